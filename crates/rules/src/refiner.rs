//! Text refiner.
//!
//! A pure, idempotent cleanup applied to rule answers before they reach a
//! caller: boilerplate headers go, the standard lead sentence is ensured,
//! and any "Fonti" marker line is normalized.

/// Lead sentence every refined answer starts with.
pub const LEAD_SENTENCE: &str = "Ecco le indicazioni tecniche Tecnaria.";

/// Canonical sources section marker.
pub const SOURCES_MARKER: &str = "Fonti:";

const HEADING_TITLES: &[&str] = &["risposta tecnica", "risposta", "answer", "sinapsi"];

const LINE_PREFIXES: &[&str] = &["risposta tecnica:", "risposta:", "answer:", "sinapsi:"];

const MODE_TAGS: &[&str] = &["[override]", "[augment]", "[postscript]"];

/// Refine answer text.
///
/// `refine(&refine(x)) == refine(x)` for every input. Empty (or
/// all-boilerplate) input yields an empty string.
pub fn refine(text: &str) -> String {
    let mut body = text.replace("\r\n", "\n");

    // Each pass only removes characters, so this terminates.
    loop {
        let stripped = strip_boilerplate(&body);
        if stripped == body {
            break;
        }
        body = stripped;
    }

    let body = collapse_blank_lines(&normalize_sources_marker(&body));
    if body.is_empty() || starts_with_lead(&body) {
        return body;
    }

    format!("{}\n\n{}", LEAD_SENTENCE, body)
}

/// Whether any line of `text` is a sources marker in some spelling.
pub fn has_sources_marker(text: &str) -> bool {
    text.lines().any(is_sources_marker)
}

fn starts_with_lead(text: &str) -> bool {
    text.get(..LEAD_SENTENCE.len())
        .map(|head| head.to_lowercase() == LEAD_SENTENCE.to_lowercase())
        .unwrap_or(false)
}

fn strip_boilerplate(text: &str) -> String {
    text.lines()
        .filter(|line| !is_boilerplate_heading(line))
        .map(strip_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_boilerplate_heading(line: &str) -> bool {
    let trimmed = line.trim();
    if !trimmed.starts_with('#') {
        return false;
    }

    let title = trimmed
        .trim_start_matches('#')
        .trim_matches(|c: char| c.is_whitespace() || c == '*' || c == ':')
        .to_lowercase();
    HEADING_TITLES.contains(&title.as_str())
}

fn strip_line(line: &str) -> String {
    let line = remove_mode_tags(line.trim_end());
    let trimmed = line.trim_start();

    for prefix in LINE_PREFIXES {
        let matches = trimmed
            .get(..prefix.len())
            .map(|head| head.eq_ignore_ascii_case(prefix))
            .unwrap_or(false);
        if matches {
            return trimmed[prefix.len()..].trim_start().to_string();
        }
    }

    line
}

fn remove_mode_tags(line: &str) -> String {
    let mut out = line.to_string();
    for tag in MODE_TAGS {
        // ASCII lowercasing keeps byte offsets aligned with `out`.
        while let Some(start) = out.to_ascii_lowercase().find(tag) {
            let mut end = start + tag.len();
            if out[end..].starts_with(' ') {
                end += 1;
            }
            out.replace_range(start..end, "");
        }
    }
    out
}

fn is_sources_marker(line: &str) -> bool {
    let word = line
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '#' | '*' | '_' | ':'));
    word.eq_ignore_ascii_case("fonti")
}

fn normalize_sources_marker(text: &str) -> String {
    text.lines()
        .map(|line| {
            if is_sources_marker(line) {
                SOURCES_MARKER
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_blank_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut blank_run = 0;

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        lines.push(line);
    }

    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_lead_sentence() {
        assert_eq!(
            refine("Usare connettori CTF."),
            "Ecco le indicazioni tecniche Tecnaria.\n\nUsare connettori CTF."
        );
    }

    #[test]
    fn test_keeps_existing_lead_case_insensitive() {
        let text = "ECCO LE INDICAZIONI TECNICHE TECNARIA. Usare CTF.";
        assert_eq!(refine(text), text);
    }

    #[test]
    fn test_strips_boilerplate() {
        let raw =
            "## Risposta\n[override] Risposta tecnica: Sinapsi: Usare la P560.\n\n\n\nDettagli.";
        assert_eq!(
            refine(raw),
            "Ecco le indicazioni tecniche Tecnaria.\n\nUsare la P560.\n\nDettagli."
        );
    }

    #[test]
    fn test_normalizes_sources_marker() {
        let raw = "Testo.\n\n**FONTI**\n- https://tecnaria.com";
        let refined = refine(raw);
        assert!(refined.ends_with("Testo.\n\nFonti:\n- https://tecnaria.com"));
        assert!(has_sources_marker("### fonti:"));
        assert!(!has_sources_marker("Le fonti sono varie"));
    }

    #[test]
    fn test_empty_stays_empty() {
        assert_eq!(refine(""), "");
        assert_eq!(refine("  \n\n "), "");
        assert_eq!(refine("# Sinapsi\nAnswer:"), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "Usare CTF.",
            "## Answer\nAnswer: Answer: testo",
            "[over[override]ride] testo",
            "Sinapsi:\n\n\n\nfonti\n- a\n\n\n",
            "  Risposta:   indentato  \r\n\r\n\r\n## Fonti ##",
            "Ecco le indicazioni tecniche Tecnaria.",
        ];
        for sample in samples {
            let once = refine(sample);
            assert_eq!(refine(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
