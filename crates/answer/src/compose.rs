//! Response composer: appends the sources footer.

use sinapsi_rules::{has_sources_marker, SOURCES_MARKER};

/// Append `sources` to `body` as `- <url>` lines under a `Fonti:` marker.
///
/// URLs already present in the body as whole tokens are skipped. If the
/// body already has a sources marker, the new lines go under it. No new
/// sources leaves the body unchanged.
pub fn compose(body: &str, sources: &[String]) -> String {
    let cited = url_tokens(body);
    let mut fresh: Vec<&str> = Vec::new();
    for url in sources {
        let url = url.trim();
        if url.is_empty() || cited.contains(&url) || fresh.contains(&url) {
            continue;
        }
        fresh.push(url);
    }

    if fresh.is_empty() {
        return body.to_string();
    }

    let footer: Vec<String> = fresh.iter().map(|url| format!("- {}", url)).collect();

    if has_sources_marker(body) {
        return insert_under_marker(body, &footer);
    }

    let body = body.trim_end();
    if body.is_empty() {
        format!("{}\n{}", SOURCES_MARKER, footer.join("\n"))
    } else {
        format!("{}\n\n{}\n{}", body, SOURCES_MARKER, footer.join("\n"))
    }
}

/// Whitespace- and bracket-delimited tokens of `body`, without trailing
/// sentence punctuation.
fn url_tokens(body: &str) -> Vec<&str> {
    body.split(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '<' | '>' | '"'))
        .map(|token| token.trim_end_matches(['.', ',', ';', ':', '!', '?', ']']))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Insert footer lines at the end of the block that follows the last
/// sources marker.
fn insert_under_marker(body: &str, footer: &[String]) -> String {
    let mut lines: Vec<String> = body.trim_end().lines().map(str::to_string).collect();

    let marker = lines
        .iter()
        .rposition(|line| has_sources_marker(line))
        .unwrap_or(lines.len().saturating_sub(1));

    let mut insert_at = marker + 1;
    while insert_at < lines.len() && !lines[insert_at].trim().is_empty() {
        insert_at += 1;
    }

    for (offset, line) in footer.iter().enumerate() {
        lines.insert(insert_at + offset, line.clone());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_appends_footer() {
        let out = compose("Testo.", &urls(&["https://tecnaria.com/a", "https://spit.eu/b"]));
        assert_eq!(
            out,
            "Testo.\n\nFonti:\n- https://tecnaria.com/a\n- https://spit.eu/b"
        );
    }

    #[test]
    fn test_no_sources_leaves_body() {
        assert_eq!(compose("Testo.\n", &[]), "Testo.\n");
    }

    #[test]
    fn test_reuses_existing_marker() {
        let body = "Testo.\n\nFonti:\n- https://tecnaria.com/a\n\nAltro paragrafo.";
        let out = compose(body, &urls(&["https://tecnaria.com/a", "https://spit.eu/b"]));
        assert_eq!(
            out,
            "Testo.\n\nFonti:\n- https://tecnaria.com/a\n- https://spit.eu/b\n\nAltro paragrafo."
        );
        assert_eq!(out.matches("Fonti:").count(), 1);
    }

    #[test]
    fn test_skips_duplicates() {
        let out = compose("", &urls(&["https://tecnaria.com/a", "https://tecnaria.com/a"]));
        assert_eq!(out, "Fonti:\n- https://tecnaria.com/a");
    }

    #[test]
    fn test_longer_url_in_body_does_not_hide_source() {
        let out = compose(
            "Vedi https://tecnaria.com/ctf-lamiera per i dettagli.",
            &urls(&["https://tecnaria.com/ctf"]),
        );
        assert_eq!(
            out,
            "Vedi https://tecnaria.com/ctf-lamiera per i dettagli.\n\n\
             Fonti:\n- https://tecnaria.com/ctf"
        );
    }

    #[test]
    fn test_url_cited_in_prose_is_skipped() {
        let body = "Scheda su https://tecnaria.com/ctf. Vedi anche (https://spit.eu/p560).";
        let out = compose(body, &urls(&["https://tecnaria.com/ctf", "https://spit.eu/p560"]));
        assert_eq!(out, body);
    }
}
