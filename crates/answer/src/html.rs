//! HTML to plain text.

use scraper::{ElementRef, Html};

/// Elements whose text never reaches the reader.
const IGNORED_ELEMENTS: &[&str] = &["script", "style", "noscript", "head", "template", "svg"];

/// Extract the visible text of an HTML document, whitespace collapsed.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);
    collapse_whitespace(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !IGNORED_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, out);
            }
        }
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_script_and_style() {
        let html = r#"<html><head><title>CTF</title><style>p { color: red }</style></head>
            <body><p>Il connettore CTF si posa a secco.</p>
            <script>var tracking = 1;</script>
            <noscript>Abilita JavaScript</noscript>
            <p>Chiodatrice   P560.</p></body></html>"#;

        assert_eq!(
            html_to_text(html),
            "Il connettore CTF si posa a secco. Chiodatrice P560."
        );
    }

    #[test]
    fn test_fragment_without_html_wrapper() {
        assert_eq!(html_to_text("<div>lamiera <b>H55</b></div>"), "lamiera H55");
    }
}
