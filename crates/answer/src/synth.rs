//! Snippet synthesizer.
//!
//! Turns search results into a short draft: fetch a few pages, keep the
//! sentences that talk about Tecnaria products, or fall back to a plain
//! truncation of the joined text.

use crate::fetch::PageFetcher;
use crate::html::collapse_whitespace;
use sinapsi_search::SearchResult;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// Pages fetched per request, in result order.
pub const MAX_PAGES: usize = 3;

/// Characters kept from each page.
pub const PAGE_CHAR_BUDGET: usize = 4000;

pub const MAX_SENTENCES: usize = 6;

/// Keyword sentences required before the truncation fallback kicks in.
pub const MIN_KEYWORD_SENTENCES: usize = 2;

pub const FALLBACK_CHARS: usize = 600;

pub const MAX_SOURCES: usize = 3;

/// Domain keywords, matched case-insensitively as substrings.
pub const KEYWORDS: &[&str] = &[
    "connettor",
    "ctf",
    "ctl",
    "diapason",
    "lamiera",
    "soletta",
    "solaio",
    "trave",
    "calcestruzzo",
    "chiodatrice",
    "p560",
    "posa",
    "resistenza",
    "acciaio",
    "legno",
    "tecnaria",
];

/// A draft answer and the pages it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
    pub sources: Vec<String>,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

pub struct Synthesizer {
    fetcher: Arc<dyn PageFetcher>,
}

impl Synthesizer {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Build a draft from search results.
    ///
    /// Pages are fetched sequentially. A page that yields no text is
    /// replaced by its search snippet; a result with neither is skipped.
    /// Only pages that contributed text to the draft are cited.
    pub async fn synthesize(&self, results: &[SearchResult]) -> Draft {
        let mut pages: Vec<Page> = Vec::new();

        for result in results.iter().take(MAX_PAGES) {
            let text = match self.fetcher.fetch_text(&result.url).await {
                Some(text) if !text.trim().is_empty() => text,
                _ => {
                    tracing::debug!("Using search snippet for {}", result.url);
                    result.snippet.clone()
                }
            };

            let text = truncate_chars(&collapse_whitespace(&text), PAGE_CHAR_BUDGET);
            if text.is_empty() {
                continue;
            }

            pages.push(Page {
                url: &result.url,
                text,
            });
        }

        if pages.is_empty() {
            return Draft::default();
        }

        let (selected, selected_from) = select_keyword_sentences(&pages);
        if selected.len() >= MIN_KEYWORD_SENTENCES {
            return Draft {
                text: selected.join(" "),
                sources: cite(&pages, &selected_from),
            };
        }

        tracing::debug!(
            "Only {} keyword sentences; truncating page text",
            selected.len()
        );

        // Pages starting inside the kept prefix are the ones it quotes.
        let mut joined = String::new();
        let mut quoted: Vec<usize> = Vec::new();
        for (index, page) in pages.iter().enumerate() {
            if !joined.is_empty() {
                joined.push(' ');
            }
            if joined.chars().count() < FALLBACK_CHARS {
                quoted.push(index);
            }
            joined.push_str(&page.text);
        }

        let truncated = truncate_chars(&joined, FALLBACK_CHARS);
        let text = if truncated.len() < joined.len() {
            format!("{}…", truncated.trim_end())
        } else {
            truncated
        };

        Draft {
            text,
            sources: cite(&pages, &quoted),
        }
    }
}

struct Page<'a> {
    url: &'a str,
    text: String,
}

/// Keyword sentences in page order, with the index of each page that
/// supplied at least one of them.
fn select_keyword_sentences(pages: &[Page<'_>]) -> (Vec<String>, Vec<usize>) {
    let mut selected: Vec<String> = Vec::new();
    let mut supplied_by: Vec<usize> = Vec::new();

    'pages: for (index, page) in pages.iter().enumerate() {
        for sentence in page.text.unicode_sentences() {
            let sentence = sentence.trim();
            let lowered = sentence.to_lowercase();
            if !KEYWORDS.iter().any(|k| lowered.contains(k)) {
                continue;
            }
            if selected.iter().any(|s| s == sentence) {
                continue;
            }

            selected.push(sentence.to_string());
            if !supplied_by.contains(&index) {
                supplied_by.push(index);
            }
            if selected.len() >= MAX_SENTENCES {
                break 'pages;
            }
        }
    }

    (selected, supplied_by)
}

/// Distinct URLs of the given pages, capped at [`MAX_SOURCES`].
fn cite(pages: &[Page<'_>], indices: &[usize]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for &index in indices {
        let url = pages[index].url;
        if sources.len() < MAX_SOURCES && !sources.iter().any(|s| s == url) {
            sources.push(url.to_string());
        }
    }
    sources
}

/// First `max` characters of `text`, never splitting a character.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
