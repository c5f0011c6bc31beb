//! Off-topic guard.
//!
//! Questions clearly outside Tecnaria's product range get a fixed reply
//! instead of a web search. Terms are matched as whole words.

/// Reply to an off-topic question.
pub const OFF_TOPIC_MESSAGE: &str = "Rispondo esclusivamente su prodotti e sistemi Tecnaria S.p.A. \
     (CTF, CTL/MAXI, VCEM/CTCEM, DIAPASON, GTS, P560, accessori, ordini/forniture). \
     Riformula la domanda in questo perimetro.";

/// Blocked terms. Multi-word entries match consecutive words.
pub const BLOCKED_TERMS: &[&str] = &[
    "bitcoin",
    "binance",
    "forex",
    "tourism",
    "hotel",
    "iphone",
    "android",
    "python code",
    "javascript",
    "football",
    "soccer",
    "car",
    "trading",
];

/// Whether `question` mentions a blocked term.
pub fn is_off_topic(question: &str) -> bool {
    let asked = words(question);
    BLOCKED_TERMS.iter().any(|term| {
        let term = words(term);
        !term.is_empty() && asked.windows(term.len()).any(|w| w == term.as_slice())
    })
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
