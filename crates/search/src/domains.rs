//! Preferred-domain allow-list.
//!
//! Only results whose host equals an allowed domain, or is a subdomain of
//! one, may be fetched or cited. An empty allow-list admits nothing.

use url::Url;

/// Host-suffix allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainFilter {
    domains: Vec<String>,
}

impl DomainFilter {
    /// Build a filter from raw domain strings.
    ///
    /// Entries are lowercased; schemes, paths, `www.` and wildcard prefixes
    /// are stripped, so `https://www.tecnaria.com/it` becomes `tecnaria.com`.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for raw in domains {
            if let Some(domain) = normalize_domain(raw.as_ref()) {
                if !normalized.contains(&domain) {
                    normalized.push(domain);
                }
            }
        }
        Self {
            domains: normalized,
        }
    }

    /// The normalized domains, in configuration order.
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Whether `url` is an http(s) URL on an allowed host.
    pub fn allows(&self, url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => return false,
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }

        let host = match parsed.host_str() {
            Some(h) => h.trim_end_matches('.').to_lowercase(),
            None => return false,
        };

        self.domains
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
    }

    /// Narrow a query to the allowed domains with `site:` operators.
    pub fn narrow_query(&self, query: &str) -> String {
        if self.domains.is_empty() {
            return query.to_string();
        }

        let sites: Vec<String> = self.domains.iter().map(|d| format!("site:{}", d)).collect();
        format!("{} ({})", query.trim(), sites.join(" OR "))
    }
}

fn normalize_domain(raw: &str) -> Option<String> {
    let mut domain = raw.trim().to_lowercase();

    for scheme in ["https://", "http://"] {
        if let Some(rest) = domain.strip_prefix(scheme) {
            domain = rest.to_string();
        }
    }

    if let Some(idx) = domain.find('/') {
        domain.truncate(idx);
    }

    let domain = domain
        .trim_start_matches("*.")
        .trim_start_matches('.')
        .trim_end_matches('.');
    let domain = domain.strip_prefix("www.").unwrap_or(domain);

    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}
