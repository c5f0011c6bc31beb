//! Provider selector.

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Brave,
    Bing,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "brave" => Some(Self::Brave),
            "bing" => Some(Self::Bing),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brave => "brave",
            Self::Bing => "bing",
        }
    }

    /// Default API endpoint.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Brave => "https://api.search.brave.com/res/v1/web/search",
            Self::Bing => "https://api.bing.microsoft.com/v7.0/search",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_parsing() {
        assert_eq!(ProviderType::parse("brave"), Some(ProviderType::Brave));
        assert_eq!(ProviderType::parse(" BING "), Some(ProviderType::Bing));
        assert_eq!(ProviderType::parse("google"), None);
        assert_eq!(ProviderType::Bing.as_str(), "bing");
    }
}
