//! CTF wizard context.
//!
//! The browser wizard collects slab parameters and sends them as a single
//! context string. Segments follow fixed templates, are emitted in key
//! order and are joined by `", "`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wizard parameter keys, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardKey {
    /// Sheet height
    HLamiera,
    /// Slab thickness
    SSoletta,
    /// Longitudinal shear action
    Vled,
    /// Concrete class
    Cls,
    /// Connector spacing along the rib
    PassoGola,
    /// Sheet direction relative to the beam
    DirLamiera,
    /// Beam-line spacing
    SLong,
    /// Sheet thickness (optional)
    TLamiera,
    /// Connectors per rib (optional)
    NrGola,
}

impl WizardKey {
    pub const ALL: [WizardKey; 9] = [
        WizardKey::HLamiera,
        WizardKey::SSoletta,
        WizardKey::Vled,
        WizardKey::Cls,
        WizardKey::PassoGola,
        WizardKey::DirLamiera,
        WizardKey::SLong,
        WizardKey::TLamiera,
        WizardKey::NrGola,
    ];

    /// Keys a CTF calculation cannot do without.
    pub const REQUIRED_CTF: [WizardKey; 7] = [
        WizardKey::HLamiera,
        WizardKey::SSoletta,
        WizardKey::Vled,
        WizardKey::Cls,
        WizardKey::PassoGola,
        WizardKey::DirLamiera,
        WizardKey::SLong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HLamiera => "h_lamiera",
            Self::SSoletta => "s_soletta",
            Self::Vled => "vled",
            Self::Cls => "cls",
            Self::PassoGola => "passo_gola",
            Self::DirLamiera => "dir_lamiera",
            Self::SLong => "s_long",
            Self::TLamiera => "t_lamiera",
            Self::NrGola => "nr_gola",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s.trim())
    }

    /// Render one context segment for `value`.
    pub fn segment(&self, value: &str) -> String {
        match self {
            Self::HLamiera => format!("lamiera H{}", value),
            Self::SSoletta => format!("soletta {} mm", value),
            Self::Vled => format!("V_L,Ed={} kN/m", value),
            Self::Cls => format!("cls {}", value),
            Self::PassoGola => format!("passo gola {} mm", value),
            Self::DirLamiera => format!("lamiera {}", value),
            Self::SLong => format!("passo lungo trave {} mm", value),
            Self::TLamiera => format!("t={} mm", value),
            Self::NrGola => format!("nr={}", value),
        }
    }
}

/// Wizard values keyed by [`WizardKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardParams {
    values: BTreeMap<WizardKey, String>,
}

impl WizardParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value. Values are trimmed; an empty value removes the key.
    pub fn set(&mut self, key: WizardKey, value: impl AsRef<str>) {
        let value = value.as_ref().trim();
        if value.is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value.to_string());
        }
    }

    pub fn with(mut self, key: WizardKey, value: impl AsRef<str>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: WizardKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build from a JSON object as posted by the wizard.
    ///
    /// Strings and numbers are accepted; unknown keys and other value
    /// types are ignored.
    pub fn from_json(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut params = Self::new();
        for (name, value) in map {
            let key = match WizardKey::parse(name) {
                Some(key) => key,
                None => {
                    tracing::debug!("Ignoring unknown wizard key '{}'", name);
                    continue;
                }
            };
            match value {
                serde_json::Value::String(s) => params.set(key, s),
                serde_json::Value::Number(n) => params.set(key, n.to_string()),
                _ => {}
            }
        }
        params
    }

    /// Render the context string.
    pub fn format_context(&self) -> String {
        WizardKey::ALL
            .iter()
            .filter_map(|key| self.get(*key).map(|value| key.segment(value)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Recover wizard values from a context string.
    ///
    /// Segments that do not follow a wizard template are ignored, so free
    /// text typed by the user does not disturb the result.
    pub fn parse_context(context: &str) -> Self {
        let mut params = Self::new();
        for segment in context.split(", ") {
            if let Some((key, value)) = parse_segment(segment.trim()) {
                params.set(key, value);
            }
        }
        params
    }

    /// Keys from `required` that have no value, in `required` order.
    pub fn missing(&self, required: &[WizardKey]) -> Vec<WizardKey> {
        required
            .iter()
            .copied()
            .filter(|key| !self.values.contains_key(key))
            .collect()
    }
}

fn parse_segment(segment: &str) -> Option<(WizardKey, &str)> {
    if let Some(rest) = segment.strip_prefix("lamiera ") {
        // "lamiera H55" is a height, anything else is a direction.
        let mut chars = rest.chars();
        let is_height = matches!(chars.next(), Some('H') | Some('h'))
            && chars.next().map(|c| c.is_ascii_digit()).unwrap_or(false);
        return if is_height {
            Some((WizardKey::HLamiera, &rest[1..]))
        } else {
            Some((WizardKey::DirLamiera, rest))
        };
    }

    if let Some(v) = strip_unit(segment, "soletta ", " mm") {
        return Some((WizardKey::SSoletta, v));
    }
    if let Some(v) = strip_unit(segment, "V_L,Ed=", " kN/m") {
        return Some((WizardKey::Vled, v));
    }
    if let Some(v) = segment.strip_prefix("cls ") {
        return Some((WizardKey::Cls, v));
    }
    if let Some(v) = strip_unit(segment, "passo gola ", " mm") {
        return Some((WizardKey::PassoGola, v));
    }
    if let Some(v) = strip_unit(segment, "passo lungo trave ", " mm") {
        return Some((WizardKey::SLong, v));
    }
    if let Some(v) = strip_unit(segment, "t=", " mm") {
        return Some((WizardKey::TLamiera, v));
    }
    if let Some(v) = segment.strip_prefix("nr=") {
        return Some((WizardKey::NrGola, v));
    }

    None
}

fn strip_unit<'a>(segment: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    segment
        .strip_prefix(prefix)
        .map(|rest| rest.strip_suffix(suffix).unwrap_or(rest))
}
