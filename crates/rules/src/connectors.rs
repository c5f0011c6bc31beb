//! Internal connector catalog.
//!
//! A data file of Tecnaria connectors (installation rates, list prices,
//! specification links). When a question names a catalogued connector the
//! pipeline appends a technical note built from its entry.

use serde::{Deserialize, Serialize};
use sinapsi_core::{AppError, AppResult};
use std::path::Path;

/// Heading placed above the internal technical note.
pub const INTERNAL_NOTE_HEADING: &str = "📌 Nota tecnica (fonte interna):";

/// Rental terms quoted for connectors installed with the P560 nailer.
const NAILER_RENTAL: &str =
    "Noleggio chiodatrice: 100 € (prima settimana) / 50 € (settimane successive)";

/// Product families whose prefix in a question boosts a matching name.
const FAMILY_PREFIXES: &[(&str, &str)] = &[
    ("ctf", "ctf"),
    ("ctl", "ctl"),
    ("gts", "gts"),
    ("vcem", "v cem"),
    ("ctcem", "ct cem"),
    ("diapason", "diapason"),
];

/// One catalogued connector. Only `name` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub name: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub substrate: Option<String>,

    /// Average pieces per square metre
    #[serde(default, rename = "incidenza_pz_m2")]
    pub pieces_per_m2: Option<f64>,

    /// Pieces laid per day by one installer
    #[serde(default, rename = "velocita_pz_giorno_1_persona")]
    pub pieces_per_day: Option<f64>,

    /// Joints per hour by a crew of two
    #[serde(default, rename = "velocita_giunzioni_ora_2_persone")]
    pub joints_per_hour: Option<f64>,

    #[serde(default, rename = "price_eur_listino")]
    pub list_price_eur: Option<f64>,

    #[serde(default)]
    pub price_notes: Option<String>,

    #[serde(default)]
    pub install_notes: Option<String>,

    #[serde(default)]
    pub equipment: Option<String>,

    #[serde(default)]
    pub capitolato_url: Option<String>,
}

impl Connector {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Bullet lines for the fields that are present, in a fixed order.
    pub fn technical_note(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        if self.category.is_some() || self.substrate.is_some() {
            let mut line = format!(
                "• Ambito: {}",
                self.category.as_deref().unwrap_or("n.d.")
            );
            if let Some(substrate) = &self.substrate {
                line.push_str(&format!(" · Supporto: {}", substrate));
            }
            lines.push(line);
        }

        if let Some(n) = self.pieces_per_m2 {
            lines.push(format!("• Incidenza media: {} pz/m²", n));
        }
        if let Some(n) = self.pieces_per_day {
            lines.push(format!("• Velocità di posa: {} pz/giorno (1 persona)", n));
        }
        if let Some(n) = self.joints_per_hour {
            lines.push(format!("• Produttività: {} giunzioni/ora (2 persone)", n));
        }

        if let Some(price) = self.list_price_eur {
            let mut line = format!("• Prezzo di listino indicativo: {} €/cad", price);
            if let Some(notes) = self.price_notes.as_deref().filter(|n| !n.trim().is_empty()) {
                line.push_str(&format!(" ({})", notes));
            }
            lines.push(line);
        }

        let lowered = self.name.to_lowercase();
        if lowered.contains("ctf") || lowered.contains("diapason") {
            lines.push(format!("• {}", NAILER_RENTAL));
        }

        if let Some(notes) = non_blank(&self.install_notes) {
            lines.push(format!("• Posa: {}", notes));
        }
        if let Some(equipment) = non_blank(&self.equipment) {
            lines.push(format!("• Attrezzatura: {}", equipment));
        }
        if let Some(url) = non_blank(&self.capitolato_url) {
            lines.push(format!("• Voce di capitolato: {}", url));
        }

        lines.join("\n")
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { connettori: Vec<Connector> },
    List(Vec<Connector>),
}

/// Immutable connector catalog, in file order.
#[derive(Debug, Clone, Default)]
pub struct ConnectorCatalog {
    connectors: Vec<Connector>,
}

impl ConnectorCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_connectors(connectors: Vec<Connector>) -> Self {
        Self {
            connectors: connectors
                .into_iter()
                .filter(|c| !c.name.trim().is_empty())
                .collect(),
        }
    }

    /// Load the catalog at `path`. Never fails: a missing or unreadable
    /// file yields an empty catalog.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::empty();
        };

        if !path.exists() {
            tracing::debug!("No connector catalog at {:?}", path);
            return Self::empty();
        }

        match read_catalog(path) {
            Ok(catalog) => {
                tracing::info!("Loaded {} connectors from {:?}", catalog.len(), path);
                catalog
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Self::empty()
            }
        }
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// The connector a question is most likely about.
    ///
    /// An exact name match wins. Otherwise each name is scored by the
    /// tokens it shares with the question, plus a small boost when the
    /// question names the connector's family. Names sharing no token are
    /// never chosen, and ties go to the earlier entry.
    pub fn find(&self, question: &str) -> Option<&Connector> {
        let target = squash(question);
        if target.is_empty() {
            return None;
        }

        if let Some(exact) = self.connectors.iter().find(|c| squash(&c.name) == target) {
            return Some(exact);
        }

        let query_tokens = tokenize(question);
        let mut best: Option<(f32, &Connector)> = None;

        for connector in &self.connectors {
            let name_tokens = tokenize(&connector.name);
            let overlap = name_tokens
                .iter()
                .filter(|t| query_tokens.contains(t))
                .count();
            if overlap == 0 {
                continue;
            }

            let lowered = connector.name.to_lowercase();
            let family_boost = FAMILY_PREFIXES.iter().any(|(token, prefix)| {
                query_tokens.iter().any(|t| t == token) && lowered.starts_with(prefix)
            });

            let score = overlap as f32 + if family_boost { 0.25 } else { 0.0 };
            if best.map(|(top, _)| score > top).unwrap_or(true) {
                best = Some((score, connector));
            }
        }

        best.map(|(_, connector)| connector)
    }

    /// The technical note for `question`, if it names a connector with at
    /// least one documented field.
    pub fn note_for(&self, question: &str) -> Option<String> {
        let connector = self.find(question)?;
        let note = connector.technical_note();
        if note.trim().is_empty() {
            return None;
        }
        tracing::debug!("Internal note from connector '{}'", connector.name);
        Some(note)
    }
}

fn read_catalog(path: &Path) -> AppResult<ConnectorCatalog> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::Rules(format!("Failed to read catalog {:?}: {}", path, e)))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let file: CatalogFile = if is_yaml {
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Rules(format!("Failed to parse catalog {:?}: {}", path, e)))?
    } else {
        serde_json::from_str(&content)
            .map_err(|e| AppError::Rules(format!("Failed to parse catalog {:?}: {}", path, e)))?
    };

    let connectors = match file {
        CatalogFile::Wrapped { connettori } => connettori,
        CatalogFile::List(list) => list,
    };
    Ok(ConnectorCatalog::from_connectors(connectors))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Lowercase alphanumerics only, `ø` folded to `o`.
fn squash(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c == 'ø' { 'o' } else { c })
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Lowercase word tokens; `12/40` yields `12` and `40`.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ctf(name: &str, price: f64) -> Connector {
        Connector {
            category: Some("Solai collaboranti acciaio-calcestruzzo".to_string()),
            substrate: Some("lamiera grecata".to_string()),
            list_price_eur: Some(price),
            ..Connector::new(name)
        }
    }

    fn catalog() -> ConnectorCatalog {
        ConnectorCatalog::from_connectors(vec![
            ctf("CTF 12/40", 1.9),
            ctf("CTF 12/60", 2.1),
            Connector {
                pieces_per_m2: Some(4.0),
                ..Connector::new("CTL MAXI 12/040")
            },
            Connector::new("GTS"),
        ])
    }

    #[test]
    fn test_find_prefers_best_overlap() {
        let catalog = catalog();
        let found = catalog.find("Qual è il prezzo del CTF 12/60?").unwrap();
        assert_eq!(found.name, "CTF 12/60");

        let found = catalog.find("posa dei ctl maxi").unwrap();
        assert_eq!(found.name, "CTL MAXI 12/040");
    }

    #[test]
    fn test_find_exact_name() {
        assert_eq!(catalog().find("ctf12/40").unwrap().name, "CTF 12/40");
    }

    #[test]
    fn test_find_ties_go_to_first_entry() {
        assert_eq!(catalog().find("connettori CTF").unwrap().name, "CTF 12/40");
    }

    #[test]
    fn test_find_requires_shared_token() {
        assert!(catalog().find("Come si taglia la lamiera?").is_none());
        assert!(catalog().find("   ").is_none());
    }

    #[test]
    fn test_note_lists_present_fields_in_order() {
        let note = ctf("CTF 12/40", 1.9).technical_note();
        assert_eq!(
            note,
            "• Ambito: Solai collaboranti acciaio-calcestruzzo · Supporto: lamiera grecata\n\
             • Prezzo di listino indicativo: 1.9 €/cad\n\
             • Noleggio chiodatrice: 100 € (prima settimana) / 50 € (settimane successive)"
        );
    }

    #[test]
    fn test_note_without_fields_is_skipped() {
        assert!(catalog().note_for("Posa dei GTS").is_none());
        assert_eq!(
            catalog().note_for("ctl maxi").as_deref(),
            Some("• Incidenza media: 4 pz/m²")
        );
    }

    #[test]
    fn test_load_wrapped_json_and_yaml_list() {
        let temp = TempDir::new().unwrap();

        let json = temp.path().join("connettori.json");
        std::fs::write(
            &json,
            r#"{"connettori": [{"name": "CTF 12/40", "incidenza_pz_m2": 6}, {"name": " "}]}"#,
        )
        .unwrap();
        let catalog = ConnectorCatalog::load(Some(&json));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.connectors()[0].pieces_per_m2, Some(6.0));

        let yaml = temp.path().join("connettori.yaml");
        std::fs::write(&yaml, "- name: Diapason\n  equipment: Chiodatrice P560\n").unwrap();
        let catalog = ConnectorCatalog::load(Some(&yaml));
        assert_eq!(
            catalog.note_for("diapason").as_deref(),
            Some(
                "• Noleggio chiodatrice: 100 € (prima settimana) / 50 € (settimane successive)\n\
                 • Attrezzatura: Chiodatrice P560"
            )
        );
    }

    #[test]
    fn test_load_missing_or_broken_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(ConnectorCatalog::load(None).is_empty());
        assert!(ConnectorCatalog::load(Some(&temp.path().join("nope.json"))).is_empty());

        let broken = temp.path().join("broken.json");
        std::fs::write(&broken, "{\"connettori\": [").unwrap();
        assert!(ConnectorCatalog::load(Some(&broken)).is_empty());
    }
}
