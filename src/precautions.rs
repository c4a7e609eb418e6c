//! Disease → precautions lookup, loaded once from `precautions.json`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// At most this many precautions are kept per disease.
pub const MAX_PRECAUTIONS: usize = 4;

/// One row of the precaution table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecautionRow {
    pub disease: String,
    #[serde(default)]
    pub precautions: Vec<String>,
}

/// Result of a table lookup. Keeps "unknown disease" apart from
/// "known disease with nothing documented".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrecautionLookup {
    Unrecognized,
    Documented(Vec<String>),
}

impl PrecautionLookup {
    pub fn into_list(self) -> Vec<String> {
        match self {
            PrecautionLookup::Unrecognized => Vec::new(),
            PrecautionLookup::Documented(list) => list,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PrecautionTable {
    /// Keyed by lowercased disease name.
    entries: HashMap<String, Vec<String>>,
}

impl PrecautionTable {
    /// Build from table rows. Blank cells are dropped and each row is capped
    /// at `MAX_PRECAUTIONS`. A later row for the same disease replaces an
    /// earlier one.
    pub fn from_rows(rows: Vec<PrecautionRow>) -> Self {
        let entries = rows
            .into_iter()
            .map(|row| {
                let precautions: Vec<String> = row
                    .precautions
                    .into_iter()
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .take(MAX_PRECAUTIONS)
                    .collect();
                (row.disease.trim().to_lowercase(), precautions)
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, disease: &str) -> PrecautionLookup {
        match self.entries.get(&disease.trim().to_lowercase()) {
            Some(list) => PrecautionLookup::Documented(list.clone()),
            None => PrecautionLookup::Unrecognized,
        }
    }

    /// Case-insensitive exact match; empty when the disease is unknown.
    pub fn resolve(&self, disease: &str) -> Vec<String> {
        self.lookup(disease).into_list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PrecautionTable {
        PrecautionTable::from_rows(vec![
            PrecautionRow {
                disease: "Malaria".into(),
                precautions: vec![
                    "Consult nearest hospital".into(),
                    "avoid oily food".into(),
                    "avoid non veg food".into(),
                    "keep mosquitos out".into(),
                ],
            },
            PrecautionRow {
                disease: "Allergy".into(),
                precautions: vec![
                    "apply calamine".into(),
                    " ".into(),
                    "use ice to compress itching".into(),
                ],
            },
            PrecautionRow {
                disease: "Rare Thing".into(),
                precautions: vec![],
            },
        ])
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let t = table();
        assert_eq!(t.resolve("malaria").len(), 4);
        assert_eq!(t.resolve("MALARIA"), t.resolve("Malaria"));
        assert_eq!(t.resolve("Malaria")[0], "Consult nearest hospital");
    }

    #[test]
    fn unknown_disease_yields_empty_list() {
        assert!(table().resolve("Dengue").is_empty());
    }

    #[test]
    fn resolve_is_idempotent() {
        let t = table();
        let first = t.resolve("Allergy");
        let second = t.resolve("Allergy");
        assert_eq!(first, second);
    }

    #[test]
    fn blank_cells_skipped() {
        assert_eq!(
            table().resolve("allergy"),
            vec!["apply calamine", "use ice to compress itching"]
        );
    }

    #[test]
    fn lookup_distinguishes_unknown_from_undocumented() {
        let t = table();
        assert_eq!(t.lookup("Dengue"), PrecautionLookup::Unrecognized);
        assert_eq!(t.lookup("rare thing"), PrecautionLookup::Documented(vec![]));
    }

    #[test]
    fn rows_capped_at_four() {
        let t = PrecautionTable::from_rows(vec![PrecautionRow {
            disease: "Flu".into(),
            precautions: (1..=6).map(|i| format!("step {i}")).collect(),
        }]);
        assert_eq!(t.resolve("flu").len(), MAX_PRECAUTIONS);
    }
}
