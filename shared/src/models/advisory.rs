//! Prevention and medication advice keyed by class label

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Notice shown when a resolved label has no catalog entry
pub const NO_ADVISORY_NOTICE: &str = "No information available for this disease.";

/// Advice attached to one class label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdvisoryEntry {
    pub preventive_measures: String,
    pub medications: String,
}

impl AdvisoryEntry {
    pub fn new(preventive_measures: impl Into<String>, medications: impl Into<String>) -> Self {
        Self {
            preventive_measures: preventive_measures.into(),
            medications: medications.into(),
        }
    }
}

/// Outcome of an advisory lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Advisory {
    Available(AdvisoryEntry),
    /// The label is not in the catalog; the classification is still reported
    NotAvailable { label: String },
}

impl Advisory {
    pub fn entry(&self) -> Option<&AdvisoryEntry> {
        match self {
            Advisory::Available(entry) => Some(entry),
            Advisory::NotAvailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Advisory::Available(_))
    }
}

/// Static label → advice table for one crop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisoryCatalog {
    entries: HashMap<String, AdvisoryEntry>,
}

impl AdvisoryCatalog {
    pub fn from_entries<I, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (L, AdvisoryEntry)>,
        L: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, entry)| (label.into(), entry))
                .collect(),
        }
    }

    pub fn lookup(&self, label: &str) -> Advisory {
        match self.entries.get(label) {
            Some(entry) => Advisory::Available(entry.clone()),
            None => Advisory::NotAvailable {
                label: label.to_string(),
            },
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> AdvisoryCatalog {
        AdvisoryCatalog::from_entries([(
            "Cherry_Healthy",
            AdvisoryEntry::new("Inspect regularly.", "No action needed."),
        )])
    }

    #[test]
    fn test_lookup_known_label() {
        let advisory = catalog().lookup("Cherry_Healthy");
        assert!(advisory.is_available());
        assert_eq!(advisory.entry().unwrap().medications, "No action needed.");
    }

    #[test]
    fn test_lookup_unknown_label() {
        let advisory = catalog().lookup("Cherry_Leaf_Curl");
        assert_eq!(
            advisory,
            Advisory::NotAvailable {
                label: "Cherry_Leaf_Curl".to_string()
            }
        );
        assert!(advisory.entry().is_none());
    }
}
