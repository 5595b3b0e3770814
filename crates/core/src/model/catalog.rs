use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog has no entries")]
    Empty,

    #[error("catalog entry name cannot be blank")]
    BlankName,

    #[error("catalog entry {name:?} has a blank description")]
    BlankDescription { name: String },

    #[error("duplicate catalog name: {name}")]
    DuplicateName { name: String },

    #[error("duplicate catalog description: {description}")]
    DuplicateDescription { description: String },

    #[error("no catalog entry named {name:?}")]
    NotFound { name: String },
}

/// One matchable item and the description it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    name: String,
    description: String,
}

impl CatalogEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

const BUILT_IN: [(&str, &str); 8] = [
    ("TruLens", "Evaluations & tracing for LLM apps"),
    (
        "Apache Iceberg",
        "Open table format for huge analytics datasets",
    ),
    ("Apache Polaris", "Open metadata and data catalog system"),
    ("Arctic Embed", "Tiny but powerful embedding model"),
    ("Streamlit", "Build and share beautiful data apps"),
    ("ArcticTraining", "Simplify LLM training experiments"),
    ("Apache NiFi", "Process and distribute multimodal data"),
    ("Modin", "Scale up pandas"),
];

/// Fixed, ordered set of item/description pairs a quiz is played against.
///
/// Names are unique and descriptions are unique, so every description maps back
/// to exactly one item. Entry order is declaration order and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from custom entries.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the list is empty, a field is blank, or a name
    /// or description appears twice.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut names = HashSet::with_capacity(entries.len());
        let mut descriptions = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.name.trim().is_empty() {
                return Err(CatalogError::BlankName);
            }
            if entry.description.trim().is_empty() {
                return Err(CatalogError::BlankDescription {
                    name: entry.name.clone(),
                });
            }
            if !names.insert(entry.name.as_str()) {
                return Err(CatalogError::DuplicateName {
                    name: entry.name.clone(),
                });
            }
            if !descriptions.insert(entry.description.as_str()) {
                return Err(CatalogError::DuplicateDescription {
                    description: entry.description.clone(),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up the correct description for `name`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no entry carries that name.
    pub fn describe(&self, name: &str) -> Result<&str, CatalogError> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(CatalogEntry::description)
            .ok_or_else(|| CatalogError::NotFound {
                name: name.to_owned(),
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    #[must_use]
    pub fn descriptions(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.description.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    /// The built-in eight-entry open source tools catalog.
    fn default() -> Self {
        Self {
            entries: BUILT_IN
                .iter()
                .map(|(name, description)| CatalogEntry::new(*name, *description))
                .collect(),
        }
    }
}
