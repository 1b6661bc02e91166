use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use crate::models::AttractionRecord;

const SEED_CATALOG: &str = include_str!("../data/attractions.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("attraction at position {0} has an empty id")]
    EmptyId(usize),
    #[error("duplicate attraction id {0}")]
    DuplicateId(String),
}

/// Read-only attraction list, kept in insertion order.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<AttractionRecord>,
}

impl Catalog {
    pub fn new(records: Vec<AttractionRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for (position, record) in records.iter().enumerate() {
            if record.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(position));
            }
            if !seen.insert(record.id.as_str()) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
        }

        Ok(Self { records })
    }

    pub fn seeded() -> Result<Self, CatalogError> {
        Self::from_json_str(SEED_CATALOG)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let records = serde_json::from_str::<Vec<AttractionRecord>>(raw)?;
        Self::new(records)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn list_all(&self) -> &[AttractionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn head(&self, count: usize) -> &[AttractionRecord] {
        &self.records[..count.min(self.records.len())]
    }

    pub fn find_by_id(&self, id: &str) -> Option<&AttractionRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Case-insensitive match in either direction: the record name inside the
    /// text, or the text inside the record name. First hit in catalog order wins.
    pub fn find_by_name_substring(&self, text: &str) -> Option<&AttractionRecord> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.records.iter().find(|record| {
            let name = record.name.to_lowercase();
            needle.contains(&name) || name.contains(&needle)
        })
    }
}
