//! Character-set catalog.
//!
//! Sets ship as embedded JSON. Bad catalog data never stops the board: it is
//! logged and replaced by a one-row fallback.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

const BUILTIN_JSON: &str = include_str!("../assets/charsets.json");

/// A named, sparse matrix template. `None` cells hold no card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterSet {
    pub id: String,
    pub name: String,
    pub matrix: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no character sets")]
    Empty,
    #[error("default character set `{0}` is not in the catalog")]
    UnknownDefault(String),
    #[error("character set id `{0}` appears more than once")]
    DuplicateId(String),
    #[error("character set `{id}` row {row} differs in length from row 0")]
    RaggedMatrix { id: String, row: usize },
}

#[derive(Deserialize)]
struct CatalogFile {
    default: String,
    sets: Vec<CharacterSet>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    sets: Vec<CharacterSet>,
    default_idx: usize,
}

impl Catalog {
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::new(file.sets, &file.default)
    }

    pub fn new(sets: Vec<CharacterSet>, default_id: &str) -> Result<Self, CatalogError> {
        if sets.is_empty() {
            return Err(CatalogError::Empty);
        }
        {
            let mut seen = HashSet::new();
            for set in &sets {
                if !seen.insert(set.id.as_str()) {
                    return Err(CatalogError::DuplicateId(set.id.clone()));
                }
                let cols = set.matrix.first().map(Vec::len).unwrap_or(0);
                if let Some(row) = set.matrix.iter().position(|r| r.len() != cols) {
                    return Err(CatalogError::RaggedMatrix {
                        id: set.id.clone(),
                        row,
                    });
                }
            }
        }
        let default_idx = sets
            .iter()
            .position(|s| s.id == default_id)
            .ok_or_else(|| CatalogError::UnknownDefault(default_id.to_string()))?;
        Ok(Self { sets, default_idx })
    }

    /// The embedded catalog, or the fallback if it fails to load.
    pub fn builtin() -> Self {
        match Self::from_json(BUILTIN_JSON) {
            Ok(catalog) => {
                log::info!("loaded {} character sets", catalog.sets.len());
                catalog
            }
            Err(e) => {
                log::warn!("built-in catalog rejected ({e}); using fallback");
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> Self {
        let row = ["あ", "い", "う", "え", "お"]
            .iter()
            .map(|c| Some(c.to_string()))
            .collect();
        Self {
            sets: vec![CharacterSet {
                id: "vowels".into(),
                name: "あいうえお".into(),
                matrix: vec![row],
            }],
            default_idx: 0,
        }
    }

    pub fn sets(&self) -> &[CharacterSet] {
        &self.sets
    }

    pub fn get(&self, id: &str) -> Option<&CharacterSet> {
        self.sets.iter().find(|s| s.id == id)
    }

    pub fn default_set(&self) -> &CharacterSet {
        &self.sets[self.default_idx]
    }
}
