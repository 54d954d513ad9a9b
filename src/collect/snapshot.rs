//! Recorded catalog replayed from a JSON file
//!
//! ```json
//! [
//!   { "query": "show tables in sales like '*'",
//!     "rows": [ { "database": "sales", "tableName": "orders", "isTemporary": false } ] }
//! ]
//! ```
//!
//! Queries are matched after collapsing whitespace and lower-casing.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogClient, CatalogRow};
use crate::error::SchemaCompareError;
use crate::util::collapse_spaces;

/// One recorded query and its result rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub query: String,
    #[serde(default)]
    pub rows: Vec<CatalogRow>,
}

/// A [`CatalogClient`] answering from recorded results.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCatalog {
    results: HashMap<String, Vec<CatalogRow>>,
}

fn query_key(sql: &str) -> String {
    collapse_spaces(sql).to_lowercase()
}

impl SnapshotCatalog {
    pub fn from_entries(entries: Vec<SnapshotEntry>) -> Self {
        Self {
            results: entries
                .into_iter()
                .map(|e| (query_key(&e.query), e.rows))
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, SchemaCompareError> {
        let content = std::fs::read_to_string(path).map_err(|e| SchemaCompareError::SnapshotError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let entries: Vec<SnapshotEntry> =
            serde_json::from_str(&content).map_err(|e| SchemaCompareError::SnapshotError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(Self::from_entries(entries))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl CatalogClient for SnapshotCatalog {
    fn query(&mut self, sql: &str) -> Result<Vec<CatalogRow>, SchemaCompareError> {
        self.results
            .get(&query_key(sql))
            .cloned()
            .ok_or_else(|| SchemaCompareError::QueryError {
                sql: sql.to_string(),
                message: "query not present in catalog snapshot".to_string(),
            })
    }
}
