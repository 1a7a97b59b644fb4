//! Project catalog - the page's project records, loaded once at start-up.
//!
//! - [`filter`] - category filter buttons over the project cards
//! - [`modal`] - the project detail dialog
//!
//! Card `i` on the page has the id `project-card-<i>` and shows record `i`.

pub mod filter;
pub mod modal;

pub use filter::{Filter, FilterControl};
pub use modal::ModalViewer;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ElementId;

/// One project, exactly as supplied by the page data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub title: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<ProjectRecord>,
}

impl Catalog {
    pub fn new(records: Vec<ProjectRecord>) -> Self {
        Self { records }
    }

    /// Parse a JSON array of project records.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, index: usize) -> Option<&ProjectRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectRecord> {
        self.records.iter()
    }

    /// Number of records `filter` lets through.
    pub fn count_in(&self, filter: &Filter) -> usize {
        self.records
            .iter()
            .filter(|r| filter.matches(&r.category))
            .count()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.category.as_str()) {
                seen.push(&record.category);
            }
        }
        seen
    }
}

/// Element id of the card showing record `index`.
pub fn card_id(index: usize) -> ElementId {
    ElementId::new(format!("project-card-{index}"))
}
