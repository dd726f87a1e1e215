//! Static reference data: equipment, livestock and sample comments.
//!
//! The built-in catalog is compiled into the binary from the JSON files in
//! `data/`. It is loaded once and never mutated; builds copy items out of it.

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::*;

const EQUIPMENT_JSON: &str = include_str!("data/equipment.json");
const LIVESTOCK_JSON: &str = include_str!("data/livestock.json");
const COMMENTS_JSON: &str = include_str!("data/comments.json");

/// Read-only catalog of purchasable items.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    equipment: Vec<Equipment>,
    livestock: Vec<Livestock>,
    sample_comments: Vec<Comment>,
}

/// Equipment search as offered by the catalog browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquipmentFilter {
    /// Case-insensitive substring of name, model number or category.
    #[serde(default)]
    pub query: String,
    /// Restrict to these categories. Empty means every category.
    #[serde(default)]
    pub categories: HashSet<EquipmentCategory>,
}

/// Livestock search as offered by the catalog browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LivestockFilter {
    /// Case-insensitive substring of common or scientific name.
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub kind: Option<LivestockKind>,
}

impl CatalogStore {
    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(EQUIPMENT_JSON, LIVESTOCK_JSON, COMMENTS_JSON)
    }

    pub fn from_json(equipment: &str, livestock: &str, comments: &str) -> Result<Self> {
        let equipment: Vec<Equipment> =
            serde_json::from_str(equipment).context("Failed to parse equipment catalog")?;
        let livestock: Vec<Livestock> =
            serde_json::from_str(livestock).context("Failed to parse livestock catalog")?;
        let sample_comments: Vec<Comment> =
            serde_json::from_str(comments).context("Failed to parse sample comments")?;

        tracing::debug!(
            equipment = equipment.len(),
            livestock = livestock.len(),
            "Loaded catalog"
        );

        Ok(Self::new(equipment, livestock, sample_comments))
    }

    pub fn new(
        equipment: Vec<Equipment>,
        livestock: Vec<Livestock>,
        sample_comments: Vec<Comment>,
    ) -> Self {
        Self {
            equipment,
            livestock,
            sample_comments,
        }
    }

    pub fn list_equipment(&self) -> &[Equipment] {
        &self.equipment
    }

    pub fn list_livestock(&self) -> &[Livestock] {
        &self.livestock
    }

    pub fn list_fish(&self) -> Vec<&Livestock> {
        self.livestock_of(LivestockKind::Fish)
    }

    pub fn list_plants(&self) -> Vec<&Livestock> {
        self.livestock_of(LivestockKind::Plant)
    }

    fn livestock_of(&self, kind: LivestockKind) -> Vec<&Livestock> {
        self.livestock.iter().filter(|l| l.kind == kind).collect()
    }

    pub fn sample_comments(&self) -> &[Comment] {
        &self.sample_comments
    }

    pub fn find_equipment(&self, id: &str) -> Option<&Equipment> {
        self.equipment.iter().find(|e| e.id == id)
    }

    pub fn find_livestock(&self, id: &str) -> Option<&Livestock> {
        self.livestock.iter().find(|l| l.id == id)
    }

    pub fn search_equipment(&self, filter: &EquipmentFilter) -> Vec<&Equipment> {
        let query = filter.query.trim().to_lowercase();
        self.equipment
            .iter()
            .filter(|e| {
                let matches_query = query.is_empty()
                    || e.name.to_lowercase().contains(&query)
                    || e
                        .model_number
                        .as_ref()
                        .is_some_and(|m| m.to_lowercase().contains(&query))
                    || e.category.as_str().to_lowercase().contains(&query);
                let matches_category =
                    filter.categories.is_empty() || filter.categories.contains(&e.category);
                matches_query && matches_category
            })
            .collect()
    }

    pub fn search_livestock(&self, filter: &LivestockFilter) -> Vec<&Livestock> {
        let query = filter.query.trim().to_lowercase();
        self.livestock
            .iter()
            .filter(|l| {
                let matches_query = query.is_empty()
                    || l.name.to_lowercase().contains(&query)
                    || l.scientific_name.to_lowercase().contains(&query);
                matches_query && filter.kind.map_or(true, |kind| l.kind == kind)
            })
            .collect()
    }
}
