//! Encounter builder state: catalogue filters and the results they select.

use serde::{Deserialize, Serialize};

use crate::creature::{cr_value, Creature};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuilderFilters {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub min_cr: Option<String>,
    #[serde(default)]
    pub max_cr: Option<String>,
    #[serde(default)]
    pub creature_type: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
}

impl BuilderFilters {
    pub fn matches(&self, creature: &Creature) -> bool {
        let search = self.search.trim().to_lowercase();
        if !search.is_empty() && !creature.name.to_lowercase().contains(&search) {
            return false;
        }
        let cr = creature.cr_value();
        if let Some(min) = self.min_cr.as_deref().and_then(cr_value) {
            if cr < min {
                return false;
            }
        }
        if let Some(max) = self.max_cr.as_deref().and_then(cr_value) {
            if cr > max {
                return false;
            }
        }
        if let Some(wanted) = &self.creature_type {
            if !creature.creature_type.eq_ignore_ascii_case(wanted) {
                return false;
            }
        }
        if let Some(wanted) = &self.environment {
            if !creature
                .environment
                .iter()
                .any(|env| env.eq_ignore_ascii_case(wanted))
            {
                return false;
            }
        }
        true
    }
}

/// Filters persist; the filtered list is rebuilt from the catalogue and is
/// never written out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuilderState {
    pub filters: BuilderFilters,
    #[serde(skip)]
    pub filtered: Vec<Creature>,
}

impl BuilderState {
    pub fn apply_filters(&mut self, catalog: &[Creature]) {
        self.filtered = catalog
            .iter()
            .filter(|creature| self.filters.matches(creature))
            .cloned()
            .collect();
    }

    pub fn set_filters(&mut self, filters: BuilderFilters, catalog: &[Creature]) {
        self.filters = filters;
        self.apply_filters(catalog);
    }
}
