//! Creature records handed over by the encounter builder, and the
//! challenge-rating lookup used to price them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const STANDARD_CR_XP: [(&str, u32); 34] = [
    ("0", 10),
    ("1/8", 25),
    ("1/4", 50),
    ("1/2", 100),
    ("1", 200),
    ("2", 450),
    ("3", 700),
    ("4", 1100),
    ("5", 1800),
    ("6", 2300),
    ("7", 2900),
    ("8", 3900),
    ("9", 5000),
    ("10", 5900),
    ("11", 7200),
    ("12", 8400),
    ("13", 10000),
    ("14", 11500),
    ("15", 13000),
    ("16", 15000),
    ("17", 18000),
    ("18", 20000),
    ("19", 22000),
    ("20", 25000),
    ("21", 33000),
    ("22", 41000),
    ("23", 50000),
    ("24", 62000),
    ("25", 75000),
    ("26", 90000),
    ("27", 105000),
    ("28", 120000),
    ("29", 135000),
    ("30", 155000),
];

/// Maps challenge-rating strings ("1/4", "5", ...) to experience points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrXpTable {
    entries: HashMap<String, u32>,
}

impl CrXpTable {
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_CR_XP
                .iter()
                .map(|(cr, xp)| (cr.to_string(), *xp))
                .collect(),
        }
    }

    pub fn xp_for(&self, cr: &str) -> Option<u32> {
        self.entries.get(cr.trim()).copied()
    }

    pub fn insert(&mut self, cr: impl Into<String>, xp: u32) {
        self.entries.insert(cr.into(), xp);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CrXpTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Parses a challenge rating into its numeric value; fractions like "1/8"
/// are supported.
pub fn cr_value(cr: &str) -> Option<f32> {
    let cr = cr.trim();
    match cr.split_once('/') {
        Some((num, den)) => {
            let num: f32 = num.trim().parse().ok()?;
            let den: f32 = den.trim().parse().ok()?;
            if den == 0.0 {
                None
            } else {
                Some(num / den)
            }
        }
        None => cr.parse().ok(),
    }
}

/// A monster as delivered by the builder or a bestiary file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub name: String,
    pub hp: u32,
    pub ac: i32,
    #[serde(default)]
    pub speed: Option<String>,
    #[serde(rename = "type", default)]
    pub creature_type: String,
    pub cr: String,
    /// Falls back to the CR table when absent.
    #[serde(default)]
    pub xp: Option<u32>,
    #[serde(default)]
    pub environment: Vec<String>,
    #[serde(default)]
    pub abilities: Vec<String>,
}

impl Creature {
    pub fn resolved_xp(&self, table: &CrXpTable) -> u32 {
        self.xp.or_else(|| table.xp_for(&self.cr)).unwrap_or(0)
    }

    pub fn cr_value(&self) -> f32 {
        cr_value(&self.cr).unwrap_or(0.0)
    }
}
