//! Depth selector: maps an approximate dive depth to an enhancement strength.
//!
//! Deeper water strips more red, so deeper selections amplify harder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EnhanceError;

/// Depth preselected by the interactive tools, in meters.
pub const DEFAULT_DEPTH: u32 = 5;

/// Built-in depth (meters) → strength pairs.
const DEFAULT_TABLE: [(u32, f32); 3] = [(5, 1.3), (10, 1.6), (15, 1.9)];

/// Ordered lookup from depth in meters to red-channel strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthTable {
    entries: BTreeMap<u32, f32>,
}

impl Default for DepthTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TABLE.into_iter().collect(),
        }
    }
}

impl DepthTable {
    /// An empty table, for callers that build their own.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Strength for an exact depth entry.
    pub fn strength_for(&self, meters: u32) -> Result<f32, EnhanceError> {
        self.entries
            .get(&meters)
            .copied()
            .ok_or(EnhanceError::UnknownDepth(meters))
    }

    /// Add or replace an entry. Returns the previous strength, if any.
    pub fn insert(&mut self, meters: u32, strength: f32) -> Result<Option<f32>, EnhanceError> {
        if !strength.is_finite() || strength <= 0.0 {
            return Err(EnhanceError::InvalidStrength(strength));
        }
        Ok(self.entries.insert(meters, strength))
    }

    /// Selectable depths in ascending order.
    pub fn depths(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    /// `(meters, strength)` pairs in ascending depth order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.entries.iter().map(|(&m, &s)| (m, s))
    }

    pub fn contains(&self, meters: u32) -> bool {
        self.entries.contains_key(&meters)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
