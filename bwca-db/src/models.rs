//! Query result model structs for the reference tables.
//!
//! All structs derive `Serialize` so they can be handed to a charting or
//! export layer as JSON.

use bwca_lake::lake::LakeIdentity;
use bwca_lake::species::Species;
use serde::Serialize;

/// A lake that has at least one campsite, for selection lists.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LakeSummary {
    pub lake_id: String,
    pub name: String,
    pub nearest_town: String,
    pub county: String,
    /// Campsites on the lake. `None` when several identity rows share the
    /// name: campsites are matched by name, so they cannot be attributed.
    pub campsite_count: Option<usize>,
}

/// Result of looking a lake up by name.
#[derive(Debug, Clone, PartialEq)]
pub enum LakeMatch {
    NotFound,
    Unique(LakeIdentity),
    /// Several lakes share the name; the caller must pick a nearest town.
    Ambiguous { name: String, towns: Vec<String> },
}

/// One row of a species BFI ranking.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BfiRanking {
    pub species: Species,
    pub lake: String,
    pub lake_id: String,
    pub nearest_town: String,
    pub county: String,
    pub score: Option<f64>,
    /// Fraction in [0, 1].
    pub percentile: Option<f64>,
}
