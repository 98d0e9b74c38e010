/// Error types for the BWCA lake library
use crate::species::Species;
use thiserror::Error;

/// Main error type for lake lookups and survey processing.
///
/// Each variant is contained at the smallest granularity it applies to: a
/// failed survey fetch suppresses fish sections but never the waypoint data,
/// and a missing species never affects the other three.
#[derive(Error, Debug)]
pub enum BwcaError {
    /// A static reference table failed to load
    #[error("Reference data unavailable: {0}")]
    ReferenceDataUnavailable(String),

    /// Lookup key absent from the identity table
    #[error("Lake not found: {0}")]
    LakeNotFound(String),

    /// Several identity rows share the lake name; a nearest town is needed
    #[error("Multiple lakes named {name}; pick the nearest town: {}", .towns.join(", "))]
    AmbiguousLake { name: String, towns: Vec<String> },

    /// Network or parse failure retrieving the survey document
    #[error("No fishery data for lake {lake_id}: {reason}")]
    SurveyFetchFailed { lake_id: String, reason: String },

    /// The document parsed but holds no usable survey records
    #[error("Survey document contains no surveys")]
    NoSurveysInDocument,

    /// The selected survey has no length data for one species
    #[error("No data for {}", .0.name())]
    SpeciesDataAbsent(Species),

    /// Lake absent from the BFI aggregate table
    #[error("No BFI data for lake {0}")]
    BfiUnavailable(String),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to parse JSON data
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// HTTP client could not be built
    #[cfg(feature = "api")]
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl BwcaError {
    /// True for conditions that only suppress fish-related sections.
    pub fn is_fishery_unavailable(&self) -> bool {
        matches!(
            self,
            BwcaError::SurveyFetchFailed { .. } | BwcaError::NoSurveysInDocument
        )
    }
}

/// Type alias for Results using BwcaError
pub type Result<T> = std::result::Result<T, BwcaError>;
