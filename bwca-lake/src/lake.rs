use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

/// One row of the county/lake identity mapping.
///
/// Lake names are not unique: two lakes can share a name and are told apart
/// by their nearest town, or by `lake_id`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LakeIdentity {
    #[serde(rename = "Name", alias = "lake", alias = "Lake")]
    pub name: String,
    #[serde(rename = "Nearest Town", alias = "nearest_town")]
    pub nearest_town: String,
    #[serde(rename = "County", alias = "county")]
    pub county: String,
    /// DNR lake identifier (DOW number), kept as text.
    #[serde(rename = "ID", alias = "LakeID", alias = "lake_id")]
    pub lake_id: String,
}

impl LakeIdentity {
    /// Parse the identity mapping CSV.
    ///
    /// Columns are matched by header (`Name`, `Nearest Town`, `County`, `ID`),
    /// so extra columns and column order do not matter. Every value is kept
    /// as text; lake IDs with leading zeros survive intact.
    pub fn parse_lake_identity_csv(csv_object: &str) -> Result<Vec<LakeIdentity>, csv::Error> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes());
        rdr.deserialize().collect()
    }
}
