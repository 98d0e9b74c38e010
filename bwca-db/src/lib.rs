//! In-memory SQLite store for the BWCA reference tables.
//!
//! The static tables (lake identity mapping, campsite and portage waypoints,
//! BFI aggregates, and the optional all-lakes population distribution) are
//! loaded once from CSV and only read afterwards.
//!
//! # Usage
//!
//! ```rust
//! use bwca_db::{ReferenceCsv, ReferenceTables};
//!
//! let tables = ReferenceTables::from_csv(&ReferenceCsv {
//!     lakes: "Name,Nearest Town,County,ID\nInsula,Ely,Lake,38063600\n",
//!     campsites: "X,Y,name,desc\n-91.3,47.98,#1,BWCA Campsite - Lake Insula - #1\n",
//!     portages: "X,Y,name,desc\n",
//!     bfi_aggregates: "LakeID,BFI_WAE,BFI_WAE_Pct\n38063600,1.1,0.7\n",
//!     population: None,
//! })
//! .unwrap();
//!
//! let lake = tables.resolve_lake("Lake Insula", None).unwrap();
//! assert_eq!(lake.lake_id, "38063600");
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.

pub mod schema;
mod loader;
mod queries;
pub mod models;

use bwca_lake::bfi::BfiAggregate;
use bwca_lake::error::{BwcaError, Result};
use bwca_lake::lake::LakeIdentity;
use models::LakeMatch;
use rusqlite::Connection;
use std::ops::Deref;
use std::path::Path;
use std::rc::Rc;

pub const LAKES_FILE: &str = "CountyLakeMapping.csv";
pub const CAMPSITES_FILE: &str = "campsites.csv";
pub const PORTAGES_FILE: &str = "portages.csv";
pub const BFI_AGGREGATES_FILE: &str = "lakeagg.csv";
pub const POPULATION_FILE: &str = "FishSurveySum.csv";

/// In-memory SQLite database holding the reference tables.
///
/// Cheaply cloneable; clones share one connection.
#[derive(Clone)]
pub struct Database {
    conn: Rc<Connection>,
}

impl Database {
    /// Create an empty in-memory database with the schema applied.
    pub(crate) fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(conn),
        })
    }
}

/// CSV text of every reference table.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceCsv<'a> {
    pub lakes: &'a str,
    pub campsites: &'a str,
    pub portages: &'a str,
    pub bfi_aggregates: &'a str,
    /// The population distribution only feeds chart baselines.
    pub population: Option<&'a str>,
}

/// The loaded, read-only reference tables.
#[derive(Clone)]
pub struct ReferenceTables {
    db: Database,
}

impl ReferenceTables {
    pub fn from_csv(csv: &ReferenceCsv<'_>) -> anyhow::Result<Self> {
        let db = Database::new()?;
        db.load_lakes(csv.lakes)?;
        db.load_campsites(csv.campsites)?;
        db.load_portages(csv.portages)?;
        db.load_bfi_aggregates(csv.bfi_aggregates)?;
        if let Some(population) = csv.population {
            db.load_population(population)?;
        }
        Ok(ReferenceTables { db })
    }

    /// Load every table from the CSV files in `dir`.
    ///
    /// A missing or malformed required file fails the whole load. A missing
    /// population file only disables the chart baselines.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let read = |file: &str| {
            let path = dir.join(file);
            std::fs::read_to_string(&path).map_err(|e| {
                BwcaError::ReferenceDataUnavailable(format!("{}: {}", path.display(), e))
            })
        };
        let lakes = read(LAKES_FILE)?;
        let campsites = read(CAMPSITES_FILE)?;
        let portages = read(PORTAGES_FILE)?;
        let bfi_aggregates = read(BFI_AGGREGATES_FILE)?;
        let population = match read(POPULATION_FILE) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("{}; population baselines disabled", e);
                None
            }
        };

        let tables = Self::from_csv(&ReferenceCsv {
            lakes: &lakes,
            campsites: &campsites,
            portages: &portages,
            bfi_aggregates: &bfi_aggregates,
            population: population.as_deref(),
        })
        .map_err(|e| BwcaError::ReferenceDataUnavailable(format!("{:#}", e)))?;
        log::info!("Loaded reference tables from {}", dir.display());
        Ok(tables)
    }

    /// Resolve a lake name to exactly one identity row.
    pub fn resolve_lake(&self, name: &str, town: Option<&str>) -> Result<LakeIdentity> {
        let found = self
            .db
            .find_lake(name, town)
            .map_err(|e| BwcaError::ReferenceDataUnavailable(e.to_string()))?;
        match found {
            LakeMatch::Unique(lake) => Ok(lake),
            LakeMatch::NotFound => Err(BwcaError::LakeNotFound(name.to_string())),
            LakeMatch::Ambiguous { name, towns } => Err(BwcaError::AmbiguousLake { name, towns }),
        }
    }

    /// The BFI aggregate row for a lake.
    pub fn bfi_for_lake(&self, lake_id: &str) -> Result<BfiAggregate> {
        self.db
            .query_lake_bfi(lake_id)
            .map_err(|e| BwcaError::ReferenceDataUnavailable(e.to_string()))?
            .ok_or_else(|| BwcaError::BfiUnavailable(lake_id.to_string()))
    }
}

impl Deref for ReferenceTables {
    type Target = Database;

    fn deref(&self) -> &Database {
        &self.db
    }
}
