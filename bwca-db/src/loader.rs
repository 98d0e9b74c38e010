//! CSV data loading functions for populating the in-memory SQLite database.
//!
//! Each loader parses CSV text with the `bwca-lake` parsers and inserts the
//! rows into the corresponding table. Loaders are crate-private: the tables
//! are filled once by [`crate::ReferenceTables`] and only read afterwards.
//!
//! # CSV Formats (all with headers)
//!
//! - **Lakes**: `Name,Nearest Town,County,ID`
//! - **Campsites / portages**: `X,Y,name,desc`
//! - **BFI aggregates**: `LakeID,BFI_WAE,BFI_WAE_Pct,...,BFI_SMB,BFI_SMB_Pct`
//! - **Population distribution**: `Length,WAEpct,NOPpct,LATpct,SMBpct`

use crate::Database;
use bwca_lake::bfi::BfiAggregate;
use bwca_lake::lake::LakeIdentity;
use bwca_lake::population::PopulationBaseline;
use bwca_lake::species::Species;
use bwca_lake::waypoint::WaypointRecord;
use rusqlite::params;

impl Database {
    /// Load the county/lake identity mapping.
    pub(crate) fn load_lakes(&self, csv_data: &str) -> anyhow::Result<usize> {
        let lakes = LakeIdentity::parse_lake_identity_csv(csv_data)?;
        let tx = self.conn.unchecked_transaction()?;
        let mut skipped = 0usize;
        for lake in &lakes {
            if lake.lake_id.is_empty() || lake.name.is_empty() {
                skipped += 1;
                continue;
            }
            tx.execute(
                "INSERT OR REPLACE INTO lakes (lake_id, name, nearest_town, county)
                 VALUES (?1, ?2, ?3, ?4)",
                params![lake.lake_id, lake.name, lake.nearest_town, lake.county],
            )?;
        }
        tx.commit()?;
        let count = lakes.len() - skipped;
        log::info!("loader: Loaded {} lakes, skipped {} without ID or name", count, skipped);
        Ok(count)
    }

    fn insert_waypoints(&self, waypoints: &[WaypointRecord]) -> anyhow::Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for w in waypoints {
            tx.execute(
                "INSERT INTO waypoints (category, latitude, longitude, label, lake)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![w.category.as_str(), w.latitude, w.longitude, w.label, w.lake],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Load campsite waypoints; the parent lake is parsed from each description.
    pub(crate) fn load_campsites(&self, csv_data: &str) -> anyhow::Result<usize> {
        let campsites = WaypointRecord::parse_campsites_csv(csv_data)?;
        self.insert_waypoints(&campsites)?;
        log::info!("loader: Loaded {} campsites", campsites.len());
        Ok(campsites.len())
    }

    /// Load portage waypoints.
    pub(crate) fn load_portages(&self, csv_data: &str) -> anyhow::Result<usize> {
        let portages = WaypointRecord::parse_portages_csv(csv_data)?;
        self.insert_waypoints(&portages)?;
        log::info!("loader: Loaded {} portages", portages.len());
        Ok(portages.len())
    }

    /// Load the per-lake BFI aggregate table. Blank cells are stored as NULL.
    pub(crate) fn load_bfi_aggregates(&self, csv_data: &str) -> anyhow::Result<usize> {
        let rows = BfiAggregate::parse_bfi_aggregate_csv(csv_data)?;
        let tx = self.conn.unchecked_transaction()?;
        for row in &rows {
            let wae = row.get(Species::Walleye);
            let nop = row.get(Species::NorthernPike);
            let lat = row.get(Species::LakeTrout);
            let smb = row.get(Species::SmallmouthBass);
            tx.execute(
                "INSERT OR REPLACE INTO lake_bfi
                 (lake_id, bfi_wae, bfi_wae_pct, bfi_nop, bfi_nop_pct,
                  bfi_lat, bfi_lat_pct, bfi_smb, bfi_smb_pct)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    row.lake_id,
                    wae.score,
                    wae.percentile,
                    nop.score,
                    nop.percentile,
                    lat.score,
                    lat.percentile,
                    smb.score,
                    smb.percentile
                ],
            )?;
        }
        tx.commit()?;
        log::info!("loader: Loaded BFI aggregates for {} lakes", rows.len());
        Ok(rows.len())
    }

    /// Load the all-lakes length distribution.
    pub(crate) fn load_population(&self, csv_data: &str) -> anyhow::Result<usize> {
        let baseline = PopulationBaseline::parse_population_csv(csv_data)?;
        let tx = self.conn.unchecked_transaction()?;
        let mut count = 0usize;
        for (species, curve) in &baseline.by_species {
            for (length, pct) in curve {
                tx.execute(
                    "INSERT OR REPLACE INTO population_distribution (species, length, pct)
                     VALUES (?1, ?2, ?3)",
                    params![species.code(), length, pct],
                )?;
                count += 1;
            }
        }
        tx.commit()?;
        log::info!("loader: Loaded {} population distribution points", count);
        Ok(count)
    }
}
