//! Typed query methods for retrieving reference data from the database.
//!
//! # Lakes with campsites
//!
//! Campsites are attributed to lakes by name only (the name parsed from the
//! campsite description). A lake "has campsites" when any campsite carries
//! its name; lakes that share a name therefore share campsites.

use crate::models::{BfiRanking, LakeMatch, LakeSummary};
use crate::Database;
use bwca_lake::bfi::{BfiAggregate, BfiScore};
use bwca_lake::lake::LakeIdentity;
use bwca_lake::population::PopulationBaseline;
use bwca_lake::species::Species;
use bwca_lake::waypoint::{WaypointCategory, WaypointRecord};
use rusqlite::{params, OptionalExtension, Row};

/// Column pair in `lake_bfi` for a species. Built from the closed species
/// set, never from user input.
fn bfi_columns(species: Species) -> (String, String) {
    let code = species.code().to_lowercase();
    (format!("bfi_{}", code), format!("bfi_{}_pct", code))
}

fn lake_from_row(row: &Row<'_>) -> rusqlite::Result<LakeIdentity> {
    Ok(LakeIdentity {
        lake_id: row.get(0)?,
        name: row.get(1)?,
        nearest_town: row.get(2)?,
        county: row.get(3)?,
    })
}

fn waypoint_from_row(row: &Row<'_>) -> rusqlite::Result<WaypointRecord> {
    let category: String = row.get(0)?;
    let category = match category.as_str() {
        "Portage" => WaypointCategory::Portage,
        _ => WaypointCategory::Campsite,
    };
    Ok(WaypointRecord {
        category,
        latitude: row.get(1)?,
        longitude: row.get(2)?,
        label: row.get(3)?,
        lake: row.get(4)?,
    })
}

/// Drop a standalone `Lake` token: "Bass Lake" and "Lake Bass" both give "Bass".
fn strip_lake_token(name: &str) -> String {
    name.split_whitespace()
        .filter(|t| !t.eq_ignore_ascii_case("lake"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Database {
    // ───────────────────── Lake Queries ─────────────────────

    /// Lakes with at least one campsite, optionally limited to one county.
    /// Ordered by name, then nearest town.
    pub fn query_lakes_with_campsites(
        &self,
        county: Option<&str>,
    ) -> anyhow::Result<Vec<LakeSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.lake_id, l.name, l.nearest_town, l.county,
                    (SELECT COUNT(*) FROM waypoints w
                      WHERE w.category = 'Campsite' AND w.lake = l.name) AS campsites,
                    (SELECT COUNT(*) FROM lakes l2 WHERE l2.name = l.name) AS namesakes
             FROM lakes l
             WHERE EXISTS (SELECT 1 FROM waypoints w
                            WHERE w.category = 'Campsite' AND w.lake = l.name)
               AND (?1 IS NULL OR l.county = ?1)
             ORDER BY l.name, l.nearest_town",
        )?;
        let rows = stmt
            .query_map(params![county], |row| {
                let campsites: i64 = row.get(4)?;
                let namesakes: i64 = row.get(5)?;
                Ok(LakeSummary {
                    lake_id: row.get(0)?,
                    name: row.get(1)?,
                    nearest_town: row.get(2)?,
                    county: row.get(3)?,
                    campsite_count: (namesakes <= 1).then_some(campsites as usize),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "query: query_lakes_with_campsites returned {} lakes",
            rows.len()
        );
        Ok(rows)
    }

    /// Identity rows with this exact name (case-insensitive), by nearest town.
    pub fn query_lakes_by_name(&self, name: &str) -> anyhow::Result<Vec<LakeIdentity>> {
        let mut stmt = self.conn.prepare(
            "SELECT lake_id, name, nearest_town, county FROM lakes
             WHERE name = ?1 COLLATE NOCASE
             ORDER BY nearest_town",
        )?;
        let rows = stmt
            .query_map(params![name.trim()], lake_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn query_lake(&self, lake_id: &str) -> anyhow::Result<Option<LakeIdentity>> {
        let lake = self
            .conn
            .query_row(
                "SELECT lake_id, name, nearest_town, county FROM lakes WHERE lake_id = ?1",
                params![lake_id],
                lake_from_row,
            )
            .optional()?;
        Ok(lake)
    }

    /// Resolve a lake name, with an optional nearest town to disambiguate.
    ///
    /// Tries the name as given, then without a `Lake` token. A town that
    /// matches none of the namesakes leaves the lookup ambiguous.
    pub fn find_lake(&self, name: &str, town: Option<&str>) -> anyhow::Result<LakeMatch> {
        let mut candidates = self.query_lakes_by_name(name)?;
        if candidates.is_empty() {
            let stripped = strip_lake_token(name);
            if !stripped.is_empty() && stripped != name.trim() {
                candidates = self.query_lakes_by_name(&stripped)?;
            }
        }

        if let Some(town) = town {
            let in_town: Vec<LakeIdentity> = candidates
                .iter()
                .filter(|l| l.nearest_town.eq_ignore_ascii_case(town.trim()))
                .cloned()
                .collect();
            if !in_town.is_empty() {
                candidates = in_town;
            }
        }

        let found = match candidates.len() {
            0 => LakeMatch::NotFound,
            1 => LakeMatch::Unique(candidates.remove(0)),
            _ => {
                let mut towns: Vec<String> =
                    candidates.iter().map(|l| l.nearest_town.clone()).collect();
                towns.dedup();
                LakeMatch::Ambiguous {
                    name: candidates[0].name.clone(),
                    towns,
                }
            }
        };
        Ok(found)
    }

    /// Distinct counties of lakes with campsites, sorted.
    pub fn query_counties(&self) -> anyhow::Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT l.county FROM lakes l
             WHERE EXISTS (SELECT 1 FROM waypoints w
                            WHERE w.category = 'Campsite' AND w.lake = l.name)
             ORDER BY l.county",
        )?;
        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(rows)
    }

    // ───────────────────── Waypoint Queries ─────────────────────

    /// All campsites and portages, for the map layer.
    pub fn query_waypoints(&self) -> anyhow::Result<Vec<WaypointRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, latitude, longitude, label, lake FROM waypoints ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], waypoint_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Campsites attributed to a lake name.
    pub fn query_campsites(&self, lake_name: &str) -> anyhow::Result<Vec<WaypointRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, latitude, longitude, label, lake FROM waypoints
             WHERE category = 'Campsite' AND lake = ?1
             ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![lake_name], waypoint_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ───────────────────── BFI Queries ─────────────────────

    /// The aggregate row for one lake, if the lake has BFI data.
    pub fn query_lake_bfi(&self, lake_id: &str) -> anyhow::Result<Option<BfiAggregate>> {
        let aggregate = self
            .conn
            .query_row(
                "SELECT bfi_wae, bfi_wae_pct, bfi_nop, bfi_nop_pct,
                        bfi_lat, bfi_lat_pct, bfi_smb, bfi_smb_pct
                 FROM lake_bfi WHERE lake_id = ?1",
                params![lake_id],
                |row| {
                    let mut scores = std::collections::BTreeMap::new();
                    for (i, species) in Species::ALL.iter().enumerate() {
                        scores.insert(
                            *species,
                            BfiScore {
                                score: row.get(i * 2)?,
                                percentile: row.get(i * 2 + 1)?,
                            },
                        );
                    }
                    Ok(BfiAggregate {
                        lake_id: lake_id.to_string(),
                        scores,
                    })
                },
            )
            .optional()?;
        Ok(aggregate)
    }

    /// Lakes with campsites and BFI data, best score first.
    ///
    /// Lakes without a score for this species sort last. `county` limits the
    /// ranking to one county; `limit` caps the number of rows.
    pub fn query_bfi_rankings(
        &self,
        species: Species,
        county: Option<&str>,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<BfiRanking>> {
        let (score_col, pct_col) = bfi_columns(species);
        let sql = format!(
            "SELECT l.name, l.lake_id, l.nearest_town, l.county, b.{score}, b.{pct}
             FROM lakes l
             INNER JOIN lake_bfi b ON b.lake_id = l.lake_id
             WHERE EXISTS (SELECT 1 FROM waypoints w
                            WHERE w.category = 'Campsite' AND w.lake = l.name)
               AND (?1 IS NULL OR l.county = ?1)
             ORDER BY b.{score} IS NULL, b.{score} DESC, l.name
             LIMIT ?2",
            score = score_col,
            pct = pct_col
        );
        let limit = limit.map_or(-1i64, |n| n as i64);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![county, limit], |row| {
                Ok(BfiRanking {
                    species,
                    lake: row.get(0)?,
                    lake_id: row.get(1)?,
                    nearest_town: row.get(2)?,
                    county: row.get(3)?,
                    score: row.get(4)?,
                    percentile: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "query: query_bfi_rankings({}) returned {} lakes",
            species,
            rows.len()
        );
        Ok(rows)
    }

    // ───────────────────── Population Queries ─────────────────────

    /// The all-lakes length distribution for every species.
    pub fn query_population_baseline(&self) -> anyhow::Result<PopulationBaseline> {
        let mut stmt = self
            .conn
            .prepare("SELECT species, length, pct FROM population_distribution")?;
        let mut baseline = PopulationBaseline::default();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u8>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?;
        for row in rows {
            let (code, length, pct) = row?;
            if let Ok(species) = code.parse::<Species>() {
                baseline
                    .by_species
                    .entry(species)
                    .or_default()
                    .insert(length, pct);
            }
        }
        Ok(baseline)
    }
}
