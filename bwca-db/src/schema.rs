//! SQL schema definitions for the in-memory SQLite database.
//!
//! The schema is applied as a single batch when the database is initialized.

/// Returns the full SQL schema as a single batch string.
///
/// - `lakes` - County/lake identity mapping (lake ID, name, nearest town, county)
/// - `waypoints` - Campsite and portage points; campsites carry their parent lake name
/// - `lake_bfi` - Per-lake BFI score and population percentile for each species
/// - `population_distribution` - All-lakes length distribution per species
///
/// The lakes-with-campsites join is not materialized; queries join
/// `lakes.name` against `waypoints.lake`.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS lakes (
        lake_id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        nearest_town TEXT NOT NULL,
        county TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_lakes_name ON lakes(name COLLATE NOCASE);

    CREATE TABLE IF NOT EXISTS waypoints (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        label TEXT NOT NULL,
        lake TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_waypoints_lake ON waypoints(lake);

    CREATE TABLE IF NOT EXISTS lake_bfi (
        lake_id TEXT PRIMARY KEY,
        bfi_wae REAL,
        bfi_wae_pct REAL,
        bfi_nop REAL,
        bfi_nop_pct REAL,
        bfi_lat REAL,
        bfi_lat_pct REAL,
        bfi_smb REAL,
        bfi_smb_pct REAL
    );

    CREATE TABLE IF NOT EXISTS population_distribution (
        species TEXT NOT NULL,
        length INTEGER NOT NULL,
        pct REAL NOT NULL,
        PRIMARY KEY (species, length)
    );
    "#
}
