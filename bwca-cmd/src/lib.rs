//! Command implementations for the BWCA CLI.
//!
//! Provides subcommands for browsing lakes with campsites, looking up one
//! lake end to end, and ranking lakes by Big Fish Index.

use bwca_lake::error::BwcaError;
use bwca_lake::species::Species;
use clap::Subcommand;
use log::warn;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

pub mod config;
pub mod lookup;
pub mod rankings;
pub mod report;
pub mod survey;

pub use config::Config;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List lakes that have at least one campsite
    Lakes {
        /// Only include lakes in this county
        #[arg(short = 'c', long)]
        county: Option<String>,
    },

    /// Look up one lake: waypoints, Big Fish Index and latest fishery survey
    Lake {
        /// Lake name, with or without "Lake"
        #[arg(short = 'n', long)]
        name: String,

        /// Nearest town, required when several lakes share the name
        #[arg(short = 't', long)]
        town: Option<String>,

        /// Output path for the length distribution table CSV
        #[arg(long)]
        distribution_csv: Option<PathBuf>,

        /// Output path for per-species chart points (lake vs. all lakes) as JSON
        #[arg(long)]
        chart_json: Option<PathBuf>,
    },

    /// Rank lakes with campsites by one species' Big Fish Index
    Rankings {
        /// Species code (WAE, NOP, LAT, SMB) or name
        #[arg(short = 's', long)]
        species: Species,

        /// Only include lakes in this county
        #[arg(short = 'c', long)]
        county: Option<String>,

        /// Number of lakes to list
        #[arg(short = 'l', long, default_value_t = 20)]
        limit: usize,

        /// Output path for the rankings CSV (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// List counties that have lakes with campsites
    Counties,

    /// Fetch a survey document and print it as flattened path/value rows
    Survey {
        /// DNR lake ID
        #[arg(long)]
        lake_id: String,

        /// Output path for the flattened CSV (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(config: &Config, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Lakes { county } => {
            let tables = config.load_tables()?;
            let mut out = std::io::stdout().lock();
            for lake in tables.query_lakes_with_campsites(county.as_deref())? {
                let campsites = lake
                    .campsite_count
                    .map_or_else(|| "?".to_string(), |n| n.to_string());
                writeln!(
                    out,
                    "{:<24} {:<14} {:<10} {:>10}  {} campsites",
                    lake.name, lake.nearest_town, lake.county, lake.lake_id, campsites
                )?;
            }
            Ok(())
        }
        Command::Lake {
            name,
            town,
            distribution_csv,
            chart_json,
        } => {
            let tables = config.load_tables()?;
            let client = config.survey_client()?;
            let report = match lookup::lookup_lake(&tables, &client, &name, town.as_deref()).await
            {
                Ok(report) => report,
                Err(e) => {
                    if let Some(BwcaError::AmbiguousLake { towns, .. }) =
                        e.downcast_ref::<BwcaError>()
                    {
                        warn!("Re-run with --town, one of: {}", towns.join(", "));
                    }
                    return Err(e);
                }
            };
            report::write_lake_report(&mut std::io::stdout().lock(), &report)?;

            match &report.fishery {
                Ok(fishery) => {
                    if let Some(path) = distribution_csv {
                        fishery.table.write_csv(std::fs::File::create(&path)?)?;
                    }
                    if let Some(path) = chart_json {
                        let points: BTreeMap<_, _> = fishery
                            .species
                            .iter()
                            .filter_map(|(species, r)| {
                                r.as_ref().ok().map(|r| (*species, &r.comparison))
                            })
                            .collect();
                        serde_json::to_writer_pretty(std::fs::File::create(&path)?, &points)?;
                    }
                }
                Err(_) if distribution_csv.is_some() || chart_json.is_some() => {
                    warn!("No fishery data for {}; nothing exported", report.lake.name);
                }
                Err(_) => {}
            }
            Ok(())
        }
        Command::Rankings {
            species,
            county,
            limit,
            output,
        } => {
            let tables = config.load_tables()?;
            rankings::run_rankings(
                &tables,
                species,
                county.as_deref(),
                limit,
                output.as_deref(),
            )
        }
        Command::Counties => {
            let tables = config.load_tables()?;
            let mut out = std::io::stdout().lock();
            for county in tables.query_counties()? {
                writeln!(out, "{}", county)?;
            }
            Ok(())
        }
        Command::Survey { lake_id, output } => {
            let client = config.survey_client()?;
            survey::run_survey(&client, &lake_id, output.as_deref()).await
        }
    }
}
