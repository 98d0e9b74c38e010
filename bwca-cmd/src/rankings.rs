//! BFI rankings export.

use bwca_db::models::BfiRanking;
use bwca_db::ReferenceTables;
use bwca_lake::species::Species;
use log::info;
use std::io::Write;
use std::path::Path;

/// Write rankings as CSV: `lake,ID,Nearest Town,County,BFI_<SP>,BFI_<SP>_Pct`.
/// Missing scores are left empty.
pub fn write_rankings_csv<W: Write>(
    writer: W,
    species: Species,
    rankings: &[BfiRanking],
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let score_column = species.score_column();
    let pct_column = species.percentile_column();
    wtr.write_record([
        "lake",
        "ID",
        "Nearest Town",
        "County",
        score_column.as_str(),
        pct_column.as_str(),
    ])?;
    let cell = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    for row in rankings {
        wtr.write_record([
            row.lake.as_str(),
            row.lake_id.as_str(),
            row.nearest_town.as_str(),
            row.county.as_str(),
            cell(row.score).as_str(),
            cell(row.percentile).as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Rank lakes by one species' BFI, to `output` or stdout.
pub fn run_rankings(
    tables: &ReferenceTables,
    species: Species,
    county: Option<&str>,
    limit: usize,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let rankings = tables.query_bfi_rankings(species, county, Some(limit))?;
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            write_rankings_csv(file, species, &rankings)?;
            info!(
                "Wrote {} {} rankings to {}",
                rankings.len(),
                species.name(),
                path.display()
            );
        }
        None => write_rankings_csv(std::io::stdout().lock(), species, &rankings)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rankings_csv_columns() {
        let rankings = vec![
            BfiRanking {
                species: Species::LakeTrout,
                lake: "Knife".to_string(),
                lake_id: "38040400".to_string(),
                nearest_town: "Ely".to_string(),
                county: "Lake".to_string(),
                score: Some(1.31),
                percentile: Some(0.965),
            },
            BfiRanking {
                species: Species::LakeTrout,
                lake: "Insula".to_string(),
                lake_id: "38063600".to_string(),
                nearest_town: "Ely".to_string(),
                county: "Lake".to_string(),
                score: None,
                percentile: None,
            },
        ];
        let mut out = Vec::new();
        write_rankings_csv(&mut out, Species::LakeTrout, &rankings).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "lake,ID,Nearest Town,County,BFI_LAT,BFI_LAT_Pct");
        assert_eq!(lines[1], "Knife,38040400,Ely,Lake,1.31,0.965");
        assert_eq!(lines[2], "Insula,38063600,Ely,Lake,,");
    }
}
