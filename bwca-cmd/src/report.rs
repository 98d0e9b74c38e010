//! Plain-text rendering of a lake report.

use crate::lookup::{FisheryReport, LakeReport};
use bwca_lake::bfi::SpeciesBfi;
use bwca_utils::dates::{format_date, parse_survey_date};
use bwca_utils::format::format_percent;
use std::io::{self, Write};

const UNAVAILABLE: &str = "unavailable";

pub fn write_lake_report<W: Write>(w: &mut W, report: &LakeReport) -> io::Result<()> {
    let lake = &report.lake;
    writeln!(
        w,
        "{} ({}, {} County)  ID {}",
        lake.name, lake.nearest_town, lake.county, lake.lake_id
    )?;

    match report.campsite_count {
        Some(n) => writeln!(w, "Campsites: {}", n)?,
        None => writeln!(
            w,
            "Campsites: unknown ({} shared with lakes of the same name)",
            report.campsites.len()
        )?,
    }
    if let Some((lat, lon)) = report.map_center {
        writeln!(w, "Map center: {:.5}, {:.5}", lat, lon)?;
    }

    writeln!(w)?;
    writeln!(w, "Big Fish Index")?;
    match &report.bfi {
        Ok(species) => {
            for bfi in species {
                writeln!(w, "  {}", bfi_line(bfi))?;
            }
        }
        Err(e) => writeln!(w, "  {}", e)?,
    }

    writeln!(w)?;
    writeln!(w, "Fishery")?;
    match &report.fishery {
        Ok(fishery) => write_fishery(w, fishery)?,
        Err(e) => writeln!(w, "  {}: {}", UNAVAILABLE, e)?,
    }
    Ok(())
}

fn bfi_line(bfi: &SpeciesBfi) -> String {
    let name = bfi.species.name();
    match (&bfi.score_display, &bfi.percentile_display, bfi.tier) {
        (Some(score), Some(pct), Some(tier)) => {
            format!("{}: {} ({} of lakes, {})", name, score, pct, tier)
        }
        (Some(score), _, _) => format!("{}: {}", name, score),
        _ => format!("{}: no data", name),
    }
}

fn write_fishery<W: Write>(w: &mut W, fishery: &FisheryReport) -> io::Result<()> {
    let date = parse_survey_date(&fishery.survey.date)
        .map(|d| format_date(&d))
        .unwrap_or_else(|_| fishery.survey.date.clone());
    writeln!(w, "  Most recent survey: {}", date)?;
    for line in fishery.characteristics.display_lines() {
        writeln!(w, "  {}", line)?;
    }
    for (species, report) in &fishery.species {
        match report {
            Ok(report) => {
                let mode = report
                    .mode()
                    .map(|(len, pct)| format!(", most common {}\" ({})", len, format_percent(pct)))
                    .unwrap_or_default();
                writeln!(
                    w,
                    "  {}: {} fish measured{}",
                    species.name(),
                    report.fish_counted,
                    mode
                )?;
            }
            Err(e) => writeln!(w, "  {}", e)?,
        }
    }
    if let Some(narrative) = &fishery.narrative {
        writeln!(w)?;
        writeln!(w, "{}", narrative)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bwca_lake::bfi::BfiScore;
    use bwca_lake::error::BwcaError;
    use bwca_lake::lake::LakeIdentity;
    use bwca_lake::species::Species;

    fn report() -> LakeReport {
        LakeReport {
            lake: LakeIdentity {
                name: "Bass".to_string(),
                nearest_town: "Ely".to_string(),
                county: "St. Louis".to_string(),
                lake_id: "69055300".to_string(),
            },
            campsites: Vec::new(),
            campsite_count: None,
            map_center: None,
            bfi: Ok(vec![
                SpeciesBfi::new(
                    Species::Walleye,
                    BfiScore {
                        score: Some(1.18),
                        percentile: Some(0.8734),
                    },
                ),
                SpeciesBfi::new(Species::LakeTrout, BfiScore::default()),
            ]),
            fishery: Err(BwcaError::SurveyFetchFailed {
                lake_id: "69055300".to_string(),
                reason: "HTTP 500".to_string(),
            }),
        }
    }

    #[test]
    fn test_report_marks_fishery_unavailable() {
        let mut out = Vec::new();
        write_lake_report(&mut out, &report()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Bass (Ely, St. Louis County)  ID 69055300\n"));
        assert!(text.contains("Campsites: unknown"));
        assert!(text.contains("Walleye: 1.18 (87.34% of lakes, Excellent)"));
        assert!(text.contains("Lake Trout: no data"));
        assert!(text.contains("unavailable: No fishery data for lake 69055300: HTTP 500"));
    }
}
