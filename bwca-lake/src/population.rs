use crate::species::Species;
use crate::survey::histogram::{LengthBin, MAX_LENGTH_BIN};
use csv::ReaderBuilder;
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;

/// Length distribution across all surveyed lakes, one curve per species.
///
/// Loaded from `FishSurveySum.csv` (`Length,WAEpct,NOPpct,LATpct,SMBpct`)
/// and drawn as the baseline a single lake is compared against.
#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct PopulationBaseline {
    pub by_species: BTreeMap<Species, BTreeMap<LengthBin, f64>>,
}

impl PopulationBaseline {
    pub fn parse_population_csv(csv_object: &str) -> Result<PopulationBaseline, csv::Error> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes());
        let headers = rdr.headers()?.clone();
        let length_idx = headers.iter().position(|h| h.eq_ignore_ascii_case("Length"));
        let species_idx: Vec<(Species, usize)> = Species::ALL
            .iter()
            .filter_map(|species| {
                let column = format!("{}pct", species.code());
                headers
                    .iter()
                    .position(|h| h.eq_ignore_ascii_case(&column))
                    .map(|idx| (*species, idx))
            })
            .collect();

        let mut baseline = PopulationBaseline::default();
        let Some(length_idx) = length_idx else {
            warn!("Population table has no Length column");
            return Ok(baseline);
        };
        for row in rdr.records() {
            let record = row?;
            let length = match record.get(length_idx).and_then(|s| s.parse::<LengthBin>().ok()) {
                Some(l) if l <= MAX_LENGTH_BIN => l,
                _ => continue,
            };
            for (species, idx) in &species_idx {
                let pct = record
                    .get(*idx)
                    .and_then(|s| s.parse::<f64>().ok())
                    .filter(|v| v.is_finite());
                if let Some(pct) = pct {
                    baseline
                        .by_species
                        .entry(*species)
                        .or_default()
                        .insert(length, pct);
                }
            }
        }
        Ok(baseline)
    }

    pub fn pct(&self, species: Species, length: LengthBin) -> Option<f64> {
        self.by_species.get(&species)?.get(&length).copied()
    }

    pub fn curve(&self, species: Species) -> Option<&BTreeMap<LengthBin, f64>> {
        self.by_species.get(&species)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_population_csv() {
        let csv_data = "\
Length,SMBcnt,SMBpct,WAEpct,NOPpct,LATpct
10,4,0.25,0.05,,0.01
12,6,0.75,0.10,0.02,
99,1,1.0,1.0,1.0,1.0
";
        let baseline = PopulationBaseline::parse_population_csv(csv_data).unwrap();
        assert_eq!(baseline.pct(Species::SmallmouthBass, 10), Some(0.25));
        assert_eq!(baseline.pct(Species::Walleye, 12), Some(0.10));
        assert_eq!(baseline.pct(Species::NorthernPike, 10), None);
        assert_eq!(baseline.pct(Species::LakeTrout, 12), None);
        assert_eq!(baseline.curve(Species::SmallmouthBass).map(|c| c.len()), Some(2));
    }

    #[test]
    fn test_missing_length_column_is_empty() {
        let baseline = PopulationBaseline::parse_population_csv("Foo,WAEpct\n1,0.5\n").unwrap();
        assert!(baseline.by_species.is_empty());
    }
}
