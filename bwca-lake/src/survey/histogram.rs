use super::selector::SelectedSurvey;
use super::{FishCountEntry, SurveySource};
use crate::species::Species;
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Integer fish length (inches) used as a histogram bin.
pub type LengthBin = u8;

/// Largest length bin shared by all species.
pub const MAX_LENGTH_BIN: LengthBin = 46;

/// The closed bin domain, 0 through 46.
pub fn length_bins() -> RangeInclusive<LengthBin> {
    0..=MAX_LENGTH_BIN
}

/// Read a length label as a bin inside the domain. Accepts `"12"` and `"12.0"`.
fn parse_length_bin(label: &str) -> Option<LengthBin> {
    let value = label.trim().parse::<f64>().ok()?;
    if value.fract() != 0.0 || value < 0.0 || value > f64::from(MAX_LENGTH_BIN) {
        return None;
    }
    Some(value as LengthBin)
}

fn parse_count(count: &str) -> Option<u32> {
    let value = count.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}

/// Raw fish counts by length bin for one species in one survey.
///
/// Bins absent from the survey are absent from the map. A bin can be
/// recorded with a null count; both count as zero toward the total.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct LengthHistogram {
    pub species: Species,
    counts: BTreeMap<LengthBin, Option<u32>>,
}

impl LengthHistogram {
    pub fn new(species: Species) -> Self {
        LengthHistogram {
            species,
            counts: BTreeMap::new(),
        }
    }

    /// Build from `(bin, count)` pairs. A bin seen twice keeps its first count.
    pub fn from_counts<I>(species: Species, counts: I) -> Self
    where
        I: IntoIterator<Item = (LengthBin, u32)>,
    {
        let mut histogram = LengthHistogram::new(species);
        for (bin, count) in counts {
            histogram.insert_first(bin, Some(count));
        }
        histogram
    }

    /// Insert unless the bin is already present. Returns false for a duplicate.
    fn insert_first(&mut self, bin: LengthBin, count: Option<u32>) -> bool {
        if self.counts.contains_key(&bin) {
            return false;
        }
        self.counts.insert(bin, count);
        true
    }

    /// Count at `bin`; `None` when the bin is absent or its count is null.
    pub fn get(&self, bin: LengthBin) -> Option<u32> {
        self.counts.get(&bin).copied().flatten()
    }

    /// True when the survey listed `bin`, even with a null count.
    pub fn contains(&self, bin: LengthBin) -> bool {
        self.counts.contains_key(&bin)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().flatten().map(|c| u64::from(*c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Bins with a known count.
    pub fn iter(&self) -> impl Iterator<Item = (LengthBin, u32)> + '_ {
        self.counts
            .iter()
            .filter_map(|(bin, count)| count.map(|c| (*bin, c)))
    }

    fn from_entries(species: Species, entries: Vec<FishCountEntry>) -> Self {
        let mut histogram = LengthHistogram::new(species);
        for entry in entries {
            let Some(bin) = parse_length_bin(&entry.length) else {
                warn!(
                    "{}: dropping length label {:?} outside bins 0..={}",
                    species, entry.length, MAX_LENGTH_BIN
                );
                continue;
            };
            let count = entry.count.as_deref().and_then(parse_count);
            if count.is_none() {
                warn!("{}: no readable count {:?} at length {}", species, entry.count, bin);
            }
            if !histogram.insert_first(bin, count) {
                warn!("{}: duplicate length {} keeps its first count", species, bin);
            }
        }
        histogram
    }
}

/// Rebuild one species' length histogram from the selected survey.
///
/// A species with no entries yields an empty histogram.
pub fn extract_histogram<S: SurveySource + ?Sized>(
    source: &S,
    survey: &SelectedSurvey,
    species: Species,
) -> LengthHistogram {
    LengthHistogram::from_entries(species, source.fish_count_entries(survey.index, species))
}

/// Histograms for all four species. Each is extracted independently.
pub fn extract_all<S: SurveySource + ?Sized>(
    source: &S,
    survey: &SelectedSurvey,
) -> BTreeMap<Species, LengthHistogram> {
    Species::ALL
        .iter()
        .map(|species| (*species, extract_histogram(source, survey, *species)))
        .collect()
}
