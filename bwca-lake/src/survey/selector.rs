use super::SurveySource;
use crate::error::{BwcaError, Result};
use bwca_utils::dates::survey_year;
use log::{debug, warn};
use serde::Serialize;

/// The survey chosen for display and extraction.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct SelectedSurvey {
    /// Position in the document's survey array.
    pub index: usize,
    pub date: String,
    pub year: i32,
}

/// Pick the most recent survey by year.
///
/// When several surveys share the latest year the first one in document
/// order wins. Dates whose year cannot be read are skipped. A document with
/// no readable survey dates yields [`BwcaError::NoSurveysInDocument`].
pub fn select_most_recent<S: SurveySource + ?Sized>(source: &S) -> Result<SelectedSurvey> {
    let mut selected: Option<SelectedSurvey> = None;
    for survey in source.survey_dates() {
        let Some(year) = survey_year(&survey.date) else {
            warn!(
                "Skipping survey {} with unreadable date {:?}",
                survey.index, survey.date
            );
            continue;
        };
        if selected.as_ref().map_or(true, |s| year > s.year) {
            selected = Some(SelectedSurvey {
                index: survey.index,
                date: survey.date,
                year,
            });
        }
    }
    if let Some(s) = &selected {
        debug!("Selected survey {} dated {}", s.index, s.date);
    }
    selected.ok_or(BwcaError::NoSurveysInDocument)
}
