//! Raw survey inspection: the fetched document as flattened path/value rows.

use bwca_lake::survey::client::SurveyClient;
use bwca_lake::survey::flatten::{flatten, FlattenedRecord};
use bwca_lake::survey::selector::select_most_recent;
use bwca_lake::survey::SurveySource;
use log::info;
use std::io::Write;
use std::path::Path;

/// Write a flattened record as `path,value` CSV rows, sorted by path.
pub fn write_flattened_csv<W: Write>(writer: W, record: &FlattenedRecord) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["path", "value"])?;
    for (path, value) in record.iter() {
        wtr.write_record([path, value])?;
    }
    wtr.flush()?;
    Ok(())
}

pub async fn run_survey(
    client: &SurveyClient,
    lake_id: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let document = client.fetch(lake_id).await?;
    let record = flatten(document.raw());
    info!(
        "Lake {}: {} flattened fields, {} dated surveys",
        lake_id,
        record.len(),
        record.survey_dates().len()
    );
    match select_most_recent(&record) {
        Ok(selected) => info!("Most recent survey is #{} ({})", selected.index, selected.date),
        Err(e) => info!("{}", e),
    }

    match output {
        Some(path) => write_flattened_csv(std::fs::File::create(path)?, &record)?,
        None => write_flattened_csv(std::io::stdout().lock(), &record)?,
    }
    Ok(())
}
