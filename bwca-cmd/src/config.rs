//! Runtime configuration shared by every subcommand.

use bwca_db::ReferenceTables;
use bwca_lake::survey::client::{SurveyClient, DEFAULT_SURVEY_URL};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Directory holding the reference CSV files
    #[arg(long, global = true, env = "BWCA_DATA_DIR", default_value = "fixtures")]
    pub data_dir: PathBuf,

    /// LakeFinder survey endpoint
    #[arg(long, global = true, env = "BWCA_SURVEY_URL", default_value = DEFAULT_SURVEY_URL)]
    pub survey_url: String,

    /// Survey request timeout in seconds
    #[arg(long, global = true, env = "BWCA_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn load_tables(&self) -> anyhow::Result<ReferenceTables> {
        Ok(ReferenceTables::load_dir(&self.data_dir)?)
    }

    pub fn survey_client(&self) -> anyhow::Result<SurveyClient> {
        Ok(SurveyClient::new(self.survey_url.clone(), self.timeout())?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("fixtures"),
            survey_url: DEFAULT_SURVEY_URL.to_string(),
            timeout_secs: 30,
        }
    }
}
