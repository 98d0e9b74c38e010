use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four game species tracked by the Big Fish Index.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Species {
    #[serde(rename = "WAE")]
    Walleye,
    #[serde(rename = "NOP")]
    NorthernPike,
    #[serde(rename = "LAT")]
    LakeTrout,
    #[serde(rename = "SMB")]
    SmallmouthBass,
}

impl Species {
    pub const ALL: [Species; 4] = [
        Species::Walleye,
        Species::NorthernPike,
        Species::LakeTrout,
        Species::SmallmouthBass,
    ];

    /// DNR species code, e.g. "WAE".
    pub fn code(&self) -> &'static str {
        match self {
            Species::Walleye => "WAE",
            Species::NorthernPike => "NOP",
            Species::LakeTrout => "LAT",
            Species::SmallmouthBass => "SMB",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Walleye => "Walleye",
            Species::NorthernPike => "Northern Pike",
            Species::LakeTrout => "Lake Trout",
            Species::SmallmouthBass => "Smallmouth Bass",
        }
    }

    /// Aggregate-table column holding this species' BFI score, e.g. "BFI_WAE".
    pub fn score_column(&self) -> String {
        format!("BFI_{}", self.code())
    }

    /// Aggregate-table column holding this species' BFI percentile, e.g. "BFI_WAE_Pct".
    pub fn percentile_column(&self) -> String {
        format!("BFI_{}_Pct", self.code())
    }

    /// Upper bound (inches) of the length axis when charting this species.
    pub fn chart_max_length(&self) -> u8 {
        match self {
            Species::Walleye => 32,
            Species::NorthernPike => 46,
            Species::LakeTrout => 42,
            Species::SmallmouthBass => 22,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WAE" | "WALLEYE" => Ok(Species::Walleye),
            "NOP" | "NORTHERN PIKE" | "PIKE" => Ok(Species::NorthernPike),
            "LAT" | "LAKE TROUT" => Ok(Species::LakeTrout),
            "SMB" | "SMALLMOUTH BASS" | "SMALLMOUTH" => Ok(Species::SmallmouthBass),
            other => Err(format!("unknown species code: {}", other)),
        }
    }
}
