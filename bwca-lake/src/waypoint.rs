use csv::ReaderBuilder;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delimiter between fields of a campsite description, e.g.
/// `"BWCA Campsite - Lake Insula - #1234"`.
const DESCRIPTION_DELIMITER: char = '-';

/// Token stripped from the parsed lake name ("Lake Insula" -> "Insula").
const LAKE_TOKEN: &str = "Lake";

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum WaypointCategory {
    Campsite,
    Portage,
}

impl WaypointCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaypointCategory::Campsite => "Campsite",
            WaypointCategory::Portage => "Portage",
        }
    }
}

impl fmt::Display for WaypointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A campsite or portage GPS waypoint.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct WaypointRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub category: WaypointCategory,
    /// Hover text: the campsite number, or the portage length in rods.
    pub label: String,
    /// Parent lake, recovered from the description. Portages carry none.
    pub lake: Option<String>,
}

/// GPX export row: `X` is longitude and `Y` latitude.
#[derive(Debug, Deserialize)]
struct GpxRow {
    #[serde(rename = "Y", alias = "lat")]
    latitude: f64,
    #[serde(rename = "X", alias = "lon")]
    longitude: f64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    desc: String,
}

/// Recover the parent lake name from a campsite description.
///
/// Takes the second `-` delimited field and drops the `Lake` token:
/// `"BWCA Campsite - Lake Insula - #1234"` gives `Some("Insula")`.
pub fn lake_name_from_description(desc: &str) -> Option<String> {
    let field = desc.split(DESCRIPTION_DELIMITER).nth(1)?;
    let name = field
        .split_whitespace()
        .filter(|token| *token != LAKE_TOKEN)
        .collect::<Vec<&str>>()
        .join(" ");
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Portage length from description text, rendered as `"<n> rods"`.
///
/// Accepts both `"... 40 rods"` and `"... Rods 40"` orderings.
pub fn rods_label(desc: &str) -> Option<String> {
    let tokens: Vec<&str> = desc.split_whitespace().collect();
    let is_number = |s: &str| s.parse::<f64>().is_ok();
    for (i, token) in tokens.iter().enumerate() {
        let word = token
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if word != "rods" && word != "rod" {
            continue;
        }
        if i > 0 && is_number(tokens[i - 1]) {
            return Some(format!("{} rods", tokens[i - 1]));
        }
        if let Some(next) = tokens.get(i + 1) {
            let next = next.trim_matches(|c: char| !c.is_ascii_digit() && c != '.');
            if is_number(next) {
                return Some(format!("{} rods", next));
            }
        }
    }
    None
}

/// Mean latitude and longitude of a set of waypoints, used to centre a map.
pub fn map_center<'a, I>(waypoints: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a WaypointRecord>,
{
    let (count, lat_sum, lon_sum) = waypoints
        .into_iter()
        .fold((0usize, 0.0f64, 0.0f64), |(n, lat, lon), w| {
            (n + 1, lat + w.latitude, lon + w.longitude)
        });
    if count == 0 {
        None
    } else {
        Some((lat_sum / count as f64, lon_sum / count as f64))
    }
}

impl WaypointRecord {
    fn parse_gpx_csv(csv_object: &str) -> Result<Vec<GpxRow>, csv::Error> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes());
        rdr.deserialize().collect()
    }

    /// Parse the campsite waypoint CSV (`X,Y,name,desc`).
    ///
    /// Campsites whose description does not name a lake are kept, with
    /// `lake` set to `None`.
    pub fn parse_campsites_csv(csv_object: &str) -> Result<Vec<WaypointRecord>, csv::Error> {
        let rows = Self::parse_gpx_csv(csv_object)?;
        let campsites = rows
            .into_iter()
            .map(|row| {
                let lake = lake_name_from_description(&row.desc);
                if lake.is_none() {
                    warn!("Campsite {} has no lake in description {:?}", row.name, row.desc);
                }
                WaypointRecord {
                    latitude: row.latitude,
                    longitude: row.longitude,
                    category: WaypointCategory::Campsite,
                    label: row.name,
                    lake,
                }
            })
            .collect();
        Ok(campsites)
    }

    /// Parse the portage waypoint CSV (`X,Y,name,desc`).
    ///
    /// The label is the rod distance found in the description, falling back
    /// to the waypoint name.
    pub fn parse_portages_csv(csv_object: &str) -> Result<Vec<WaypointRecord>, csv::Error> {
        let rows = Self::parse_gpx_csv(csv_object)?;
        let portages = rows
            .into_iter()
            .map(|row| WaypointRecord {
                latitude: row.latitude,
                longitude: row.longitude,
                category: WaypointCategory::Portage,
                label: rods_label(&row.desc).unwrap_or(row.name),
                lake: None,
            })
            .collect();
        Ok(portages)
    }
}
