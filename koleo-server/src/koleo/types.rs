//! Typed records for the Koleo API.
//!
//! The remote service omits fields freely, so every non-identity field is
//! optional with a serde default. Default substitution for display text
//! lives in the formatter layer, not here.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::datetime::TimeOfDay;

/// A railway station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_slug: String,
    #[serde(default, rename = "type")]
    pub station_type: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Wrapper for the station search endpoint response.
#[derive(Debug, Deserialize)]
pub struct StationSearchResponse {
    #[serde(default)]
    pub stations: Vec<Station>,
}

/// A train operator / service tier (e.g. EIP, TLK, REG).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo_text: Option<String>,
}

/// A carrier company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Carrier {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
}

/// One train on a station departure/arrival board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardEntry {
    /// Departure timestamp as an ISO string, when this is a departure row.
    #[serde(default)]
    pub departure: Option<String>,
    /// Arrival timestamp as an ISO string, when this is an arrival row.
    #[serde(default)]
    pub arrival: Option<String>,
    #[serde(default)]
    pub train_full_name: Option<String>,
    /// Route stations; the first entry is the terminus shown on the board.
    #[serde(default)]
    pub stations: Vec<BoardStation>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub track: Option<String>,
}

/// A station reference inside a board row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardStation {
    #[serde(default)]
    pub name: Option<String>,
}

/// One leg of a connection. Only `train_leg` entries carry a train.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub leg_type: Option<String>,
    #[serde(default)]
    pub train_full_name: Option<String>,
    #[serde(default)]
    pub train_nr: Option<i64>,
}

impl Leg {
    /// Whether this leg is an actual train ride (vs. a walk/transfer).
    pub fn is_train(&self) -> bool {
        self.leg_type.as_deref() == Some("train_leg")
    }
}

/// A connection between two stations, possibly with changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub arrival: Option<String>,
    /// Travel time in minutes.
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub changes: Option<i64>,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// Parameters for one page of the connection search endpoint.
#[derive(Debug, Clone)]
pub struct ConnectionQuery {
    pub start_station: i64,
    pub end_station: i64,
    /// Numeric brand ids; empty means "all brands".
    pub brand_ids: Vec<i64>,
    /// Departure-after cursor.
    pub departure_after: NaiveDateTime,
    pub only_direct: bool,
}

/// Response of the connection-id resolution endpoint.
#[derive(Debug, Deserialize)]
pub struct ConnectionIdResponse {
    pub connection_id: i64,
}

/// Operating calendar for a train number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainCalendar {
    #[serde(default)]
    pub train_name: Option<String>,
    /// Dates the train runs, as `YYYY-MM-DD` strings.
    #[serde(default)]
    pub dates: Vec<String>,
    /// Date -> internal train id for that day.
    #[serde(default)]
    pub date_train_map: BTreeMap<String, i64>,
}

/// Wrapper for the train calendars endpoint response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainCalendars {
    #[serde(default)]
    pub train_calendars: Vec<TrainCalendar>,
}

/// A scheduled time at a stop: either a full ISO timestamp or a bare
/// wall-clock time, depending on the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopTime {
    Clock(TimeOfDay),
    Text(String),
}

/// One stop on a train's route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainStop {
    #[serde(default)]
    pub arrival: Option<StopTime>,
    #[serde(default)]
    pub departure: Option<StopTime>,
    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub station_display_name: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    /// Distance from the line origin, in metres.
    #[serde(default)]
    pub distance: Option<f64>,
}

/// Header record of a train detail response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainHeader {
    #[serde(default)]
    pub train_full_name: Option<String>,
    /// Human-readable running-days description.
    #[serde(default)]
    pub run_desc: Option<String>,
}

/// Full train route: header plus ordered stops.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainDetail {
    #[serde(default)]
    pub train: TrainHeader,
    #[serde(default)]
    pub stops: Vec<TrainStop>,
}
