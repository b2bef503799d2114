//! Flat, serializable views of tracked stations for tables and exports.

use std::collections::BTreeMap;

use aisnmea_models::{BinarySubMessage, Mmsi, PositionFields, StationClass, StationDetails};
use serde::{Deserialize, Serialize};

use crate::station::Station;
use crate::tracker::{StationTracker, TIME_NOT_AVAILABLE};

/// Identity, details and positions of one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    #[serde(rename = "MMSI")]
    pub mmsi: Mmsi,
    #[serde(rename = "Class")]
    pub class: StationClass,
    #[serde(rename = "Type")]
    pub ship_type: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Callsign")]
    pub callsign: String,
    #[serde(rename = "Flag")]
    pub flag: String,
    #[serde(rename = "Details")]
    pub details: StationDetails,
    #[serde(rename = "Binary Messages", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub binary_messages: BTreeMap<String, Vec<BinarySubMessage>>,
    #[serde(rename = "Sent Messages")]
    pub message_counts: BTreeMap<String, usize>,
    #[serde(rename = "Last Known Position", default, skip_serializing_if = "Option::is_none")]
    pub latest_position: Option<PositionFields>,
    #[serde(rename = "Positions", default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<PositionFields>,
}

/// One row of the navigation table: where each station is now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavRow {
    #[serde(rename = "MMSI")]
    pub mmsi: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Callsign")]
    pub callsign: String,
    #[serde(rename = "Class")]
    pub class: String,
    #[serde(rename = "Flag")]
    pub flag: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "CoG")]
    pub course: String,
    #[serde(rename = "Speed (knots)")]
    pub speed: String,
    #[serde(rename = "Navigation Status")]
    pub nav_status: String,
    #[serde(rename = "Turn Rate")]
    pub turn_rate: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Destination")]
    pub destination: String,
    #[serde(rename = "ETA")]
    pub eta: String,
}

/// One row of the full station table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(rename = "MMSI")]
    pub mmsi: String,
    #[serde(rename = "Class")]
    pub class: String,
    #[serde(rename = "Type")]
    pub ship_type: String,
    #[serde(rename = "Flag")]
    pub flag: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Callsign")]
    pub callsign: String,
    #[serde(rename = "IMO")]
    pub imo: String,
    #[serde(rename = "RAIM")]
    pub raim: String,
    #[serde(rename = "EPFD")]
    pub epfd: String,
    #[serde(rename = "Position Accuracy")]
    pub position_accuracy: String,
    #[serde(rename = "Total Messages")]
    pub total_messages: usize,
    #[serde(rename = "First Known Latitude")]
    pub first_latitude: String,
    #[serde(rename = "First Known Longitude")]
    pub first_longitude: String,
    #[serde(rename = "First Known Navigation Status")]
    pub first_nav_status: String,
    #[serde(rename = "First Known Time")]
    pub first_time: String,
    #[serde(rename = "Last Known Latitude")]
    pub last_latitude: String,
    #[serde(rename = "Last Known Longitude")]
    pub last_longitude: String,
    #[serde(rename = "Last Known Navigation Status")]
    pub last_nav_status: String,
    #[serde(rename = "Last Known Time")]
    pub last_time: String,
    #[serde(rename = "Destination")]
    pub destination: String,
    #[serde(rename = "ETA")]
    pub eta: String,
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| TIME_NOT_AVAILABLE.to_string(), |v| v.to_string())
}

fn position_columns(position: Option<&PositionFields>) -> [String; 4] {
    [
        or_na(position.map(|p| p.latitude)),
        or_na(position.map(|p| p.longitude)),
        or_na(position.and_then(|p| p.nav_status)),
        or_na(position.and_then(|p| p.received_time.clone())),
    ]
}

impl NavRow {
    fn from_station(station: &Station, position: &PositionFields) -> Self {
        Self {
            mmsi: station.mmsi().to_string(),
            name: station.name().to_string(),
            callsign: station.callsign().to_string(),
            class: station.class().to_string(),
            flag: station.flag().to_string(),
            latitude: position.latitude,
            longitude: position.longitude,
            course: or_na(position.course),
            speed: or_na(position.speed),
            nav_status: or_na(position.nav_status),
            turn_rate: or_na(position.turn_rate),
            time: or_na(position.received_time.clone()),
            destination: or_na(position.destination.clone()),
            eta: or_na(position.eta.clone()),
        }
    }
}

impl TableRow {
    fn from_station(station: &Station) -> Self {
        let details = station.details();
        let first = station.first_position();
        let last = station.latest_position();
        let [first_latitude, first_longitude, first_nav_status, first_time] =
            position_columns(first);
        let [last_latitude, last_longitude, last_nav_status, last_time] = position_columns(last);
        Self {
            mmsi: station.mmsi().to_string(),
            class: station.class().to_string(),
            ship_type: station.ship_type().to_string(),
            flag: station.flag().to_string(),
            name: station.name().to_string(),
            callsign: station.callsign().to_string(),
            imo: or_na(details.imo),
            raim: or_na(details.raim.or_else(|| last.and_then(|p| p.raim))),
            epfd: or_na(details.epfd),
            position_accuracy: or_na(
                details
                    .position_accuracy
                    .or_else(|| last.and_then(|p| p.position_accuracy)),
            ),
            total_messages: station.total_messages(),
            first_latitude,
            first_longitude,
            first_nav_status,
            first_time,
            last_latitude,
            last_longitude,
            last_nav_status,
            last_time,
            destination: or_na(details.destination.clone()),
            eta: or_na(details.eta.clone()),
        }
    }
}

impl StationTracker {
    /// Latest position of every station that has one.
    pub fn nav_table(&self) -> Vec<NavRow> {
        self.stations()
            .filter_map(|station| {
                station
                    .latest_position()
                    .map(|position| NavRow::from_station(station, position))
            })
            .collect()
    }

    /// One summary row per station.
    pub fn table_data(&self) -> Vec<TableRow> {
        self.stations().map(TableRow::from_station).collect()
    }
}
