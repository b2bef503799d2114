//! Aggregate statistics and groupings over the tracked stations.

use std::collections::BTreeMap;

use aisnmea_models::Mmsi;
use serde::{Deserialize, Serialize};

use crate::station::Station;
use crate::tracker::StationTracker;

/// First and last timing of a capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    #[serde(rename = "Started")]
    pub started: String,
    #[serde(rename = "Finished")]
    pub finished: String,
}

/// Summary of everything a tracker has seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerStats {
    #[serde(rename = "Total Unique Stations")]
    pub total_stations: usize,
    #[serde(rename = "Total Messages Processed")]
    pub total_messages: usize,
    #[serde(rename = "Message Stats")]
    pub message_counts: BTreeMap<String, usize>,
    #[serde(rename = "AIS Station Types")]
    pub station_classes: BTreeMap<String, usize>,
    #[serde(rename = "Ship Types")]
    pub ship_types: BTreeMap<String, usize>,
    #[serde(rename = "Country Flags")]
    pub flags: BTreeMap<String, usize>,
    #[serde(rename = "Times", skip_serializing_if = "Option::is_none")]
    pub times: Option<TimeSpan>,
    #[serde(rename = "Timing Source MMSIs")]
    pub timing_sources: Vec<String>,
}

/// Station attribute to group by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Class,
    #[strum(serialize = "type")]
    ShipType,
    Flag,
}

impl Category {
    fn key(self, station: &Station) -> String {
        match self {
            Self::Class => station.class().to_string(),
            Self::ShipType => station.ship_type().to_string(),
            Self::Flag => station.flag().to_string(),
        }
    }
}

fn tally<'a>(stations: impl Iterator<Item = &'a Station>, category: Category) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for station in stations {
        *counts.entry(category.key(station)).or_default() += 1;
    }
    counts
}

impl StationTracker {
    /// Totals, per-category counts and the capture's time span.
    pub fn stats(&self) -> TrackerStats {
        let times = match (self.timings.first(), self.timings.last()) {
            (Some(started), Some(finished)) => Some(TimeSpan {
                started: started.clone(),
                finished: finished.clone(),
            }),
            _ => None,
        };
        TrackerStats {
            total_stations: self.stations.len(),
            total_messages: self.total_messages,
            message_counts: self.message_counts.clone(),
            station_classes: tally(self.stations.values(), Category::Class),
            ship_types: tally(self.stations.values(), Category::ShipType),
            flags: tally(self.stations.values(), Category::Flag),
            times,
            timing_sources: self.timing_sources.iter().map(ToString::to_string).collect(),
        }
    }

    /// MMSIs grouped by class, ship type or flag.
    pub fn sort_by_category(&self, category: Category) -> BTreeMap<String, Vec<Mmsi>> {
        let mut groups: BTreeMap<String, Vec<Mmsi>> = BTreeMap::new();
        for station in self.stations.values() {
            groups
                .entry(category.key(station))
                .or_default()
                .push(station.mmsi().clone());
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> StationTracker {
        let mut tracker = StationTracker::new();
        tracker.ingest("13P;Ruhvj1wj=0bNTU;up;=T80Rd", None).unwrap();
        tracker.ingest("13P;Ruhvj1wj=0bNTU;up;=T80Rd", None).unwrap();
        tracker.ingest("B3P=BS@0IWrnJ@7qm31=8ug5mP06", None).unwrap();
        tracker
            .ingest_with_fill("E>jHC=c6:W2h22R`@1:WdP00000Opa@H?KTcP10888e?B0", 2, None)
            .unwrap();
        tracker
    }

    #[test]
    fn stats_count_stations_and_messages() {
        let stats = tracker().stats();
        assert_eq!(stats.total_stations, 3);
        assert_eq!(stats.total_messages, 4);
        assert_eq!(stats.message_counts["Position Report Class A"], 2);
        assert_eq!(stats.station_classes["A"], 1);
        assert_eq!(stats.station_classes["B"], 1);
        assert_eq!(stats.station_classes["Navigation Aid"], 1);
        assert_eq!(stats.flags["United Kingdom"], 3);
        assert_eq!(stats.times, None);
    }

    #[test]
    fn stats_serialize_with_display_keys() {
        let json = serde_json::to_value(tracker().stats()).unwrap();
        assert_eq!(json["Total Unique Stations"], 3);
        assert_eq!(json["Total Messages Processed"], 4);
        assert_eq!(json["Ship Types"]["Cardinal Mark S"], 1);
        assert!(json.get("Times").is_none());
    }

    #[test]
    fn group_by_class() {
        let groups = tracker().sort_by_category(Category::Class);
        assert_eq!(groups["A"], vec![Mmsi::new("235070199")]);
        assert_eq!(groups["Navigation Aid"], vec![Mmsi::new("992351030")]);
    }

    #[test]
    fn category_parses_from_cli_names() {
        assert_eq!("type".parse::<Category>().unwrap(), Category::ShipType);
        assert_eq!("flag".parse::<Category>().unwrap(), Category::Flag);
        assert_eq!(Category::Class.to_string(), "class");
    }
}
