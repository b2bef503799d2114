//! Station tracker: folds decoded messages into per-MMSI state and keeps
//! the reception timeline.
//!
//! Messages without a receive timestamp can still be placed in time when
//! they come from a trusted base station: its broadcast UTC time becomes
//! an *estimated* timing that later messages inherit.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use aisnmea_models::{AisMessage, AssembledMessage, MessageBody, Mmsi, Result};
use tracing::{debug, info};

use crate::station::Station;

/// Rendered time of a message whose reception time is unknown.
pub const TIME_NOT_AVAILABLE: &str = "N/A";

/// Suffix marking a timing derived from a base station broadcast.
pub const ESTIMATED_SUFFIX: &str = " (estimated)";

/// Accumulated state for every station heard.
#[derive(Debug, Clone, Default)]
pub struct StationTracker {
    pub(crate) stations: BTreeMap<Mmsi, Station>,
    pub(crate) message_counts: BTreeMap<String, usize>,
    pub(crate) total_messages: usize,
    pub(crate) timings: Vec<String>,
    seen_timings: HashSet<String>,
    pub(crate) timing_sources: BTreeSet<Mmsi>,
}

impl StationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker that estimates timings from these base stations.
    pub fn with_timing_sources(sources: impl IntoIterator<Item = Mmsi>) -> Self {
        Self {
            timing_sources: sources.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Trust another base station's UTC broadcasts.
    pub fn add_timing_source(&mut self, mmsi: Mmsi) {
        info!(mmsi = %mmsi, "timing source added");
        self.timing_sources.insert(mmsi);
    }

    pub fn timing_sources(&self) -> &BTreeSet<Mmsi> {
        &self.timing_sources
    }

    // ---- ingestion ----------------------------------------------------

    /// Decode a complete payload (no fill bits) and record it.
    ///
    /// Returns the decoded message with its effective received time set.
    /// A decode error leaves the tracker unchanged.
    pub fn ingest(&mut self, payload: &str, timestamp: Option<&str>) -> Result<AisMessage> {
        self.ingest_with_fill(payload, 0, timestamp)
    }

    pub fn ingest_with_fill(
        &mut self,
        payload: &str,
        fill_bits: u8,
        timestamp: Option<&str>,
    ) -> Result<AisMessage> {
        let message = aisnmea_models::decode_with_fill(payload, fill_bits)?;
        Ok(self.record(message, timestamp))
    }

    /// Decode and record the output of a [`Reassembler`](aisnmea_models::Reassembler).
    pub fn ingest_assembled(
        &mut self,
        assembled: &AssembledMessage,
        timestamp: Option<&str>,
    ) -> Result<AisMessage> {
        self.ingest_with_fill(&assembled.payload, assembled.fill_bits, timestamp)
    }

    /// Record an already decoded message.
    pub fn record(&mut self, mut message: AisMessage, timestamp: Option<&str>) -> AisMessage {
        self.total_messages += 1;
        *self
            .message_counts
            .entry(message.description().to_string())
            .or_default() += 1;

        message.received_time = Some(self.effective_time(&message, timestamp));

        let station = self
            .stations
            .entry(message.mmsi.clone())
            .or_insert_with(|| {
                debug!(mmsi = %message.mmsi, "new station");
                Station::new(message.mmsi.clone())
            });
        station.classify(message.message_type);
        station.identify(&message);
        station.ingest(&message);
        message
    }

    /// Work out the received time to stamp on `message`, extending the
    /// timeline as a side effect.
    fn effective_time(&mut self, message: &AisMessage, timestamp: Option<&str>) -> String {
        if let Some(timestamp) = timestamp {
            self.push_timing(timestamp.to_string());
            return timestamp.to_string();
        }
        if let MessageBody::BaseStationReport(report) | MessageBody::UtcDateResponse(report) =
            &message.body
        {
            if self.timing_sources.contains(&message.mmsi) && report.utc_time().is_some() {
                self.push_timing(format!("{}{ESTIMATED_SUFFIX}", report.timestamp()));
            }
        }
        self.timings
            .last()
            .cloned()
            .unwrap_or_else(|| TIME_NOT_AVAILABLE.to_string())
    }

    fn push_timing(&mut self, timing: String) {
        if self.seen_timings.insert(timing.clone()) {
            self.timings.push(timing);
        }
    }

    // ---- queries ------------------------------------------------------

    pub fn station(&self, mmsi: &Mmsi) -> Option<&Station> {
        self.stations.get(mmsi)
    }

    /// Stations in MMSI order.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn total_messages(&self) -> usize {
        self.total_messages
    }

    /// Distinct timings in first-seen order.
    pub fn timings(&self) -> &[String] {
        &self.timings
    }

    /// Median latitude and median longitude of every station's latest
    /// position, taking the upper median for an even count.
    pub fn centre_of_map(&self) -> Option<(f64, f64)> {
        let (mut latitudes, mut longitudes): (Vec<f64>, Vec<f64>) = self
            .stations
            .values()
            .filter_map(Station::latest_position)
            .map(|p| (p.latitude, p.longitude))
            .unzip();
        if latitudes.is_empty() {
            return None;
        }
        latitudes.sort_by(f64::total_cmp);
        longitudes.sort_by(f64::total_cmp);
        let middle = latitudes.len() / 2;
        Some((latitudes[middle], longitudes[middle]))
    }

    /// Forget every station, count and timing. Timing sources are kept.
    pub fn clear(&mut self) {
        self.stations.clear();
        self.message_counts.clear();
        self.total_messages = 0;
        self.timings.clear();
        self.seen_timings.clear();
    }
}

// ---------------------------------------------------------------------------
// BaseStationTracker
// ---------------------------------------------------------------------------

/// Tracker restricted to base station reports (types 4 and 11).
///
/// Used as a first pass over a capture to find which base stations
/// broadcast a usable UTC time, before timing sources are chosen.
#[derive(Debug, Clone, Default)]
pub struct BaseStationTracker {
    tracker: StationTracker,
    utc_reports: BTreeMap<Mmsi, usize>,
}

impl BaseStationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `payload` and record it if it is a base station report.
    ///
    /// Returns `Ok(None)` for any other message type.
    pub fn ingest_with_fill(
        &mut self,
        payload: &str,
        fill_bits: u8,
        timestamp: Option<&str>,
    ) -> Result<Option<AisMessage>> {
        let message = aisnmea_models::decode_with_fill(payload, fill_bits)?;
        let (MessageBody::BaseStationReport(report) | MessageBody::UtcDateResponse(report)) =
            &message.body
        else {
            return Ok(None);
        };
        if report.utc_time().is_some() {
            *self.utc_reports.entry(message.mmsi.clone()).or_default() += 1;
        }
        Ok(Some(self.tracker.record(message, timestamp)))
    }

    /// Base stations with a valid UTC time, most reports first.
    pub fn timing_candidates(&self) -> Vec<(Mmsi, usize)> {
        let mut candidates: Vec<(Mmsi, usize)> = self
            .utc_reports
            .iter()
            .map(|(mmsi, count)| (mmsi.clone(), *count))
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        candidates
    }

    pub fn tracker(&self) -> &StationTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisnmea_models::{AisError, Reassembler, StationClass};

    const S1: &str = "13P;Ruhvj1wj=0bNTU;up;=T80Rd";
    const SENTINEL: &str = "13P;Ruhvj1dtSF0l4Q@=p;=T80Rd";
    const BASE_STATION: [&str; 4] = [
        "402=a`1vDo:00wTwO0O?Ph700000",
        "402=a`1vDo:0:wTwO0O?Ph700000",
        "402=a`1vDo:0DwTwO0O?Ph700000",
        "402=a`1vDo:0NwTwO0O?Ph700000",
    ];

    #[test]
    fn single_position_report() {
        let mut tracker = StationTracker::new();
        let message = tracker.ingest(S1, None).unwrap();
        assert_eq!(message.received_time.as_deref(), Some(TIME_NOT_AVAILABLE));

        let station = tracker.station(&Mmsi::new("235070199")).unwrap();
        assert_eq!(station.class(), StationClass::A);
        assert_eq!(station.flag(), "United Kingdom");
        assert_eq!(station.positions().len(), 1);
        let position = &station.positions()[0];
        assert!((position.latitude - 53.427_705).abs() < 1e-6);
        assert!((position.longitude + 3.013_938_3).abs() < 1e-6);
        assert_eq!(tracker.total_messages(), 1);
    }

    #[test]
    fn reassembled_static_voyage() {
        let mut reassembler = Reassembler::new();
        let first = "!AIVDM,2,1,5,A,53P:dJP2<10S8I@GH00l4p4pp4p000000000000`2Q<==5WBN813mAk0Dh00,0*08";
        let second = "!AIVDM,2,2,5,A,00000000000,2*21";
        assert_eq!(reassembler.accept(first).unwrap(), None);
        let assembled = reassembler.accept(second).unwrap().unwrap();

        let mut tracker = StationTracker::new();
        let message = tracker.ingest_assembled(&assembled, None).unwrap();
        let station = tracker.station(&message.mmsi).unwrap();
        assert_eq!(station.name(), "MANANNAN");
        assert_eq!(station.callsign(), "2FTE6");
        assert_eq!(station.class(), StationClass::A);
        assert_eq!(station.details().imo, Some(9_176_072));
        assert_eq!(station.details().destination.as_deref(), Some("DOUGLAS"));
        assert_eq!(station.details().draught, Some(3.2));
        assert!(station.positions().is_empty());
    }

    #[test]
    fn zero_mmsi_creates_no_station() {
        let mut tracker = StationTracker::new();
        let err = tracker.ingest("1000000vj1wj=0bNTU;up;=T80Rd", None).unwrap_err();
        assert_eq!(err, AisError::InvalidMmsi { message_type: 1 });
        assert!(tracker.is_empty());
        assert_eq!(tracker.total_messages(), 0);
    }

    #[test]
    fn bad_sentence_leaves_state_unchanged() {
        let mut reassembler = Reassembler::new();
        let mut tracker = StationTracker::new();
        tracker.ingest(S1, Some("2021/03/14 10:00:00")).unwrap();

        let corrupted = "!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0*43";
        assert!(reassembler.accept(corrupted).is_err());
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.total_messages(), 1);
        assert_eq!(tracker.timings(), ["2021/03/14 10:00:00"]);
    }

    #[test]
    fn base_station_timings_are_estimated() {
        let mut tracker = StationTracker::with_timing_sources([Mmsi::new("002320800")]);
        for payload in BASE_STATION {
            tracker.ingest(payload, None).unwrap();
        }
        assert_eq!(
            tracker.timings(),
            [
                "2021/03/14 10:00:00 (estimated)",
                "2021/03/14 10:00:10 (estimated)",
                "2021/03/14 10:00:20 (estimated)",
                "2021/03/14 10:00:30 (estimated)",
            ]
        );
        let message = tracker.ingest(S1, None).unwrap();
        assert_eq!(
            message.received_time.as_deref(),
            Some("2021/03/14 10:00:30 (estimated)")
        );
        let stats = tracker.stats();
        let times = stats.times.unwrap();
        assert_eq!(times.started, "2021/03/14 10:00:00 (estimated)");
        assert_eq!(times.finished, "2021/03/14 10:00:30 (estimated)");

        let base = tracker.station(&Mmsi::new("002320800")).unwrap();
        assert_eq!(base.class(), StationClass::BaseStation);
        assert_eq!(base.flag(), "United Kingdom");
        assert_eq!(base.positions().len(), 4);
    }

    #[test]
    fn untrusted_base_station_gives_no_timing() {
        let mut tracker = StationTracker::new();
        let message = tracker.ingest(BASE_STATION[0], None).unwrap();
        assert!(tracker.timings().is_empty());
        assert_eq!(message.received_time.as_deref(), Some(TIME_NOT_AVAILABLE));
    }

    #[test]
    fn supplied_timestamps_are_deduplicated() {
        let mut tracker = StationTracker::new();
        tracker.ingest(S1, Some("2021/03/14 10:00:00")).unwrap();
        tracker.ingest(S1, Some("2021/03/14 10:00:00")).unwrap();
        tracker.ingest(S1, Some("2021/03/14 10:00:05")).unwrap();
        assert_eq!(tracker.timings().len(), 2);
        let position = &tracker.station(&Mmsi::new("235070199")).unwrap().positions()[2];
        assert_eq!(position.received_time.as_deref(), Some("2021/03/14 10:00:05"));
    }

    #[test]
    fn aid_to_navigation_station() {
        let mut tracker = StationTracker::new();
        tracker
            .ingest_with_fill("E>jHC=c6:W2h22R`@1:WdP00000Opa@H?KTcP10888e?B0", 2, None)
            .unwrap();
        let station = tracker.station(&Mmsi::new("992351030")).unwrap();
        assert_eq!(station.class(), StationClass::NavigationAid);
        assert_eq!(station.name(), "LUNE DEEP BUOY");
        assert_eq!(station.ship_type(), "Cardinal Mark S");
        assert_eq!(station.details().raim, Some(true));
        let position = station.latest_position().unwrap();
        assert!((position.latitude - 53.934_66).abs() < 1e-5);
        assert!((position.longitude + 3.213_613_3).abs() < 1e-6);
    }

    #[test]
    fn invalid_positions_are_never_stored() {
        let mut tracker = StationTracker::new();
        tracker.ingest(SENTINEL, None).unwrap();
        tracker.ingest(S1, None).unwrap();
        let station = tracker.station(&Mmsi::new("235070199")).unwrap();
        assert_eq!(station.positions().len(), 1);
        assert!(tracker
            .stations()
            .flat_map(Station::positions)
            .all(|p| p.is_valid()));
    }

    #[test]
    fn centre_of_map_uses_upper_medians() {
        let mut tracker = StationTracker::new();
        assert_eq!(tracker.centre_of_map(), None);
        tracker.ingest(S1, None).unwrap();
        tracker
            .ingest_with_fill("E>jHC=c6:W2h22R`@1:WdP00000Opa@H?KTcP10888e?B0", 2, None)
            .unwrap();
        let (lat, lon) = tracker.centre_of_map().unwrap();
        assert!((lat - 53.934_66).abs() < 1e-5);
        assert!((lon + 3.013_938_3).abs() < 1e-6);
    }

    #[test]
    fn clear_keeps_timing_sources() {
        let mut tracker = StationTracker::with_timing_sources([Mmsi::new("002320800")]);
        tracker.ingest(BASE_STATION[0], None).unwrap();
        tracker.clear();
        assert!(tracker.is_empty());
        assert!(tracker.timings().is_empty());
        assert_eq!(tracker.total_messages(), 0);
        assert_eq!(tracker.timing_sources().len(), 1);
    }

    #[test]
    fn base_station_tracker_ignores_other_types() {
        let mut tracker = BaseStationTracker::new();
        assert_eq!(tracker.ingest_with_fill(S1, 0, None).unwrap(), None);
        for payload in BASE_STATION {
            assert!(tracker.ingest_with_fill(payload, 0, None).unwrap().is_some());
        }
        assert_eq!(tracker.tracker().len(), 1);
        assert_eq!(
            tracker.timing_candidates(),
            vec![(Mmsi::new("002320800"), 4)]
        );
    }
}
