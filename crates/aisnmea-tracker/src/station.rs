//! One tracked AIS station and the state it accumulates.

use std::collections::BTreeMap;

use aisnmea_models::{
    AisMessage, BinarySubMessage, DetailFields, MessageBody, Mmsi, PositionFields,
    StaticDataReport, StationClass, StationDetails,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::views::StationInfo;

/// Ship type of a station nothing has described yet.
pub const UNKNOWN_SHIP_TYPE: &str = "Unknown";

/// Everything known about one MMSI.
///
/// Created on the first valid message from that MMSI and mutated only
/// through [`Station::ingest`] (via the tracker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    mmsi: Mmsi,
    class: StationClass,
    ship_type: String,
    name: String,
    callsign: String,
    flag: String,
    details: StationDetails,
    positions: Vec<PositionFields>,
    binary_messages: BTreeMap<String, Vec<BinarySubMessage>>,
    message_counts: BTreeMap<String, usize>,
}

impl Station {
    /// A station with unknown class whose flag comes from the MMSI's MID.
    pub fn new(mmsi: Mmsi) -> Self {
        let flag = mmsi.flag().to_string();
        Self {
            mmsi,
            class: StationClass::Unknown,
            ship_type: UNKNOWN_SHIP_TYPE.to_string(),
            name: String::new(),
            callsign: String::new(),
            flag,
            details: StationDetails::default(),
            positions: Vec::new(),
            binary_messages: BTreeMap::new(),
            message_counts: BTreeMap::new(),
        }
    }

    // ---- accessors ----------------------------------------------------

    pub fn mmsi(&self) -> &Mmsi {
        &self.mmsi
    }

    pub fn class(&self) -> StationClass {
        self.class
    }

    pub fn ship_type(&self) -> &str {
        &self.ship_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    /// Country of registration, or `"Unknown"`.
    pub fn flag(&self) -> &str {
        &self.flag
    }

    pub fn details(&self) -> &StationDetails {
        &self.details
    }

    /// Valid positions in ingestion order.
    pub fn positions(&self) -> &[PositionFields] {
        &self.positions
    }

    /// Decoded binary sub-messages grouped by sub-type.
    pub fn binary_messages(&self) -> &BTreeMap<String, Vec<BinarySubMessage>> {
        &self.binary_messages
    }

    /// Messages received, keyed by message type description.
    pub fn message_counts(&self) -> &BTreeMap<String, usize> {
        &self.message_counts
    }

    pub fn total_messages(&self) -> usize {
        self.message_counts.values().sum()
    }

    pub fn first_position(&self) -> Option<&PositionFields> {
        self.positions.first()
    }

    pub fn latest_position(&self) -> Option<&PositionFields> {
        self.positions.last()
    }

    // ---- classification -----------------------------------------------

    /// Set the class once, from the MMSI prefix or else the message type.
    ///
    /// Does nothing when the class is already known.
    pub fn classify(&mut self, message_type: u8) {
        if self.class != StationClass::Unknown {
            return;
        }
        let Some(class) = self
            .mmsi
            .class_from_prefix()
            .or_else(|| StationClass::from_message_type(message_type))
        else {
            return;
        };
        self.class = class;
        if matches!(
            class,
            StationClass::BaseStation | StationClass::AisSart | StationClass::Mob | StationClass::Epirb
        ) {
            self.ship_type = class.to_string();
        }
        debug!(mmsi = %self.mmsi, class = %class, "station classified");
    }

    /// Fill in a missing name, ship type or callsign from the message.
    pub fn identify(&mut self, message: &AisMessage) {
        if self.ship_type != UNKNOWN_SHIP_TYPE && !self.name.is_empty() {
            return;
        }
        let (name, ship_type, callsign) = match &message.body {
            MessageBody::StaticAndVoyage(r) => (
                Some(r.name.as_str()),
                Some(r.ship_type_name()),
                Some(r.callsign.as_str()),
            ),
            MessageBody::ExtendedClassBPosition(r) => {
                (Some(r.name.as_str()), Some(r.ship_type_name()), None)
            }
            MessageBody::SarAircraftPosition(_) => (None, Some("SAR Aircraft"), None),
            MessageBody::AidToNavigation(r) => {
                (Some(r.name.as_str()), Some(r.aid_type_name()), None)
            }
            MessageBody::StaticDataReport(StaticDataReport::PartA { name }) => {
                (Some(name.as_str()), None, None)
            }
            MessageBody::StaticDataReport(StaticDataReport::PartB {
                ship_type,
                callsign,
                ..
            }) => (
                None,
                Some(aisnmea_models::tables::ship_type_name(u64::from(*ship_type))),
                callsign.as_deref(),
            ),
            _ => return,
        };
        if let Some(name) = name.filter(|n| !n.is_empty() && self.name.is_empty()) {
            self.name = name.to_string();
        }
        if let Some(ship_type) = ship_type.filter(|_| self.ship_type == UNKNOWN_SHIP_TYPE) {
            self.ship_type = ship_type.to_string();
        }
        if let Some(callsign) = callsign.filter(|c| !c.is_empty() && self.callsign.is_empty()) {
            self.callsign = callsign.to_string();
        }
    }

    // ---- ingestion ----------------------------------------------------

    /// Record a decoded message: count it, keep its position if valid and
    /// fold its details in.
    pub fn ingest(&mut self, message: &AisMessage) {
        *self
            .message_counts
            .entry(message.description().to_string())
            .or_default() += 1;

        if let Some(mut position) = message.position_fields() {
            match position.validate(&self.mmsi) {
                Ok(()) => {
                    position.destination = self.details.destination.clone();
                    position.eta = self.details.eta.clone();
                    self.positions.push(position);
                }
                Err(err) => debug!(error = %err, "position dropped"),
            }
        }

        match message.detail_fields() {
            Some(DetailFields::Station(details)) => self.details.merge(details),
            Some(DetailFields::Binary(sub_message)) => self
                .binary_messages
                .entry(sub_message.sub_type().to_string())
                .or_default()
                .push(sub_message),
            None => {}
        }
    }

    /// Identity, details, counts and either the latest or every position.
    pub fn station_info(&self, full: bool) -> StationInfo {
        StationInfo {
            mmsi: self.mmsi.clone(),
            class: self.class,
            ship_type: self.ship_type.clone(),
            name: self.name.clone(),
            callsign: self.callsign.clone(),
            flag: self.flag.clone(),
            details: self.details.clone(),
            binary_messages: self.binary_messages.clone(),
            message_counts: self.message_counts.clone(),
            latest_position: if full { None } else { self.latest_position().cloned() },
            positions: if full { self.positions.clone() } else { Vec::new() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisnmea_models::{decode, decode_with_fill};

    const TYPE5: &str = "53P:dJP2<10S8I@GH00l4p4pp4p000000000000`2Q<==5WBN813mAk0Dh0000000000000";

    #[test]
    fn new_station_takes_flag_from_mid() {
        let station = Station::new(Mmsi::new("235070199"));
        assert_eq!(station.flag(), "United Kingdom");
        assert_eq!(station.class(), StationClass::Unknown);
        assert_eq!(station.ship_type(), UNKNOWN_SHIP_TYPE);
    }

    #[test]
    fn class_is_set_once() {
        let mut station = Station::new(Mmsi::new("002320800"));
        station.classify(4);
        assert_eq!(station.class(), StationClass::BaseStation);
        assert_eq!(station.ship_type(), "Base Station");
        station.classify(1);
        assert_eq!(station.class(), StationClass::BaseStation);
    }

    #[test]
    fn prefix_wins_over_message_type() {
        let mut station = Station::new(Mmsi::new("970123456"));
        station.classify(1);
        assert_eq!(station.class(), StationClass::AisSart);
        assert_eq!(station.ship_type(), "AIS SART");
    }

    #[test]
    fn unclassifying_message_leaves_unknown() {
        let mut station = Station::new(Mmsi::new("235070199"));
        station.classify(8);
        assert_eq!(station.class(), StationClass::Unknown);
    }

    #[test]
    fn identify_from_static_voyage() {
        let message = decode_with_fill(TYPE5, 2).unwrap();
        let mut station = Station::new(message.mmsi.clone());
        station.identify(&message);
        assert_eq!(station.name(), "MANANNAN");
        assert_eq!(station.callsign(), "2FTE6");
        assert_eq!(
            station.ship_type(),
            "High speed craft (HSC), all ships of this type"
        );
    }

    #[test]
    fn identify_from_split_static_report() {
        let part_a = decode_with_fill("H3P=BSA<D6098DE`D0000000000", 2).unwrap();
        let part_b = decode("H3P=BSDUCBD830q=123i000`7220").unwrap();
        let mut station = Station::new(part_a.mmsi.clone());
        station.identify(&part_b);
        assert_eq!(station.ship_type(), "Pleasure Craft");
        assert_eq!(station.name(), "");
        station.identify(&part_a);
        assert_eq!(station.name(), "SEA BREEZE");
        assert_eq!(station.callsign(), "MABC1");
    }

    #[test]
    fn positions_snapshot_voyage_details() {
        let voyage = decode_with_fill(TYPE5, 2).unwrap();
        let position = decode("13P;Ruhvj1wj=0bNTU;up;=T80Rd").unwrap();
        let mut station = Station::new(Mmsi::new("235070199"));
        station.ingest(&position);
        station.ingest(&voyage);
        station.ingest(&position);
        assert_eq!(station.positions().len(), 2);
        assert_eq!(station.positions()[0].destination, None);
        assert_eq!(station.positions()[1].destination.as_deref(), Some("DOUGLAS"));
        assert_eq!(station.positions()[1].eta.as_deref(), Some("18:30 14/06"));
        assert_eq!(station.message_counts()["Position Report Class A"], 2);
        assert_eq!(station.total_messages(), 3);
    }

    #[test]
    fn sentinel_position_is_not_stored() {
        let message = decode("13P;Ruhvj1dtSF0l4Q@=p;=T80Rd").unwrap();
        let mut station = Station::new(message.mmsi.clone());
        station.ingest(&message);
        assert!(station.positions().is_empty());
        assert_eq!(station.total_messages(), 1);
    }

    #[test]
    fn binary_messages_grouped_by_sub_type() {
        let message = decode_with_fill("602=a`3dV4kH>da1P002@00", 2).unwrap();
        let mut station = Station::new(message.mmsi.clone());
        station.ingest(&message);
        station.ingest(&message);
        assert_eq!(
            station.binary_messages()["Aid to Navigation monitoring data (UK)"].len(),
            2
        );
    }

    #[test]
    fn station_info_latest_or_full() {
        let message = decode("13P;Ruhvj1wj=0bNTU;up;=T80Rd").unwrap();
        let mut station = Station::new(message.mmsi.clone());
        station.ingest(&message);
        station.ingest(&message);
        let brief = station.station_info(false);
        assert!(brief.latest_position.is_some());
        assert!(brief.positions.is_empty());
        let full = station.station_info(true);
        assert!(full.latest_position.is_none());
        assert_eq!(full.positions.len(), 2);
    }
}
