//! Decoding of the 27 AIS message types.
//!
//! [`decode`] reads the 6-bit type and 30-bit source MMSI from the header
//! and dispatches to the layout for that type. Every decoded
//! [`AisMessage`] offers two projections used by station tracking:
//!
//! - [`AisMessage::position_fields`] for types 1–4, 9, 11, 18, 19, 21, 27
//! - [`AisMessage::detail_fields`] for types 4–6, 8, 11, 12, 18, 19, 21, 24

pub mod aid;
pub mod base_station;
pub mod binary;
pub mod link;
pub mod position;
pub mod projection;
pub mod safety;
pub mod static_data;

pub use aid::*;
pub use base_station::*;
pub use binary::*;
pub use link::*;
pub use position::*;
pub use projection::*;
pub use safety::*;
pub use static_data::*;

use serde::{Deserialize, Serialize};

use crate::bits::BitVector;
use crate::error::{AisError, Result};
use crate::identity::Mmsi;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Static information about one message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTypeInfo {
    /// Type number, 1–27.
    pub message_type: u8,
    /// Short description, used as the per-type counter key.
    pub description: &'static str,
}

/// Every defined message type, indexed by `message_type - 1`.
pub static MESSAGE_TYPES: [MessageTypeInfo; 27] = [
    MessageTypeInfo { message_type: 1,  description: "Position Report Class A" },
    MessageTypeInfo { message_type: 2,  description: "Position Report Class A (Assigned schedule)" },
    MessageTypeInfo { message_type: 3,  description: "Position Report Class A (Response to interrogation)" },
    MessageTypeInfo { message_type: 4,  description: "Base Station Report" },
    MessageTypeInfo { message_type: 5,  description: "Static and Voyage Related Data" },
    MessageTypeInfo { message_type: 6,  description: "Binary Addressed Message" },
    MessageTypeInfo { message_type: 7,  description: "Binary Acknowledge" },
    MessageTypeInfo { message_type: 8,  description: "Binary Broadcast Message" },
    MessageTypeInfo { message_type: 9,  description: "Standard SAR Aircraft Position Report" },
    MessageTypeInfo { message_type: 10, description: "UTC and Date Inquiry" },
    MessageTypeInfo { message_type: 11, description: "UTC and Date Response" },
    MessageTypeInfo { message_type: 12, description: "Addressed Safety Related Message" },
    MessageTypeInfo { message_type: 13, description: "Safety Related Acknowledgement" },
    MessageTypeInfo { message_type: 14, description: "Safety Related Broadcast Message" },
    MessageTypeInfo { message_type: 15, description: "Interrogation" },
    MessageTypeInfo { message_type: 16, description: "Assignment Mode Command" },
    MessageTypeInfo { message_type: 17, description: "DGNSS Binary Broadcast Message" },
    MessageTypeInfo { message_type: 18, description: "Standard Class B CS Position Report" },
    MessageTypeInfo { message_type: 19, description: "Extended Class B Equipment Position Report" },
    MessageTypeInfo { message_type: 20, description: "Data Link Management" },
    MessageTypeInfo { message_type: 21, description: "Aid-to-Navigation Report" },
    MessageTypeInfo { message_type: 22, description: "Channel Management" },
    MessageTypeInfo { message_type: 23, description: "Group Assignment Command" },
    MessageTypeInfo { message_type: 24, description: "Static Data Report" },
    MessageTypeInfo { message_type: 25, description: "Single Slot Binary Message" },
    MessageTypeInfo { message_type: 26, description: "Multiple Slot Binary Message With Communications State" },
    MessageTypeInfo { message_type: 27, description: "Position Report For Long-Range Applications" },
];

/// Look up a message type, `None` outside 1–27.
pub fn message_type_info(message_type: u8) -> Option<&'static MessageTypeInfo> {
    usize::from(message_type)
        .checked_sub(1)
        .and_then(|index| MESSAGE_TYPES.get(index))
}

// ---------------------------------------------------------------------------
// MessageBody
// ---------------------------------------------------------------------------

/// Type-specific content of a message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum MessageBody {
    /// Type 1.
    PositionReport(ClassAPosition),
    /// Type 2.
    AssignedPositionReport(ClassAPosition),
    /// Type 3.
    InterrogatedPositionReport(ClassAPosition),
    /// Type 4.
    BaseStationReport(BaseStationReport),
    /// Type 5.
    StaticAndVoyage(StaticAndVoyage),
    /// Type 6.
    AddressedBinary(AddressedBinary),
    /// Type 7.
    BinaryAcknowledge(Acknowledgement),
    /// Type 8.
    BinaryBroadcast(BinaryBroadcast),
    /// Type 9.
    SarAircraftPosition(SarAircraftPosition),
    /// Type 10.
    UtcDateInquiry(UtcDateInquiry),
    /// Type 11.
    UtcDateResponse(BaseStationReport),
    /// Type 12.
    AddressedSafety(AddressedSafety),
    /// Type 13.
    SafetyAcknowledge(Acknowledgement),
    /// Type 14.
    SafetyBroadcast(SafetyBroadcast),
    /// Type 15.
    Interrogation(Interrogation),
    /// Type 16.
    AssignmentModeCommand(AssignmentModeCommand),
    /// Type 17.
    DgnssBroadcast(OpaqueBody),
    /// Type 18.
    ClassBPosition(ClassBPosition),
    /// Type 19.
    ExtendedClassBPosition(ExtendedClassBPosition),
    /// Type 20.
    DataLinkManagement(DataLinkManagement),
    /// Type 21.
    AidToNavigation(AidToNavigationReport),
    /// Type 22.
    ChannelManagement(ChannelManagement),
    /// Type 23.
    GroupAssignment(OpaqueBody),
    /// Type 24.
    StaticDataReport(StaticDataReport),
    /// Type 25.
    SingleSlotBinary(SlotBinary),
    /// Type 26.
    MultipleSlotBinary(SlotBinary),
    /// Type 27.
    LongRangePosition(LongRangePosition),
}

impl MessageBody {
    fn decode(message_type: u8, mmsi: &Mmsi, bits: &BitVector) -> Result<Self> {
        use MessageBody as B;

        Ok(match message_type {
            1 => B::PositionReport(ClassAPosition::decode(bits)?),
            2 => B::AssignedPositionReport(ClassAPosition::decode(bits)?),
            3 => B::InterrogatedPositionReport(ClassAPosition::decode(bits)?),
            4 => B::BaseStationReport(BaseStationReport::decode(bits)?),
            5 => B::StaticAndVoyage(StaticAndVoyage::decode(bits)?),
            6 => B::AddressedBinary(AddressedBinary::decode(bits)?),
            7 => B::BinaryAcknowledge(Acknowledgement::decode(bits)?),
            8 => B::BinaryBroadcast(BinaryBroadcast::decode(bits)?),
            9 => B::SarAircraftPosition(SarAircraftPosition::decode(bits)?),
            10 => B::UtcDateInquiry(UtcDateInquiry::decode(bits)?),
            11 => B::UtcDateResponse(BaseStationReport::decode(bits)?),
            12 => B::AddressedSafety(AddressedSafety::decode(bits)?),
            13 => B::SafetyAcknowledge(Acknowledgement::decode(bits)?),
            14 => B::SafetyBroadcast(SafetyBroadcast::decode(bits)?),
            15 => B::Interrogation(Interrogation::decode(bits)?),
            16 => B::AssignmentModeCommand(AssignmentModeCommand::decode(bits)?),
            17 => B::DgnssBroadcast(OpaqueBody::decode(bits)),
            18 => B::ClassBPosition(ClassBPosition::decode(bits)?),
            19 => B::ExtendedClassBPosition(ExtendedClassBPosition::decode(bits)?),
            20 => B::DataLinkManagement(DataLinkManagement::decode(bits)?),
            21 => B::AidToNavigation(AidToNavigationReport::decode(bits)?),
            22 => B::ChannelManagement(ChannelManagement::decode(bits)?),
            23 => B::GroupAssignment(OpaqueBody::decode(bits)),
            24 => B::StaticDataReport(StaticDataReport::decode(
                bits,
                mmsi.as_str().starts_with("98"),
            )?),
            25 => B::SingleSlotBinary(SlotBinary::decode(bits)?),
            26 => B::MultipleSlotBinary(SlotBinary::decode(bits)?),
            27 => B::LongRangePosition(LongRangePosition::decode(bits)?),
            _ => return Err(AisError::UnknownMessageType { message_type }),
        })
    }

    /// One-line summary of the content, without the header.
    fn summary(&self) -> String {
        use MessageBody as B;

        let at = |lat: f64, lon: f64| format!("at {lat:.5}, {lon:.5}");
        match self {
            B::PositionReport(r) | B::AssignedPositionReport(r) | B::InterrogatedPositionReport(r) => {
                format!(
                    "{}, {:.1} knots, course {:.1}, turn {} {}",
                    r.nav_status,
                    r.speed,
                    r.course,
                    r.turn_rate,
                    at(r.latitude, r.longitude)
                )
            }
            B::BaseStationReport(r) | B::UtcDateResponse(r) => {
                format!("UTC {} {}", r.timestamp(), at(r.latitude, r.longitude))
            }
            B::StaticAndVoyage(r) => format!(
                "{} ({}), {}, bound for {}, ETA {}",
                r.name,
                r.callsign,
                r.ship_type_name(),
                r.destination,
                r.eta
            ),
            B::AddressedBinary(r) => format!(
                "to {}, DAC {} FID {}: {}",
                r.destination,
                r.dac,
                r.fid,
                r.sub_message.sub_type()
            ),
            B::BinaryBroadcast(r) => {
                format!("DAC {} FID {}: {}", r.dac, r.fid, r.sub_message.sub_type())
            }
            B::BinaryAcknowledge(r) | B::SafetyAcknowledge(r) => {
                let stations: Vec<&str> = r.acknowledged.iter().map(|a| a.mmsi.as_str()).collect();
                format!("acknowledging {}", stations.join(", "))
            }
            B::SarAircraftPosition(r) => format!(
                "altitude {} m, {} knots {}",
                r.altitude,
                r.speed,
                at(r.latitude, r.longitude)
            ),
            B::UtcDateInquiry(r) => format!("to {}", r.destination),
            B::AddressedSafety(r) => format!("to {}: {}", r.destination, r.text),
            B::SafetyBroadcast(r) => r.text.clone(),
            B::Interrogation(r) => {
                let requests: Vec<String> = r
                    .requests
                    .iter()
                    .map(|q| format!("{} for type {}", q.mmsi, q.message_type))
                    .collect();
                format!("requesting {}", requests.join(", "))
            }
            B::AssignmentModeCommand(r) => {
                let stations: Vec<&str> = r.assignments.iter().map(|a| a.mmsi.as_str()).collect();
                format!("assigning {}", stations.join(", "))
            }
            B::DgnssBroadcast(r) | B::GroupAssignment(r) => format!("{} data bits", r.data_bits),
            B::ClassBPosition(r) => format!(
                "{:.1} knots, course {:.1} {}",
                r.speed,
                r.course,
                at(r.latitude, r.longitude)
            ),
            B::ExtendedClassBPosition(r) => format!(
                "{}, {:.1} knots {}",
                r.name,
                r.speed,
                at(r.latitude, r.longitude)
            ),
            B::DataLinkManagement(r) => format!("{} slot reservation(s)", r.reservations.len()),
            B::AidToNavigation(r) => format!(
                "{}, {} {}",
                r.name,
                r.aid_type_name(),
                at(r.latitude, r.longitude)
            ),
            B::ChannelManagement(r) => format!("channels {}/{}", r.channel_a, r.channel_b),
            B::StaticDataReport(StaticDataReport::PartA { name }) => format!("part A, {name}"),
            B::StaticDataReport(StaticDataReport::PartB {
                ship_type, callsign, ..
            }) => format!(
                "part B, {}, callsign {}",
                crate::tables::ship_type_name(u64::from(*ship_type)),
                callsign.as_deref().unwrap_or("N/A")
            ),
            B::SingleSlotBinary(r) | B::MultipleSlotBinary(r) => format!("{} data bits", r.data_bits),
            B::LongRangePosition(r) => format!(
                "{}, {:.1} knots {}",
                r.nav_status,
                r.speed,
                at(r.latitude, r.longitude)
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// AisMessage
// ---------------------------------------------------------------------------

/// A decoded AIS message: common header plus type-specific body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AisMessage {
    /// 1–27.
    pub message_type: u8,
    /// Times the message has been repeated, 0 to 3.
    pub repeat_indicator: u8,
    /// Source MMSI, zero-padded to nine digits.
    pub mmsi: Mmsi,
    /// Reception time assigned by the tracker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_time: Option<String>,
    /// Type-specific fields.
    pub body: MessageBody,
}

/// Decode a complete armored payload with no fill bits.
///
/// # Examples
///
/// ```
/// use aisnmea_models::{decode, AisError};
///
/// let message = decode("13P;Ruhvj1wj=0bNTU;up;=T80Rd").unwrap();
/// assert_eq!(message.message_type, 1);
/// assert_eq!(message.mmsi.as_str(), "235070199");
/// assert_eq!(message.description(), "Position Report Class A");
///
/// assert_eq!(
///     decode("1000000vj1wj=0bNTU;up;=T80Rd"),
///     Err(AisError::InvalidMmsi { message_type: 1 })
/// );
/// ```
pub fn decode(payload: &str) -> Result<AisMessage> {
    decode_with_fill(payload, 0)
}

/// Decode a complete armored payload, dropping `fill_bits` trailing pad bits.
pub fn decode_with_fill(payload: &str, fill_bits: u8) -> Result<AisMessage> {
    AisMessage::from_bits(&BitVector::from_payload_with_fill(payload, fill_bits)?)
}

impl AisMessage {
    /// Decode a message from its unpacked bits.
    pub fn from_bits(bits: &BitVector) -> Result<Self> {
        let message_type = bits.uint(0, 6)? as u8;
        if message_type_info(message_type).is_none() {
            return Err(AisError::UnknownMessageType { message_type });
        }
        if !bits.contains_range(8, 38) {
            return Err(AisError::NoBinaryData {
                start: 8,
                end: bits.len(),
            });
        }
        let raw_mmsi = bits.uint(8, 38)? as u32;
        if raw_mmsi == 0 {
            return Err(AisError::InvalidMmsi { message_type });
        }
        let mmsi = Mmsi::from_u32(raw_mmsi);
        let body = MessageBody::decode(message_type, &mmsi, bits)?;
        Ok(Self {
            message_type,
            repeat_indicator: bits.uint(6, 8)? as u8,
            mmsi,
            received_time: None,
            body,
        })
    }

    /// Short description of the message type.
    pub fn description(&self) -> &'static str {
        message_type_info(self.message_type)
            .map(|info| info.description)
            .unwrap_or("Unknown")
    }

    /// Description, source and a one-line summary of the content.
    pub fn detailed_description(&self) -> String {
        format!(
            "{} from {}: {}",
            self.description(),
            self.mmsi,
            self.body.summary()
        )
    }

    /// Position-related fields, for the types that report a position.
    pub fn position_fields(&self) -> Option<PositionFields> {
        use MessageBody as B;

        let fields = match &self.body {
            B::PositionReport(r) | B::AssignedPositionReport(r) | B::InterrogatedPositionReport(r) => {
                PositionFields {
                    heading: Some(r.heading),
                    course: Some(r.course),
                    speed: Some(r.speed),
                    nav_status: Some(r.nav_status),
                    turn_rate: Some(r.turn_rate),
                    position_accuracy: Some(r.position_accuracy),
                    raim: Some(r.raim),
                    ..PositionFields::new(r.latitude, r.longitude)
                }
            }
            B::BaseStationReport(r) | B::UtcDateResponse(r) => PositionFields {
                position_accuracy: Some(r.position_accuracy),
                raim: Some(r.raim),
                ..PositionFields::new(r.latitude, r.longitude)
            },
            B::SarAircraftPosition(r) => PositionFields {
                course: Some(r.course),
                speed: Some(f64::from(r.speed)),
                altitude: Some(r.altitude),
                position_accuracy: Some(r.position_accuracy),
                raim: Some(r.raim),
                ..PositionFields::new(r.latitude, r.longitude)
            },
            B::ClassBPosition(r) => PositionFields {
                heading: Some(r.heading),
                course: Some(r.course),
                speed: Some(r.speed),
                position_accuracy: Some(r.position_accuracy),
                raim: Some(r.raim),
                ..PositionFields::new(r.latitude, r.longitude)
            },
            B::ExtendedClassBPosition(r) => PositionFields {
                heading: Some(r.heading),
                course: Some(r.course),
                speed: Some(r.speed),
                position_accuracy: Some(r.position_accuracy),
                raim: Some(r.raim),
                ..PositionFields::new(r.latitude, r.longitude)
            },
            B::AidToNavigation(r) => PositionFields {
                position_accuracy: Some(r.position_accuracy),
                raim: Some(r.raim),
                ..PositionFields::new(r.latitude, r.longitude)
            },
            B::LongRangePosition(r) => PositionFields {
                course: Some(r.course),
                speed: Some(r.speed),
                nav_status: Some(r.nav_status),
                position_accuracy: Some(r.position_accuracy),
                raim: Some(r.raim),
                ..PositionFields::new(r.latitude, r.longitude)
            },
            _ => return None,
        };
        Some(PositionFields {
            received_time: self.received_time.clone(),
            ..fields
        })
    }

    /// What this message contributes to its station's details.
    pub fn detail_fields(&self) -> Option<DetailFields> {
        use MessageBody as B;

        let details = match &self.body {
            B::BaseStationReport(r) | B::UtcDateResponse(r) => StationDetails {
                epfd: Some(r.epfd),
                raim: Some(r.raim),
                position_accuracy: Some(r.position_accuracy),
                reported_time: Some(r.timestamp()),
                ..StationDetails::default()
            },
            B::StaticAndVoyage(r) => StationDetails {
                ais_version: Some(r.ais_version),
                imo: Some(r.imo),
                callsign: Some(r.callsign.clone()),
                name: Some(r.name.clone()),
                ship_type: Some(r.ship_type_name().to_string()),
                length: Some(r.dimensions.length()),
                beam: Some(r.dimensions.beam()),
                epfd: Some(r.epfd),
                eta: Some(r.eta.to_string()),
                draught: Some(r.draught),
                destination: Some(r.destination.clone()),
                dte: Some(r.dte),
                ..StationDetails::default()
            },
            B::AddressedBinary(r) => return Some(DetailFields::Binary(r.sub_message.clone())),
            B::BinaryBroadcast(r) => return Some(DetailFields::Binary(r.sub_message.clone())),
            B::AddressedSafety(r) => StationDetails {
                safety_message: Some(r.text.clone()),
                ..StationDetails::default()
            },
            B::ClassBPosition(r) => StationDetails {
                unit_type: Some(r.unit_type().to_string()),
                display: Some(r.display),
                dsc: Some(r.dsc),
                band: Some(r.band),
                message_22: Some(r.message_22),
                assigned_mode: Some(r.assigned_mode),
                raim: Some(r.raim),
                ..StationDetails::default()
            },
            B::ExtendedClassBPosition(r) => StationDetails {
                name: Some(r.name.clone()),
                ship_type: Some(r.ship_type_name().to_string()),
                length: Some(r.dimensions.length()),
                beam: Some(r.dimensions.beam()),
                epfd: Some(r.epfd),
                raim: Some(r.raim),
                dte: Some(r.dte),
                assigned_mode: Some(r.assigned_mode),
                ..StationDetails::default()
            },
            B::AidToNavigation(r) => StationDetails {
                name: Some(r.name.clone()),
                aid_type: Some(r.aid_type_name().to_string()),
                length: Some(r.dimensions.length()),
                beam: Some(r.dimensions.beam()),
                epfd: Some(r.epfd),
                off_position: Some(r.off_position),
                virtual_aid: Some(r.virtual_aid),
                raim: Some(r.raim),
                ..StationDetails::default()
            },
            B::StaticDataReport(StaticDataReport::PartA { name }) => StationDetails {
                name: Some(name.clone()),
                ..StationDetails::default()
            },
            B::StaticDataReport(StaticDataReport::PartB {
                ship_type,
                vendor_id,
                model_code,
                serial_number,
                callsign,
                dimensions,
                mothership,
            }) => StationDetails {
                ship_type: Some(crate::tables::ship_type_name(u64::from(*ship_type)).to_string()),
                vendor_id: vendor_id.clone(),
                model_code: *model_code,
                serial_number: *serial_number,
                callsign: callsign.clone(),
                length: dimensions.map(|d| d.length()),
                beam: dimensions.map(|d| d.beam()),
                mothership: mothership.clone(),
                ..StationDetails::default()
            },
            _ => return None,
        };
        Some(DetailFields::Station(details))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::NavigationStatus;

    const POSITION: &str = "13P;Ruhvj1wj=0bNTU;up;=T80Rd";
    const TYPE5: &str = "53P:dJP2<10S8I@GH00l4p4pp4p000000000000`2Q<==5WBN813mAk0Dh0000000000000";
    const NAV_AID: &str = "E>jHC=c6:W2h22R`@1:WdP00000Opa@H?KTcP10888e?B0";

    /// One payload per message type, with its fill bits.
    const SAMPLES: [(u8, &str, u8); 27] = [
        (1, POSITION, 0),
        (2, "23P;Ruhvj1wj=0bNTU;up;=T80Rd", 0),
        (3, "33P;Ruhvj1wj=0bNTU;up;=T80Rd", 0),
        (4, "402=a`1vDo:00wTwO0O?Ph700000", 0),
        (5, TYPE5, 2),
        (6, "602=a`3dV4kH>da1P002@00", 2),
        (7, "73P;Ruh0SJJ1>0m:=0", 4),
        (8, "802=a`00GwmsN1Rp85jWQqJ7AP?e0Dnd<R<d7Ucwe7wvlO31`9wwnPia?vh0", 0),
        (9, "91b55u1hQpwVlc0NqRP3Q3024000", 0),
        (10, ":3P;Ruh0SJJ0", 0),
        (11, ";02=a`1vDo:00wTwO0O?Ph700000", 0),
        (12, "<3P;Rul0SJJ085<<?PG?B<4", 0),
        (13, "=3P;Ruh0SJJ1>0m:=0", 4),
        (14, ">02=a`1<D=E8U@D", 2),
        (15, "?02=a`0p2pgLD000000", 4),
        (16, "@02=a`0p2pgL6@2P", 0),
        (17, "A02=a`000000000000000000000", 2),
        (18, "B3P=BS@0IWrnJ@7qm31=8ug5mP06", 0),
        (19, "C3P=BS@0=7rnJ@7qm30p@e7PH28k0>T26:0000000000BPP2112P", 0),
        (20, "D02=a`204f>40000000000000000", 4),
        (21, NAV_AID, 2),
        (22, "F02=a`22N2P00000000000000000", 0),
        (23, "G02=a`000000000000000000000", 2),
        (24, "H3P=BSA<D6098DE`D0000000000", 2),
        (25, "I02=a`00wh", 4),
        (26, "J02=a`00wh0000", 4),
        (27, "K3P;Rup?pv3rj6;@", 0),
    ];

    #[test]
    fn registry_covers_every_type() {
        for (index, info) in MESSAGE_TYPES.iter().enumerate() {
            assert_eq!(usize::from(info.message_type), index + 1);
        }
        assert!(message_type_info(0).is_none());
        assert!(message_type_info(28).is_none());
    }

    #[test]
    fn every_type_decodes_with_padded_mmsi() {
        for (message_type, payload, fill) in SAMPLES {
            let message = decode_with_fill(payload, fill)
                .unwrap_or_else(|e| panic!("type {message_type}: {e}"));
            assert_eq!(message.message_type, message_type);
            assert_eq!(message.mmsi.as_str().len(), 9);
            assert!(message.mmsi.as_str().chars().all(|c| c.is_ascii_digit()));
            assert!(!message.detailed_description().is_empty());
        }
    }

    #[test]
    fn position_projection_matches_type_set() {
        let with_position = [1u8, 2, 3, 4, 9, 11, 18, 19, 21, 27];
        for (message_type, payload, fill) in SAMPLES {
            let message = decode_with_fill(payload, fill).unwrap();
            assert_eq!(
                message.position_fields().is_some(),
                with_position.contains(&message_type),
                "type {message_type}"
            );
        }
    }

    #[test]
    fn detail_projection_matches_type_set() {
        let with_details = [4u8, 5, 6, 8, 11, 12, 18, 19, 21, 24];
        for (message_type, payload, fill) in SAMPLES {
            let message = decode_with_fill(payload, fill).unwrap();
            assert_eq!(
                message.detail_fields().is_some(),
                with_details.contains(&message_type),
                "type {message_type}"
            );
        }
    }

    #[test]
    fn unknown_types_are_rejected() {
        // type 0 and type 63
        assert_eq!(
            decode("03P;Ruhvj1wj=0bNTU;up;=T80Rd"),
            Err(AisError::UnknownMessageType { message_type: 0 })
        );
        assert_eq!(
            decode("w3P;Ruhvj1wj=0bNTU;up;=T80Rd"),
            Err(AisError::UnknownMessageType { message_type: 63 })
        );
    }

    #[test]
    fn zero_mmsi_is_rejected() {
        assert_eq!(
            decode("1000000vj1wj=0bNTU;up;=T80Rd"),
            Err(AisError::InvalidMmsi { message_type: 1 })
        );
    }

    #[test]
    fn short_header_has_no_binary_data() {
        assert!(matches!(decode("13P"), Err(AisError::NoBinaryData { .. })));
        assert!(matches!(decode(""), Err(AisError::NoBinaryData { .. })));
    }

    #[test]
    fn class_a_position_projection() {
        let message = decode(POSITION).unwrap();
        let position = message.position_fields().unwrap();
        assert!((position.latitude - 53.427_705).abs() < 1e-6);
        assert!((position.longitude - -3.013_938_3).abs() < 1e-6);
        assert_eq!(position.heading, Some(358));
        assert_eq!(position.nav_status, Some(NavigationStatus::UnderWayUsingEngine));
        assert_eq!(position.turn_rate, Some(TurnRate::Rate(-1.1)));
        assert!(position.is_valid());
    }

    #[test]
    fn static_voyage_details() {
        let message = decode_with_fill(TYPE5, 2).unwrap();
        let Some(DetailFields::Station(details)) = message.detail_fields() else {
            panic!("expected station details");
        };
        assert_eq!(details.name.as_deref(), Some("MANANNAN"));
        assert_eq!(
            details.ship_type.as_deref(),
            Some("High speed craft (HSC), all ships of this type")
        );
        assert_eq!(details.destination.as_deref(), Some("DOUGLAS"));
        assert_eq!(details.eta.as_deref(), Some("18:30 14/06"));
        assert_eq!(details.length, Some(96));
    }

    #[test]
    fn binary_details_carry_sub_message() {
        let message = decode_with_fill("602=a`3dV4kH>da1P002@00", 2).unwrap();
        let Some(DetailFields::Binary(sub)) = message.detail_fields() else {
            panic!("expected binary details");
        };
        assert_eq!(sub.sub_type(), "Aid to Navigation monitoring data (UK)");
    }

    #[test]
    fn detailed_description_reads_naturally() {
        let message = decode(POSITION).unwrap();
        assert_eq!(
            message.detailed_description(),
            "Position Report Class A from 235070199: Under way using engine, 12.9 knots, \
             course 355.2, turn -1.1°/min at 53.42771, -3.01394"
        );
        let aid = decode_with_fill(NAV_AID, 2).unwrap();
        assert_eq!(
            aid.detailed_description(),
            "Aid-to-Navigation Report from 992351030: LUNE DEEP BUOY, Cardinal Mark S at 53.93466, -3.21361"
        );
    }

    #[test]
    fn message_serializes_to_json() {
        let message = decode(POSITION).unwrap();
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["mmsi"], "235070199");
        assert_eq!(json["message_type"], 1);
        assert_eq!(json["body"]["PositionReport"]["heading"], 358);
        assert!(json.get("received_time").is_none());
        let back: AisMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, message);
    }
}
