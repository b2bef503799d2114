//! Views of a decoded message consumed by station tracking: a position
//! record and a bag of static/voyage details.

use serde::{Deserialize, Serialize};

use crate::error::{AisError, Result};
use crate::identity::Mmsi;
use crate::messages::binary::BinarySubMessage;
use crate::messages::position::{TurnRate, HEADING_NOT_AVAILABLE};
use crate::tables::{EpfdFixType, NavigationStatus};

// ---------------------------------------------------------------------------
// PositionFields
// ---------------------------------------------------------------------------

/// Position-related fields of a report, plus the voyage snapshot the
/// tracker attaches when it stores the position.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PositionFields {
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east.
    pub longitude: f64,
    /// True heading; `None` when not reported or not available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<u16>,
    /// Course over ground in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<f64>,
    /// Speed over ground in knots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Class A navigational status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav_status: Option<NavigationStatus>,
    /// Class A rate of turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_rate: Option<TurnRate>,
    /// Metres, SAR aircraft only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<u16>,
    /// `true` for a DGNSS-quality fix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_accuracy: Option<bool>,
    /// RAIM in use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raim: Option<bool>,
    /// Effective received time, set by the tracker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_time: Option<String>,
    /// Destination known when the position was stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// ETA known when the position was stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
}

impl PositionFields {
    /// A bare position with every optional field empty.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }

    /// `true` when both coordinates are inside their valid ranges.
    ///
    /// The "not available" sentinels (lat 91, lon 181) are out of range.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Fail with [`AisError::NoSuitablePosition`] unless [`is_valid`](Self::is_valid).
    pub fn validate(&self, mmsi: &Mmsi) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        Err(AisError::NoSuitablePosition {
            mmsi: mmsi.to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }

    /// Heading in degrees, `"N/A"` for the 511 sentinel or when absent.
    pub fn heading_text(&self) -> String {
        match self.heading {
            Some(heading) if heading != HEADING_NOT_AVAILABLE => heading.to_string(),
            _ => "N/A".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// StationDetails
// ---------------------------------------------------------------------------

/// Latest static and voyage values seen for a station.
///
/// Each message type fills the fields it carries; [`merge`](Self::merge)
/// overwrites only fields that the update actually sets.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StationDetails {
    /// AIS version indicator.
    #[serde(rename = "AIS Version", skip_serializing_if = "Option::is_none")]
    pub ais_version: Option<u8>,
    /// IMO ship number.
    #[serde(rename = "IMO", skip_serializing_if = "Option::is_none")]
    pub imo: Option<u32>,
    /// Radio callsign.
    #[serde(rename = "Callsign", skip_serializing_if = "Option::is_none")]
    pub callsign: Option<String>,
    /// Vessel or aid name.
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ship and cargo type, as text.
    #[serde(rename = "Ship Type", skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<String>,
    /// Overall length in metres.
    #[serde(rename = "Length", skip_serializing_if = "Option::is_none")]
    pub length: Option<u16>,
    /// Overall beam in metres.
    #[serde(rename = "Beam", skip_serializing_if = "Option::is_none")]
    pub beam: Option<u16>,
    /// Position-fixing device.
    #[serde(rename = "EPFD", skip_serializing_if = "Option::is_none")]
    pub epfd: Option<EpfdFixType>,
    /// ETA as `HH:MM DD/MM`.
    #[serde(rename = "ETA", skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
    /// Metres.
    #[serde(rename = "Draught", skip_serializing_if = "Option::is_none")]
    pub draught: Option<f64>,
    /// Voyage destination.
    #[serde(rename = "Destination", skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// `true` when no data terminal is available.
    #[serde(rename = "DTE", skip_serializing_if = "Option::is_none")]
    pub dte: Option<bool>,
    /// RAIM in use.
    #[serde(rename = "RAIM", skip_serializing_if = "Option::is_none")]
    pub raim: Option<bool>,
    /// `true` for a DGNSS-quality fix.
    #[serde(rename = "Position Accuracy", skip_serializing_if = "Option::is_none")]
    pub position_accuracy: Option<bool>,
    /// Time broadcast by a base station.
    #[serde(rename = "Reported Time", skip_serializing_if = "Option::is_none")]
    pub reported_time: Option<String>,
    /// `CS` or `SOTDMA`.
    #[serde(rename = "Class B Unit", skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<String>,
    /// Unit has a display for message 12 and 14.
    #[serde(rename = "Display", skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    /// Unit has a DSC function.
    #[serde(rename = "DSC", skip_serializing_if = "Option::is_none")]
    pub dsc: Option<bool>,
    /// Unit can use the whole marine band.
    #[serde(rename = "Band", skip_serializing_if = "Option::is_none")]
    pub band: Option<bool>,
    /// Unit accepts channel management by message 22.
    #[serde(rename = "Message 22", skip_serializing_if = "Option::is_none")]
    pub message_22: Option<bool>,
    /// Station is in assigned mode.
    #[serde(rename = "Assigned Mode", skip_serializing_if = "Option::is_none")]
    pub assigned_mode: Option<bool>,
    /// Aid type, as text.
    #[serde(rename = "Aid Type", skip_serializing_if = "Option::is_none")]
    pub aid_type: Option<String>,
    /// The aid is off its charted position.
    #[serde(rename = "Off Position", skip_serializing_if = "Option::is_none")]
    pub off_position: Option<bool>,
    /// The aid is virtual.
    #[serde(rename = "Virtual Aid", skip_serializing_if = "Option::is_none")]
    pub virtual_aid: Option<bool>,
    /// Manufacturer mnemonic.
    #[serde(rename = "Vendor ID", skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    /// Unit model code.
    #[serde(rename = "Unit Model Code", skip_serializing_if = "Option::is_none")]
    pub model_code: Option<u8>,
    /// Unit serial number.
    #[serde(rename = "Serial Number", skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<u32>,
    /// Parent ship of an auxiliary craft.
    #[serde(rename = "Mothership MMSI", skip_serializing_if = "Option::is_none")]
    pub mothership: Option<Mmsi>,
    /// Latest safety related text.
    #[serde(rename = "Safety Message", skip_serializing_if = "Option::is_none")]
    pub safety_message: Option<String>,
}

macro_rules! merge_fields {
    ($target:ident, $update:ident, $($field:ident),+ $(,)?) => {
        $(
            if $update.$field.is_some() {
                $target.$field = $update.$field;
            }
        )+
    };
}

impl StationDetails {
    /// Overwrite every field that `update` sets.
    pub fn merge(&mut self, update: StationDetails) {
        merge_fields!(
            self, update, ais_version, imo, callsign, name, ship_type, length, beam, epfd, eta,
            draught, destination, dte, raim, position_accuracy, reported_time, unit_type,
            display, dsc, band, message_22, assigned_mode, aid_type, off_position, virtual_aid,
            vendor_id, model_code, serial_number, mothership, safety_message,
        );
    }
}

// ---------------------------------------------------------------------------
// DetailFields
// ---------------------------------------------------------------------------

/// What a message contributes to its station's accumulated details.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum DetailFields {
    /// Static, voyage or equipment values.
    Station(StationDetails),
    /// A decoded binary application message.
    Binary(BinarySubMessage),
}
