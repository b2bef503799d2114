//! Static and voyage data: type 5 and both parts of type 24.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bits::BitVector;
use crate::error::Result;
use crate::identity::Mmsi;
use crate::tables::{ship_type_name, EpfdFixType};

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// Distances in metres from the position reference point to each side
/// of the hull.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    /// Metres forward of the reference point.
    pub to_bow: u16,
    /// Metres aft of the reference point.
    pub to_stern: u16,
    /// Metres to port of the reference point.
    pub to_port: u8,
    /// Metres to starboard of the reference point.
    pub to_starboard: u8,
}

impl Dimensions {
    /// Read the 30-bit dimension quadruple starting at `start`.
    pub(crate) fn decode(bits: &BitVector, start: usize) -> Result<Self> {
        Ok(Self {
            to_bow: bits.uint(start, start + 9)? as u16,
            to_stern: bits.uint(start + 9, start + 18)? as u16,
            to_port: bits.uint(start + 18, start + 24)? as u8,
            to_starboard: bits.uint(start + 24, start + 30)? as u8,
        })
    }

    /// Overall length (bow + stern).
    pub fn length(&self) -> u16 {
        self.to_bow + self.to_stern
    }

    /// Overall beam (port + starboard).
    pub fn beam(&self) -> u16 {
        u16::from(self.to_port) + u16::from(self.to_starboard)
    }
}

// ---------------------------------------------------------------------------
// Eta
// ---------------------------------------------------------------------------

/// Estimated time of arrival as broadcast (no year, UTC).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Eta {
    /// 1 to 12; 0 when not available.
    pub month: u8,
    /// 1 to 31; 0 when not available.
    pub day: u8,
    /// 0 to 23; 24 when not available.
    pub hour: u8,
    /// 0 to 59; 60 when not available.
    pub minute: u8,
}

impl Eta {
    fn decode(bits: &BitVector, start: usize) -> Result<Self> {
        Ok(Self {
            month: bits.uint(start, start + 4)? as u8,
            day: bits.uint(start + 4, start + 9)? as u8,
            hour: bits.uint(start + 9, start + 14)? as u8,
            minute: bits.uint(start + 14, start + 20)? as u8,
        })
    }
}

/// Renders as `HH:MM DD/MM`.
impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} {:02}/{:02}",
            self.hour, self.minute, self.day, self.month
        )
    }
}

// ---------------------------------------------------------------------------
// Type 5
// ---------------------------------------------------------------------------

/// Static and voyage related data.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StaticAndVoyage {
    /// 0 for ITU-R M.1371-1 stations.
    pub ais_version: u8,
    /// IMO ship number; 0 when not available.
    pub imo: u32,
    /// Radio callsign, trailing spaces removed.
    pub callsign: String,
    /// Vessel name, trailing spaces removed.
    pub name: String,
    /// Ship and cargo type code.
    pub ship_type: u8,
    /// Hull dimensions.
    pub dimensions: Dimensions,
    /// Position-fixing device.
    pub epfd: EpfdFixType,
    /// Estimated time of arrival.
    pub eta: Eta,
    /// Metres.
    pub draught: f64,
    /// Destination, trailing spaces removed.
    pub destination: String,
    /// `true` when no data terminal is available.
    pub dte: bool,
}

impl StaticAndVoyage {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Self {
            ais_version: bits.uint(38, 40)? as u8,
            imo: bits.uint(40, 70)? as u32,
            callsign: bits.text(70, 112)?.trim_end().to_string(),
            name: bits.text(112, 232)?.trim_end().to_string(),
            ship_type: bits.uint(232, 240)? as u8,
            dimensions: Dimensions::decode(bits, 240)?,
            epfd: EpfdFixType::from_code(bits.uint(270, 274)?),
            eta: Eta::decode(bits, 274)?,
            draught: bits.uint(294, 302)? as f64 / 10.0,
            destination: bits.text(302, 422)?.trim_end().to_string(),
            dte: bits.opt_flag(422).unwrap_or(false),
        })
    }

    /// Text form of [`ship_type`](Self::ship_type).
    pub fn ship_type_name(&self) -> &'static str {
        ship_type_name(u64::from(self.ship_type))
    }
}

// ---------------------------------------------------------------------------
// Type 24
// ---------------------------------------------------------------------------

/// One half of a static data report.
///
/// Part B arrives short often enough that every field after the ship type
/// is optional.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum StaticDataReport {
    /// Part A (part number 0): the vessel name.
    PartA {
        /// Vessel name, trailing spaces removed.
        name: String,
    },
    /// Part B (part number 1): type, equipment and callsign.
    PartB {
        /// Ship and cargo type code.
        ship_type: u8,
        /// Manufacturer mnemonic.
        vendor_id: Option<String>,
        /// Unit model code.
        model_code: Option<u8>,
        /// Unit serial number.
        serial_number: Option<u32>,
        /// Radio callsign.
        callsign: Option<String>,
        /// Hull dimensions; absent for auxiliary craft.
        dimensions: Option<Dimensions>,
        /// Set instead of dimensions by auxiliary craft (MMSI `98…`).
        mothership: Option<Mmsi>,
    },
}

impl StaticDataReport {
    pub(crate) fn decode(bits: &BitVector, auxiliary: bool) -> Result<Self> {
        if bits.uint(38, 40)? == 0 {
            return Ok(Self::PartA {
                name: bits.opt_text(40, 160).unwrap_or_default().trim_end().to_string(),
            });
        }
        let (dimensions, mothership) = if auxiliary {
            let mmsi = bits
                .opt_uint(132, 162)
                .filter(|mmsi| *mmsi != 0)
                .map(|mmsi| Mmsi::from_u32(mmsi as u32));
            (None, mmsi)
        } else if bits.contains_range(132, 162) {
            (Some(Dimensions::decode(bits, 132)?), None)
        } else {
            (None, None)
        };
        Ok(Self::PartB {
            ship_type: bits.uint(40, 48)? as u8,
            vendor_id: bits.opt_text(48, 66),
            model_code: bits.opt_uint(66, 70).map(|v| v as u8),
            serial_number: bits.opt_uint(70, 90).map(|v| v as u32),
            callsign: bits.opt_text(90, 132).map(|s| s.trim_end().to_string()),
            dimensions,
            mothership,
        })
    }

    /// 0 for part A, 1 for part B.
    pub fn part_number(&self) -> u8 {
        match self {
            Self::PartA { .. } => 0,
            Self::PartB { .. } => 1,
        }
    }
}
