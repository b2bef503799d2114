//! Binary messages (types 6, 8, 25, 26) and the application-specific
//! sub-messages recognised inside them.
//!
//! Types 6 and 8 carry a Designated Area Code and Function Identifier
//! that select the layout of the remaining bits. Recognised pairs:
//!
//! | Type | DAC | FID | Sub-message |
//! |------|-----|-----|-------------|
//! | 6 | 235 | 10 | AtoN monitoring (UK) |
//! | 6 | 250 | 10 | AtoN monitoring (ROI) |
//! | 8 | 200 | 10 | Inland static & voyage data |
//! | 8 | 1 | 31 | Meteorological and hydrological data |
//!
//! Anything else, or a recognised pair whose block is truncated, becomes
//! [`BinarySubMessage::Unknown`] with the undecoded bits re-armored.

use serde::{Deserialize, Serialize};

use crate::bits::BitVector;
use crate::error::Result;
use crate::identity::Mmsi;

const ATON_START: usize = 88;
const BROADCAST_START: usize = 56;

// ---------------------------------------------------------------------------
// Type 6
// ---------------------------------------------------------------------------

/// Binary message addressed to one station.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AddressedBinary {
    /// Sequence number, 0 to 3.
    pub sequence_number: u8,
    /// Addressed station.
    pub destination: Mmsi,
    /// The message was retransmitted.
    pub retransmit: bool,
    /// Designated area code.
    pub dac: u16,
    /// Functional identifier.
    pub fid: u8,
    /// Decoded application payload.
    pub sub_message: BinarySubMessage,
}

impl AddressedBinary {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        let dac = bits.uint(72, 82)? as u16;
        let fid = bits.uint(82, 88)? as u8;
        let sub_message = match (dac, fid) {
            (235 | 250, 10) if bits.contains_range(ATON_START, ATON_START + 44) => {
                BinarySubMessage::AtonMonitoring(AtonMonitoring::decode(bits, dac)?)
            }
            _ => BinarySubMessage::unknown(bits, dac, fid, ATON_START),
        };
        Ok(Self {
            sequence_number: bits.uint(38, 40)? as u8,
            destination: Mmsi::from_u32(bits.uint(40, 70)? as u32),
            retransmit: bits.flag(70)?,
            dac,
            fid,
            sub_message,
        })
    }
}

// ---------------------------------------------------------------------------
// Type 8
// ---------------------------------------------------------------------------

/// Binary message broadcast to all stations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BinaryBroadcast {
    /// Designated area code.
    pub dac: u16,
    /// Functional identifier.
    pub fid: u8,
    /// Decoded application payload.
    pub sub_message: BinarySubMessage,
}

impl BinaryBroadcast {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        let dac = bits.uint(40, 50)? as u16;
        let fid = bits.uint(50, 56)? as u8;
        let sub_message = match (dac, fid) {
            (200, 10) if bits.contains_range(BROADCAST_START, 160) => {
                BinarySubMessage::InlandStaticVoyage(InlandStaticVoyage::decode(bits)?)
            }
            (1, 31) if bits.contains_range(BROADCAST_START, 350) => {
                BinarySubMessage::Meteorological(Box::new(MeteoHydro::decode(bits)?))
            }
            _ => BinarySubMessage::unknown(bits, dac, fid, BROADCAST_START),
        };
        Ok(Self {
            dac,
            fid,
            sub_message,
        })
    }
}

// ---------------------------------------------------------------------------
// Types 25, 26
// ---------------------------------------------------------------------------

/// Single or multiple slot binary message. Only the header is decoded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SlotBinary {
    /// `true` when a destination MMSI precedes the data.
    pub addressed: bool,
    /// `true` when an application identifier precedes the data.
    pub structured: bool,
    /// Number of payload bits after the two flags.
    pub data_bits: usize,
}

impl SlotBinary {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Self {
            addressed: bits.flag(38)?,
            structured: bits.opt_flag(39).unwrap_or(false),
            data_bits: bits.len().saturating_sub(40),
        })
    }
}

// ---------------------------------------------------------------------------
// BinarySubMessage
// ---------------------------------------------------------------------------

/// Decoded application payload of a type 6 or type 8 message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BinarySubMessage {
    /// DAC 235 or 250, FID 10.
    AtonMonitoring(AtonMonitoring),
    /// DAC 200, FID 10.
    InlandStaticVoyage(InlandStaticVoyage),
    /// DAC 1, FID 31.
    Meteorological(Box<MeteoHydro>),
    /// Any other DAC and FID, or a recognised block that is too short.
    Unknown {
        /// Designated area code.
        dac: u16,
        /// Functional identifier.
        fid: u8,
        /// Undecoded application bits, armored; empty when there are none.
        data: String,
    },
}

impl BinarySubMessage {
    fn unknown(bits: &BitVector, dac: u16, fid: u8, start: usize) -> Self {
        Self::Unknown {
            dac,
            fid,
            data: bits.slice(start, bits.len()).to_payload(),
        }
    }

    /// Human-readable sub-type, also used to group a station's binary
    /// messages.
    pub fn sub_type(&self) -> &'static str {
        match self {
            Self::AtonMonitoring(m) if m.dac == 250 => "Aid to Navigation monitoring data (ROI)",
            Self::AtonMonitoring(_) => "Aid to Navigation monitoring data (UK)",
            Self::InlandStaticVoyage(_) => "Inland Static & Voyage Data",
            Self::Meteorological(_) => "Meteorological and Hydrological Data",
            Self::Unknown { .. } => "Unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// AtoN monitoring (DAC 235/250, FID 10)
// ---------------------------------------------------------------------------

macro_rules! two_bit_status {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::FromRepr)]
        #[repr(u8)]
        pub enum $name {
            $(#[doc = $label] #[strum(serialize = $label)] $variant,)+
        }

        impl $name {
            fn from_code(code: u64) -> Self {
                Self::from_repr((code & 0b11) as u8).unwrap_or(Self::Error)
            }
        }
    };
}

two_bit_status!(
    /// RACON status reported by an AtoN.
    RaconStatus {
        NotInstalled = "No RACON installed",
        NotMonitored = "RACON not monitored",
        Operational = "RACON operational",
        Error = "RACON ERROR",
    }
);

two_bit_status!(
    /// Light status reported by an AtoN.
    LightStatus {
        NotMonitored = "No light or no monitoring",
        On = "Light ON",
        Off = "Light OFF",
        Error = "Light ERROR",
    }
);

/// Aid-to-navigation health and power status block.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AtonMonitoring {
    /// 235 (UK) or 250 (ROI).
    pub dac: u16,
    /// Volts.
    pub analogue_internal: f64,
    /// Volts.
    pub analogue_external_1: f64,
    /// Volts.
    pub analogue_external_2: f64,
    /// RACON status.
    pub racon: RaconStatus,
    /// Light status.
    pub light: LightStatus,
    /// `true` when the AtoN reports an alarm.
    pub alarm: bool,
    /// Eight digital inputs, bit 7 first.
    pub external_status: u8,
    /// The aid is off its charted position.
    pub off_position: bool,
}

impl AtonMonitoring {
    fn decode(bits: &BitVector, dac: u16) -> Result<Self> {
        let volts = |start: usize| -> Result<f64> { Ok(bits.uint(start, start + 10)? as f64 * 0.05) };
        Ok(Self {
            dac,
            analogue_internal: volts(88)?,
            analogue_external_1: volts(98)?,
            analogue_external_2: volts(108)?,
            racon: RaconStatus::from_code(bits.uint(118, 120)?),
            light: LightStatus::from_code(bits.uint(120, 122)?),
            alarm: bits.flag(122)?,
            external_status: bits.uint(123, 131)? as u8,
            off_position: bits.flag(131)?,
        })
    }

    /// `"Good health"` or `"Alarm"`.
    pub fn health(&self) -> &'static str {
        if self.alarm {
            "Alarm"
        } else {
            "Good health"
        }
    }
}

// ---------------------------------------------------------------------------
// Inland static & voyage data (DAC 200, FID 10)
// ---------------------------------------------------------------------------

/// European inland waterways vessel data.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InlandStaticVoyage {
    /// European Vessel Identification Number.
    pub vin: String,
    /// Metres.
    pub length: f64,
    /// Metres.
    pub beam: f64,
    /// ERI ship or combination type code.
    pub ship_type: u16,
    /// Hazardous cargo code, see [`hazard_name`](Self::hazard_name).
    pub hazard: u8,
    /// Metres.
    pub draught: f64,
    /// Load status code, see [`load_status_name`](Self::load_status_name).
    pub load_status: u8,
    /// `true` when speed comes from a certified device.
    pub speed_quality: bool,
    /// `true` when course comes from a certified device.
    pub course_quality: bool,
    /// `true` when heading comes from a certified device.
    pub heading_quality: bool,
}

impl InlandStaticVoyage {
    fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Self {
            vin: bits.text(56, 104)?.trim_end().to_string(),
            length: bits.uint(104, 117)? as f64 / 10.0,
            beam: bits.uint(117, 127)? as f64 / 10.0,
            ship_type: bits.uint(127, 141)? as u16,
            hazard: bits.uint(141, 144)? as u8,
            draught: bits.uint(144, 155)? as f64 / 100.0,
            load_status: bits.uint(155, 157)? as u8,
            speed_quality: bits.flag(157)?,
            course_quality: bits.flag(158)?,
            heading_quality: bits.flag(159)?,
        })
    }

    /// Number of blue cones or lights carried.
    pub fn hazard_name(&self) -> &'static str {
        match self.hazard {
            0 => "0 blue cones/lights",
            1 => "1 blue cone/light",
            2 => "2 blue cones/lights",
            3 => "3 blue cones/lights",
            4 => "4 B-Flag",
            _ => "Unknown",
        }
    }

    /// Loaded, unloaded or not available.
    pub fn load_status_name(&self) -> &'static str {
        match self.load_status {
            1 => "Loaded",
            2 => "Unloaded",
            _ => "N/A",
        }
    }
}

// ---------------------------------------------------------------------------
// Meteorological and hydrological data (DAC 1, FID 31)
// ---------------------------------------------------------------------------

/// Precipitation type reported by a weather station.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Precipitation {
    /// Code 0, and the reserved codes.
    Reserved,
    /// Code 1.
    Rain,
    /// Code 2.
    Thunderstorm,
    /// Code 3.
    #[strum(serialize = "Freezing rain")]
    FreezingRain,
    /// Code 4.
    #[strum(serialize = "Mixed/ice")]
    MixedIce,
    /// Code 5.
    Snow,
}

/// Weather and sea-state observation. `None` marks a field the station
/// reported as not available.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MeteoHydro {
    /// Degrees east.
    pub longitude: Option<f64>,
    /// Degrees north.
    pub latitude: Option<f64>,
    /// `true` for a DGNSS-quality fix (better than 10 m).
    pub position_accuracy: bool,
    /// UTC day of the observation.
    pub day: Option<u8>,
    /// UTC hour of the observation.
    pub hour: Option<u8>,
    /// UTC minute of the observation.
    pub minute: Option<u8>,
    /// Knots.
    pub wind_speed: Option<u8>,
    /// Knots.
    pub wind_gust: Option<u8>,
    /// Degrees.
    pub wind_direction: Option<u16>,
    /// Degrees.
    pub wind_gust_direction: Option<u16>,
    /// Degrees Celsius.
    pub air_temperature: Option<f64>,
    /// Percent.
    pub humidity: Option<u8>,
    /// Degrees Celsius.
    pub dew_point: Option<f64>,
    /// Hectopascal.
    pub air_pressure: Option<u16>,
    /// 0 steady, 1 decreasing, 2 increasing.
    pub pressure_tendency: Option<u8>,
    /// The visibility value is a lower bound.
    pub visibility_greater_than: bool,
    /// Nautical miles.
    pub visibility: Option<f64>,
    /// Metres relative to the local chart datum.
    pub water_level: Option<f64>,
    /// 0 steady, 1 decreasing, 2 increasing.
    pub water_level_trend: Option<u8>,
    /// Knots.
    pub surface_current_speed: Option<f64>,
    /// Degrees.
    pub surface_current_direction: Option<u16>,
    /// Knots.
    pub current_speed_2: Option<f64>,
    /// Degrees.
    pub current_direction_2: Option<u16>,
    /// Metres.
    pub current_depth_2: Option<u8>,
    /// Knots.
    pub current_speed_3: Option<f64>,
    /// Degrees.
    pub current_direction_3: Option<u16>,
    /// Metres.
    pub current_depth_3: Option<u8>,
    /// Metres.
    pub wave_height: Option<f64>,
    /// Seconds.
    pub wave_period: Option<u8>,
    /// Degrees.
    pub wave_direction: Option<u16>,
    /// Metres.
    pub swell_height: Option<f64>,
    /// Seconds.
    pub swell_period: Option<u8>,
    /// Degrees.
    pub swell_direction: Option<u16>,
    /// Beaufort-like scale; 13–15 are not defined.
    pub sea_state: u8,
    /// Degrees Celsius.
    pub water_temperature: Option<f64>,
    /// Precipitation type.
    pub precipitation: Option<Precipitation>,
    /// Parts per thousand.
    pub salinity: Option<f64>,
    /// Ice present.
    pub ice: Option<bool>,
}

impl MeteoHydro {
    fn decode(bits: &BitVector) -> Result<Self> {
        let uint = |start: usize, end: usize, na: u64| -> Result<Option<u64>> {
            let value = bits.uint(start, end)?;
            Ok((value != na).then_some(value))
        };
        let direction = |start: usize| -> Result<Option<u16>> {
            let value = bits.uint(start, start + 9)?;
            Ok((value < 360).then_some(value as u16))
        };
        let scaled = |start: usize, end: usize, na: u64| -> Result<Option<f64>> {
            Ok(uint(start, end, na)?.map(|v| v as f64 / 10.0))
        };
        let signed = |start: usize, end: usize, na: i64| -> Result<Option<f64>> {
            let value = bits.int(start, end)?;
            Ok((value != na).then_some(value as f64 / 10.0))
        };

        let longitude = bits.int(56, 81)?;
        let latitude = bits.int(81, 105)?;
        Ok(Self {
            longitude: (longitude != 181 * 60_000).then_some(longitude as f64 / 60_000.0),
            latitude: (latitude != 91 * 60_000).then_some(latitude as f64 / 60_000.0),
            position_accuracy: bits.flag(105)?,
            day: uint(106, 111, 0)?.map(|v| v as u8),
            hour: uint(111, 116, 24)?.map(|v| v as u8),
            minute: uint(116, 122, 60)?.map(|v| v as u8),
            wind_speed: uint(122, 129, 127)?.map(|v| v as u8),
            wind_gust: uint(129, 136, 127)?.map(|v| v as u8),
            wind_direction: direction(136)?,
            wind_gust_direction: direction(145)?,
            air_temperature: signed(154, 165, -1024)?,
            humidity: uint(165, 172, 101)?.map(|v| v as u8),
            dew_point: signed(172, 182, 501)?,
            air_pressure: uint(182, 191, 511)?.map(|v| v as u16 + 799),
            pressure_tendency: uint(191, 193, 3)?.map(|v| v as u8),
            visibility_greater_than: bits.flag(193)?,
            visibility: scaled(194, 201, 127)?,
            water_level: uint(201, 213, 4001)?.map(|v| v as f64 / 100.0 - 10.0),
            water_level_trend: uint(213, 215, 3)?.map(|v| v as u8),
            surface_current_speed: scaled(215, 223, 255)?,
            surface_current_direction: direction(223)?,
            current_speed_2: scaled(232, 240, 255)?,
            current_direction_2: direction(240)?,
            current_depth_2: uint(249, 254, 31)?.map(|v| v as u8),
            current_speed_3: scaled(254, 262, 255)?,
            current_direction_3: direction(262)?,
            current_depth_3: uint(271, 276, 31)?.map(|v| v as u8),
            wave_height: scaled(276, 284, 255)?,
            wave_period: uint(284, 290, 63)?.map(|v| v as u8),
            wave_direction: direction(290)?,
            swell_height: scaled(299, 307, 255)?,
            swell_period: uint(307, 313, 63)?.map(|v| v as u8),
            swell_direction: direction(313)?,
            sea_state: bits.uint(322, 326)? as u8,
            water_temperature: signed(326, 336, 501)?,
            precipitation: match bits.uint(336, 339)? {
                1 => Some(Precipitation::Rain),
                2 => Some(Precipitation::Thunderstorm),
                3 => Some(Precipitation::FreezingRain),
                4 => Some(Precipitation::MixedIce),
                5 => Some(Precipitation::Snow),
                7 => None,
                _ => Some(Precipitation::Reserved),
            },
            salinity: bits.uint(339, 348).map(|v| (v < 510).then_some(v as f64 / 10.0))?,
            ice: uint(348, 350, 3)?.map(|v| v == 1),
        })
    }
}
