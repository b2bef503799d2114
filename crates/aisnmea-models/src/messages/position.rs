//! Position reports: Class A (1–3), SAR aircraft (9), Class B (18, 19)
//! and long-range (27).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bits::BitVector;
use crate::error::Result;
use crate::messages::static_data::Dimensions;
use crate::tables::{ship_type_name, EpfdFixType, ManeuverIndicator, NavigationStatus};

/// Sentinel true heading meaning "not available".
pub const HEADING_NOT_AVAILABLE: u16 = 511;

pub(crate) fn degrees(raw: i64, divisor: f64) -> f64 {
    raw as f64 / divisor
}

pub(crate) fn tenths(raw: u64) -> f64 {
    raw as f64 / 10.0
}

// ---------------------------------------------------------------------------
// TurnRate
// ---------------------------------------------------------------------------

/// Rate of turn as reported by a Class A transponder.
///
/// # Examples
///
/// ```
/// use aisnmea_models::TurnRate;
///
/// assert_eq!(TurnRate::from_raw(0), TurnRate::NotTurning);
/// assert_eq!(TurnRate::from_raw(128), TurnRate::NotAvailable);
/// assert_eq!(TurnRate::from_raw(251), TurnRate::Rate(-1.1));
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum TurnRate {
    /// Raw value 0.
    NotTurning,
    /// Raw value 128 (-128 signed).
    NotAvailable,
    /// Turning right at more than 10°/min, no turn indicator (raw 127).
    RightNoIndicator,
    /// Turning left at more than 10°/min, no turn indicator (raw 129).
    LeftNoIndicator,
    /// Rate of turn in degrees per minute, rounded to one decimal.
    Rate(f64),
}

impl TurnRate {
    /// Decode the 8-bit rate-of-turn field.
    ///
    /// The signed value is the two's complement reading of `raw`; the rate
    /// is `sign × (|signed| / 4.733)²`.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::NotTurning,
            128 => Self::NotAvailable,
            127 => Self::RightNoIndicator,
            129 => Self::LeftNoIndicator,
            _ => {
                let signed = f64::from(raw as i8);
                let rate = signed.signum() * (signed.abs() / 4.733).powi(2);
                Self::Rate((rate * 10.0).round() / 10.0)
            }
        }
    }
}

impl fmt::Display for TurnRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotTurning => f.write_str("Not turning"),
            Self::NotAvailable => f.write_str("N/A"),
            Self::RightNoIndicator => {
                f.write_str("Turning right at more than 10°/min (no turn indicator)")
            }
            Self::LeftNoIndicator => {
                f.write_str("Turning left at more than 10°/min (no turn indicator)")
            }
            Self::Rate(rate) => write!(f, "{rate:.1}°/min"),
        }
    }
}

// ---------------------------------------------------------------------------
// Types 1, 2, 3
// ---------------------------------------------------------------------------

/// Class A position report (types 1, 2 and 3 share this layout).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassAPosition {
    /// Navigational status.
    pub nav_status: NavigationStatus,
    /// Rate of turn.
    pub turn_rate: TurnRate,
    /// Knots; 102.3 means not available.
    pub speed: f64,
    /// `true` for a DGNSS-quality fix (better than 10 m).
    pub position_accuracy: bool,
    /// Degrees; 181.0 means not available.
    pub longitude: f64,
    /// Degrees; 91.0 means not available.
    pub latitude: f64,
    /// Course over ground in degrees; 360.0 means not available.
    pub course: f64,
    /// True heading in degrees; 511 means not available.
    pub heading: u16,
    /// UTC second of the report; 60 and above are sentinels.
    pub second: u8,
    /// Special manoeuvre indicator.
    pub maneuver: ManeuverIndicator,
    /// RAIM in use.
    pub raim: bool,
    /// Raw communication state.
    pub radio_status: u32,
}

impl ClassAPosition {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Self {
            nav_status: NavigationStatus::from_code(bits.uint(38, 42)?),
            turn_rate: TurnRate::from_raw(bits.uint(42, 50)? as u8),
            speed: tenths(bits.uint(50, 60)?),
            position_accuracy: bits.flag(60)?,
            longitude: degrees(bits.int(61, 89)?, 600_000.0),
            latitude: degrees(bits.int(89, 116)?, 600_000.0),
            course: tenths(bits.uint(116, 128)?),
            heading: bits.uint(128, 137)? as u16,
            second: bits.uint(137, 143)? as u8,
            maneuver: ManeuverIndicator::from_code(bits.uint(143, 145)?),
            raim: bits.flag(148)?,
            radio_status: bits.uint(149, 168)? as u32,
        })
    }
}

// ---------------------------------------------------------------------------
// Type 9
// ---------------------------------------------------------------------------

/// Standard SAR aircraft position report.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SarAircraftPosition {
    /// Metres; 4095 means not available.
    pub altitude: u16,
    /// Knots; 1023 means not available.
    pub speed: u16,
    /// `true` for a DGNSS-quality fix (better than 10 m).
    pub position_accuracy: bool,
    /// Degrees east; 181.0 means not available.
    pub longitude: f64,
    /// Degrees north; 91.0 means not available.
    pub latitude: f64,
    /// Course over ground in degrees; 360.0 means not available.
    pub course: f64,
    /// UTC second of the report; 60 and above are sentinels.
    pub second: u8,
    /// `true` when no data terminal is available.
    pub dte: bool,
    /// Station is in assigned mode.
    pub assigned_mode: bool,
    /// RAIM in use.
    pub raim: bool,
    /// Raw communication state.
    pub radio_status: u32,
}

impl SarAircraftPosition {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Self {
            altitude: bits.uint(38, 50)? as u16,
            speed: bits.uint(50, 60)? as u16,
            position_accuracy: bits.flag(60)?,
            longitude: degrees(bits.int(61, 89)?, 600_000.0),
            latitude: degrees(bits.int(89, 116)?, 600_000.0),
            course: tenths(bits.uint(116, 128)?),
            second: bits.uint(128, 134)? as u8,
            dte: bits.flag(142)?,
            assigned_mode: bits.flag(146)?,
            raim: bits.flag(147)?,
            radio_status: bits.uint(148, 168)? as u32,
        })
    }
}

// ---------------------------------------------------------------------------
// Type 18
// ---------------------------------------------------------------------------

/// Standard Class B CS position report.
///
/// Speed occupies bits 46..56. The accuracy flag is taken from bit 46,
/// the most significant speed bit, not from bit 56.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassBPosition {
    /// Speed over ground in knots; 102.3 means not available.
    pub speed: f64,
    /// `true` for a DGNSS-quality fix (better than 10 m).
    pub position_accuracy: bool,
    /// Degrees east; 181.0 means not available.
    pub longitude: f64,
    /// Degrees north; 91.0 means not available.
    pub latitude: f64,
    /// Course over ground in degrees; 360.0 means not available.
    pub course: f64,
    /// True heading in degrees; 511 means not available.
    pub heading: u16,
    /// UTC second of the report; 60 and above are sentinels.
    pub second: u8,
    /// `true` for a carrier-sense unit, `false` for SOTDMA.
    pub carrier_sense: bool,
    /// Unit has a display for message 12 and 14.
    pub display: bool,
    /// Unit has a DSC function.
    pub dsc: bool,
    /// Unit can use the whole marine band.
    pub band: bool,
    /// Unit accepts channel management by message 22.
    pub message_22: bool,
    /// Station is in assigned mode.
    pub assigned_mode: bool,
    /// RAIM in use.
    pub raim: bool,
    /// Raw communication state.
    pub radio_status: u32,
}

impl ClassBPosition {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Self {
            speed: tenths(bits.uint(46, 56)?),
            position_accuracy: bits.flag(46)?,
            longitude: degrees(bits.int(57, 85)?, 600_000.0),
            latitude: degrees(bits.int(85, 112)?, 600_000.0),
            course: tenths(bits.uint(112, 124)?),
            heading: bits.uint(124, 133)? as u16,
            second: bits.uint(133, 139)? as u8,
            carrier_sense: bits.flag(141)?,
            display: bits.flag(142)?,
            dsc: bits.flag(143)?,
            band: bits.flag(144)?,
            message_22: bits.flag(145)?,
            assigned_mode: bits.flag(146)?,
            raim: bits.flag(147)?,
            radio_status: bits.uint(148, 168)? as u32,
        })
    }

    /// `"CS"` or `"SOTDMA"`.
    pub fn unit_type(&self) -> &'static str {
        if self.carrier_sense {
            "CS"
        } else {
            "SOTDMA"
        }
    }
}

// ---------------------------------------------------------------------------
// Type 19
// ---------------------------------------------------------------------------

/// Extended Class B equipment position report.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExtendedClassBPosition {
    /// Speed over ground in knots; 102.3 means not available.
    pub speed: f64,
    /// `true` for a DGNSS-quality fix (better than 10 m).
    pub position_accuracy: bool,
    /// Degrees east; 181.0 means not available.
    pub longitude: f64,
    /// Degrees north; 91.0 means not available.
    pub latitude: f64,
    /// Course over ground in degrees; 360.0 means not available.
    pub course: f64,
    /// True heading in degrees; 511 means not available.
    pub heading: u16,
    /// UTC second of the report; 60 and above are sentinels.
    pub second: u8,
    /// Vessel name, trailing spaces removed.
    pub name: String,
    /// Ship and cargo type code.
    pub ship_type: u8,
    /// Hull dimensions.
    pub dimensions: Dimensions,
    /// Position-fixing device.
    pub epfd: EpfdFixType,
    /// RAIM in use.
    pub raim: bool,
    /// `true` when no data terminal is available.
    pub dte: bool,
    /// Station is in assigned mode.
    pub assigned_mode: bool,
}

impl ExtendedClassBPosition {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Self {
            speed: tenths(bits.uint(46, 56)?),
            position_accuracy: bits.flag(46)?,
            longitude: degrees(bits.int(57, 85)?, 600_000.0),
            latitude: degrees(bits.int(85, 112)?, 600_000.0),
            course: tenths(bits.uint(112, 124)?),
            heading: bits.uint(124, 133)? as u16,
            second: bits.uint(133, 139)? as u8,
            name: bits.text(143, 263)?.trim_end().to_string(),
            ship_type: bits.uint(263, 271)? as u8,
            dimensions: Dimensions::decode(bits, 271)?,
            epfd: EpfdFixType::from_code(bits.uint(301, 305)?),
            raim: bits.flag(305)?,
            dte: bits.flag(306)?,
            assigned_mode: bits.opt_flag(307).unwrap_or(false),
        })
    }

    /// Text form of [`ship_type`](Self::ship_type).
    pub fn ship_type_name(&self) -> &'static str {
        ship_type_name(u64::from(self.ship_type))
    }
}

// ---------------------------------------------------------------------------
// Type 27
// ---------------------------------------------------------------------------

/// Position report for long-range applications (reduced precision).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LongRangePosition {
    /// `true` for a DGNSS-quality fix (better than 10 m).
    pub position_accuracy: bool,
    /// RAIM in use.
    pub raim: bool,
    /// Navigational status.
    pub nav_status: NavigationStatus,
    /// Degrees at 1/10 minute precision.
    pub longitude: f64,
    /// Degrees at 1/10 minute precision.
    pub latitude: f64,
    /// Raw 6-bit speed field divided by ten.
    pub speed: f64,
    /// Whole degrees; 511 means not available.
    pub course: f64,
    /// `false` when the position is the current GNSS fix.
    pub gnss_not_current: bool,
}

impl LongRangePosition {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Self {
            position_accuracy: bits.flag(38)?,
            raim: bits.flag(39)?,
            nav_status: NavigationStatus::from_code(bits.uint(40, 44)?),
            longitude: degrees(bits.int(44, 62)?, 600.0),
            latitude: degrees(bits.int(62, 79)?, 600.0),
            speed: tenths(bits.uint(79, 85)?),
            course: bits.uint(85, 94)? as f64,
            gnss_not_current: bits.opt_flag(94).unwrap_or(false),
        })
    }
}
