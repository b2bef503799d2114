//! Station identity: MMSI, MID-derived flag and station class.
//!
//! An MMSI is kept as its zero-padded 9-digit decimal form. The country
//! flag comes from the Maritime Identification Digits, whose position
//! inside the MMSI depends on its prefix (coast stations, SAR aircraft,
//! nav aids and auxiliary craft prepend extra digits).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::countries::country_for_mid;
use crate::error::AisError;

// ---------------------------------------------------------------------------
// Mmsi
// ---------------------------------------------------------------------------

/// A 9-digit Maritime Mobile Service Identity.
///
/// # Examples
///
/// ```
/// use aisnmea_models::Mmsi;
///
/// let mmsi = Mmsi::from_u32(2320800);
/// assert_eq!(mmsi.as_str(), "002320800");
/// assert_eq!(mmsi.mid(), Some("232"));
/// assert_eq!(mmsi.flag(), "United Kingdom");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mmsi(String);

impl Mmsi {
    /// Render a decoded 30-bit MMSI as a zero-padded 9-digit string.
    pub fn from_u32(value: u32) -> Self {
        Self(format!("{value:09}"))
    }

    /// Wrap an MMSI string **without validation**.
    pub fn new(mmsi: &str) -> Self {
        Self(mmsi.to_string())
    }

    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The Maritime Identification Digits, skipping any type prefix.
    pub fn mid(&self) -> Option<&str> {
        let s = self.0.as_str();
        let start = if ["111", "970", "972", "974"].iter().any(|p| s.starts_with(p)) {
            3
        } else if ["00", "99", "98"].iter().any(|p| s.starts_with(p)) {
            2
        } else if s.starts_with('0') {
            1
        } else {
            0
        };
        s.get(start..start + 3)
    }

    /// Country of registration, or `"Unknown"` if the MID is unassigned.
    pub fn flag(&self) -> &'static str {
        self.mid()
            .and_then(|mid| mid.parse::<u16>().ok())
            .and_then(country_for_mid)
            .unwrap_or("Unknown")
    }

    /// Station class implied by the MMSI prefix alone, if any.
    ///
    /// Prefixes are tested in priority order: `111`, `970`, `972`, `974`,
    /// `98`, `99`, `8`.
    pub fn class_from_prefix(&self) -> Option<StationClass> {
        const PREFIXES: [(&str, StationClass); 7] = [
            ("111", StationClass::SarAircraft),
            ("970", StationClass::AisSart),
            ("972", StationClass::Mob),
            ("974", StationClass::Epirb),
            ("98", StationClass::AuxiliaryCraft),
            ("99", StationClass::NavigationAid),
            ("8", StationClass::PortableVhf),
        ];
        PREFIXES
            .iter()
            .find(|(prefix, _)| self.0.starts_with(prefix))
            .map(|(_, class)| *class)
    }
}

impl fmt::Display for Mmsi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Mmsi {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u32> for Mmsi {
    fn from(value: u32) -> Self {
        Self::from_u32(value)
    }
}

impl FromStr for Mmsi {
    type Err = AisError;

    /// Parse a decimal MMSI of up to nine digits, zero-padding it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<u32>() {
            Ok(value) if trimmed.len() <= 9 && value > 0 => Ok(Self::from_u32(value)),
            _ => Err(AisError::InvalidMmsi { message_type: 0 }),
        }
    }
}

// ---------------------------------------------------------------------------
// StationClass
// ---------------------------------------------------------------------------

/// Broad category of an AIS station.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(into = "String", try_from = "String")]
pub enum StationClass {
    /// Class not yet determined.
    #[default]
    #[strum(serialize = "Unknown")]
    Unknown,
    /// Class A shipborne equipment.
    #[strum(serialize = "A")]
    A,
    /// Class B shipborne equipment.
    #[strum(serialize = "B")]
    B,
    /// Fixed base station.
    #[strum(serialize = "Base Station")]
    BaseStation,
    /// Aid to navigation, physical or virtual.
    #[strum(serialize = "Navigation Aid")]
    NavigationAid,
    /// Search and rescue aircraft.
    #[strum(serialize = "SAR Aircraft")]
    SarAircraft,
    /// Handheld VHF transceiver with AIS.
    #[strum(serialize = "Portable VHF")]
    PortableVhf,
    /// Craft associated with a parent ship.
    #[strum(serialize = "Auxiliary Craft")]
    AuxiliaryCraft,
    /// AIS search and rescue transmitter.
    #[strum(serialize = "AIS SART")]
    AisSart,
    /// Man overboard device.
    #[strum(serialize = "MOB")]
    Mob,
    /// Emergency position-indicating radio beacon.
    #[strum(serialize = "EPIRB")]
    Epirb,
}

impl StationClass {
    /// Station class implied by receiving a given message type, if any.
    pub fn from_message_type(message_type: u8) -> Option<Self> {
        match message_type {
            4 | 11 => Some(Self::BaseStation),
            21 => Some(Self::NavigationAid),
            1 | 2 | 3 | 5 | 27 => Some(Self::A),
            14 | 18 | 19 | 24 => Some(Self::B),
            9 => Some(Self::SarAircraft),
            _ => None,
        }
    }

    /// `true` for stations that are not vessels.
    pub fn is_vessel(self) -> bool {
        matches!(self, Self::A | Self::B | Self::AuxiliaryCraft)
    }
}

impl From<StationClass> for String {
    fn from(class: StationClass) -> Self {
        class.to_string()
    }
}

impl TryFrom<String> for StationClass {
    type Error = strum::ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmsi_is_zero_padded() {
        assert_eq!(Mmsi::from_u32(2320800).to_string(), "002320800");
        assert_eq!(Mmsi::from_u32(235070199).to_string(), "235070199");
        let parsed: Mmsi = "2320800".parse().unwrap();
        assert_eq!(parsed, Mmsi::new("002320800"));
        assert!("0".parse::<Mmsi>().is_err());
        assert!("abc".parse::<Mmsi>().is_err());
    }

    #[test]
    fn mid_extraction_skips_prefixes() {
        assert_eq!(Mmsi::new("235070199").mid(), Some("235"));
        assert_eq!(Mmsi::new("023207000").mid(), Some("232"));
        assert_eq!(Mmsi::new("002320800").mid(), Some("232"));
        assert_eq!(Mmsi::new("992351030").mid(), Some("235"));
        assert_eq!(Mmsi::new("982351234").mid(), Some("235"));
        assert_eq!(Mmsi::new("111232500").mid(), Some("232"));
        assert_eq!(Mmsi::new("970010000").mid(), Some("010"));
    }

    #[test]
    fn flags_from_mid() {
        assert_eq!(Mmsi::new("235070199").flag(), "United Kingdom");
        assert_eq!(Mmsi::new("992501234").flag(), "Ireland");
        assert_eq!(Mmsi::new("366999999").flag(), "United States of America");
        assert_eq!(Mmsi::new("100000000").flag(), "Unknown");
    }

    #[test]
    fn class_from_prefix_priority() {
        assert_eq!(Mmsi::new("111232500").class_from_prefix(), Some(StationClass::SarAircraft));
        assert_eq!(Mmsi::new("970123456").class_from_prefix(), Some(StationClass::AisSart));
        assert_eq!(Mmsi::new("972123456").class_from_prefix(), Some(StationClass::Mob));
        assert_eq!(Mmsi::new("974123456").class_from_prefix(), Some(StationClass::Epirb));
        assert_eq!(Mmsi::new("982351234").class_from_prefix(), Some(StationClass::AuxiliaryCraft));
        assert_eq!(Mmsi::new("992351030").class_from_prefix(), Some(StationClass::NavigationAid));
        assert_eq!(Mmsi::new("823512345").class_from_prefix(), Some(StationClass::PortableVhf));
        assert_eq!(Mmsi::new("235070199").class_from_prefix(), None);
    }

    #[test]
    fn class_from_message_type() {
        assert_eq!(StationClass::from_message_type(11), Some(StationClass::BaseStation));
        assert_eq!(StationClass::from_message_type(27), Some(StationClass::A));
        assert_eq!(StationClass::from_message_type(24), Some(StationClass::B));
        assert_eq!(StationClass::from_message_type(8), None);
    }

    #[test]
    fn station_class_display_and_serde() {
        assert_eq!(StationClass::BaseStation.to_string(), "Base Station");
        let json = serde_json::to_string(&StationClass::AisSart).unwrap();
        assert_eq!(json, "\"AIS SART\"");
        assert_eq!(
            serde_json::from_str::<StationClass>(&json).unwrap(),
            StationClass::AisSart
        );
    }
}
