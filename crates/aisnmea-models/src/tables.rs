//! Enumerated code tables from ITU-R M.1371.
//!
//! Small closed sets (navigational status, EPFD fix type, manoeuvre
//! indicator) are `strum` enums that serialise as their descriptive text.
//! The two large tables (ship types 0–99 and aid-to-navigation types 0–31)
//! are static string registries looked up by code.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NavigationStatus
// ---------------------------------------------------------------------------

/// Navigational status reported in Class A and long-range position reports.
///
/// # Examples
///
/// ```
/// use aisnmea_models::NavigationStatus;
///
/// assert_eq!(NavigationStatus::from_code(5), NavigationStatus::Moored);
/// assert_eq!(NavigationStatus::from_code(5).to_string(), "Moored");
/// assert_eq!(NavigationStatus::from_code(99), NavigationStatus::NotDefined);
/// ```
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::FromRepr,
)]
#[serde(into = "String", try_from = "String")]
#[repr(u8)]
pub enum NavigationStatus {
    /// Code 0.
    #[strum(serialize = "Under way using engine")]
    UnderWayUsingEngine = 0,
    /// Code 1.
    #[strum(serialize = "At anchor")]
    AtAnchor = 1,
    /// Code 2.
    #[strum(serialize = "Not under command")]
    NotUnderCommand = 2,
    /// Code 3.
    #[strum(serialize = "Restricted manoeuverability")]
    RestrictedManoeuverability = 3,
    /// Code 4.
    #[strum(serialize = "Constrained by her draught")]
    ConstrainedByDraught = 4,
    /// Code 5.
    #[strum(serialize = "Moored")]
    Moored = 5,
    /// Code 6.
    #[strum(serialize = "Aground")]
    Aground = 6,
    /// Code 7.
    #[strum(serialize = "Engaged in Fishing")]
    EngagedInFishing = 7,
    /// Code 8.
    #[strum(serialize = "Under way sailing")]
    UnderWaySailing = 8,
    /// Code 9, reserved for high speed craft.
    #[strum(serialize = "Reserved for future amendment of Navigational Status for HSC")]
    ReservedHsc = 9,
    /// Code 10, reserved for wing in ground craft.
    #[strum(serialize = "Reserved for future amendment of Navigational Status for WIG")]
    ReservedWig = 10,
    /// Code 11.
    #[strum(serialize = "Power-driven vessel towing astern (regional use)")]
    TowingAstern = 11,
    /// Code 12.
    #[strum(serialize = "Power-driven vessel pushing ahead or towing alongside (regional use)")]
    PushingAhead = 12,
    /// Code 13.
    #[strum(serialize = "Reserved for future use")]
    Reserved = 13,
    /// Code 14.
    #[strum(serialize = "AIS-SART is active")]
    SartActive = 14,
    /// Code 15, also the default.
    #[strum(serialize = "Not defined (default)")]
    NotDefined = 15,
}

impl NavigationStatus {
    /// Look up a 4-bit status code; anything out of range is `NotDefined`.
    pub fn from_code(code: u64) -> Self {
        u8::try_from(code)
            .ok()
            .and_then(Self::from_repr)
            .unwrap_or(Self::NotDefined)
    }
}

impl From<NavigationStatus> for String {
    fn from(status: NavigationStatus) -> Self {
        status.to_string()
    }
}

impl TryFrom<String> for NavigationStatus {
    type Error = strum::ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// EpfdFixType
// ---------------------------------------------------------------------------

/// Type of electronic position-fixing device.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::FromRepr,
)]
#[serde(into = "String", try_from = "String")]
#[repr(u8)]
pub enum EpfdFixType {
    /// No device given.
    #[strum(serialize = "Undefined")]
    Undefined = 0,
    /// Global Positioning System.
    #[strum(serialize = "GPS")]
    Gps = 1,
    /// GLONASS.
    #[strum(serialize = "GLONASS")]
    Glonass = 2,
    /// GPS and GLONASS combined.
    #[strum(serialize = "Combined GPS/GLONASS")]
    GpsGlonass = 3,
    /// Loran-C.
    #[strum(serialize = "Loran-C")]
    LoranC = 4,
    /// Chayka.
    #[strum(serialize = "Chayka")]
    Chayka = 5,
    /// Integrated navigation system.
    #[strum(serialize = "Integrated navigation system")]
    IntegratedNavigation = 6,
    /// Surveyed position, typical of fixed stations.
    #[strum(serialize = "Surveyed")]
    Surveyed = 7,
    /// Galileo.
    #[strum(serialize = "Galileo")]
    Galileo = 8,
    /// Internal GNSS receiver.
    #[strum(serialize = "Internal GNSS")]
    InternalGnss = 15,
}

impl EpfdFixType {
    /// Look up a 4-bit EPFD code; unassigned codes are `Undefined`.
    pub fn from_code(code: u64) -> Self {
        u8::try_from(code)
            .ok()
            .and_then(Self::from_repr)
            .unwrap_or(Self::Undefined)
    }
}

impl From<EpfdFixType> for String {
    fn from(epfd: EpfdFixType) -> Self {
        epfd.to_string()
    }
}

impl TryFrom<String> for EpfdFixType {
    type Error = strum::ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// ManeuverIndicator
// ---------------------------------------------------------------------------

/// Special manoeuvre indicator of Class A position reports.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::FromRepr,
)]
#[serde(into = "String", try_from = "String")]
#[repr(u8)]
pub enum ManeuverIndicator {
    /// No indicator given.
    #[strum(serialize = "Not available (default)")]
    NotAvailable = 0,
    /// Normal navigation.
    #[strum(serialize = "No special maneuver")]
    NoSpecialManeuver = 1,
    /// Engaged in a special manoeuvre.
    #[strum(serialize = "Special maneuver (such as regional passing arrangement)")]
    SpecialManeuver = 2,
}

impl ManeuverIndicator {
    /// Look up a 2-bit indicator code; 3 is treated as not available.
    pub fn from_code(code: u64) -> Self {
        u8::try_from(code)
            .ok()
            .and_then(Self::from_repr)
            .unwrap_or(Self::NotAvailable)
    }
}

impl From<ManeuverIndicator> for String {
    fn from(indicator: ManeuverIndicator) -> Self {
        indicator.to_string()
    }
}

impl TryFrom<String> for ManeuverIndicator {
    type Error = strum::ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// Ship types
// ---------------------------------------------------------------------------

const RESERVED: &str = "Reserved for future use";

/// Ship and cargo type descriptions, indexed by the 8-bit type code (0–99).
pub static SHIP_TYPES: [&str; 100] = [
    "Not available (default)",
    RESERVED, RESERVED, RESERVED, RESERVED, RESERVED, RESERVED, RESERVED, RESERVED, RESERVED,
    RESERVED, RESERVED, RESERVED, RESERVED, RESERVED, RESERVED, RESERVED, RESERVED, RESERVED,
    RESERVED,
    "Wing in ground (WIG), all ships of this type",
    "Wing in ground (WIG), Hazardous category A",
    "Wing in ground (WIG), Hazardous category B",
    "Wing in ground (WIG), Hazardous category C",
    "Wing in ground (WIG), Hazardous category D",
    "Wing in ground (WIG), Reserved for future use",
    "Wing in ground (WIG), Reserved for future use",
    "Wing in ground (WIG), Reserved for future use",
    "Wing in ground (WIG), Reserved for future use",
    "Wing in ground (WIG), Reserved for future use",
    "Fishing",
    "Towing",
    "Towing: length exceeds 200m or breadth exceeds 25m",
    "Dredging or underwater ops",
    "Diving ops",
    "Military ops",
    "Sailing",
    "Pleasure Craft",
    "Reserved",
    "Reserved",
    "High speed craft (HSC), all ships of this type",
    "High speed craft (HSC), Hazardous category A",
    "High speed craft (HSC), Hazardous category B",
    "High speed craft (HSC), Hazardous category C",
    "High speed craft (HSC), Hazardous category D",
    "High speed craft (HSC), Reserved for future use",
    "High speed craft (HSC), Reserved for future use",
    "High speed craft (HSC), Reserved for future use",
    "High speed craft (HSC), Reserved for future use",
    "High speed craft (HSC), No additional information",
    "Pilot Vessel",
    "Search and Rescue vessel",
    "Tug",
    "Port Tender",
    "Anti-pollution equipment",
    "Law Enforcement",
    "Spare - Local Vessel",
    "Spare - Local Vessel",
    "Medical Transport",
    "Noncombatant ship according to RR Resolution No. 18",
    "Passenger, all ships of this type",
    "Passenger, Hazardous category A",
    "Passenger, Hazardous category B",
    "Passenger, Hazardous category C",
    "Passenger, Hazardous category D",
    "Passenger, Reserved for future use",
    "Passenger, Reserved for future use",
    "Passenger, Reserved for future use",
    "Passenger, Reserved for future use",
    "Passenger, No additional information",
    "Cargo, all ships of this type",
    "Cargo, Hazardous category A",
    "Cargo, Hazardous category B",
    "Cargo, Hazardous category C",
    "Cargo, Hazardous category D",
    "Cargo, Reserved for future use",
    "Cargo, Reserved for future use",
    "Cargo, Reserved for future use",
    "Cargo, Reserved for future use",
    "Cargo, No additional information",
    "Tanker, all ships of this type",
    "Tanker, Hazardous category A",
    "Tanker, Hazardous category B",
    "Tanker, Hazardous category C",
    "Tanker, Hazardous category D",
    "Tanker, Reserved for future use",
    "Tanker, Reserved for future use",
    "Tanker, Reserved for future use",
    "Tanker, Reserved for future use",
    "Tanker, No additional information",
    "Other Type, all ships of this type",
    "Other Type, Hazardous category A",
    "Other Type, Hazardous category B",
    "Other Type, Hazardous category C",
    "Other Type, Hazardous category D",
    "Other Type, Reserved for future use",
    "Other Type, Reserved for future use",
    "Other Type, Reserved for future use",
    "Other Type, Reserved for future use",
    "Other Type, No additional information",
];

/// Description of a ship type code, `"Unknown"` outside 0–99.
///
/// # Examples
///
/// ```
/// use aisnmea_models::tables::ship_type_name;
///
/// assert_eq!(ship_type_name(52), "Tug");
/// assert_eq!(ship_type_name(200), "Unknown");
/// ```
pub fn ship_type_name(code: u64) -> &'static str {
    usize::try_from(code)
        .ok()
        .and_then(|index| SHIP_TYPES.get(index))
        .copied()
        .unwrap_or("Unknown")
}

// ---------------------------------------------------------------------------
// Aid-to-navigation types
// ---------------------------------------------------------------------------

/// Aid-to-navigation type descriptions, indexed by the 5-bit code (0–31).
pub static AID_TYPES: [&str; 32] = [
    "Default, Type of Aid to Navigation not specified",
    "Reference point",
    "RACON (radar transponder marking a navigation hazard)",
    "Fixed structure off shore, such as oil platforms, wind farms, rigs",
    "Spare, Reserved for future use",
    "Light, without sectors",
    "Light, with sectors",
    "Leading Light Front",
    "Leading Light Rear",
    "Beacon, Cardinal N",
    "Beacon, Cardinal E",
    "Beacon, Cardinal S",
    "Beacon, Cardinal W",
    "Beacon, Port hand",
    "Beacon, Starboard hand",
    "Beacon, Preferred Channel port hand",
    "Beacon, Preferred Channel starboard hand",
    "Beacon, Isolated danger",
    "Beacon, Safe water",
    "Beacon, Special mark",
    "Cardinal Mark N",
    "Cardinal Mark E",
    "Cardinal Mark S",
    "Cardinal Mark W",
    "Port hand Mark",
    "Starboard hand Mark",
    "Preferred Channel Port hand",
    "Preferred Channel Starboard hand",
    "Isolated danger",
    "Safe Water",
    "Special Mark",
    "Light Vessel / LANBY / Rigs",
];

/// Description of an aid-to-navigation type code.
pub fn aid_type_name(code: u64) -> &'static str {
    usize::try_from(code)
        .ok()
        .and_then(|index| AID_TYPES.get(index))
        .copied()
        .unwrap_or("Unknown")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn ship_type_table_covers_all_codes() {
        assert_eq!(ship_type_name(0), "Not available (default)");
        assert_eq!(ship_type_name(37), "Pleasure Craft");
        assert_eq!(ship_type_name(40), "High speed craft (HSC), all ships of this type");
        assert_eq!(ship_type_name(70), "Cargo, all ships of this type");
        assert_eq!(ship_type_name(99), "Other Type, No additional information");
        assert_eq!(ship_type_name(100), "Unknown");
    }

    #[test]
    fn aid_type_table() {
        assert_eq!(aid_type_name(22), "Cardinal Mark S");
        assert_eq!(aid_type_name(31), "Light Vessel / LANBY / Rigs");
        assert_eq!(aid_type_name(32), "Unknown");
    }

    #[test]
    fn navigation_status_codes_are_contiguous() {
        for (code, status) in NavigationStatus::iter().enumerate() {
            assert_eq!(NavigationStatus::from_code(code as u64), status);
        }
        assert_eq!(NavigationStatus::iter().count(), 16);
    }

    #[test]
    fn epfd_lookup() {
        assert_eq!(EpfdFixType::from_code(1).to_string(), "GPS");
        assert_eq!(EpfdFixType::from_code(7), EpfdFixType::Surveyed);
        assert_eq!(EpfdFixType::from_code(12), EpfdFixType::Undefined);
    }

    #[test]
    fn enums_serialise_as_text() {
        let json = serde_json::to_string(&NavigationStatus::AtAnchor).unwrap();
        assert_eq!(json, "\"At anchor\"");
        let back: NavigationStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NavigationStatus::AtAnchor);
        let json = serde_json::to_string(&ManeuverIndicator::NoSpecialManeuver).unwrap();
        assert_eq!(json, "\"No special maneuver\"");
    }
}
