//! Aid-to-navigation report (type 21).

use serde::{Deserialize, Serialize};

use crate::bits::BitVector;
use crate::error::Result;
use crate::messages::position::degrees;
use crate::messages::static_data::Dimensions;
use crate::tables::{aid_type_name, EpfdFixType};

/// Identity and position of a buoy, beacon or other navigation aid.
///
/// Names longer than 20 characters continue in an extension field at the
/// end of the message; [`name`](Self::name) holds both halves joined.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AidToNavigationReport {
    /// Aid type code, see [`aid_type_name`](Self::aid_type_name).
    pub aid_type: u8,
    /// Name including any extension, trailing spaces removed.
    pub name: String,
    /// `true` for a DGNSS-quality fix (better than 10 m).
    pub position_accuracy: bool,
    /// Degrees east; 181 when not available.
    pub longitude: f64,
    /// Degrees north; 91 when not available.
    pub latitude: f64,
    /// Hull or structure dimensions.
    pub dimensions: Dimensions,
    /// Position-fixing device.
    pub epfd: EpfdFixType,
    /// UTC second of the report; 60 and above are sentinels.
    pub second: u8,
    /// The aid is off its charted position.
    pub off_position: bool,
    /// RAIM in use.
    pub raim: bool,
    /// The aid is virtual and only exists as a broadcast.
    pub virtual_aid: bool,
    /// Station is in assigned mode.
    pub assigned_mode: bool,
}

impl AidToNavigationReport {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        let mut name = bits.text(43, 163)?;
        if let Some(extension) = bits.trailing_text(272, 361) {
            name.push_str(&extension);
        }
        Ok(Self {
            aid_type: bits.uint(38, 43)? as u8,
            name: name.trim_end().to_string(),
            position_accuracy: bits.flag(163)?,
            longitude: degrees(bits.int(164, 192)?, 600_000.0),
            latitude: degrees(bits.int(192, 219)?, 600_000.0),
            dimensions: Dimensions::decode(bits, 219)?,
            epfd: EpfdFixType::from_code(bits.uint(249, 253)?),
            second: bits.uint(253, 259)? as u8,
            off_position: bits.opt_flag(259).unwrap_or(false),
            raim: bits.opt_flag(268).unwrap_or(false),
            virtual_aid: bits.opt_flag(269).unwrap_or(false),
            assigned_mode: bits.opt_flag(270).unwrap_or(false),
        })
    }

    /// Text form of [`aid_type`](Self::aid_type).
    pub fn aid_type_name(&self) -> &'static str {
        aid_type_name(u64::from(self.aid_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_navigation_aid() {
        let bits =
            BitVector::from_payload_with_fill("E>jHC=c6:W2h22R`@1:WdP00000Opa@H?KTcP10888e?B0", 2)
                .unwrap();
        let report = AidToNavigationReport::decode(&bits).unwrap();
        assert_eq!(report.aid_type, 22);
        assert_eq!(report.aid_type_name(), "Cardinal Mark S");
        assert_eq!(report.name, "LUNE DEEP BUOY");
        assert!(report.position_accuracy);
        assert!((report.longitude - -3.213_613_3).abs() < 1e-6);
        assert!((report.latitude - 53.934_66).abs() < 1e-6);
        assert_eq!(report.dimensions.length(), 2);
        assert_eq!(report.epfd, EpfdFixType::Gps);
        assert_eq!(report.second, 26);
        assert!(!report.off_position);
        assert!(report.raim);
        assert!(!report.virtual_aid);
    }

    #[test]
    fn name_extension_is_appended() {
        let base =
            BitVector::from_payload_with_fill("E>jHC=c6:W2h22R`@1:WdP00000Opa@H?KTcP10888e?B0", 2)
                .unwrap();
        // pad to the extension start, then "NORTH" in 6-bit ASCII
        let mut bits: Vec<bool> = base.to_string().chars().map(|c| c == '1').collect();
        bits.resize(272, false);
        for code in [14u8, 15, 18, 20, 8] {
            bits.extend((0..6).rev().map(|shift| (code >> shift) & 1 == 1));
        }
        let extended: BitVector = bits.into_iter().collect();
        let report = AidToNavigationReport::decode(&extended).unwrap();
        assert_eq!(report.name, "LUNE DEEP BUOYNORTH");
    }
}
