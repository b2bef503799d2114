//! Base station reports (types 4 and 11) and the UTC date inquiry (type 10).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::bits::BitVector;
use crate::error::Result;
use crate::identity::Mmsi;
use crate::messages::position::degrees;
use crate::tables::EpfdFixType;

/// Format used for every timestamp the decoder and tracker render.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Base station report / UTC date response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BaseStationReport {
    /// UTC year; 0 when not available.
    pub year: u16,
    /// UTC month; 0 when not available.
    pub month: u8,
    /// UTC day; 0 when not available.
    pub day: u8,
    /// UTC hour; 24 when not available.
    pub hour: u8,
    /// UTC minute; 60 when not available.
    pub minute: u8,
    /// UTC second; 60 when not available.
    pub second: u8,
    /// `true` for a DGNSS-quality fix (better than 10 m).
    pub position_accuracy: bool,
    /// Degrees east; 181 when not available.
    pub longitude: f64,
    /// Degrees north; 91 when not available.
    pub latitude: f64,
    /// Position-fixing device.
    pub epfd: EpfdFixType,
    /// RAIM in use.
    pub raim: bool,
    /// Raw SOTDMA communication state.
    pub radio_status: u32,
}

impl BaseStationReport {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Self {
            year: bits.uint(38, 52)? as u16,
            month: bits.uint(52, 56)? as u8,
            day: bits.uint(56, 61)? as u8,
            hour: bits.uint(61, 66)? as u8,
            minute: bits.uint(66, 72)? as u8,
            second: bits.uint(72, 78)? as u8,
            position_accuracy: bits.flag(78)?,
            longitude: degrees(bits.int(79, 107)?, 600_000.0),
            latitude: degrees(bits.int(107, 134)?, 600_000.0),
            epfd: EpfdFixType::from_code(bits.uint(134, 138)?),
            raim: bits.flag(148)?,
            radio_status: bits.uint(149, 168)? as u32,
        })
    }

    /// The broadcast time as `YYYY/MM/DD HH:MM:SS`.
    ///
    /// Unavailable fields render as their sentinels, so a station with no
    /// time fix reports `0/00/00 24:60:60`.
    pub fn timestamp(&self) -> String {
        format!(
            "{}/{:02}/{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    /// The broadcast time, if it is a real calendar date and time.
    pub fn utc_time(&self) -> Option<NaiveDateTime> {
        if self.year == 0 {
            return None;
        }
        NaiveDateTime::parse_from_str(&self.timestamp(), TIMESTAMP_FORMAT).ok()
    }
}

/// UTC and date inquiry addressed to another station.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UtcDateInquiry {
    /// Station asked for its time.
    pub destination: Mmsi,
}

impl UtcDateInquiry {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Self {
            destination: Mmsi::from_u32(bits.uint(40, 70)? as u32),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(payload: &str) -> BaseStationReport {
        BaseStationReport::decode(&BitVector::from_payload(payload).unwrap()).unwrap()
    }

    #[test]
    fn decodes_base_station_report() {
        let report = report("402=a`1vDo:00wTwO0O?Ph700000");
        assert_eq!(report.timestamp(), "2021/03/14 10:00:00");
        assert!(report.utc_time().is_some());
        assert!((report.longitude - -5.9).abs() < 1e-9);
        assert!((report.latitude - 54.6).abs() < 1e-9);
        assert_eq!(report.epfd, EpfdFixType::Surveyed);
    }

    #[test]
    fn sentinel_time_is_not_well_formed() {
        let mut report = report("402=a`1vDo:00wTwO0O?Ph700000");
        report.year = 0;
        report.month = 0;
        report.day = 0;
        report.hour = 24;
        report.minute = 60;
        report.second = 60;
        assert_eq!(report.timestamp(), "0/00/00 24:60:60");
        assert_eq!(report.utc_time(), None);
    }

    #[test]
    fn decodes_utc_inquiry() {
        let bits = BitVector::from_payload(":3P;Ruh0SJJ0").unwrap();
        let inquiry = UtcDateInquiry::decode(&bits).unwrap();
        assert_eq!(inquiry.destination.as_str(), "002320800");
    }
}
