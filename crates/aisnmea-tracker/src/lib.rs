//! # AIS Station Tracker
//!
//! Folds decoded [`aisnmea_models::AisMessage`]s into one [`Station`] per
//! MMSI and derives the views a capture summary needs.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`tracker`] | `StationTracker`, `BaseStationTracker`, timing estimation |
//! | [`station`] | `Station`: class, identity, details, positions |
//! | [`stats`] | `TrackerStats`, grouping by `Category` |
//! | [`views`] | `StationInfo`, nav and full table rows |

pub mod station;
pub mod stats;
pub mod tracker;
pub mod views;

pub use station::Station;
pub use stats::{Category, TimeSpan, TrackerStats};
pub use tracker::{BaseStationTracker, StationTracker, TIME_NOT_AVAILABLE};
pub use views::{NavRow, StationInfo, TableRow};
