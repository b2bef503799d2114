#![deny(missing_docs)]

//! # AIS NMEA Models
//!
//! Wire-level types for decoding AIS traffic carried in NMEA 0183
//! `!AIVDM` / `!AIVDO` sentences.
//!
//! ## Decoding pipeline
//!
//! ```text
//! sentence line
//! └── Fragment::parse            (shape + checksum)
//!     └── Reassembler::accept    (multi-sentence messages)
//!         └── AssembledMessage   (armored payload + fill bits)
//!             └── decode_with_fill
//!                 └── AisMessage { header, MessageBody }
//!                     ├── position_fields()
//!                     └── detail_fields()
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`bits`] | 6-bit payload armor and bit-field readers |
//! | [`sentence`] | Sentence parsing, checksum, fragment reassembly |
//! | [`messages`] | The 27 message layouts and their projections |
//! | [`identity`] | `Mmsi`, MID flag lookup, `StationClass` |
//! | [`tables`] | Navigation status, EPFD, ship and aid type tables |
//! | [`countries`] | MID → country table |
//! | [`error`] | `AisError` |

pub mod bits;
pub mod countries;
pub mod error;
pub mod identity;
pub mod messages;
pub mod sentence;
pub mod tables;

// Re-export the main types at crate root.
// Downstream crates can use `aisnmea_models::Mmsi` directly.
pub use bits::{bits_to_payload, payload_to_bits, BitVector};
pub use error::*;
pub use identity::*;
pub use messages::*;
pub use sentence::{AssembledMessage, Channel, Fragment, Reassembler, SentenceKind, SentenceStats};
pub use tables::{EpfdFixType, ManeuverIndicator, NavigationStatus};
