//! Error types for the `aisnmea-models` crate.
//!
//! Every fallible operation in this crate (sentence parsing, payload
//! conversion, message decoding) returns a variant of [`AisError`]. All of
//! them are recoverable: callers skip the offending line or message and
//! carry on.

/// Errors produced while parsing sentences or decoding AIS payloads.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AisError {
    /// The line does not have the shape of an `!AIVDM` / `!AIVDO` sentence.
    #[error("invalid NMEA sentence \"{line}\": {reason}")]
    InvalidSentence {
        /// The rejected line.
        line: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// The XOR checksum after `*` does not match the sentence body.
    #[error("checksum failed for \"{line}\": expected {expected:02X}, computed {computed:02X}")]
    ChecksumFailed {
        /// The rejected line.
        line: String,
        /// Checksum carried by the sentence.
        expected: u8,
        /// Checksum computed over the sentence body.
        computed: u8,
    },

    /// A payload character falls outside the 6-bit armor alphabet.
    #[error("invalid payload character {character:?}")]
    InvalidPayloadCharacter {
        /// The offending character.
        character: char,
    },

    /// A decoder asked for a bit range that holds no data.
    #[error("no binary data in bit range {start}..{end}")]
    NoBinaryData {
        /// First bit of the requested range.
        start: usize,
        /// One past the last bit of the requested range.
        end: usize,
    },

    /// The 6-bit message type is not one of the 27 defined types.
    #[error("unknown message type {message_type}")]
    UnknownMessageType {
        /// The message type read from the header.
        message_type: u8,
    },

    /// The source MMSI of a message is all zeros.
    #[error("invalid MMSI in type {message_type} message")]
    InvalidMmsi {
        /// The message type read from the header.
        message_type: u8,
    },

    /// A position report carried unavailable or out-of-range coordinates.
    #[error("no suitable position from {mmsi}: lat {latitude}, lon {longitude}")]
    NoSuitablePosition {
        /// MMSI of the reporting station.
        mmsi: String,
        /// Reported latitude.
        latitude: f64,
        /// Reported longitude.
        longitude: f64,
    },

    /// A multi-fragment message completed with one or more gaps.
    #[error("message {sequence_id:?} is missing fragments {missing:?}")]
    MissingFragment {
        /// Sequence id of the incomplete message.
        sequence_id: String,
        /// 1-based indices of the fragments that never arrived.
        missing: Vec<u8>,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AisError>;

impl AisError {
    /// Short name of the error kind, suitable as a counter key.
    pub fn kind(&self) -> &'static str {
        match self {
            AisError::InvalidSentence { .. } => "InvalidSentence",
            AisError::ChecksumFailed { .. } => "ChecksumFailed",
            AisError::InvalidPayloadCharacter { .. } => "InvalidPayloadCharacter",
            AisError::NoBinaryData { .. } => "NoBinaryData",
            AisError::UnknownMessageType { .. } => "UnknownMessageType",
            AisError::InvalidMmsi { .. } => "InvalidMMSI",
            AisError::NoSuitablePosition { .. } => "NoSuitablePosition",
            AisError::MissingFragment { .. } => "MissingFragment",
        }
    }
}
