//! Data link control messages: interrogation (15), assignment (16),
//! DGNSS (17), data link management (20), channel management (22) and
//! group assignment (23).

use serde::{Deserialize, Serialize};

use crate::bits::BitVector;
use crate::error::Result;
use crate::identity::Mmsi;

fn mmsi_at(bits: &BitVector, start: usize) -> Option<Mmsi> {
    if !bits.contains_range(start, start + 30) {
        return None;
    }
    bits.opt_uint(start, start + 30)
        .filter(|m| *m != 0)
        .map(|m| Mmsi::from_u32(m as u32))
}

// ---------------------------------------------------------------------------
// Type 15
// ---------------------------------------------------------------------------

/// One request inside an interrogation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InterrogationRequest {
    /// Interrogated station.
    pub mmsi: Mmsi,
    /// Requested message type.
    pub message_type: u8,
    /// Response slot offset.
    pub slot_offset: u16,
}

/// Interrogation of up to two stations for up to three message types.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Interrogation {
    /// Requests in the order they appear.
    pub requests: Vec<InterrogationRequest>,
}

impl Interrogation {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        let first = mmsi_at(bits, 40);
        let second = mmsi_at(bits, 110);
        let slots = [(first.clone(), 70usize), (first, 90), (second, 140)];

        let requests = slots
            .into_iter()
            .filter_map(|(mmsi, start)| {
                let mmsi = mmsi?;
                if !bits.contains_range(start, start + 18) {
                    return None;
                }
                let message_type = bits.opt_uint(start, start + 6)? as u8;
                (message_type != 0).then(|| InterrogationRequest {
                    mmsi,
                    message_type,
                    slot_offset: bits.opt_uint(start + 6, start + 18).unwrap_or(0) as u16,
                })
            })
            .collect();
        Ok(Self { requests })
    }
}

// ---------------------------------------------------------------------------
// Type 16
// ---------------------------------------------------------------------------

/// Slot assignment for one station.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    /// Assigned station.
    pub mmsi: Mmsi,
    /// Slot offset.
    pub offset: u16,
    /// Slot increment; 0 means a reporting rate assignment.
    pub increment: u16,
}

/// Assignment mode command for up to two stations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AssignmentModeCommand {
    /// Assignments in the order they appear.
    pub assignments: Vec<SlotAssignment>,
}

impl AssignmentModeCommand {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        let assignments = [40usize, 92]
            .into_iter()
            .filter(|start| bits.contains_range(*start, start + 52))
            .filter_map(|start| {
                Some(SlotAssignment {
                    mmsi: mmsi_at(bits, start)?,
                    offset: bits.opt_uint(start + 30, start + 42)? as u16,
                    increment: bits.opt_uint(start + 42, start + 52)? as u16,
                })
            })
            .collect();
        Ok(Self { assignments })
    }
}

// ---------------------------------------------------------------------------
// Type 20
// ---------------------------------------------------------------------------

/// A block of slots reserved by a base station.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SlotReservation {
    /// First reserved slot.
    pub offset: u16,
    /// Number of consecutive slots.
    pub slots: u8,
    /// Minutes.
    pub timeout: u8,
    /// Slots between reserved blocks.
    pub increment: u16,
}

/// Data link management: up to four slot reservations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DataLinkManagement {
    /// Non-empty reservations in the order they appear.
    pub reservations: Vec<SlotReservation>,
}

impl DataLinkManagement {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        let reservations = [40usize, 70, 100, 130]
            .into_iter()
            .filter(|start| bits.contains_range(*start, start + 30))
            .map(|start| SlotReservation {
                offset: bits.opt_uint(start, start + 12).unwrap_or(0) as u16,
                slots: bits.opt_uint(start + 12, start + 16).unwrap_or(0) as u8,
                timeout: bits.opt_uint(start + 16, start + 19).unwrap_or(0) as u8,
                increment: bits.opt_uint(start + 19, start + 30).unwrap_or(0) as u16,
            })
            .filter(|r| r.offset != 0 || r.slots != 0)
            .collect();
        Ok(Self { reservations })
    }
}

// ---------------------------------------------------------------------------
// Type 22
// ---------------------------------------------------------------------------

/// Channel management command.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChannelManagement {
    /// Channel A number.
    pub channel_a: u16,
    /// Channel B number.
    pub channel_b: u16,
    /// Transmit and receive mode.
    pub txrx_mode: u8,
    /// `true` for high transmit power.
    pub high_power: bool,
}

impl ChannelManagement {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Self {
            channel_a: bits.uint(40, 52)? as u16,
            channel_b: bits.uint(52, 64)? as u16,
            txrx_mode: bits.uint(64, 68)? as u8,
            high_power: bits.flag(68)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Types 17, 23
// ---------------------------------------------------------------------------

/// A message that is recognised but whose body is not decoded
/// (DGNSS broadcast, group assignment).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OpaqueBody {
    /// Number of bits after the 38-bit header.
    pub data_bits: usize,
}

impl OpaqueBody {
    pub(crate) fn decode(bits: &BitVector) -> Self {
        Self {
            data_bits: bits.len().saturating_sub(38),
        }
    }
}
