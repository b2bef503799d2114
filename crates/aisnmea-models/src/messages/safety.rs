//! Acknowledgements (types 7, 13) and safety related text (types 12, 14).

use serde::{Deserialize, Serialize};

use crate::bits::BitVector;
use crate::error::Result;
use crate::identity::Mmsi;

/// One acknowledged station and the sequence number being acknowledged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AcknowledgedStation {
    /// Station being acknowledged.
    pub mmsi: Mmsi,
    /// Sequence number of the acknowledged message.
    pub sequence_number: u8,
}

/// Binary or safety acknowledgement. Carries up to four stations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    /// Stations in the order they appear.
    pub acknowledged: Vec<AcknowledgedStation>,
}

impl Acknowledgement {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        let acknowledged = [40usize, 72, 104, 136]
            .into_iter()
            .filter(|start| bits.contains_range(*start, start + 30))
            .filter_map(|start| {
                let mmsi = bits.opt_uint(start, start + 30).filter(|m| *m != 0)?;
                Some(AcknowledgedStation {
                    mmsi: Mmsi::from_u32(mmsi as u32),
                    sequence_number: bits.opt_uint(start + 30, start + 32).unwrap_or(0) as u8,
                })
            })
            .collect();
        Ok(Self { acknowledged })
    }
}

/// Safety related text addressed to one station.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AddressedSafety {
    /// Sequence number, 0 to 3.
    pub sequence_number: u8,
    /// Addressed station.
    pub destination: Mmsi,
    /// The message was retransmitted.
    pub retransmit: bool,
    /// Message text, trailing `@` fill removed.
    pub text: String,
}

impl AddressedSafety {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Self {
            sequence_number: bits.uint(38, 40)? as u8,
            destination: Mmsi::from_u32(bits.uint(40, 70)? as u32),
            retransmit: bits.flag(70)?,
            text: bits.trailing_text(72, 936).unwrap_or_default(),
        })
    }
}

/// Safety related text broadcast to all stations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SafetyBroadcast {
    /// Message text, trailing `@` fill removed.
    pub text: String,
}

impl SafetyBroadcast {
    pub(crate) fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Self {
            text: bits.trailing_text(40, 968).unwrap_or_default(),
        })
    }
}
