//! Payload armor and bit-level field extraction.
//!
//! An AIS payload travels as 6-bit "armored" ASCII: each character in the
//! range `0`..`w` (skipping `X`..`_`) encodes six bits. [`BitVector`] holds
//! the unpacked bits of one complete payload and reads the fixed-width
//! fields every message layout is built from:
//!
//! - [`BitVector::uint`]: unsigned, most significant bit first
//! - [`BitVector::int`]: two's complement signed
//! - [`BitVector::text`]: 6-bit ASCII with trailing `@` fill stripped
//!
//! Any range that does not lie wholly inside the buffer fails with
//! [`AisError::NoBinaryData`]. The `opt_*` variants turn that into `None`
//! for decoders that must treat a short payload as "field absent".
//! Variable-length text at the end of a message is read with
//! [`BitVector::trailing_text`], which stops at the buffer end.

use std::fmt;

use crate::error::{AisError, Result};

/// The 64-character 6-bit ASCII table used for text fields.
pub const SIXBIT_ASCII: &[u8; 64] =
    b"@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_ !\"#$%&'()*+,-./0123456789:;<=>?";

/// Decode one armored payload character into its 6-bit value.
///
/// # Examples
///
/// ```
/// use aisnmea_models::bits::armor_to_sixbit;
///
/// assert_eq!(armor_to_sixbit('0').unwrap(), 0);
/// assert_eq!(armor_to_sixbit('W').unwrap(), 39);
/// assert_eq!(armor_to_sixbit('`').unwrap(), 40);
/// assert_eq!(armor_to_sixbit('w').unwrap(), 63);
/// assert!(armor_to_sixbit('X').is_err());
/// ```
pub fn armor_to_sixbit(character: char) -> Result<u8> {
    let code = character as u32;
    if !(48..=119).contains(&code) || (88..=95).contains(&code) {
        return Err(AisError::InvalidPayloadCharacter { character });
    }
    let mut value = code - 48;
    if value > 40 {
        value -= 8;
    }
    Ok(value as u8)
}

/// Encode a 6-bit value (0..=63) as an armored payload character.
pub fn sixbit_to_armor(value: u8) -> char {
    let value = value & 0x3f;
    let offset = if value > 39 { 8 } else { 0 };
    char::from(value + offset + 48)
}

/// An immutable sequence of payload bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitVector {
    bits: Vec<bool>,
}

impl BitVector {
    /// Unpack an armored payload. The result holds `6 × len(payload)` bits.
    ///
    /// An empty payload fails with [`AisError::NoBinaryData`].
    pub fn from_payload(payload: &str) -> Result<Self> {
        Self::from_payload_with_fill(payload, 0)
    }

    /// Unpack an armored payload and drop its trailing `fill_bits` pad bits.
    pub fn from_payload_with_fill(payload: &str, fill_bits: u8) -> Result<Self> {
        if payload.is_empty() {
            return Err(AisError::NoBinaryData { start: 0, end: 0 });
        }
        let mut bits = Vec::with_capacity(payload.len() * 6);
        for character in payload.chars() {
            let value = armor_to_sixbit(character)?;
            bits.extend((0..6).rev().map(|shift| (value >> shift) & 1 == 1));
        }
        let keep = bits.len().saturating_sub(usize::from(fill_bits.min(5)));
        bits.truncate(keep);
        Ok(Self { bits })
    }

    /// Re-armor the bits, zero-padding the last character if needed.
    pub fn to_payload(&self) -> String {
        self.bits
            .chunks(6)
            .map(|chunk| {
                let value = chunk
                    .iter()
                    .chain(std::iter::repeat(&false))
                    .take(6)
                    .fold(0u8, |acc, bit| (acc << 1) | u8::from(*bit));
                sixbit_to_armor(value)
            })
            .collect()
    }

    /// Number of bits held.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// `true` when no bits are held.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// `true` when the whole range `start..end` lies inside the buffer.
    pub fn contains_range(&self, start: usize, end: usize) -> bool {
        start < end && end <= self.bits.len()
    }

    fn range(&self, start: usize, end: usize) -> Result<&[bool]> {
        if !self.contains_range(start, end) {
            return Err(AisError::NoBinaryData { start, end });
        }
        Ok(&self.bits[start..end])
    }

    /// Read `start..end` as an unsigned integer.
    pub fn uint(&self, start: usize, end: usize) -> Result<u64> {
        Ok(self
            .range(start, end)?
            .iter()
            .fold(0u64, |acc, bit| (acc << 1) | u64::from(*bit)))
    }

    /// Read `start..end` as a two's complement signed integer.
    pub fn int(&self, start: usize, end: usize) -> Result<i64> {
        let width = self.range(start, end)?.len();
        let raw = self.uint(start, end)?;
        if width >= 64 || raw >> (width - 1) == 0 {
            return Ok(raw as i64);
        }
        Ok(raw as i64 - (1i64 << width))
    }

    /// Read the single bit at `index` as a flag.
    pub fn flag(&self, index: usize) -> Result<bool> {
        Ok(self.uint(index, index + 1)? == 1)
    }

    /// Read `start..end` as 6-bit ASCII, stripping trailing `@` fill.
    ///
    /// A trailing group of fewer than six bits is ignored.
    pub fn text(&self, start: usize, end: usize) -> Result<String> {
        let text: String = self
            .range(start, end)?
            .chunks_exact(6)
            .map(|chunk| {
                let code = chunk.iter().fold(0usize, |acc, bit| (acc << 1) | usize::from(*bit));
                char::from(SIXBIT_ASCII[code])
            })
            .collect();
        Ok(text.trim_end_matches('@').to_string())
    }

    /// Read variable-length text from `start` up to `end` or the buffer
    /// end, whichever comes first. `None` when no whole character fits.
    pub fn trailing_text(&self, start: usize, end: usize) -> Option<String> {
        let end = end.min(self.bits.len());
        if end < start + 6 {
            return None;
        }
        self.text(start, end).ok()
    }

    /// Like [`uint`](Self::uint), but `None` when the range holds no data.
    pub fn opt_uint(&self, start: usize, end: usize) -> Option<u64> {
        self.uint(start, end).ok()
    }

    /// Like [`int`](Self::int), but `None` when the range holds no data.
    pub fn opt_int(&self, start: usize, end: usize) -> Option<i64> {
        self.int(start, end).ok()
    }

    /// Like [`flag`](Self::flag), but `None` when the bit is missing.
    pub fn opt_flag(&self, index: usize) -> Option<bool> {
        self.flag(index).ok()
    }

    /// Like [`text`](Self::text), but `None` when the range holds no data.
    pub fn opt_text(&self, start: usize, end: usize) -> Option<String> {
        self.text(start, end).ok()
    }

    /// Copy `start..end` (truncated at the buffer end) into a new vector.
    pub fn slice(&self, start: usize, end: usize) -> BitVector {
        let end = end.min(self.bits.len());
        let start = start.min(end);
        BitVector {
            bits: self.bits[start..end].to_vec(),
        }
    }
}

impl FromIterator<bool> for BitVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Unpack an armored payload into bits. See [`BitVector::from_payload`].
pub fn payload_to_bits(payload: &str) -> Result<BitVector> {
    BitVector::from_payload(payload)
}

/// Re-armor a bit sequence. See [`BitVector::to_payload`].
pub fn bits_to_payload(bits: &BitVector) -> String {
    bits.to_payload()
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSITION_PAYLOAD: &str = "13P;Ruhvj1wj=0bNTU;up;=T80Rd";

    fn bits_of(pattern: &str) -> BitVector {
        pattern.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn every_sixbit_value_survives_armoring() {
        for value in 0u8..64 {
            assert_eq!(armor_to_sixbit(sixbit_to_armor(value)).unwrap(), value);
        }
    }

    #[test]
    fn payload_roundtrip_preserves_text() {
        let bits = payload_to_bits(POSITION_PAYLOAD).unwrap();
        assert_eq!(bits.len(), 6 * POSITION_PAYLOAD.len());
        assert_eq!(bits_to_payload(&bits), POSITION_PAYLOAD);
    }

    #[test]
    fn empty_payload_has_no_binary_data() {
        assert_eq!(
            payload_to_bits(""),
            Err(AisError::NoBinaryData { start: 0, end: 0 })
        );
    }

    #[test]
    fn characters_in_the_gap_are_rejected() {
        assert_eq!(
            payload_to_bits("1X"),
            Err(AisError::InvalidPayloadCharacter { character: 'X' })
        );
        assert!(payload_to_bits("1'").is_err());
    }

    #[test]
    fn fill_bits_shorten_the_buffer() {
        let bits = BitVector::from_payload_with_fill("0000", 2).unwrap();
        assert_eq!(bits.len(), 22);
    }

    #[test]
    fn reads_header_fields() {
        let bits = payload_to_bits(POSITION_PAYLOAD).unwrap();
        assert_eq!(bits.uint(0, 6).unwrap(), 1);
        assert_eq!(bits.uint(6, 8).unwrap(), 0);
        assert_eq!(bits.uint(8, 38).unwrap(), 235_070_199);
    }

    #[test]
    fn reads_signed_values() {
        let bits = bits_of("11111011");
        assert_eq!(bits.uint(0, 8).unwrap(), 251);
        assert_eq!(bits.int(0, 8).unwrap(), -5);
        assert_eq!(bits_of("0111").int(0, 4).unwrap(), 7);
        assert_eq!(bits_of("1000").int(0, 4).unwrap(), -8);
    }

    #[test]
    fn reads_sixbit_text_and_strips_fill() {
        // "AB" followed by two '@' fill characters
        let bits = bits_of("000001000010000000000000");
        assert_eq!(bits.text(0, 24).unwrap(), "AB");
    }

    #[test]
    fn partial_ranges_have_no_binary_data() {
        let bits = bits_of("1010");
        assert_eq!(bits.uint(2, 10), Err(AisError::NoBinaryData { start: 2, end: 10 }));
        assert_eq!(bits.opt_uint(2, 10), None);
        assert_eq!(bits.opt_int(0, 8), None);
        assert!(!bits.contains_range(2, 10));
        assert!(bits.contains_range(0, 4));
        assert_eq!(bits.int(0, 4).unwrap(), -6);
    }

    #[test]
    fn trailing_text_stops_at_buffer_end() {
        // "AB" then two spare bits
        let bits = bits_of("00000100001011");
        assert_eq!(bits.opt_text(0, 24), None);
        assert_eq!(bits.trailing_text(0, 24).as_deref(), Some("AB"));
        assert_eq!(bits.trailing_text(12, 24), None);
    }

    #[test]
    fn empty_ranges_have_no_binary_data() {
        let bits = bits_of("1010");
        assert_eq!(bits.uint(4, 8), Err(AisError::NoBinaryData { start: 4, end: 8 }));
        assert_eq!(bits.opt_uint(4, 8), None);
        assert_eq!(bits.opt_text(6, 12), None);
    }

    #[test]
    fn display_renders_binary_digits() {
        assert_eq!(payload_to_bits("1").unwrap().to_string(), "000001");
    }
}
