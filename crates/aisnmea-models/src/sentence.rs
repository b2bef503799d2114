//! NMEA 0183 `!AIVDM` / `!AIVDO` sentences and multi-fragment reassembly.
//!
//! [`Fragment`] validates one sentence line (shape, then checksum).
//! [`Reassembler`] buffers fragments of multi-sentence messages keyed by
//! their sequence id and hands back a complete payload once the last
//! fragment arrives.
//!
//! The reassembler is single-threaded and keeps no timers: partial
//! messages stay buffered until completed or until [`Reassembler::reset`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AisError, Result};

lazy_static! {
    static ref SENTENCE_RE: Regex = Regex::new(
        r"^!(AIVD[MO]),([1-9]),([1-9]),([0-9]*),([AB12]?),([0-9:;<=>?@A-W`a-w]+),([0-5])\*([0-9A-Fa-f]{2})$"
    )
    .expect("sentence pattern is valid");
}

/// XOR of every character of a sentence body (the text between `!` and `*`).
///
/// # Examples
///
/// ```
/// use aisnmea_models::sentence::nmea_checksum;
///
/// assert_eq!(nmea_checksum("AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0"), 0x42);
/// ```
pub fn nmea_checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, b| acc ^ b)
}

// ---------------------------------------------------------------------------
// SentenceKind / Channel
// ---------------------------------------------------------------------------

/// Whether the sentence reports another station or own vessel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum SentenceKind {
    /// Messages received from other stations.
    #[strum(serialize = "AIVDM")]
    Vdm,
    /// Messages about the receiving station's own vessel.
    #[strum(serialize = "AIVDO")]
    Vdo,
}

/// The VHF channel a sentence was received on.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum Channel {
    /// AIS 1 (161.975 MHz).
    #[strum(to_string = "A", serialize = "1")]
    A,
    /// AIS 2 (162.025 MHz).
    #[strum(to_string = "B", serialize = "2")]
    B,
}

// ---------------------------------------------------------------------------
// Fragment
// ---------------------------------------------------------------------------

/// One validated NMEA sentence carrying (part of) an AIS payload.
///
/// # Examples
///
/// ```
/// use aisnmea_models::Fragment;
///
/// let fragment: Fragment = "!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0*42".parse().unwrap();
/// assert_eq!(fragment.fragment_count, 1);
/// assert_eq!(fragment.payload, "13P;Ruhvj1wj=0bNTU;up;=T80Rd");
///
/// assert!("!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0*43".parse::<Fragment>().is_err());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// `AIVDM` or `AIVDO`.
    pub kind: SentenceKind,
    /// Number of sentences the message spans (1–9).
    pub fragment_count: u8,
    /// 1-based position of this sentence within the message.
    pub fragment_index: u8,
    /// Sequential message id; empty for most single-sentence messages.
    pub sequence_id: String,
    /// Radio channel, when the receiver reports one.
    pub channel: Option<Channel>,
    /// Armored payload characters.
    pub payload: String,
    /// Number of pad bits at the end of the payload (0–5).
    pub fill_bits: u8,
    /// Checksum carried by the sentence.
    pub checksum: u8,
}

impl Fragment {
    /// Parse and validate a single sentence line.
    ///
    /// Surrounding whitespace (including CR/LF) is ignored. A line that does
    /// not match the sentence grammar fails with
    /// [`AisError::InvalidSentence`]; a bad checksum with
    /// [`AisError::ChecksumFailed`].
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let invalid = |reason: &str| AisError::InvalidSentence {
            line: line.to_string(),
            reason: reason.to_string(),
        };
        let caps = SENTENCE_RE
            .captures(line)
            .ok_or_else(|| invalid("does not match !AIVDM/!AIVDO sentence grammar"))?;

        let fragment_count: u8 = caps[2].parse().map_err(|_| invalid("bad fragment count"))?;
        let fragment_index: u8 = caps[3].parse().map_err(|_| invalid("bad fragment index"))?;
        if fragment_index > fragment_count {
            return Err(invalid("fragment index exceeds fragment count"));
        }

        let checksum =
            u8::from_str_radix(&caps[8], 16).map_err(|_| invalid("bad checksum digits"))?;
        let body = &line[1..line.len() - 3];
        let computed = nmea_checksum(body);
        if computed != checksum {
            return Err(AisError::ChecksumFailed {
                line: line.to_string(),
                expected: checksum,
                computed,
            });
        }

        Ok(Self {
            kind: caps[1].parse().map_err(|_| invalid("bad sentence type"))?,
            fragment_count,
            fragment_index,
            sequence_id: caps[4].to_string(),
            channel: match &caps[5] {
                "" => None,
                ch => Some(ch.parse().map_err(|_| invalid("bad channel"))?),
            },
            payload: caps[6].to_string(),
            fill_bits: caps[7].parse().map_err(|_| invalid("bad fill bits"))?,
            checksum,
        })
    }

    /// Render the fragment back into a sentence line with a fresh checksum.
    pub fn to_sentence(&self) -> String {
        let body = format!(
            "{},{},{},{},{},{},{}",
            self.kind,
            self.fragment_count,
            self.fragment_index,
            self.sequence_id,
            self.channel.map(|c| c.to_string()).unwrap_or_default(),
            self.payload,
            self.fill_bits
        );
        format!("!{body}*{:02X}", nmea_checksum(&body))
    }
}

impl FromStr for Fragment {
    type Err = AisError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sentence())
    }
}

// ---------------------------------------------------------------------------
// AssembledMessage
// ---------------------------------------------------------------------------

/// A payload ready for decoding, produced by the [`Reassembler`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AssembledMessage {
    /// `AIVDM` or `AIVDO`.
    pub kind: SentenceKind,
    /// Channel of the first fragment received.
    pub channel: Option<Channel>,
    /// Concatenated armored payload.
    pub payload: String,
    /// Pad bits at the end of the payload.
    pub fill_bits: u8,
    /// Number of sentences the message was announced to span.
    pub fragment_count: u8,
    /// `false` when this is a best-effort first fragment of a message
    /// whose other fragments went missing.
    pub complete: bool,
}

// ---------------------------------------------------------------------------
// Reassembler
// ---------------------------------------------------------------------------

/// Counters kept by the [`Reassembler`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceStats {
    /// Valid sentences accepted.
    pub total_sentences: usize,
    /// Multi-sentence messages reassembled with every fragment present.
    pub multipart_reassembled: usize,
    /// Multi-sentence messages completed with gaps.
    pub incomplete: usize,
    /// Accepted sentences per channel (`"Unknown"` when not reported).
    pub channels: BTreeMap<String, usize>,
    /// Rejected lines per error kind.
    pub rejected: BTreeMap<String, usize>,
}

#[derive(Debug)]
struct AssemblySlot {
    fragment_count: u8,
    fragments: Vec<Option<Fragment>>,
}

impl AssemblySlot {
    fn new(fragment_count: u8) -> Self {
        Self {
            fragment_count,
            fragments: vec![None; usize::from(fragment_count)],
        }
    }

    fn is_full(&self) -> bool {
        self.fragments.iter().all(Option::is_some)
    }

    fn missing(&self) -> Vec<u8> {
        (1..=self.fragment_count)
            .zip(&self.fragments)
            .filter(|(_, f)| f.is_none())
            .map(|(index, _)| index)
            .collect()
    }
}

/// Turns a stream of sentence lines into complete payloads.
///
/// # Examples
///
/// ```
/// use aisnmea_models::Reassembler;
///
/// let mut reassembler = Reassembler::new();
/// let first = "!AIVDM,2,1,5,A,53P:dJP2<10S8I@GH00l4p4pp4p000000000000`2Q<==5WBN813mAk0Dh00,0*08";
/// let last = "!AIVDM,2,2,5,A,00000000000,2*21";
///
/// assert!(reassembler.accept(first).unwrap().is_none());
/// let message = reassembler.accept(last).unwrap().expect("complete");
/// assert_eq!(message.payload.len(), 71);
/// assert_eq!(message.fill_bits, 2);
/// ```
#[derive(Debug, Default)]
pub struct Reassembler {
    slots: HashMap<String, AssemblySlot>,
    stats: SentenceStats,
}

impl Reassembler {
    /// Create an empty reassembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one sentence line.
    ///
    /// Returns the payload to decode once a message is complete, `None`
    /// while fragments are still buffered. Invalid lines are counted in
    /// [`SentenceStats::rejected`] and returned as errors.
    pub fn accept(&mut self, line: &str) -> Result<Option<AssembledMessage>> {
        match Fragment::parse(line) {
            Ok(fragment) => Ok(self.accept_fragment(fragment)),
            Err(err) => {
                debug!(error = %err, "sentence rejected");
                *self.stats.rejected.entry(err.kind().to_string()).or_default() += 1;
                Err(err)
            }
        }
    }

    /// Feed an already validated fragment.
    pub fn accept_fragment(&mut self, fragment: Fragment) -> Option<AssembledMessage> {
        if fragment.fragment_index == 0 || fragment.fragment_index > fragment.fragment_count {
            debug!(index = fragment.fragment_index, count = fragment.fragment_count, "fragment index out of range");
            return None;
        }
        self.stats.total_sentences += 1;
        let channel = fragment
            .channel
            .map(|c| c.to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        *self.stats.channels.entry(channel).or_default() += 1;

        if fragment.fragment_count == 1 {
            return Some(AssembledMessage {
                kind: fragment.kind,
                channel: fragment.channel,
                payload: fragment.payload,
                fill_bits: fragment.fill_bits,
                fragment_count: 1,
                complete: true,
            });
        }

        let key = fragment.sequence_id.clone();
        let index = usize::from(fragment.fragment_index - 1);
        let is_final = fragment.fragment_index == fragment.fragment_count;

        let stale = self.slots.get(&key).is_some_and(|slot| {
            slot.fragment_count != fragment.fragment_count
                || slot.fragments[index].is_some()
        });
        if stale {
            debug!(sequence_id = %key, "discarding stale partial message");
            self.slots.remove(&key);
        }
        let existed = self.slots.contains_key(&key);

        let slot = self
            .slots
            .entry(key.clone())
            .or_insert_with(|| AssemblySlot::new(fragment.fragment_count));
        slot.fragments[index] = Some(fragment);

        if slot.is_full() {
            let slot = self.slots.remove(&key)?;
            self.stats.multipart_reassembled += 1;
            return Some(Self::concatenate(slot));
        }
        // Without fragment 1 there is nothing to emit: keep waiting for it.
        if is_final && existed && slot.fragments[0].is_some() {
            let slot = self.slots.remove(&key)?;
            return self.best_effort(&key, slot);
        }
        None
    }

    fn concatenate(slot: AssemblySlot) -> AssembledMessage {
        let fragments: Vec<Fragment> = slot.fragments.into_iter().flatten().collect();
        let first = &fragments[0];
        let last = &fragments[fragments.len() - 1];
        AssembledMessage {
            kind: first.kind,
            channel: first.channel,
            payload: fragments.iter().map(|f| f.payload.as_str()).collect(),
            fill_bits: last.fill_bits,
            fragment_count: slot.fragment_count,
            complete: true,
        }
    }

    fn best_effort(&mut self, key: &str, slot: AssemblySlot) -> Option<AssembledMessage> {
        let err = AisError::MissingFragment {
            sequence_id: key.to_string(),
            missing: slot.missing(),
        };
        let fragment_count = slot.fragment_count;
        let first = slot.fragments.into_iter().next().flatten()?;
        warn!(error = %err, "emitting first fragment only");
        self.stats.incomplete += 1;
        Some(AssembledMessage {
            kind: first.kind,
            channel: first.channel,
            payload: first.payload,
            fill_bits: first.fill_bits,
            fragment_count,
            complete: false,
        })
    }

    /// Drop every buffered partial message. Counters are kept.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Number of partial messages currently buffered.
    pub fn pending(&self) -> usize {
        self.slots.len()
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> &SentenceStats {
        &self.stats
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = "!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0*42";
    const TYPE5_FIRST: &str =
        "!AIVDM,2,1,5,A,53P:dJP2<10S8I@GH00l4p4pp4p000000000000`2Q<==5WBN813mAk0Dh00,0*08";
    const TYPE5_LAST: &str = "!AIVDM,2,2,5,A,00000000000,2*21";

    fn multipart(count: u8, index: u8, seq: &str, payload: &str) -> String {
        Fragment {
            kind: SentenceKind::Vdm,
            fragment_count: count,
            fragment_index: index,
            sequence_id: seq.to_string(),
            channel: Some(Channel::B),
            payload: payload.to_string(),
            fill_bits: 0,
            checksum: 0,
        }
        .to_sentence()
    }

    #[test]
    fn parses_single_sentence() {
        let fragment = Fragment::parse(SINGLE).unwrap();
        assert_eq!(fragment.kind, SentenceKind::Vdm);
        assert_eq!(fragment.fragment_index, 1);
        assert_eq!(fragment.sequence_id, "");
        assert_eq!(fragment.channel, Some(Channel::A));
        assert_eq!(fragment.fill_bits, 0);
        assert_eq!(fragment.checksum, 0x42);
        assert_eq!(fragment.to_sentence(), SINGLE);
    }

    #[test]
    fn tolerates_line_endings_and_own_vessel() {
        let fragment = Fragment::parse(&format!("{SINGLE}\r\n")).unwrap();
        assert_eq!(fragment.payload, "13P;Ruhvj1wj=0bNTU;up;=T80Rd");

        let mut own = fragment.clone();
        own.kind = SentenceKind::Vdo;
        own.channel = None;
        let reparsed = Fragment::parse(&own.to_sentence()).unwrap();
        assert_eq!(reparsed.kind, SentenceKind::Vdo);
        assert_eq!(reparsed.channel, None);

        // the talker is covered by the checksum
        let retagged = SINGLE.replace("AIVDM", "AIVDO");
        assert!(matches!(Fragment::parse(&retagged), Err(AisError::ChecksumFailed { .. })));
    }

    #[test]
    fn numeric_channels_map_to_a_and_b() {
        let line = SINGLE.replace(",A,", ",1,");
        let body = &line[1..line.len() - 3];
        let line = format!("!{body}*{:02X}", nmea_checksum(body));
        assert_eq!(Fragment::parse(&line).unwrap().channel, Some(Channel::A));
    }

    #[test]
    fn rejects_malformed_sentences() {
        for line in [
            "",
            "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47",
            "!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0",
            "!AIVDM,1,1,,C,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0*42",
            "!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,6*42",
        ] {
            assert!(
                matches!(Fragment::parse(line), Err(AisError::InvalidSentence { .. })),
                "{line}"
            );
        }
    }

    #[test]
    fn rejects_index_beyond_count() {
        let line = multipart(2, 3, "1", "13P;");
        assert!(matches!(Fragment::parse(&line), Err(AisError::InvalidSentence { .. })));
    }

    #[test]
    fn rejects_bad_checksum() {
        let err = Fragment::parse("!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0*43").unwrap_err();
        assert_eq!(
            err,
            AisError::ChecksumFailed {
                line: "!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0*43".into(),
                expected: 0x43,
                computed: 0x42,
            }
        );
    }

    #[test]
    fn single_bit_flip_changes_checksum() {
        let body = "AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0";
        let original = nmea_checksum(body);
        for (i, b) in body.bytes().enumerate() {
            for bit in 0..7 {
                let mut flipped = body.as_bytes().to_vec();
                flipped[i] = b ^ (1 << bit);
                let flipped = String::from_utf8_lossy(&flipped).to_string();
                assert_ne!(nmea_checksum(&flipped), original);
            }
        }
    }

    #[test]
    fn single_sentence_is_emitted_immediately() {
        let mut reassembler = Reassembler::new();
        let message = reassembler.accept(SINGLE).unwrap().unwrap();
        assert_eq!(message.payload, "13P;Ruhvj1wj=0bNTU;up;=T80Rd");
        assert!(message.complete);
        assert_eq!(reassembler.stats().total_sentences, 1);
        assert_eq!(reassembler.stats().channels["A"], 1);
        assert_eq!(reassembler.pending(), 0);
    }

    #[test]
    fn two_fragments_are_concatenated() {
        let mut reassembler = Reassembler::new();
        assert_eq!(reassembler.accept(TYPE5_FIRST).unwrap(), None);
        assert_eq!(reassembler.pending(), 1);
        let message = reassembler.accept(TYPE5_LAST).unwrap().unwrap();
        assert!(message.payload.starts_with("53P:dJP2"));
        assert!(message.payload.ends_with("Dh0000000000000"));
        assert_eq!(message.fill_bits, 2);
        assert_eq!(message.fragment_count, 2);
        assert!(message.complete);
        assert_eq!(reassembler.stats().multipart_reassembled, 1);
        assert_eq!(reassembler.pending(), 0);
    }

    #[test]
    fn interleaved_sequences_coexist() {
        let mut reassembler = Reassembler::new();
        assert!(reassembler.accept(&multipart(2, 1, "1", "AAAA")).unwrap().is_none());
        assert!(reassembler.accept(&multipart(2, 1, "2", "BBBB")).unwrap().is_none());
        assert_eq!(reassembler.pending(), 2);
        let two = reassembler.accept(&multipart(2, 2, "2", "bb")).unwrap().unwrap();
        assert_eq!(two.payload, "BBBBbb");
        let one = reassembler.accept(&multipart(2, 2, "1", "aa")).unwrap().unwrap();
        assert_eq!(one.payload, "AAAAaa");
    }

    #[test]
    fn out_of_order_fragments_complete_when_all_present() {
        let mut reassembler = Reassembler::new();
        assert!(reassembler.accept(&multipart(3, 2, "7", "22")).unwrap().is_none());
        assert!(reassembler.accept(&multipart(3, 3, "7", "33")).unwrap().is_none());
        let message = reassembler.accept(&multipart(3, 1, "7", "11")).unwrap().unwrap();
        assert_eq!(message.payload, "112233");
        assert!(message.complete);
    }

    #[test]
    fn missing_first_fragment_keeps_the_slot_open() {
        let mut reassembler = Reassembler::new();
        assert!(reassembler.accept(&multipart(3, 2, "8", "22")).unwrap().is_none());
        assert!(reassembler.accept(&multipart(3, 3, "8", "33")).unwrap().is_none());
        assert_eq!(reassembler.pending(), 1);
        assert_eq!(reassembler.stats().incomplete, 0);

        let message = reassembler.accept(&multipart(3, 1, "8", "11")).unwrap().unwrap();
        assert_eq!(message.payload, "112233");
        assert_eq!(reassembler.pending(), 0);
        assert_eq!(reassembler.stats().multipart_reassembled, 1);
    }

    #[test]
    fn reused_sequence_id_replaces_a_slot_missing_its_start() {
        let mut reassembler = Reassembler::new();
        assert!(reassembler.accept(&multipart(2, 2, "9", "lost")).unwrap().is_none());
        assert!(reassembler.accept(&multipart(2, 2, "9", "tail")).unwrap().is_none());
        assert_eq!(reassembler.pending(), 1);
        let message = reassembler.accept(&multipart(2, 1, "9", "head")).unwrap().unwrap();
        assert_eq!(message.payload, "headtail");
        assert_eq!(reassembler.pending(), 0);
    }

    #[test]
    fn gap_emits_first_fragment_as_best_effort() {
        let mut reassembler = Reassembler::new();
        assert!(reassembler.accept(&multipart(3, 1, "4", "11")).unwrap().is_none());
        let message = reassembler.accept(&multipart(3, 3, "4", "33")).unwrap().unwrap();
        assert_eq!(message.payload, "11");
        assert!(!message.complete);
        assert_eq!(reassembler.stats().incomplete, 1);
        assert_eq!(reassembler.pending(), 0);
    }

    #[test]
    fn repeated_first_fragment_restarts_the_slot() {
        let mut reassembler = Reassembler::new();
        assert!(reassembler.accept(&multipart(2, 1, "3", "old")).unwrap().is_none());
        assert!(reassembler.accept(&multipart(2, 1, "3", "new")).unwrap().is_none());
        let message = reassembler.accept(&multipart(2, 2, "3", "end")).unwrap().unwrap();
        assert_eq!(message.payload, "newend");
    }

    #[test]
    fn rejected_lines_are_counted_and_reset_clears_partials() {
        let mut reassembler = Reassembler::new();
        assert!(reassembler.accept("garbage").is_err());
        assert!(reassembler
            .accept("!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0*43")
            .is_err());
        assert!(reassembler.accept(TYPE5_FIRST).unwrap().is_none());
        reassembler.reset();
        assert_eq!(reassembler.pending(), 0);
        // the orphaned last fragment now opens a fresh slot and waits
        assert!(reassembler.accept(TYPE5_LAST).unwrap().is_none());
        let stats = reassembler.stats();
        assert_eq!(stats.rejected["InvalidSentence"], 1);
        assert_eq!(stats.rejected["ChecksumFailed"], 1);
        assert_eq!(stats.total_sentences, 2);
    }
}
