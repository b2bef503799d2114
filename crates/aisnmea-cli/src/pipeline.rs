//! Batch decoding: input records through the reassembler and into a
//! station tracker, counting what was accepted and rejected.

use std::collections::BTreeMap;

use aisnmea_models::{AisError, AisMessage, Mmsi, Reassembler, SentenceStats};
use aisnmea_tracker::{BaseStationTracker, StationTracker};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::input::{InputFormat, InputRecord};

/// A decoded message with the payload it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub payload: String,
    pub fill_bits: u8,
    /// Carries the effective received time.
    pub message: AisMessage,
}

/// Accepted and rejected counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub accepted: usize,
    pub rejected: usize,
    /// Rejections per error kind, sentence and decode errors alike.
    pub rejected_by_kind: BTreeMap<String, usize>,
    pub sentences: SentenceStats,
}

impl RunSummary {
    fn reject(&mut self, err: &AisError) {
        debug!(kind = err.kind(), error = %err, "record rejected");
        self.rejected += 1;
        *self
            .rejected_by_kind
            .entry(err.kind().to_string())
            .or_default() += 1;
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub tracker: StationTracker,
    pub records: Vec<DecodedRecord>,
    pub summary: RunSummary,
}

/// The base station with the most well-formed UTC reports in a text
/// capture, if any.
pub fn discover_timing_source(records: &[InputRecord]) -> Option<Mmsi> {
    let mut reassembler = Reassembler::new();
    let mut base_stations = BaseStationTracker::new();
    for record in records {
        let InputRecord::Sentence(line) = record else {
            continue;
        };
        let Ok(Some(assembled)) = reassembler.accept(line) else {
            continue;
        };
        if let Err(err) =
            base_stations.ingest_with_fill(&assembled.payload, assembled.fill_bits, None)
        {
            debug!(error = %err, "pre-pass skipped message");
        }
    }
    let (mmsi, reports) = base_stations.timing_candidates().into_iter().next()?;
    info!(mmsi = %mmsi, reports, "timing source discovered");
    Some(mmsi)
}

/// Decode every record into a fresh tracker.
///
/// Plain text captures with no configured timing source get a pre-pass
/// that picks one.
pub fn run(records: &[InputRecord], format: InputFormat, config: &RunConfig) -> RunOutput {
    let mut timing_sources = config.timing_sources.clone();
    if timing_sources.is_empty() && format == InputFormat::Text {
        timing_sources.extend(discover_timing_source(records));
    }

    let mut output = RunOutput {
        tracker: StationTracker::with_timing_sources(timing_sources),
        ..RunOutput::default()
    };
    let mut reassembler = Reassembler::new();

    for record in records {
        let (payload, fill_bits, decoded) = match record {
            InputRecord::Sentence(line) => match reassembler.accept(line) {
                Ok(Some(assembled)) => {
                    let decoded = output.tracker.ingest_assembled(&assembled, None);
                    (assembled.payload, assembled.fill_bits, decoded)
                }
                Ok(None) => continue,
                Err(err) => {
                    output.summary.reject(&err);
                    continue;
                }
            },
            InputRecord::Payload {
                payload,
                fill_bits,
                rxtime,
            } => {
                let decoded =
                    output
                        .tracker
                        .ingest_with_fill(payload, *fill_bits, rxtime.as_deref());
                (payload.clone(), *fill_bits, decoded)
            }
        };
        match decoded {
            Ok(message) => {
                output.summary.accepted += 1;
                output.records.push(DecodedRecord {
                    payload,
                    fill_bits,
                    message,
                });
            }
            Err(err) => output.summary.reject(&err),
        }
    }

    if reassembler.pending() > 0 {
        debug!(pending = reassembler.pending(), "unfinished multi-sentence messages dropped");
    }
    output.summary.sentences = reassembler.stats().clone();
    info!(
        accepted = output.summary.accepted,
        rejected = output.summary.rejected,
        stations = output.tracker.len(),
        "capture decoded"
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(lines: &[&str]) -> Vec<InputRecord> {
        lines.iter().map(|l| InputRecord::Sentence((*l).to_string())).collect()
    }

    const S1: &str = "!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0*42";
    const S2: [&str; 2] = [
        "!AIVDM,2,1,5,A,53P:dJP2<10S8I@GH00l4p4pp4p000000000000`2Q<==5WBN813mAk0Dh00,0*08",
        "!AIVDM,2,2,5,A,00000000000,2*21",
    ];
    const BASE_STATION: [&str; 4] = [
        "!AIVDM,1,1,,B,402=a`1vDo:00wTwO0O?Ph700000,0*1D",
        "!AIVDM,1,1,,B,402=a`1vDo:0:wTwO0O?Ph700000,0*17",
        "!AIVDM,1,1,,B,402=a`1vDo:0DwTwO0O?Ph700000,0*69",
        "!AIVDM,1,1,,B,402=a`1vDo:0NwTwO0O?Ph700000,0*63",
    ];

    #[test]
    fn counts_accepted_and_rejected() {
        let records = sentences(&[
            S1,
            "!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0*43",
            "!AIVDM,1,1,,A,1000000vj1wj=0bNTU;up;=T80Rd,0*55",
            S2[0],
            S2[1],
        ]);
        let output = run(&records, InputFormat::Text, &RunConfig::default());
        assert_eq!(output.summary.accepted, 2);
        assert_eq!(output.summary.rejected, 2);
        assert_eq!(output.summary.rejected_by_kind["ChecksumFailed"], 1);
        assert_eq!(output.summary.rejected_by_kind["InvalidMMSI"], 1);
        assert_eq!(output.summary.sentences.multipart_reassembled, 1);
        assert_eq!(output.tracker.len(), 2);
        assert_eq!(output.records[1].fill_bits, 2);
    }

    #[test]
    fn text_capture_discovers_timing_source() {
        let mut lines = BASE_STATION.to_vec();
        lines.push(S1);
        let output = run(&sentences(&lines), InputFormat::Text, &RunConfig::default());
        assert!(output.tracker.timing_sources().contains(&Mmsi::new("002320800")));
        assert_eq!(output.tracker.timings().len(), 4);
        assert_eq!(
            output.records[4].message.received_time.as_deref(),
            Some("2021/03/14 10:00:30 (estimated)")
        );
    }

    #[test]
    fn configured_source_skips_discovery() {
        let config = RunConfig {
            timing_sources: vec![Mmsi::new("002320801")],
            per_station: false,
        };
        let output = run(&sentences(&BASE_STATION), InputFormat::Text, &config);
        assert!(output.tracker.timings().is_empty());
        assert_eq!(output.tracker.timing_sources().len(), 1);
    }

    #[test]
    fn payload_records_keep_their_times() {
        let records = vec![InputRecord::Payload {
            payload: "13P;Ruhvj1wj=0bNTU;up;=T80Rd".into(),
            fill_bits: 0,
            rxtime: Some("2021/03/14 10:00:00".into()),
        }];
        let output = run(&records, InputFormat::Jsonl, &RunConfig::default());
        assert_eq!(output.tracker.timings(), ["2021/03/14 10:00:00"]);
        assert_eq!(output.summary.sentences, SentenceStats::default());
    }

    #[test]
    fn no_base_stations_no_source() {
        assert_eq!(discover_timing_source(&sentences(&[S1])), None);
    }
}
