//! Output bundle writers.
//!
//! | File | Contents |
//! |------|----------|
//! | `ais-messages.jsonl` | one decoded message per line, re-importable |
//! | `ais-messages.csv` | payload, MMSI, type, time and description |
//! | `vessel-data.json` | station info keyed by MMSI |
//! | `vessel-data.csv` | one full table row per station |
//! | `map.geojson` | latest position of each station |
//! | `summary.txt` | run and tracker statistics |

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use aisnmea_models::AisMessage;
use aisnmea_tracker::{Station, StationInfo, StationTracker, TIME_NOT_AVAILABLE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::pipeline::{RunOutput, RunSummary};

pub const MESSAGES_JSONL: &str = "ais-messages.jsonl";
pub const MESSAGES_CSV: &str = "ais-messages.csv";
pub const VESSEL_JSON: &str = "vessel-data.json";
pub const VESSEL_CSV: &str = "vessel-data.csv";
pub const MAP_GEOJSON: &str = "map.geojson";
pub const SUMMARY_TXT: &str = "summary.txt";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// One line of `ais-messages.jsonl`.
#[derive(Debug, Serialize)]
pub struct JsonlMessageRow<'a> {
    pub payload: &'a str,
    pub fill_bits: u8,
    pub rxtime: &'a str,
    pub decoded: &'a AisMessage,
}

/// One row of `ais-messages.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvMessageRow {
    #[serde(rename = "Payload")]
    pub payload: String,
    #[serde(rename = "MMSI")]
    pub mmsi: String,
    #[serde(rename = "MessageTypeNumber")]
    pub message_type: u8,
    #[serde(rename = "ReceivedTime")]
    pub received_time: String,
    #[serde(rename = "DetailedDescription")]
    pub detailed_description: String,
}

/// One position in a per-station CSV.
#[derive(Debug, Serialize)]
struct PositionRow {
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "CoG")]
    course: String,
    #[serde(rename = "Speed (knots)")]
    speed: String,
    #[serde(rename = "Heading")]
    heading: String,
    #[serde(rename = "Navigation Status")]
    nav_status: String,
    #[serde(rename = "Turn Rate")]
    turn_rate: String,
    #[serde(rename = "Destination")]
    destination: String,
    #[serde(rename = "ETA")]
    eta: String,
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| TIME_NOT_AVAILABLE.to_string(), |v| v.to_string())
}

fn received_time(message: &AisMessage) -> &str {
    message.received_time.as_deref().unwrap_or(TIME_NOT_AVAILABLE)
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write the overview bundle into `outdir`, creating it if needed.
pub fn write_overview(outdir: &Path, output: &RunOutput) -> Result<()> {
    fs::create_dir_all(outdir).with_context(|| format!("creating {}", outdir.display()))?;

    let mut jsonl = BufWriter::new(File::create(outdir.join(MESSAGES_JSONL))?);
    let mut messages_csv = csv::Writer::from_path(outdir.join(MESSAGES_CSV))?;
    for record in &output.records {
        let row = JsonlMessageRow {
            payload: &record.payload,
            fill_bits: record.fill_bits,
            rxtime: received_time(&record.message),
            decoded: &record.message,
        };
        serde_json::to_writer(&mut jsonl, &row)?;
        jsonl.write_all(b"\n")?;
        messages_csv.serialize(CsvMessageRow {
            payload: record.payload.clone(),
            mmsi: record.message.mmsi.to_string(),
            message_type: record.message.message_type,
            received_time: received_time(&record.message).to_string(),
            detailed_description: record.message.detailed_description(),
        })?;
    }
    jsonl.flush()?;
    messages_csv.flush()?;

    let tracker = &output.tracker;
    let vessels: BTreeMap<String, StationInfo> = tracker
        .stations()
        .map(|station| (station.mmsi().to_string(), station.station_info(false)))
        .collect();
    fs::write(outdir.join(VESSEL_JSON), serde_json::to_string_pretty(&vessels)?)?;

    let mut vessel_csv = csv::Writer::from_path(outdir.join(VESSEL_CSV))?;
    for row in tracker.table_data() {
        vessel_csv.serialize(row)?;
    }
    vessel_csv.flush()?;

    fs::write(
        outdir.join(MAP_GEOJSON),
        serde_json::to_string_pretty(&geojson(tracker)?)?,
    )?;
    let mut summary = String::new();
    write_summary(&mut summary, tracker, &output.summary)?;
    fs::write(outdir.join(SUMMARY_TXT), summary)?;

    info!(outdir = %outdir.display(), messages = output.records.len(), "overview written");
    Ok(())
}

/// Write `<outdir>/<mmsi>/<mmsi>.json` and `<mmsi>.csv` for every station.
pub fn write_station_dirs(outdir: &Path, tracker: &StationTracker) -> Result<usize> {
    let mut written = 0;
    for station in tracker.stations() {
        write_station(outdir, station)?;
        written += 1;
    }
    info!(stations = written, "station directories written");
    Ok(written)
}

fn write_station(outdir: &Path, station: &Station) -> Result<()> {
    let mmsi = station.mmsi().as_str();
    let dir = outdir.join(mmsi);
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    fs::write(
        dir.join(format!("{mmsi}.json")),
        serde_json::to_string_pretty(&station.station_info(true))?,
    )?;

    let mut positions = csv::Writer::from_path(dir.join(format!("{mmsi}.csv")))?;
    for position in station.positions() {
        positions.serialize(PositionRow {
            time: or_na(position.received_time.clone()),
            latitude: position.latitude,
            longitude: position.longitude,
            course: or_na(position.course),
            speed: or_na(position.speed),
            heading: position.heading_text(),
            nav_status: or_na(position.nav_status),
            turn_rate: or_na(position.turn_rate),
            destination: or_na(position.destination.clone()),
            eta: or_na(position.eta.clone()),
        })?;
    }
    positions.flush()?;
    Ok(())
}

fn geojson(tracker: &StationTracker) -> Result<Value> {
    let features = tracker
        .nav_table()
        .into_iter()
        .map(|row| {
            Ok(json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [row.longitude, row.latitude],
                },
                "properties": serde_json::to_value(&row)?,
            }))
        })
        .collect::<Result<Vec<Value>>>()?;
    Ok(json!({ "type": "FeatureCollection", "features": features }))
}

fn write_summary(
    text: &mut impl fmt::Write,
    tracker: &StationTracker,
    run: &RunSummary,
) -> fmt::Result {
    let stats = tracker.stats();
    writeln!(text, "Accepted messages: {}", run.accepted)?;
    writeln!(text, "Rejected records: {}", run.rejected)?;
    for (kind, count) in &run.rejected_by_kind {
        writeln!(text, "  {kind}: {count}")?;
    }
    if run.sentences.total_sentences > 0 {
        writeln!(
            text,
            "Sentences: {} ({} multi-sentence messages, {} incomplete)",
            run.sentences.total_sentences,
            run.sentences.multipart_reassembled,
            run.sentences.incomplete
        )?;
    }
    writeln!(text, "Total Unique Stations: {}", stats.total_stations)?;
    writeln!(text, "Total Messages Processed: {}", stats.total_messages)?;
    if let Some(times) = &stats.times {
        writeln!(text, "Started: {}", times.started)?;
        writeln!(text, "Finished: {}", times.finished)?;
    }
    if !stats.timing_sources.is_empty() {
        writeln!(text, "Timing Source MMSIs: {}", stats.timing_sources.join(", "))?;
    }
    for (title, counts) in [
        ("Message Stats", &stats.message_counts),
        ("AIS Station Types", &stats.station_classes),
        ("Ship Types", &stats.ship_types),
        ("Country Flags", &stats.flags),
    ] {
        writeln!(text, "\n{title}:")?;
        for (key, count) in counts {
            writeln!(text, "  {key}: {count}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::input::{read_input, InputFormat, InputRecord};
    use crate::pipeline::run;
    use aisnmea_models::Mmsi;
    use tempfile::TempDir;

    const CAPTURE: [&str; 8] = [
        "!AIVDM,1,1,,B,402=a`1vDo:00wTwO0O?Ph700000,0*1D",
        "!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0*42",
        "!AIVDM,2,1,5,A,53P:dJP2<10S8I@GH00l4p4pp4p000000000000`2Q<==5WBN813mAk0Dh00,0*08",
        "!AIVDM,2,2,5,A,00000000000,2*21",
        "!AIVDM,1,1,,B,402=a`1vDo:0:wTwO0O?Ph700000,0*17",
        "!AIVDM,1,1,,A,E>jHC=c6:W2h22R`@1:WdP00000Opa@H?KTcP10888e?B0,2*1F",
        "!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0*42",
        "!AIVDM,1,1,,A,13P;Ruhvj1dtSF0l4Q@=p;=T80Rd,0*70",
    ];

    fn decoded_capture() -> RunOutput {
        let records: Vec<InputRecord> = CAPTURE
            .iter()
            .map(|l| InputRecord::Sentence((*l).to_string()))
            .collect();
        run(&records, InputFormat::Text, &RunConfig::default())
    }

    #[test]
    fn overview_bundle_is_complete() {
        let dir = TempDir::new().unwrap();
        let output = decoded_capture();
        write_overview(dir.path(), &output).unwrap();

        for name in [MESSAGES_JSONL, MESSAGES_CSV, VESSEL_JSON, VESSEL_CSV, MAP_GEOJSON, SUMMARY_TXT] {
            assert!(dir.path().join(name).is_file(), "{name} missing");
        }

        let jsonl = fs::read_to_string(dir.path().join(MESSAGES_JSONL)).unwrap();
        assert_eq!(jsonl.lines().count(), 7);

        let vessels: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(VESSEL_JSON)).unwrap())
                .unwrap();
        assert_eq!(vessels["992351030"]["Name"], "LUNE DEEP BUOY");
        assert_eq!(vessels["002320800"]["Class"], "Base Station");

        let map: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(MAP_GEOJSON)).unwrap())
                .unwrap();
        assert_eq!(map["features"].as_array().unwrap().len(), 3);

        let summary = fs::read_to_string(dir.path().join(SUMMARY_TXT)).unwrap();
        assert!(summary.contains("Accepted messages: 7"));
        assert!(summary.contains("Timing Source MMSIs: 002320800"));
    }

    #[test]
    fn summary_lists_rejections_and_sentence_counts() {
        let mut records: Vec<InputRecord> = CAPTURE
            .iter()
            .map(|l| InputRecord::Sentence((*l).to_string()))
            .collect();
        records.push(InputRecord::Sentence(
            "!AIVDM,1,1,,A,13P;Ruhvj1wj=0bNTU;up;=T80Rd,0*43".into(),
        ));
        let output = run(&records, InputFormat::Text, &RunConfig::default());

        let mut summary = String::new();
        write_summary(&mut summary, &output.tracker, &output.summary).unwrap();
        assert!(summary.starts_with("Accepted messages: 7\nRejected records: 1\n"));
        assert!(summary.contains("  ChecksumFailed: 1\n"));
        assert!(summary.contains("Sentences: 8 (1 multi-sentence messages, 0 incomplete)"));
        assert!(summary.contains("\nCountry Flags:\n"));
    }

    #[test]
    fn messages_csv_has_fixed_columns() {
        let dir = TempDir::new().unwrap();
        write_overview(dir.path(), &decoded_capture()).unwrap();
        let mut reader = csv::Reader::from_path(dir.path().join(MESSAGES_CSV)).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            ["Payload", "MMSI", "MessageTypeNumber", "ReceivedTime", "DetailedDescription"]
        );
        let first: CsvMessageRow = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(first.mmsi, "002320800");
        assert_eq!(first.message_type, 4);
        assert_eq!(first.received_time, "2021/03/14 10:00:00 (estimated)");
    }

    #[test]
    fn jsonl_round_trip_reproduces_positions() {
        let dir = TempDir::new().unwrap();
        let first = decoded_capture();
        write_overview(dir.path(), &first).unwrap();

        let records = read_input(&dir.path().join(MESSAGES_JSONL), InputFormat::Jsonl).unwrap();
        let second = run(&records, InputFormat::Jsonl, &RunConfig::default());

        assert_eq!(second.summary.accepted, first.summary.accepted);
        for station in first.tracker.stations() {
            let again = second.tracker.station(station.mmsi()).unwrap();
            assert_eq!(again.positions(), station.positions());
            assert_eq!(again.class(), station.class());
        }
    }

    #[test]
    fn station_directories_hold_json_and_csv() {
        let dir = TempDir::new().unwrap();
        let output = decoded_capture();
        let written = write_station_dirs(dir.path(), &output.tracker).unwrap();
        assert_eq!(written, output.tracker.len());

        let station_dir = dir.path().join("235070199");
        let info: Value = serde_json::from_str(
            &fs::read_to_string(station_dir.join("235070199.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(info["Positions"].as_array().unwrap().len(), 2);

        let mut reader = csv::Reader::from_path(station_dir.join("235070199.csv")).unwrap();
        assert_eq!(reader.records().count(), 2);
        assert!(output.tracker.station(&Mmsi::new("235070199")).is_some());
    }
}
