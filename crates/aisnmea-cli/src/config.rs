//! Run configuration.
//!
//! Built from environment variables at startup, then extended by command
//! line flags.

use aisnmea_models::Mmsi;
use anyhow::{Context, Result};

/// Environment variable listing trusted timing sources.
pub const TIMING_SOURCES_VAR: &str = "AISNMEA_TIMING_SOURCES";

/// Settings for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Base stations whose UTC broadcasts date untimestamped messages.
    pub timing_sources: Vec<Mmsi>,
    /// Write one sub-directory per station as well as the overview.
    pub per_station: bool,
}

impl RunConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable                 | Default | Description                        |
    /// |--------------------------|---------|------------------------------------|
    /// | `AISNMEA_TIMING_SOURCES` | empty   | comma-separated timing source MMSIs |
    pub fn from_env() -> Result<Self> {
        let timing_sources = match std::env::var(TIMING_SOURCES_VAR) {
            Ok(list) => parse_mmsi_list(&list)
                .with_context(|| format!("invalid {TIMING_SOURCES_VAR}"))?,
            Err(_) => Vec::new(),
        };
        Ok(Self {
            timing_sources,
            per_station: false,
        })
    }

    /// Add timing sources given on the command line, skipping duplicates.
    pub fn with_timing_sources(mut self, extra: impl IntoIterator<Item = Mmsi>) -> Self {
        for mmsi in extra {
            if !self.timing_sources.contains(&mmsi) {
                self.timing_sources.push(mmsi);
            }
        }
        self
    }
}

/// Parse a comma-separated MMSI list. Blank entries are ignored.
pub fn parse_mmsi_list(list: &str) -> Result<Vec<Mmsi>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<Mmsi>()
                .with_context(|| format!("not an MMSI: {entry:?}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmsi_list_is_padded_and_trimmed() {
        let list = parse_mmsi_list(" 2320800, 002320801 ,,").unwrap();
        assert_eq!(list, vec![Mmsi::new("002320800"), Mmsi::new("002320801")]);
    }

    #[test]
    fn bad_mmsi_is_rejected() {
        assert!(parse_mmsi_list("2320800,abc").is_err());
        assert!(parse_mmsi_list("0").is_err());
    }

    #[test]
    fn command_line_sources_extend_env_sources() {
        let config = RunConfig {
            timing_sources: vec![Mmsi::new("002320800")],
            per_station: false,
        }
        .with_timing_sources([Mmsi::new("002320800"), Mmsi::new("002320801")]);
        assert_eq!(config.timing_sources.len(), 2);
    }
}
