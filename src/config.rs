use crate::error::{Result, TsError};
use std::env;

/// Environment variable overriding [`DemuxerConfig::max_pes_size`].
pub const ENV_MAX_PES_SIZE: &str = "TSDEMUX_MAX_PES_SIZE";
/// Environment variable overriding [`DemuxerConfig::strict_pes_length`].
pub const ENV_STRICT_PES_LENGTH: &str = "TSDEMUX_STRICT_PES_LENGTH";

/// Default bound on one PID's reassembly buffer (16 MiB).
pub const DEFAULT_MAX_PES_SIZE: usize = 16 * 1024 * 1024;

/// Tunables for [`TSDemuxer`](crate::format::ts::TSDemuxer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemuxerConfig {
    /// Largest PES unit a single PID may accumulate before it is dropped.
    pub max_pes_size: usize,
    /// Accept `PES_packet_length == 0` only for video stream ids.
    pub strict_pes_length: bool,
}

impl Default for DemuxerConfig {
    fn default() -> Self {
        Self {
            max_pes_size: DEFAULT_MAX_PES_SIZE,
            strict_pes_length: false,
        }
    }
}

impl DemuxerConfig {
    /// Defaults, overridden by `TSDEMUX_MAX_PES_SIZE` and
    /// `TSDEMUX_STRICT_PES_LENGTH` when they are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DemuxerConfig::default();

        if let Some(value) = lookup(ENV_MAX_PES_SIZE) {
            config.max_pes_size = value.trim().parse()?;
        }

        if let Some(value) = lookup(ENV_STRICT_PES_LENGTH) {
            config.strict_pes_length = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                other => {
                    return Err(TsError::InvalidData(format!(
                        "{} must be a boolean, got '{}'",
                        ENV_STRICT_PES_LENGTH, other
                    )))
                }
            };
        }

        Ok(config)
    }

    /// Sets [`max_pes_size`](Self::max_pes_size).
    pub fn with_max_pes_size(mut self, max_pes_size: usize) -> Self {
        self.max_pes_size = max_pes_size;
        self
    }

    /// Sets [`strict_pes_length`](Self::strict_pes_length).
    pub fn with_strict_pes_length(mut self, strict: bool) -> Self {
        self.strict_pes_length = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = DemuxerConfig::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config, DemuxerConfig::default());
        assert_eq!(config.max_pes_size, DEFAULT_MAX_PES_SIZE);
        assert!(!config.strict_pes_length);
    }

    #[test]
    fn test_overrides() {
        let config = DemuxerConfig::from_lookup(lookup_in(&[
            (ENV_MAX_PES_SIZE, " 65536 "),
            (ENV_STRICT_PES_LENGTH, "TRUE"),
        ]))
        .unwrap();
        assert_eq!(config.max_pes_size, 65536);
        assert!(config.strict_pes_length);
    }

    #[test]
    fn test_invalid_overrides() {
        let result = DemuxerConfig::from_lookup(lookup_in(&[(ENV_MAX_PES_SIZE, "lots")]));
        assert!(matches!(result, Err(TsError::ParseInt(_))));

        let result = DemuxerConfig::from_lookup(lookup_in(&[(ENV_STRICT_PES_LENGTH, "maybe")]));
        assert!(matches!(result, Err(TsError::InvalidData(_))));
    }

    #[test]
    fn test_builder() {
        let config = DemuxerConfig::default()
            .with_max_pes_size(1024)
            .with_strict_pes_length(true);
        assert_eq!(config.max_pes_size, 1024);
        assert!(config.strict_pes_length);
    }
}
