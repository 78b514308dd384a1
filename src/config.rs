use crate::error::{ChopError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default silence threshold used by the flag-driven CLI.
pub const DEFAULT_SILENCE_THRESH_DB: f32 = -40.0;

/// Default silence threshold offered by the interactive wizard.
pub const INTERACTIVE_SILENCE_THRESH_DB: f32 = -60.0;

/// Splitting parameters threaded through the whole pipeline.
///
/// A value of this type is immutable once built; the batch runner clones it
/// per file so worker tasks never share mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChopConfig {
    /// Minimum silent-run length that qualifies as a split boundary (ms).
    pub min_silence_len: u64,
    /// dBFS threshold below which audio counts as silence.
    pub silence_thresh: f32,
    /// Minimum acceptable chunk duration before padding is forced (s).
    pub min_sec: u64,
    /// Maximum acceptable chunk duration before forced splitting (s).
    pub max_sec: u64,
    /// Duration short chunks are padded up to (s).
    pub ideal_pad_sec: u64,
    /// Fade duration applied at every cut or merge boundary (ms).
    pub fade_ms: u64,
    /// Silence inserted between merged segments (ms).
    pub gap_ms: u64,
    /// File-level parallelism; `None` means all available CPUs.
    pub workers: Option<usize>,
}

impl Default for ChopConfig {
    fn default() -> Self {
        Self {
            min_silence_len: 300,
            silence_thresh: DEFAULT_SILENCE_THRESH_DB,
            min_sec: 1,
            max_sec: 5,
            ideal_pad_sec: 4,
            fade_ms: 10,
            gap_ms: 100,
            workers: None,
        }
    }
}

impl ChopConfig {
    pub fn min_ms(&self) -> u64 {
        self.min_sec * 1000
    }

    pub fn max_ms(&self) -> u64 {
        self.max_sec * 1000
    }

    pub fn ideal_pad_ms(&self) -> u64 {
        self.ideal_pad_sec * 1000
    }

    /// Load configuration: defaults, then the optional config file, then
    /// `WAVCHOP_*` environment variables. Command-line flags are applied on
    /// top by the caller.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<ChopConfig>(&contents) {
                    config = file_config;
                }
            }
        }

        if let Ok(v) = std::env::var("WAVCHOP_MIN_SILENCE_LEN") {
            if let Ok(ms) = v.parse() {
                config.min_silence_len = ms;
            }
        }
        if let Ok(v) = std::env::var("WAVCHOP_SILENCE_THRESH") {
            if let Ok(db) = v.parse() {
                config.silence_thresh = db;
            }
        }
        if let Ok(v) = std::env::var("WAVCHOP_MIN_SEC") {
            if let Ok(s) = v.parse() {
                config.min_sec = s;
            }
        }
        if let Ok(v) = std::env::var("WAVCHOP_MAX_SEC") {
            if let Ok(s) = v.parse() {
                config.max_sec = s;
            }
        }
        if let Ok(v) = std::env::var("WAVCHOP_IDEAL_PAD_SEC") {
            if let Ok(s) = v.parse() {
                config.ideal_pad_sec = s;
            }
        }
        if let Ok(v) = std::env::var("WAVCHOP_FADE_MS") {
            if let Ok(ms) = v.parse() {
                config.fade_ms = ms;
            }
        }
        if let Ok(v) = std::env::var("WAVCHOP_GAP_MS") {
            if let Ok(ms) = v.parse() {
                config.gap_ms = ms;
            }
        }
        if let Ok(v) = std::env::var("WAVCHOP_WORKERS") {
            if let Ok(n) = v.parse() {
                config.workers = Some(n);
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_sec == 0 {
            return Err(ChopError::Config(
                "max_sec must be greater than 0".to_string(),
            ));
        }
        if self.min_sec == 0 {
            return Err(ChopError::Config(
                "min_sec must be greater than 0".to_string(),
            ));
        }
        if self.min_sec > self.max_sec {
            return Err(ChopError::Config(format!(
                "min_sec ({}) must not exceed max_sec ({})",
                self.min_sec, self.max_sec
            )));
        }
        if self.ideal_pad_sec == 0 {
            return Err(ChopError::Config(
                "ideal_pad_sec must be greater than 0".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(ChopError::Config(
                "workers must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("wavchop").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChopConfig::default();
        assert_eq!(config.min_silence_len, 300);
        assert_eq!(config.silence_thresh, DEFAULT_SILENCE_THRESH_DB);
        assert_eq!(config.min_sec, 1);
        assert_eq!(config.max_sec, 5);
        assert_eq!(config.ideal_pad_sec, 4);
        assert_eq!(config.fade_ms, 10);
        assert_eq!(config.gap_ms, 100);
        assert!(config.workers.is_none());
    }

    #[test]
    fn test_millisecond_accessors() {
        let config = ChopConfig::default();
        assert_eq!(config.min_ms(), 1000);
        assert_eq!(config.max_ms(), 5000);
        assert_eq!(config.ideal_pad_ms(), 4000);
    }

    #[test]
    fn test_validate_default_ok() {
        assert!(ChopConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_min_exceeds_max() {
        let config = ChopConfig {
            min_sec: 10,
            max_sec: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_durations() {
        let config = ChopConfig {
            max_sec: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ChopConfig {
            min_sec: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ChopConfig {
            ideal_pad_sec: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_workers() {
        let config = ChopConfig {
            workers: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ChopConfig = toml::from_str("max_sec = 8\ngap_ms = 50").unwrap();
        assert_eq!(config.max_sec, 8);
        assert_eq!(config.gap_ms, 50);
        assert_eq!(config.min_silence_len, 300);
        assert_eq!(config.silence_thresh, DEFAULT_SILENCE_THRESH_DB);
    }
}
