//! Application configuration, optionally loaded from a JSON file.
//!
//! ```json
//! {
//!   "gem_count": 30,
//!   "session": { "pinch": { "press_below": 0.035 } },
//!   "provider": { "max_hands": 1 }
//! }
//! ```
//!
//! Anything not named keeps its default.

use std::path::Path;

use hand_pointer::{ConfigError, SessionConfig};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

// ════════════════════════════════════════════════════════════════════════════
// ProviderOptions
// ════════════════════════════════════════════════════════════════════════════

/// Knobs handed to whichever frame provider is compiled in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    /// Hands reported per frame at most.
    pub max_hands:     usize,
    /// Frame delivery rate of the simulated provider.
    pub frame_rate_hz: f64,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        ProviderOptions { max_hands: 2, frame_rate_hz: 30.0 }
    }
}

impl ProviderOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_hands == 0 {
            return Err(ConfigError::OutOfRange {
                name: "provider.max_hands", value: 0.0, min: 1.0, max: f64::INFINITY,
            });
        }
        if !(self.frame_rate_hz >= 1.0 && self.frame_rate_hz <= 240.0) {
            return Err(ConfigError::OutOfRange {
                name: "provider.frame_rate_hz", value: self.frame_rate_hz, min: 1.0, max: 240.0,
            });
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session:   SessionConfig,
    pub provider:  ProviderOptions,
    pub gem_count: usize,
    /// Gems per grid row.
    pub columns:   usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            session:   SessionConfig::default(),
            provider:  ProviderOptions::default(),
            gem_count: 24,
            columns:   6,
        }
    }
}

impl AppConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: AppConfig = serde_json::from_str(&text).map_err(|source| AppError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.session.validate()?;
        self.provider.validate()?;
        if self.gem_count == 0 || self.columns == 0 {
            return Err(AppError::Grid { gem_count: self.gem_count, columns: self.columns });
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("pinch_gems_{}_{}.json", name, std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn default_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let path = temp_file("partial", r#"{ "gem_count": 30, "provider": { "max_hands": 1 } }"#);
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.gem_count, 30);
        assert_eq!(cfg.columns, 6);
        assert_eq!(cfg.provider.max_hands, 1);
        assert_eq!(cfg.provider.frame_rate_hz, 30.0);
        assert_eq!(cfg.session, SessionConfig::default());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn invalid_pinch_band_rejected_on_load() {
        let path = temp_file(
            "band",
            r#"{ "session": { "pinch": { "press_below": 0.09, "release_above": 0.06 } } }"#,
        );
        assert!(matches!(
            AppConfig::load(&path),
            Err(AppError::Config(ConfigError::PinchBand { .. }))
        ));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let path = temp_file("broken", "{ gem_count: ");
        assert!(matches!(AppConfig::load(&path), Err(AppError::ParseConfig { .. })));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_read_error() {
        let path = std::env::temp_dir().join("pinch_gems_does_not_exist.json");
        assert!(matches!(AppConfig::load(&path), Err(AppError::ReadConfig { .. })));
    }

    #[test]
    fn zero_columns_rejected() {
        let cfg = AppConfig { columns: 0, ..AppConfig::default() };
        assert!(matches!(cfg.validate(), Err(AppError::Grid { columns: 0, .. })));
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = AppConfig::default();
        let text = serde_json::to_string_pretty(&cfg).unwrap();
        assert_eq!(serde_json::from_str::<AppConfig>(&text).unwrap(), cfg);
    }
}
