//! Application-level errors. Everything here is fatal at launch; runtime
//! trouble (a provider that fails to start or dies) is reported in the HUD.

use std::path::PathBuf;

use hand_pointer::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not open window: {0}")]
    Window(String),

    #[error("could not read config {path}: {source}")]
    ReadConfig {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config {path}: {source}")]
    ParseConfig {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("grid needs at least one gem and one column (got {gem_count} gems, {columns} columns)")]
    Grid { gem_count: usize, columns: usize },
}
