use std::path::PathBuf;

use thiserror::Error;

/// Problems with farm or scenario input gathered from files and flags.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("fire intensity must be 1 (mild), 2 (severe) or 3 (extreme), got {0}")]
    FireIntensity(i64),

    #[error("unknown {field} '{value}'")]
    UnknownLabel { field: &'static str, value: String },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid farm file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid scenario CSV: {0}")]
    Csv(#[from] csv::Error),
}
