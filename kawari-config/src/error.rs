//! Error types for settings loading.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("preset {id} is defined twice in settings")]
    DuplicatePreset { id: i32 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
