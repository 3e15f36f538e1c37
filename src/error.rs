use std::path::PathBuf;

/// Errors raised at the crate boundary: configuration, parsing, profile files.
#[derive(Debug, thiserror::Error)]
pub enum LudoError {
    #[error("player count must be 2, 3 or 4, got {0}")]
    InvalidPlayerCount(u8),
    #[error("unknown color '{0}'")]
    UnknownColor(String),
    #[error("unknown token '{0}' (expected e.g. 'red-0')")]
    UnknownToken(String),
    #[error("unknown bot profile '{0}'")]
    UnknownProfile(String),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
