use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("layout has no rows")]
    EmptyLayout,
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile glyph {glyph:?} at ({col},{row})")]
    UnknownTile { col: usize, row: usize, glyph: char },
    #[error("tunnel row {row} is outside a layout of {height} rows")]
    TunnelOutOfRange { row: i32, height: i32 },
    #[error("{what} spawn at ({x},{y}) is not on an open tile")]
    BlockedSpawn { what: &'static str, x: i32, y: i32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}
