//! Error type shared by the helpers and the settings loader.

use std::path::PathBuf;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced while configuring or invoking the asset helpers.
///
/// A missing or unreadable asset file is never an error: it simply renders
/// without a cache-busting token.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No asset directory could be resolved for a local file.
    #[error(
        "no asset directory configured: pass `asset_dir`, set `static_assets_dir`, or set a non-empty `public_folder`"
    )]
    MissingAssetDir,
    /// Failed to read a settings file from disk.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        source: std::io::Error,
    },
    /// Failed to parse a settings file.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Path that caused the error.
        path: PathBuf,
        /// Source JSON or YAML parse error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A helper was requested by a name that is not registered.
    #[error("unknown asset helper `{0}`")]
    UnknownHelper(String),
    /// A timestamp format name was not recognised.
    #[error("unknown timestamp format `{0}` (expected `mtime_int` or `sha1`)")]
    UnknownTimestampFormat(String),
    /// A positional helper argument was neither a source string nor an option mapping.
    #[error("invalid helper argument: {0}")]
    InvalidArgument(String),
    /// An option mapping carried a recognised key with the wrong type.
    #[error("invalid helper options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}
