//! Resolution of asset sources to files on disk and their cache-busting tokens.
//!
//! A source is either a remote URI, which is rendered untouched, or a path that is
//! looked up below an asset directory. Local files get a token derived from their
//! modification time or content digest, computed lazily and kept for the lifetime of
//! the [`Asset`] only.

mod path;
mod timestamp;
mod uri;

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

pub use path::{join_asset_path, split_source};
pub use timestamp::{Timestamp, TimestampFormat};
pub use uri::is_uri;

/// A single asset referenced by a helper call.
#[derive(Debug, Clone)]
pub struct Asset {
    source: String,
    full_path: Option<PathBuf>,
    format: TimestampFormat,
    timestamp: OnceCell<Option<Timestamp>>,
}

impl Asset {
    /// Describe `source` as served from `asset_dir`.
    ///
    /// Without an asset directory the source itself is split into file name and
    /// directory, so `public/css/app.css` resolves to that very path.
    pub fn new(
        source: impl Into<String>,
        asset_dir: Option<&Path>,
        format: Option<TimestampFormat>,
    ) -> Self {
        let source = source.into();
        let full_path = (!is_uri(&source)).then(|| match asset_dir {
            Some(dir) => join_asset_path(dir, &source),
            None => {
                let (file_name, dir) = split_source(&source);
                join_asset_path(&dir, &file_name)
            }
        });

        Self {
            source,
            full_path,
            format: format.unwrap_or_default(),
            timestamp: OnceCell::new(),
        }
    }

    /// The value as passed by the caller, used for the tag's `src` or `href`.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Location on disk, `None` for remote URIs.
    pub fn full_path(&self) -> Option<&Path> {
        self.full_path.as_deref()
    }

    /// Whether the source points at a remote resource.
    pub fn is_uri(&self) -> bool {
        self.full_path.is_none()
    }

    /// Strategy used for [`Asset::timestamp`].
    pub fn format(&self) -> TimestampFormat {
        self.format
    }

    /// Cache-busting token, `None` for URIs and files that do not exist.
    pub fn timestamp(&self) -> Option<&Timestamp> {
        self.timestamp
            .get_or_init(|| {
                let path = self.full_path.as_deref()?;
                if !path.is_file() {
                    tracing::debug!(path = %path.display(), "asset not found, skipping timestamp");
                    return None;
                }
                self.format.compute(path)
            })
            .as_ref()
    }

    /// `?ts=<token>` when a token is available.
    pub fn query_string(&self) -> Option<String> {
        self.timestamp().map(|timestamp| format!("?ts={timestamp}"))
    }
}
