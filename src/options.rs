//! Per-call options accepted by the helpers.
//!
//! Callers build a [`TagOptions`] (directly, or from a JSON mapping handed over by a
//! template engine). Before rendering it is resolved against the application's
//! [`AssetSettings`] into an immutable per-call record: call-level values win,
//! then application settings, then built-in defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::asset::{TimestampFormat, is_uri};
use crate::config::AssetSettings;
use crate::error::{Error, Result};

/// Options controlling how the asset URL is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct UrlOptions {
    /// Produce a fully qualified URL including scheme and host.
    pub absolute: Option<bool>,
    /// Prefix the application's mount point. `Some(false)` also disables cache-busting.
    #[serde(alias = "script_tag")]
    pub script_name: Option<bool>,
}

/// Caller-supplied options for a single helper call.
///
/// Anything that is not one of the recognised settings ends up as an HTML attribute
/// and overrides the helper's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOptions {
    /// Self-close the element (`<link ... />`); defaults to `true`.
    pub closed: Option<bool>,
    /// Directory to look the asset up in.
    pub asset_dir: Option<PathBuf>,
    /// Cache-busting strategy for this call.
    pub timestamp_format: Option<TimestampFormat>,
    /// URL building options.
    pub url: UrlOptions,
    /// `Some(false)` suppresses the cache-busting query string.
    pub timestamp: Option<bool>,
    /// Pass-through HTML attributes.
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawOptions {
    closed: Option<bool>,
    asset_dir: Option<PathBuf>,
    timestamp_format: Option<TimestampFormat>,
    url_options: Option<UrlOptions>,
    absolute: Option<bool>,
    #[serde(alias = "script_tag")]
    script_name: Option<bool>,
    timestamp: Option<bool>,
    #[serde(flatten)]
    attributes: BTreeMap<String, Value>,
}

impl TagOptions {
    /// Empty options: every setting falls back to the application settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an HTML attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Choose between a self-closed and a bare opening tag.
    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = Some(closed);
        self
    }

    /// Look the asset up in `dir` instead of the configured directory.
    pub fn asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = Some(dir.into());
        self
    }

    /// Override the cache-busting strategy.
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = Some(format);
        self
    }

    /// Ask for a fully qualified URL.
    pub fn absolute(mut self, absolute: bool) -> Self {
        self.url.absolute = Some(absolute);
        self
    }

    /// Force or forbid prefixing the mount point.
    pub fn script_name(mut self, script_name: bool) -> Self {
        self.url.script_name = Some(script_name);
        self
    }

    /// Enable or suppress the cache-busting query string.
    pub fn timestamp(mut self, timestamp: bool) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Read options from a JSON mapping.
    ///
    /// Anything other than an object yields empty options. Recognised keys with a value
    /// of the wrong type are reported as [`Error::InvalidOptions`].
    pub fn from_json(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Ok(Self::default());
        }

        let raw = RawOptions::deserialize(value)?;
        let nested = raw.url_options.unwrap_or_default();
        let attributes = raw
            .attributes
            .into_iter()
            .filter_map(|(key, value)| attribute_value(value).map(|value| (key, value)))
            .collect();

        Ok(Self {
            closed: raw.closed,
            asset_dir: raw.asset_dir,
            timestamp_format: raw.timestamp_format,
            url: UrlOptions {
                absolute: nested.absolute.or(raw.absolute),
                script_name: nested.script_name.or(raw.script_name),
            },
            timestamp: raw.timestamp,
            attributes,
        })
    }

    /// Resolve against the application settings.
    ///
    /// A missing asset directory is only reported once a local source asks for it, see
    /// [`ResolvedOptions::asset_dir_for`].
    pub(crate) fn resolve<'a>(&'a self, settings: &'a AssetSettings) -> ResolvedOptions<'a> {
        let asset_dir = match self.asset_dir.as_deref() {
            Some(dir) if !dir.as_os_str().is_empty() => Some(dir),
            _ => settings.asset_dir().ok(),
        };

        ResolvedOptions {
            asset_dir,
            timestamp_format: self.timestamp_format.unwrap_or(settings.timestamp_format),
            absolute: self.url.absolute.unwrap_or(false),
            script_name: self.url.script_name,
            timestamp: self.timestamp.unwrap_or(true),
            closed: self.closed.unwrap_or(true),
            attributes: &self.attributes,
        }
    }
}

fn attribute_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// Split helper arguments into sources and a trailing option mapping.
///
/// The last argument is taken as options when it is a JSON object. Any other trailing
/// value that cannot be a source (a number or boolean) is dropped and the call proceeds
/// without options. String arrays are flattened into individual sources and `null`
/// arguments are skipped.
pub fn extract_options(args: &[Value]) -> Result<(Vec<String>, TagOptions)> {
    let (sources, options) = match args.split_last() {
        Some((last, rest)) if last.is_object() => (rest, TagOptions::from_json(last)?),
        Some((Value::Bool(_) | Value::Number(_), rest)) => (rest, TagOptions::default()),
        _ => (args, TagOptions::default()),
    };

    let mut list = Vec::with_capacity(sources.len());
    for source in sources {
        collect_source(source, &mut list)?;
    }
    Ok((list, options))
}

fn collect_source(value: &Value, list: &mut Vec<String>) -> Result<()> {
    match value {
        Value::String(source) => list.push(source.clone()),
        Value::Array(items) => {
            for item in items {
                collect_source(item, list)?;
            }
        }
        Value::Null => {}
        other => {
            return Err(Error::InvalidArgument(format!(
                "expected an asset source string, got `{other}`"
            )));
        }
    }
    Ok(())
}

/// Options for one call after precedence resolution. Never mutated once built.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedOptions<'a> {
    pub asset_dir: Option<&'a Path>,
    pub timestamp_format: TimestampFormat,
    pub absolute: bool,
    pub script_name: Option<bool>,
    pub timestamp: bool,
    pub closed: bool,
    pub attributes: &'a BTreeMap<String, String>,
}

impl<'a> ResolvedOptions<'a> {
    /// Directory to look `source` up in; `None` for URIs, which never touch the disk.
    pub fn asset_dir_for(&self, source: &str) -> Result<Option<&'a Path>> {
        if is_uri(source) {
            return Ok(None);
        }
        self.asset_dir.map(Some).ok_or(Error::MissingAssetDir)
    }

    /// Root-relative local paths get the mount point unless the caller said otherwise.
    pub fn prefix_script_name(&self, source: &str) -> bool {
        self.script_name
            .unwrap_or_else(|| source.starts_with('/') && !is_uri(source))
    }

    /// An explicit `script_name: false` also turns cache-busting off.
    pub fn cache_busting(&self) -> bool {
        self.timestamp && self.script_name != Some(false)
    }
}
