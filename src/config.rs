//! Application-wide settings read by every helper call.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::asset::TimestampFormat;
use crate::error::{Error, Result};
use crate::helpers::AssetTags;
use crate::url::UrlResolver;

const DEFAULT_CONFIG_FILES: [&str; 3] = [
    "assets.config.json",
    "assets.config.yml",
    "assets.config.yaml",
];

/// Settings shared by all requests of an application.
///
/// Configure once at startup; helpers only ever read them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directory the host serves static files from.
    pub public_folder: PathBuf,
    /// Overrides `public_folder` as the place assets are looked up in.
    pub static_assets_dir: Option<PathBuf>,
    /// Default cache-busting strategy.
    pub timestamp_format: TimestampFormat,
    /// Emit XHTML-flavoured markup, e.g. `rel="shortcut icon"` for favicons.
    pub xhtml: bool,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            public_folder: PathBuf::from("public"),
            static_assets_dir: None,
            timestamp_format: TimestampFormat::Mtime,
            xhtml: false,
        }
    }
}

impl AssetSettings {
    /// Look for a settings file in `dir`, falling back to defaults when there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        for name in DEFAULT_CONFIG_FILES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Self::from_path(&candidate);
            }
        }

        tracing::debug!(dir = %dir.display(), "no asset settings file found, using defaults");
        Ok(Self::default())
    }

    /// Read settings from a JSON or YAML file, chosen by extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml")
            });

        let parsed: std::result::Result<Self, Box<dyn std::error::Error + Send + Sync>> =
            if is_yaml {
                serde_yaml::from_str(&content).map_err(Into::into)
            } else {
                serde_json::from_str(&content).map_err(Into::into)
            };

        parsed.map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Set the folder the host serves static files from.
    pub fn with_public_folder(mut self, dir: impl Into<PathBuf>) -> Self {
        self.public_folder = dir.into();
        self
    }

    /// Look assets up somewhere other than the public folder.
    pub fn with_static_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_assets_dir = Some(dir.into());
        self
    }

    /// Change the default cache-busting strategy.
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Toggle XHTML-flavoured markup.
    pub fn with_xhtml(mut self, xhtml: bool) -> Self {
        self.xhtml = xhtml;
        self
    }

    /// Directory assets are looked up in when a call does not name one.
    ///
    /// `static_assets_dir` takes precedence over `public_folder`; an empty value for
    /// either counts as unset.
    pub fn asset_dir(&self) -> Result<&Path> {
        let configured = |dir: &&Path| !dir.as_os_str().is_empty();
        self.static_assets_dir
            .as_deref()
            .filter(configured)
            .or_else(|| Some(self.public_folder.as_path()).filter(configured))
            .ok_or(Error::MissingAssetDir)
    }

    /// Bind these settings to a request's URL resolver.
    pub fn helpers<'a, R: UrlResolver>(&'a self, resolver: &'a R) -> AssetTags<'a, R> {
        AssetTags::new(self, resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_registration() {
        let settings = AssetSettings::default();
        assert_eq!(settings.public_folder, PathBuf::from("public"));
        assert_eq!(settings.static_assets_dir, None);
        assert_eq!(settings.timestamp_format, TimestampFormat::Mtime);
        assert!(!settings.xhtml);
    }

    #[test]
    fn static_assets_dir_wins_over_public_folder() {
        let settings = AssetSettings::default().with_static_assets_dir("assets");
        assert_eq!(settings.asset_dir().unwrap(), Path::new("assets"));

        let settings = AssetSettings::default().with_public_folder("app/public");
        assert_eq!(settings.asset_dir().unwrap(), Path::new("app/public"));
    }

    #[test]
    fn fails_without_any_asset_dir() {
        let settings = AssetSettings::default().with_public_folder("");
        assert!(matches!(settings.asset_dir(), Err(Error::MissingAssetDir)));

        let settings = settings.with_static_assets_dir("");
        assert!(matches!(settings.asset_dir(), Err(Error::MissingAssetDir)));
    }

    #[test]
    fn discovers_json_settings() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("assets.config.json"),
            r#"{ "public_folder": "app/public", "timestamp_format": "sha1" }"#,
        )
        .unwrap();

        let settings = AssetSettings::discover(dir.path()).unwrap();
        assert_eq!(settings.public_folder, PathBuf::from("app/public"));
        assert_eq!(settings.timestamp_format, TimestampFormat::Sha1);
        assert!(!settings.xhtml);
    }

    #[test]
    fn discovers_yaml_settings() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("assets.config.yml"),
            "static_assets_dir: static\nxhtml: true\n",
        )
        .unwrap();

        let settings = AssetSettings::discover(dir.path()).unwrap();
        assert_eq!(settings.static_assets_dir, Some(PathBuf::from("static")));
        assert!(settings.xhtml);
        assert_eq!(settings.public_folder, PathBuf::from("public"));
    }

    #[test]
    fn falls_back_to_defaults_when_absent() {
        let dir = tempdir().unwrap();
        let settings = AssetSettings::discover(dir.path()).unwrap();
        assert_eq!(settings, AssetSettings::default());
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assets.config.json");
        fs::write(&path, r#"{ "timestamp_format": "md5" }"#).unwrap();

        let err = AssetSettings::from_path(&path).unwrap_err();
        match &err {
            Error::Parse { path: reported, .. } => assert_eq!(reported, &path),
            other => panic!("expected parse error, got {other:?}"),
        }
        let source = std::error::Error::source(&err).expect("parse error keeps its source");
        assert!(source.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn yaml_parse_errors_keep_their_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assets.config.yml");
        fs::write(&path, "xhtml: [not, a, bool]\n").unwrap();

        let err = AssetSettings::from_path(&path).unwrap_err();
        let source = std::error::Error::source(&err).expect("parse error keeps its source");
        assert!(source.downcast_ref::<serde_yaml::Error>().is_some());
    }

    #[test]
    fn reports_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(AssetSettings::from_path(&path), Err(Error::Io { .. })));
    }
}
