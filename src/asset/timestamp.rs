use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::error::Error;

/// Strategy used to derive the cache-busting token of a local asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum TimestampFormat {
    /// Modification time in whole seconds since the Unix epoch.
    #[default]
    #[serde(rename = "mtime_int", alias = "mtime")]
    Mtime,
    /// SHA-1 hex digest of the file contents.
    #[serde(rename = "sha1")]
    Sha1,
}

impl TimestampFormat {
    /// Compute the token for an existing file, `None` when it cannot be read.
    pub fn compute(self, path: &Path) -> Option<Timestamp> {
        match self {
            Self::Mtime => modified_seconds(path).map(Timestamp::Mtime),
            Self::Sha1 => sha1_hex(path).map(Timestamp::Sha1),
        }
    }

    /// Canonical name as accepted in settings files and option mappings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mtime => "mtime_int",
            Self::Sha1 => "sha1",
        }
    }
}

impl FromStr for TimestampFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "mtime_int" | "mtime" => Ok(Self::Mtime),
            "sha1" => Ok(Self::Sha1),
            other => Err(Error::UnknownTimestampFormat(other.to_string())),
        }
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache-busting token computed for a local asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// Seconds since the Unix epoch.
    Mtime(i64),
    /// Lowercase hex SHA-1 digest.
    Sha1(String),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mtime(seconds) => write!(f, "{seconds}"),
            Self::Sha1(digest) => f.write_str(digest),
        }
    }
}

fn modified_seconds(path: &Path) -> Option<i64> {
    let modified = match path.metadata().and_then(|meta| meta.modified()) {
        Ok(modified) => modified,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "could not read modification time");
            return None;
        }
    };

    let seconds = match modified.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    };
    Some(seconds)
}

fn sha1_hex(path: &Path) -> Option<String> {
    let digest = File::open(path).and_then(|mut file| {
        let mut hasher = Sha1::new();
        io::copy(&mut file, &mut hasher)?;
        Ok(hasher.finalize())
    });

    match digest {
        Ok(digest) => Some(hex::encode(digest)),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "could not hash asset");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_format_names() {
        assert_eq!("mtime_int".parse::<TimestampFormat>().unwrap(), TimestampFormat::Mtime);
        assert_eq!("mtime".parse::<TimestampFormat>().unwrap(), TimestampFormat::Mtime);
        assert_eq!("sha1".parse::<TimestampFormat>().unwrap(), TimestampFormat::Sha1);
        assert!("md5".parse::<TimestampFormat>().is_err());
    }

    #[test]
    fn deserializes_format_names() {
        let format: TimestampFormat = serde_json::from_str(r#""sha1""#).unwrap();
        assert_eq!(format, TimestampFormat::Sha1);
        let format: TimestampFormat = serde_json::from_str(r#""mtime""#).unwrap();
        assert_eq!(format, TimestampFormat::Mtime);
    }

    #[test]
    fn hashes_file_contents() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("hello.txt");
        fs::write(&file, "hello world").unwrap();

        let token = TimestampFormat::Sha1.compute(&file).unwrap();
        assert_eq!(
            token,
            Timestamp::Sha1("2aae6c35c94fcfb415dbe95f408b9ce91ee846ed".to_string())
        );
    }

    #[test]
    fn reads_modification_time() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("app.css");
        fs::write(&file, "body {}").unwrap();

        let expected = fs::metadata(&file)
            .unwrap()
            .modified()
            .unwrap()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        assert_eq!(
            TimestampFormat::Mtime.compute(&file),
            Some(Timestamp::Mtime(expected))
        );
    }

    #[test]
    fn missing_files_have_no_token() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("missing.css");
        assert_eq!(TimestampFormat::Mtime.compute(&file), None);
        assert_eq!(TimestampFormat::Sha1.compute(&file), None);
    }
}
