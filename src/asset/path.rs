use std::path::{Path, PathBuf};

/// Split a source into its file name and containing directory.
///
/// Used when no asset directory is supplied so callers can pass a full relative path
/// such as `public/css/app.css`. The directory defaults to `.` when none is present.
pub fn split_source(source: &str) -> (String, PathBuf) {
    let trimmed = source.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => (trimmed[1..].to_string(), PathBuf::from("/")),
        Some(index) => (
            trimmed[index + 1..].to_string(),
            PathBuf::from(&trimmed[..index]),
        ),
        None => (trimmed.to_string(), PathBuf::from(".")),
    }
}

/// Join an asset source onto the directory it is served from.
///
/// Leading slashes are dropped from the source so that a root-relative URL such as
/// `/css/app.css` lands inside `asset_dir` instead of replacing it.
pub fn join_asset_path(asset_dir: &Path, source: &str) -> PathBuf {
    let relative = source.trim_start_matches('/');
    if relative.is_empty() {
        return asset_dir.to_path_buf();
    }
    asset_dir.join(relative)
}
