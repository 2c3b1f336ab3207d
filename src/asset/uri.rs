use regex::Regex;

fn uri_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // An optional scheme followed by at least two slashes.
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.\-]*:)?//").expect("invalid URI regex")
    })
}

/// Determine whether an asset source points at a remote resource rather than a local file.
///
/// Only the scheme part is inspected: `http://example.com/x.css` and `//example.com/x.css`
/// are URIs, whereas `example.com/x.css` or `www.example.com` resolve as files.
pub fn is_uri(value: &str) -> bool {
    uri_pattern().is_match(value)
}
