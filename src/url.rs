//! Seam between the helpers and the host framework's URL builder.

use regex::Regex;

/// Turns an application-relative path into a URL suitable for the current request.
pub trait UrlResolver {
    /// Resolve `path`, optionally as an absolute URL and optionally prefixed with the
    /// application's mount point.
    fn resolve_url(&self, path: &str, absolute: bool, prefix_script_name: bool) -> String;
}

impl<F> UrlResolver for F
where
    F: Fn(&str, bool, bool) -> String,
{
    fn resolve_url(&self, path: &str, absolute: bool, prefix_script_name: bool) -> String {
        self(path, absolute, prefix_script_name)
    }
}

fn scheme_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("invalid scheme regex")
    })
}

/// Request-derived URL builder for hosts without one of their own.
///
/// ```
/// use asset_tags::{RequestUrl, UrlResolver};
///
/// let request = RequestUrl::new("example.com").with_script_name("/blog");
/// assert_eq!(request.resolve_url("/css/a.css", false, true), "/blog/css/a.css");
/// assert_eq!(
///     request.resolve_url("/css/a.css", true, false),
///     "http://example.com/css/a.css"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    /// `http` or `https`.
    pub scheme: String,
    /// Host name without port.
    pub host: String,
    /// Port the request arrived on.
    pub port: u16,
    /// Mount point of the application, empty when served from the root.
    pub script_name: String,
}

impl Default for RequestUrl {
    fn default() -> Self {
        Self::new("localhost")
    }
}

impl RequestUrl {
    /// Plain HTTP on port 80, mounted at the root.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            scheme: "http".into(),
            host: host.into(),
            port: 80,
            script_name: String::new(),
        }
    }

    /// Serve over HTTPS on the default port.
    pub fn secure(mut self) -> Self {
        self.scheme = "https".into();
        self.port = 443;
        self
    }

    /// Use a non-default port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Mount the application below `script_name`.
    pub fn with_script_name(mut self, script_name: impl Into<String>) -> Self {
        self.script_name = script_name.into();
        self
    }

    fn origin(&self) -> String {
        let default_port = match self.scheme.as_str() {
            "https" => 443,
            _ => 80,
        };
        if self.port == default_port {
            format!("{}://{}", self.scheme, self.host)
        } else {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        }
    }
}

impl UrlResolver for RequestUrl {
    fn resolve_url(&self, path: &str, absolute: bool, prefix_script_name: bool) -> String {
        if path.starts_with("//") || scheme_pattern().is_match(path) {
            return path.to_string();
        }

        let mut url = if absolute { self.origin() } else { String::new() };
        if prefix_script_name {
            url = join_segment(&url, &self.script_name);
        }
        join_segment(&url, path)
    }
}

/// Append `segment` to `base` with exactly one slash at the boundary.
fn join_segment(base: &str, segment: &str) -> String {
    let segment = segment.trim_start_matches('/');
    if segment.is_empty() && !base.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_mounted_paths_are_unchanged() {
        let request = RequestUrl::default();
        assert_eq!(request.resolve_url("/css/a.css", false, true), "/css/a.css");
        assert_eq!(request.resolve_url("/favicon.ico", false, false), "/favicon.ico");
    }

    #[test]
    fn bare_file_names_become_root_relative() {
        let request = RequestUrl::default().with_script_name("/bar");
        assert_eq!(request.resolve_url("favicon.ico", false, false), "/favicon.ico");
        assert_eq!(request.resolve_url("favicon.ico", false, true), "/bar/favicon.ico");
    }

    #[test]
    fn prefixes_mount_point() {
        let request = RequestUrl::default().with_script_name("/bar/");
        assert_eq!(
            request.resolve_url("/stylesheets/winter.css", false, true),
            "/bar/stylesheets/winter.css"
        );
    }

    #[test]
    fn builds_absolute_urls() {
        let request = RequestUrl::new("example.org")
            .with_port(8080)
            .with_script_name("/app2");
        assert_eq!(
            request.resolve_url("/js/app.js", true, true),
            "http://example.org:8080/app2/js/app.js"
        );

        let secure = RequestUrl::new("example.org").secure();
        assert_eq!(
            secure.resolve_url("/js/app.js", true, false),
            "https://example.org/js/app.js"
        );
    }

    #[test]
    fn passes_uris_through() {
        let request = RequestUrl::default().with_script_name("/bar");
        for uri in [
            "http://example.org/images/foo.png",
            "//cdn.example.com/x.js",
            "data:image/png;base64,abc",
        ] {
            assert_eq!(request.resolve_url(uri, true, true), uri);
        }
    }

    #[test]
    fn closures_act_as_resolvers() {
        let resolver = |path: &str, _absolute: bool, script: bool| {
            if script {
                format!("/mounted{path}")
            } else {
                path.to_string()
            }
        };
        assert_eq!(resolver.resolve_url("/a.css", false, true), "/mounted/a.css");
    }
}
