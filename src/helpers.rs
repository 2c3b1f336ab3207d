//! Tag-producing helpers exposed to templates.
//!
//! [`AssetTags`] binds the read-only [`AssetSettings`] to the URL resolver of the current
//! request. Every helper accepts one or many sources and renders one tag per source,
//! joined by newlines.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::asset::{Asset, is_uri};
use crate::config::AssetSettings;
use crate::error::{Error, Result};
use crate::options::{ResolvedOptions, TagOptions, extract_options};
use crate::tag::Tag;
use crate::url::UrlResolver;

const DEFAULT_CSS: [(&str, &str); 3] = [
    ("charset", "utf-8"),
    ("media", "screen"),
    ("rel", "stylesheet"),
];

const DEFAULT_JS: [(&str, &str); 1] = [("charset", "utf-8")];

const DEFAULT_FAVICON: &str = "/favicon.ico";

/// The helper families and every name they can be called by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperKind {
    /// `<img>` tags.
    Image,
    /// `<link rel="stylesheet">` tags.
    Stylesheet,
    /// `<script>` tags.
    Javascript,
    /// `<link rel="icon">` tags.
    Favicon,
}

impl HelperKind {
    /// Every helper family.
    pub const ALL: [HelperKind; 4] = [
        Self::Image,
        Self::Stylesheet,
        Self::Javascript,
        Self::Favicon,
    ];

    /// Names under which this helper is registered; the first one is canonical.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Self::Image => &["image_tag", "img_tag"],
            Self::Stylesheet => &["stylesheet_tag", "css_tag", "stylesheet"],
            Self::Javascript => &[
                "javascript_tag",
                "javascript_include_tag",
                "js_tag",
                "script_tag",
            ],
            Self::Favicon => &["favicon_tag", "link_favicon_tag", "favicon"],
        }
    }

    /// Look a helper up by any of its names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.names().contains(&name))
    }
}

impl FromStr for HelperKind {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::from_name(name).ok_or_else(|| Error::UnknownHelper(name.to_string()))
    }
}

impl fmt::Display for HelperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.names()[0])
    }
}

/// Asset helpers for one request.
///
/// ```
/// use asset_tags::{AssetSettings, RequestUrl, TagOptions};
///
/// let settings = AssetSettings::default();
/// let request = RequestUrl::default();
/// let tags = settings.helpers(&request);
///
/// let html = tags
///     .javascript_tag(["http://cdn.example.com/x.js"], &TagOptions::new())
///     .unwrap();
/// assert_eq!(
///     html,
///     r#"<script charset="utf-8" src="http://cdn.example.com/x.js"></script>"#
/// );
/// ```
#[derive(Debug)]
pub struct AssetTags<'a, R> {
    settings: &'a AssetSettings,
    resolver: &'a R,
}

impl<R> Clone for AssetTags<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for AssetTags<'_, R> {}

impl<'a, R: UrlResolver> AssetTags<'a, R> {
    /// Bind application settings to a request's URL resolver.
    pub fn new(settings: &'a AssetSettings, resolver: &'a R) -> Self {
        Self { settings, resolver }
    }

    /// Settings the helpers read from.
    pub fn settings(&self) -> &'a AssetSettings {
        self.settings
    }

    /// `<img src="...">` for each source.
    pub fn image_tag<I, S>(&self, sources: I, options: &TagOptions) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.render_each(HelperKind::Image, sources, options, |source, resolved| {
            Tag::new("img")
                .attr("src", self.asset_url(source, resolved))
                .attrs(resolved.attributes)
                .closed(resolved.closed)
        })
    }

    /// `<link rel="stylesheet" href="...">` for each source.
    pub fn stylesheet_tag<I, S>(&self, sources: I, options: &TagOptions) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.render_each(HelperKind::Stylesheet, sources, options, |source, resolved| {
            Tag::new("link")
                .attrs(DEFAULT_CSS)
                .attr("href", self.asset_url(source, resolved))
                .attrs(resolved.attributes)
                .closed(resolved.closed)
        })
    }

    /// `<script src="..."></script>` for each source. Never self-closed.
    pub fn javascript_tag<I, S>(&self, sources: I, options: &TagOptions) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.render_each(HelperKind::Javascript, sources, options, |source, resolved| {
            Tag::new("script")
                .attrs(DEFAULT_JS)
                .attr("src", self.asset_url(source, resolved))
                .attrs(resolved.attributes)
                .body(String::new)
        })
    }

    /// `<link rel="icon" href="...">`, pointing at `/favicon.ico` when no source is given.
    ///
    /// Favicons never carry a cache-busting query string.
    pub fn favicon_tag(&self, source: Option<&str>, options: &TagOptions) -> String {
        let source = source
            .filter(|source| !source.is_empty())
            .unwrap_or(DEFAULT_FAVICON);
        let rel = if self.settings.xhtml {
            "shortcut icon"
        } else {
            "icon"
        };

        let prefix = options
            .url
            .script_name
            .unwrap_or_else(|| source.starts_with('/') && !is_uri(source));
        let href = self
            .resolver
            .resolve_url(source, options.url.absolute.unwrap_or(false), prefix);

        let tag = Tag::new("link")
            .attr("rel", rel)
            .attr("href", href)
            .attrs(&options.attributes)
            .closed(options.closed.unwrap_or(true));
        tracing::trace!(helper = %HelperKind::Favicon, source, "rendered asset tag");
        tag.render()
    }

    /// Alias of [`Self::image_tag`].
    #[inline]
    pub fn img_tag<I, S>(&self, sources: I, options: &TagOptions) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.image_tag(sources, options)
    }

    /// Alias of [`Self::stylesheet_tag`].
    #[inline]
    pub fn css_tag<I, S>(&self, sources: I, options: &TagOptions) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stylesheet_tag(sources, options)
    }

    /// Alias of [`Self::stylesheet_tag`].
    #[inline]
    pub fn stylesheet<I, S>(&self, sources: I, options: &TagOptions) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stylesheet_tag(sources, options)
    }

    /// Alias of [`Self::javascript_tag`].
    #[inline]
    pub fn javascript_include_tag<I, S>(&self, sources: I, options: &TagOptions) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.javascript_tag(sources, options)
    }

    /// Alias of [`Self::javascript_tag`].
    #[inline]
    pub fn js_tag<I, S>(&self, sources: I, options: &TagOptions) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.javascript_tag(sources, options)
    }

    /// Alias of [`Self::javascript_tag`].
    #[inline]
    pub fn script_tag<I, S>(&self, sources: I, options: &TagOptions) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.javascript_tag(sources, options)
    }

    /// Alias of [`Self::favicon_tag`].
    #[inline]
    pub fn link_favicon_tag(&self, source: Option<&str>, options: &TagOptions) -> String {
        self.favicon_tag(source, options)
    }

    /// Alias of [`Self::favicon_tag`].
    #[inline]
    pub fn favicon(&self, source: Option<&str>, options: &TagOptions) -> String {
        self.favicon_tag(source, options)
    }

    /// Invoke a helper by name with template-style arguments.
    ///
    /// Positional arguments are source strings (or arrays of them); a trailing JSON
    /// object is taken as the option mapping.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<String> {
        let kind: HelperKind = name.parse()?;
        let (sources, options) = extract_options(args)?;

        match kind {
            HelperKind::Image => self.image_tag(&sources, &options),
            HelperKind::Stylesheet => self.stylesheet_tag(&sources, &options),
            HelperKind::Javascript => self.javascript_tag(&sources, &options),
            HelperKind::Favicon => {
                Ok(self.favicon_tag(sources.first().map(String::as_str), &options))
            }
        }
    }

    fn render_each<I, S, F>(
        &self,
        kind: HelperKind,
        sources: I,
        options: &TagOptions,
        render: F,
    ) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str, &ResolvedOptions<'_>) -> Tag,
    {
        let resolved = options.resolve(self.settings);
        let tags = sources
            .into_iter()
            .map(|source| -> Result<String> {
                let source = source.as_ref();
                resolved.asset_dir_for(source)?;
                let tag = render(source, &resolved);
                tracing::trace!(helper = %kind, source, "rendered asset tag");
                Ok(tag.render())
            })
            .collect::<Result<Vec<String>>>()?;
        Ok(tags.join("\n"))
    }

    fn asset_url(&self, source: &str, resolved: &ResolvedOptions<'_>) -> String {
        let asset = Asset::new(source, resolved.asset_dir, Some(resolved.timestamp_format));
        let href = self.resolver.resolve_url(
            asset.source(),
            resolved.absolute,
            resolved.prefix_script_name(source),
        );

        if !resolved.cache_busting() {
            return href;
        }
        match asset.query_string() {
            Some(query) => format!("{href}{query}"),
            None => href,
        }
    }
}
