//! Rendering of a single HTML element from a set of attributes.

use std::collections::BTreeMap;
use std::fmt;

/// An HTML element waiting to be rendered.
///
/// Attributes are kept in a sorted map so the rendered output is deterministic
/// regardless of insertion order. Values are written verbatim: callers are
/// expected to pass pre-sanitised strings.
///
/// ```
/// use asset_tags::Tag;
///
/// let tag = Tag::new("img").attr("src", "/images/foo.jpg").attr("width", "500");
/// assert_eq!(tag.to_string(), r#"<img src="/images/foo.jpg" width="500" />"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    attributes: BTreeMap<String, String>,
    closed: bool,
    body: Option<String>,
}

impl Tag {
    /// Start a self-closing element with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            closed: true,
            body: None,
        }
    }

    /// Set a single attribute, replacing any previous value for the key.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Merge a batch of attributes; later values win on key conflicts.
    pub fn attrs<K, V>(mut self, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes.extend(
            attributes
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        self
    }

    /// Choose between `<name ... />` and a bare opening tag `<name ...>`.
    ///
    /// Ignored when a body is present.
    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    /// Wrap the output produced by `body` in an opening and closing tag.
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.body = Some(body());
        self
    }

    /// Element name, e.g. `link`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in render order.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Render the element into its HTML string form.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (key, value) in &self.attributes {
            write!(f, r#" {key}="{value}""#)?;
        }

        match &self.body {
            Some(body) => write!(f, ">{body}</{}>", self.name),
            None if self.closed => f.write_str(" />"),
            None => f.write_str(">"),
        }
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.to_string()
    }
}
