#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset;
pub mod config;
pub mod error;
pub mod helpers;
pub mod options;
pub mod tag;
pub mod url;

pub use asset::{Asset, Timestamp, TimestampFormat};
pub use config::AssetSettings;
pub use error::{Error, Result};
pub use helpers::{AssetTags, HelperKind};
pub use options::{TagOptions, UrlOptions, extract_options};
pub use tag::Tag;
pub use url::{RequestUrl, UrlResolver};
