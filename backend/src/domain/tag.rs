//! Recipe tags.
//!
//! Tags are curated by administrators and attached to recipes. Each has a
//! display colour and a URL slug used by recipe filters.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::TagId;

/// Validation errors raised when constructing tag values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagValidationError {
    #[error("tag name must not be empty")]
    EmptyName,
    #[error("tag colour must be a #RRGGBB hex string, got {0:?}")]
    InvalidColor(String),
    #[error("tag slug may only contain letters, digits, hyphens and underscores, got {0:?}")]
    InvalidSlug(String),
}

static COLOR_RE: OnceLock<Regex> = OnceLock::new();
static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn color_regex() -> &'static Regex {
    COLOR_RE.get_or_init(|| {
        Regex::new("^#[0-9A-Fa-f]{6}$")
            .unwrap_or_else(|error| panic!("colour regex failed to compile: {error}"))
    })
}

fn slug_regex() -> &'static Regex {
    SLUG_RE.get_or_init(|| {
        Regex::new("^[-a-zA-Z0-9_]+$")
            .unwrap_or_else(|error| panic!("slug regex failed to compile: {error}"))
    })
}

/// Hex colour such as `#E26C2D`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Validate and construct a colour.
    pub fn new(value: impl Into<String>) -> Result<Self, TagValidationError> {
        let value = value.into();
        if color_regex().is_match(&value) {
            Ok(Self(value))
        } else {
            Err(TagValidationError::InvalidColor(value))
        }
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

impl TryFrom<String> for HexColor {
    type Error = TagValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// URL-safe tag slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagSlug(String);

impl TagSlug {
    /// Validate and construct a slug.
    pub fn new(value: impl Into<String>) -> Result<Self, TagValidationError> {
        let value = value.into();
        if slug_regex().is_match(&value) {
            Ok(Self(value))
        } else {
            Err(TagValidationError::InvalidSlug(value))
        }
    }
}

impl AsRef<str> for TagSlug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TagSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TagSlug> for String {
    fn from(value: TagSlug) -> Self {
        value.0
    }
}

impl TryFrom<String> for TagSlug {
    type Error = TagValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A persisted tag.
///
/// ## Invariants
/// - `name`, `color` and `slug` are each unique (enforced by storage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: HexColor,
    pub slug: TagSlug,
}

/// Tag fields supplied before an identifier is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub color: HexColor,
    pub slug: TagSlug,
}

impl NewTag {
    /// Validate raw tag fields.
    pub fn try_new(
        name: impl Into<String>,
        color: impl Into<String>,
        slug: impl Into<String>,
    ) -> Result<Self, TagValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TagValidationError::EmptyName);
        }
        Ok(Self {
            name,
            color: HexColor::new(color)?,
            slug: TagSlug::new(slug)?,
        })
    }
}
