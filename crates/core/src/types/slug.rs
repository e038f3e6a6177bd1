//! URL slug derived from a document's name.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input string is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]`.
    #[error("slug contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A URL-safe identifier generated from a document's name.
///
/// Serialized the way the CMS stores slug fields:
/// `{ "_type": "slug", "current": "blue-linen-shirt" }`.
///
/// ## Examples
///
/// ```
/// use loomwise_core::Slug;
///
/// let slug = Slug::from_name("Blue Linen Shirt (XL)");
/// assert_eq!(slug.as_str(), "blue-linen-shirt-xl");
///
/// assert!(Slug::parse("blue-linen-shirt").is_ok());
/// assert!(Slug::parse("Blue Shirt").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "slug")]
pub struct Slug {
    current: String,
}

impl Slug {
    /// Maximum slug length, matching the CMS default.
    pub const MAX_LENGTH: usize = 200;

    /// Generate a slug from a human-readable name.
    ///
    /// Lowercases ASCII letters, keeps digits, and collapses every run of
    /// other characters into a single `-`. The result never starts or ends
    /// with `-` and is truncated to [`Self::MAX_LENGTH`]. A name without any
    /// alphanumeric characters yields an empty slug.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let mut current = String::with_capacity(name.len());
        let mut pending_dash = false;

        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_dash && !current.is_empty() {
                    current.push('-');
                }
                pending_dash = false;
                current.push(c.to_ascii_lowercase());
            } else {
                pending_dash = true;
            }
        }

        // ASCII only, so byte truncation is safe
        current.truncate(Self::MAX_LENGTH);
        while current.ends_with('-') {
            current.pop();
        }

        Self { current }
    }

    /// Parse an existing slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than
    /// [`Self::MAX_LENGTH`], or contains characters other than lowercase
    /// ASCII letters, digits, and `-`.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidCharacter(c));
        }

        Ok(Self {
            current: s.to_owned(),
        })
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.current
    }

    /// Whether the slug is empty (the name had no usable characters).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.current)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
