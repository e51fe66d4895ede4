use std::{borrow::Borrow, fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Serialize, Serializer};

/// A validated name for a project, operation or request.
///
/// Names double as directory names on disk, so they must be a single, valid
/// path segment:
///
/// - non-empty
/// - not `.` or `..`, and not one of the fixed file names a store keeps
///   beside directories (`project.properties`, `config.toml`)
/// - no `/`, `\` or NUL characters
/// - no leading or trailing whitespace
///
/// Comparison is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(NonEmptyString);

/// Segments that would collide with the current directory, the parent, or a
/// file in the store layout.
const RESERVED: [&str; 4] = [".", "..", "project.properties", "config.toml"];

impl Name {
    /// Creates a new `Name` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidNameError`] if the string is not a valid path segment.
    pub fn new(s: String) -> Result<Self, InvalidNameError> {
        if RESERVED.contains(&s.as_str()) {
            return Err(InvalidNameError::Reserved(s));
        }

        if let Some(c) = s.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
            return Err(InvalidNameError::ForbiddenCharacter { name: s, found: c });
        }

        if s.trim() != s {
            return Err(InvalidNameError::SurroundingWhitespace(s));
        }

        NonEmptyString::new(s)
            .map(Self)
            .map_err(|_| InvalidNameError::Empty)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Name {
    type Error = InvalidNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Name {
    type Error = InvalidNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for Name {
    type Err = InvalidNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Name {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Error returned when a string cannot be used as a [`Name`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidNameError {
    /// The name was empty.
    #[error("name must not be empty")]
    Empty,

    /// The name was `.`, `..` or the name of a file in the store layout.
    #[error("'{0}' is reserved and cannot be used as a name")]
    Reserved(String),

    /// The name contained a path separator or NUL.
    #[error("invalid name '{name}': contains forbidden character {found:?}")]
    ForbiddenCharacter {
        /// The rejected name.
        name: String,
        /// The first offending character.
        found: char,
    },

    /// The name started or ended with whitespace.
    #[error("invalid name '{0}': leading or trailing whitespace")]
    SurroundingWhitespace(String),
}
