//! Branch name validation and newtype.
//!
//! Branch names from the command line end up as arguments to `git checkout`,
//! `git merge` and `git push`. [`BranchName`] rejects anything git would
//! refuse as a ref, anything a shell would interpret, and anything git
//! would parse as an option.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// A validated git branch name.
///
/// # Examples
///
/// ```
/// use crisscross_core::BranchName;
///
/// assert!(BranchName::new("release/2.x").is_ok());
/// assert!(BranchName::new("--force").is_err());
/// assert!(BranchName::new("a..b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBranchName`] if the name violates git's
    /// ref naming rules, contains shell metacharacters, or starts with `-`.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if let Some(reason) = violation(&name) {
            return Err(Error::InvalidBranchName {
                name,
                reason: reason.to_string(),
            });
        }
        Ok(Self(name))
    }

    /// Get the branch name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the `BranchName` and return the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for BranchName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for BranchName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BranchName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::str::FromStr for BranchName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for BranchName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BranchName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

/// Characters git refuses in ref names.
const GIT_FORBIDDEN: &[char] = &[' ', '~', '^', ':', '?', '*', '['];

/// Characters a shell would interpret.
const SHELL_META: &[char] = &[
    '$', ';', '|', '&', '>', '<', '`', '\\', '"', '\'', '(', ')', '{', '}', '!',
];

/// Sequences git refuses anywhere in a ref name.
const FORBIDDEN_SEQUENCES: &[(&str, &str)] = &[
    ("..", "branch name cannot contain '..'"),
    ("//", "branch name cannot contain '//'"),
    ("@{", "branch name cannot contain '@{'"),
    ("/.", "branch name component cannot start with '.'"),
];

/// First rule the name breaks, if any.
fn violation(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("branch name cannot be empty");
    }
    if name == "@" {
        return Some("branch name cannot be '@'");
    }
    if name.starts_with('-') {
        return Some("branch name cannot start with '-'");
    }
    if name.starts_with('.') || name.ends_with('.') {
        return Some("branch name cannot start or end with '.'");
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Some("branch name cannot start or end with '/'");
    }
    #[allow(clippy::case_sensitive_file_extension_comparisons)]
    if name.ends_with(".lock") {
        return Some("branch name cannot end with '.lock'");
    }
    if name.chars().any(|c| c.is_ascii_control()) {
        return Some("branch name cannot contain control characters");
    }
    if name.contains(GIT_FORBIDDEN) {
        return Some("branch name cannot contain space, '~', '^', ':', '?', '*' or '['");
    }
    if name.contains(SHELL_META) {
        return Some("branch name cannot contain shell metacharacters");
    }

    FORBIDDEN_SEQUENCES
        .iter()
        .find(|(seq, _)| name.contains(*seq))
        .map(|(_, reason)| *reason)
}
