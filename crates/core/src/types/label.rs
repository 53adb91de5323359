//! Name labels: the user-chosen SLD, the TLD namespace, and the combined key.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Label`], [`Tld`], or [`NameKey`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// The input string is empty.
    #[error("name label cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("name label must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside the label grammar.
    #[error("name label may only contain lowercase letters, digits, and hyphens")]
    InvalidCharacter,
    /// The input starts or ends with a hyphen.
    #[error("name label cannot start or end with a hyphen")]
    EdgeHyphen,
    /// The input contains two hyphens in a row.
    #[error("name label cannot contain consecutive hyphens")]
    ConsecutiveHyphens,
    /// The TLD contains a character other than a lowercase letter.
    #[error("top-level domain may only contain letters")]
    InvalidTld,
    /// The input is not of the form `label.tld`.
    #[error("name must be of the form label.tld")]
    MissingDot,
}

/// A second-level domain label (the user-chosen part of a name).
///
/// ## Constraints
///
/// - Length: 1-63 characters
/// - Lowercase letters, digits, and hyphens only (uppercase input is folded)
/// - No leading or trailing hyphen, no consecutive hyphens
///
/// ## Examples
///
/// ```
/// use nameport_core::Label;
///
/// assert!(Label::parse("alice").is_ok());
/// assert!(Label::parse("a-1").is_ok());
/// assert_eq!(Label::parse("Alice").unwrap().as_str(), "alice");
///
/// assert!(Label::parse("").is_err());       // empty
/// assert!(Label::parse("-alice").is_err()); // leading hyphen
/// assert!(Label::parse("a--b").is_err());   // consecutive hyphens
/// assert!(Label::parse("a.b").is_err());    // dot belongs to NameKey
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Maximum length of a label (DNS limit).
    pub const MAX_LENGTH: usize = 63;

    /// Parse a `Label` from a string, folding uppercase input to lowercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 63 characters,
    /// contains a character outside `[a-z0-9-]`, or misuses hyphens.
    pub fn parse(s: &str) -> Result<Self, LabelError> {
        let s = s.trim().to_lowercase();

        if s.is_empty() {
            return Err(LabelError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(LabelError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(LabelError::InvalidCharacter);
        }
        if s.starts_with('-') || s.ends_with('-') {
            return Err(LabelError::EdgeHyphen);
        }
        if s.contains("--") {
            return Err(LabelError::ConsecutiveHyphens);
        }

        Ok(Self(s))
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the label length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Returns `true` if the label is empty (never true for a parsed label).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Label {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A top-level domain: the name system's namespace suffix.
///
/// Lowercase letters only, 1-63 characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Tld(String);

impl Tld {
    /// Parse a `Tld` from a string, folding uppercase input to lowercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, or contains a
    /// character other than a letter.
    pub fn parse(s: &str) -> Result<Self, LabelError> {
        let s = s.trim().to_lowercase();

        if s.is_empty() {
            return Err(LabelError::Empty);
        }
        if s.len() > Label::MAX_LENGTH {
            return Err(LabelError::TooLong {
                max: Label::MAX_LENGTH,
            });
        }
        if !s.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(LabelError::InvalidTld);
        }

        Ok(Self(s))
    }

    /// Returns the TLD as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Tld {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Tld {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A fully qualified name: `(label, tld)`, displayed as `label.tld`.
///
/// This is the identity key for cart entries and registered names.
///
/// ## Examples
///
/// ```
/// use nameport_core::NameKey;
///
/// let key = NameKey::parse("alice.core").unwrap();
/// assert_eq!(key.label().as_str(), "alice");
/// assert_eq!(key.tld().as_str(), "core");
/// assert_eq!(key.to_string(), "alice.core");
///
/// // The split is on the last dot.
/// assert!(NameKey::parse("alice").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NameKey {
    label: Label,
    tld: Tld,
}

impl NameKey {
    /// Combine an already-validated label and TLD.
    #[must_use]
    pub const fn new(label: Label, tld: Tld) -> Self {
        Self { label, tld }
    }

    /// Parse a `NameKey` from `label.tld` form, splitting on the last dot.
    ///
    /// # Errors
    ///
    /// Returns `LabelError::MissingDot` if there is no dot, or the underlying
    /// label/TLD error if either side fails its grammar.
    pub fn parse(s: &str) -> Result<Self, LabelError> {
        let s = s.trim();
        let (label, tld) = s.rsplit_once('.').ok_or(LabelError::MissingDot)?;
        Ok(Self {
            label: Label::parse(label)?,
            tld: Tld::parse(tld)?,
        })
    }

    /// The user-chosen label portion.
    #[must_use]
    pub const fn label(&self) -> &Label {
        &self.label
    }

    /// The namespace suffix.
    #[must_use]
    pub const fn tld(&self) -> &Tld {
        &self.tld
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.label, self.tld)
    }
}

impl std::str::FromStr for NameKey {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_labels() {
        assert!(Label::parse("alice").is_ok());
        assert!(Label::parse("a").is_ok());
        assert!(Label::parse("abc-123").is_ok());
        assert!(Label::parse("0x0").is_ok());
        assert!(Label::parse("a-b-c").is_ok());
    }

    #[test]
    fn test_parse_folds_case_and_whitespace() {
        assert_eq!(Label::parse("  Alice ").unwrap().as_str(), "alice");
    }

    #[test]
    fn test_parse_empty_label() {
        assert_eq!(Label::parse(""), Err(LabelError::Empty));
        assert_eq!(Label::parse("   "), Err(LabelError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(64);
        assert!(matches!(
            Label::parse(&long),
            Err(LabelError::TooLong { .. })
        ));
        assert!(Label::parse(&"a".repeat(63)).is_ok());
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert_eq!(Label::parse("a b"), Err(LabelError::InvalidCharacter));
        assert_eq!(Label::parse("a_b"), Err(LabelError::InvalidCharacter));
        assert_eq!(Label::parse("a.b"), Err(LabelError::InvalidCharacter));
        assert_eq!(Label::parse("émile"), Err(LabelError::InvalidCharacter));
    }

    #[test]
    fn test_parse_hyphen_rules() {
        assert_eq!(Label::parse("-a"), Err(LabelError::EdgeHyphen));
        assert_eq!(Label::parse("a-"), Err(LabelError::EdgeHyphen));
        assert_eq!(Label::parse("a--b"), Err(LabelError::ConsecutiveHyphens));
    }

    #[test]
    fn test_parse_tld() {
        assert!(Tld::parse("core").is_ok());
        assert_eq!(Tld::parse("CORE").unwrap().as_str(), "core");
        assert_eq!(Tld::parse("c0re"), Err(LabelError::InvalidTld));
        assert_eq!(Tld::parse(""), Err(LabelError::Empty));
    }

    #[test]
    fn test_name_key_parse() {
        let key = NameKey::parse("alice.core").unwrap();
        assert_eq!(key.label().as_str(), "alice");
        assert_eq!(key.tld().as_str(), "core");
    }

    #[test]
    fn test_name_key_splits_on_last_dot() {
        // Only the suffix after the final dot is the TLD; the rest must
        // satisfy the label grammar, so an inner dot is rejected.
        assert_eq!(
            NameKey::parse("a.b.core"),
            Err(LabelError::InvalidCharacter)
        );
    }

    #[test]
    fn test_name_key_missing_dot() {
        assert_eq!(NameKey::parse("alice"), Err(LabelError::MissingDot));
    }

    #[test]
    fn test_name_key_display() {
        let key = NameKey::parse("alice.core").unwrap();
        assert_eq!(format!("{key}"), "alice.core");
    }

    #[test]
    fn test_name_key_equality_is_case_insensitive_via_parse() {
        let a = NameKey::parse("Alice.CORE").unwrap();
        let b = NameKey::parse("alice.core").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serde_roundtrip() {
        let key = NameKey::parse("alice.core").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        let parsed: NameKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }
}
