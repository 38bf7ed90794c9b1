//! Keyword identity: a primary name plus an optional abbreviation.
//!
//! Two keywords are equal when any slot of one equals any slot of the other
//! (primary/primary, primary/abbreviation, abbreviation/primary, or two
//! present abbreviations). This relation is symmetric but not transitive, so
//! [`Keyword`] implements [`PartialEq`] only.
//!
//! # Examples
//!
//! ```
//! use argscope_core::Keyword;
//!
//! let verbose = Keyword::with_abbreviation("verbose", "v");
//! assert_eq!(verbose, Keyword::new("v"));
//! assert_eq!(Keyword::new("v"), verbose);
//! assert!(verbose.matches("verbose"));
//! assert!(!verbose.matches("quiet"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A primary name with an optional short abbreviation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Keyword {
    primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    abbreviation: Option<String>,
}

impl Keyword {
    /// Creates a keyword without an abbreviation.
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            abbreviation: None,
        }
    }

    /// Creates a keyword with both a primary name and an abbreviation.
    pub fn with_abbreviation(primary: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            abbreviation: Some(abbreviation.into()),
        }
    }

    /// The primary (long) spelling.
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// The abbreviation, if one was given.
    pub fn abbreviation(&self) -> Option<&str> {
        self.abbreviation.as_deref()
    }

    /// Both spellings, primary first.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.abbreviation.as_deref())
    }

    /// Returns `true` if `token` equals either slot exactly.
    pub fn matches(&self, token: &str) -> bool {
        self.primary == token || self.abbreviation.as_deref() == Some(token)
    }

    /// Returns `true` if `token` equals either slot exactly or either slot
    /// with its leading dashes removed.
    ///
    /// ```
    /// use argscope_core::Keyword;
    ///
    /// let kw = Keyword::with_abbreviation("--flag", "-f");
    /// assert!(kw.matches_bare("-f"));
    /// assert!(kw.matches_bare("f"));
    /// assert!(kw.matches_bare("flag"));
    /// assert!(!kw.matches_bare("-flag"));
    /// ```
    pub fn matches_bare(&self, token: &str) -> bool {
        self.matches(token) || self.forms().any(|form| strip_dashes(form) == token)
    }

    /// Normalized registration form: `--primary` and `-abbreviation`.
    ///
    /// Slots that already start with a dash are kept verbatim.
    ///
    /// ```
    /// use argscope_core::Keyword;
    ///
    /// let kw = Keyword::with_abbreviation("double", "d").normalized();
    /// assert_eq!(kw.primary(), "--double");
    /// assert_eq!(kw.abbreviation(), Some("-d"));
    ///
    /// let kw = Keyword::new("--already").normalized();
    /// assert_eq!(kw.primary(), "--already");
    /// ```
    pub fn normalized(&self) -> Self {
        Self {
            primary: with_prefix(&self.primary, "--"),
            abbreviation: self.abbreviation.as_deref().map(|a| with_prefix(a, "-")),
        }
    }

    /// The keyword with leading dashes stripped from both slots.
    pub fn bare(&self) -> Self {
        Self {
            primary: strip_dashes(&self.primary).to_string(),
            abbreviation: self
                .abbreviation
                .as_deref()
                .map(|a| strip_dashes(a).to_string()),
        }
    }

    /// Returns `true` if both keywords name the same thing once leading
    /// dashes are ignored.
    pub fn refers_to(&self, other: &Keyword) -> bool {
        self.bare() == other.bare()
    }

    /// Returns `true` if any slot is empty after stripping dashes.
    pub(crate) fn is_blank(&self) -> bool {
        self.forms().any(|form| strip_dashes(form).is_empty())
    }
}

fn with_prefix(raw: &str, prefix: &str) -> String {
    if raw.starts_with('-') {
        raw.to_string()
    } else {
        format!("{prefix}{raw}")
    }
}

fn strip_dashes(raw: &str) -> &str {
    raw.trim_start_matches('-')
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        self.primary == other.primary
            || other.abbreviation.as_deref() == Some(self.primary.as_str())
            || self.abbreviation.as_deref() == Some(other.primary.as_str())
            || (self.abbreviation.is_some() && self.abbreviation == other.abbreviation)
    }
}

impl PartialEq<str> for Keyword {
    fn eq(&self, other: &str) -> bool {
        self.matches(other)
    }
}

impl PartialEq<&str> for Keyword {
    fn eq(&self, other: &&str) -> bool {
        self.matches(other)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.primary)?;
        if let Some(abbreviation) = &self.abbreviation {
            write!(f, ", {abbreviation}")?;
        }
        Ok(())
    }
}

impl From<&str> for Keyword {
    fn from(primary: &str) -> Self {
        Self::new(primary)
    }
}

impl From<String> for Keyword {
    fn from(primary: String) -> Self {
        Self::new(primary)
    }
}

impl From<&String> for Keyword {
    fn from(primary: &String) -> Self {
        Self::new(primary.as_str())
    }
}

impl From<(&str, &str)> for Keyword {
    fn from((primary, abbreviation): (&str, &str)) -> Self {
        Self::with_abbreviation(primary, abbreviation)
    }
}

impl From<&Keyword> for Keyword {
    fn from(keyword: &Keyword) -> Self {
        keyword.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "my_key";
    const ABBR: &str = "my_abbr";
    const ANOTHER_KEY: &str = "another_key";

    #[test]
    fn test_default_keyword_is_empty() {
        let kw = Keyword::default();
        assert_eq!(kw.primary(), "");
        assert_eq!(kw.abbreviation(), None);
    }

    #[test]
    fn test_equality_on_either_slot() {
        let kw = Keyword::with_abbreviation(KEY, ABBR);

        assert_eq!(kw, Keyword::new(KEY));
        assert_eq!(kw, Keyword::new(ABBR));
        assert_eq!(kw, Keyword::with_abbreviation(ANOTHER_KEY, ABBR));
        assert_ne!(kw, Keyword::new(ANOTHER_KEY));
    }

    #[test]
    fn test_equality_is_symmetric() {
        let pairs = [
            (Keyword::with_abbreviation(KEY, ABBR), Keyword::new(ABBR)),
            (
                Keyword::with_abbreviation(KEY, ABBR),
                Keyword::with_abbreviation(ANOTHER_KEY, ABBR),
            ),
            (Keyword::new(KEY), Keyword::with_abbreviation(ANOTHER_KEY, KEY)),
        ];
        for (a, b) in pairs {
            assert_eq!(a, b);
            assert_eq!(b, a);
        }
    }

    #[test]
    fn test_missing_abbreviations_do_not_compare_equal() {
        assert_ne!(Keyword::new(KEY), Keyword::new(ANOTHER_KEY));
    }

    #[test]
    fn test_equality_against_strings() {
        let kw = Keyword::with_abbreviation(KEY, ABBR);
        assert!(kw == KEY);
        assert!(kw == *ABBR);
        assert!(kw != ANOTHER_KEY);
    }

    #[test]
    fn test_normalization_keeps_existing_dashes() {
        let kw = Keyword::with_abbreviation("-x", "--y").normalized();
        assert_eq!(kw.primary(), "-x");
        assert_eq!(kw.abbreviation(), Some("--y"));
    }

    #[test]
    fn test_bare_and_refers_to() {
        let registered = Keyword::with_abbreviation("double", "d").normalized();
        assert!(registered.refers_to(&Keyword::new("d")));
        assert!(registered.refers_to(&Keyword::new("--double")));
        assert!(!registered.refers_to(&Keyword::new("dd")));
        assert_eq!(registered.bare().primary(), "double");
    }

    #[test]
    fn test_blank_keywords() {
        assert!(Keyword::new("").is_blank());
        assert!(Keyword::new("--").is_blank());
        assert!(Keyword::with_abbreviation("name", "-").is_blank());
        assert!(!Keyword::with_abbreviation("name", "n").is_blank());
    }

    #[test]
    fn test_display() {
        assert_eq!(Keyword::with_abbreviation("--flag", "-f").to_string(), "--flag, -f");
        assert_eq!(Keyword::new("sub").to_string(), "sub");
    }
}
