//! Error types for schema registration, parsing and value decoding.
//!
//! - [`SchemaError`]: a mistake in the schema being built.
//! - [`ParseError`]: a user-facing problem with the supplied tokens.
//! - [`DecodeError`]: a present value could not be converted to the requested
//!   type.
//!
//! A missing subcommand is not an error; see
//! [`Parser::dispatched`](crate::Parser::dispatched).

use thiserror::Error;

use crate::keyword::Keyword;

/// Errors raised while registering entries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// The keyword collides with one already registered in the same scope.
    #[error("keyword already used: {0}")]
    DuplicateKeyword(Keyword),
    /// A keyword or name is empty (or consists only of dashes).
    #[error("keyword cannot be empty")]
    EmptyKeyword,
}

/// Errors raised by [`Parser::parse`](crate::Parser::parse).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// More tokens were left over than positionals are registered.
    #[error("found unknown arguments: {}", .tokens.join(" "))]
    UnknownArguments {
        /// The tokens beyond the last registered positional.
        tokens: Vec<String>,
    },
    /// Fewer tokens were left over than positionals are registered.
    #[error("missing positional arguments: {}", .names.join(", "))]
    MissingPositionals {
        /// Names of the positionals that received no token.
        names: Vec<String>,
    },
    /// A mandatory keyed value was not supplied.
    #[error("missing mandatory argument: {}", join_keywords(.keywords))]
    MissingMandatory {
        /// Keywords of every unsatisfied mandatory entry, in registration order.
        keywords: Vec<Keyword>,
    },
    /// A subcommand's own parser rejected the remaining tokens.
    #[error("{name}: {source}")]
    InSubcommand {
        name: String,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// The innermost error, with subcommand context removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use argscope_core::ParseError;
    ///
    /// let nested = ParseError::InSubcommand {
    ///     name: "run".into(),
    ///     source: Box::new(ParseError::UnknownArguments { tokens: vec!["x".into()] }),
    /// };
    /// assert!(matches!(nested.root(), ParseError::UnknownArguments { .. }));
    /// assert_eq!(nested.subcommand_path(), vec!["run"]);
    /// ```
    pub fn root(&self) -> &ParseError {
        match self {
            Self::InSubcommand { source, .. } => source.root(),
            other => other,
        }
    }

    /// Names of the subcommands the error was raised under, outermost first.
    pub fn subcommand_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        while let Self::InSubcommand { name, source } = current {
            path.push(name.as_str());
            current = source.as_ref();
        }
        path
    }
}

fn join_keywords(keywords: &[Keyword]) -> String {
    keywords
        .iter()
        .map(Keyword::primary)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A present value that could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode {raw:?} as {target}: {reason}")]
pub struct DecodeError {
    raw: String,
    target: &'static str,
    reason: String,
}

impl DecodeError {
    pub(crate) fn new(raw: &str, target: &'static str, reason: impl Into<String>) -> Self {
        Self {
            raw: raw.to_string(),
            target,
            reason: reason.into(),
        }
    }

    /// The text that failed to decode.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Name of the requested type.
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Why the conversion failed.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ParseError::UnknownArguments {
            tokens: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "found unknown arguments: a b");

        let err = ParseError::MissingMandatory {
            keywords: vec![Keyword::with_abbreviation("--mode", "-m")],
        };
        assert_eq!(err.to_string(), "missing mandatory argument: --mode");

        let err = SchemaError::DuplicateKeyword(Keyword::new("x"));
        assert_eq!(err.to_string(), "keyword already used: x");
    }

    #[test]
    fn test_nested_subcommand_message() {
        let err = ParseError::InSubcommand {
            name: "remote".into(),
            source: Box::new(ParseError::InSubcommand {
                name: "add".into(),
                source: Box::new(ParseError::MissingPositionals {
                    names: vec!["url".into()],
                }),
            }),
        };
        assert_eq!(err.to_string(), "remote: add: missing positional arguments: url");
        assert_eq!(err.subcommand_path(), vec!["remote", "add"]);
        assert!(matches!(err.root(), ParseError::MissingPositionals { .. }));
    }
}
