//! Registered schema entries.
//!
//! Every entry carries a keyword (or bare name, for positionals), a
//! description and a satisfied marker. The kind-specific payload lives in a
//! single sum type so the parser never needs to downcast.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keyword::Keyword;
use crate::parser::Parser;

/// The kind of a registered entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Boolean switch; present or not.
    Flag,
    /// Keyed value that must be supplied.
    Mandatory,
    /// Keyed value that may be omitted.
    Optional,
    /// Unkeyed value assigned by position.
    Positional,
    /// Nested command with its own parser.
    Subcommand,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flag => "flag",
            Self::Mandatory => "mandatory",
            Self::Optional => "optional",
            Self::Positional => "positional",
            Self::Subcommand => "subcommand",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Flag,
    Mandatory(String),
    Optional(Option<String>),
    Positional(String),
    Subcommand(Parser),
}

/// One registered flag, value, positional or subcommand.
#[derive(Debug, Clone)]
pub struct Entry {
    keyword: Keyword,
    description: String,
    satisfied: bool,
    slot: Slot,
}

impl Entry {
    fn with_slot(keyword: Keyword, description: String, slot: Slot) -> Self {
        Self {
            keyword,
            description,
            satisfied: false,
            slot,
        }
    }

    pub(crate) fn flag(keyword: Keyword, description: String) -> Self {
        Self::with_slot(keyword, description, Slot::Flag)
    }

    pub(crate) fn mandatory(keyword: Keyword, description: String) -> Self {
        Self::with_slot(keyword, description, Slot::Mandatory(String::new()))
    }

    pub(crate) fn optional(keyword: Keyword, description: String) -> Self {
        Self::with_slot(keyword, description, Slot::Optional(None))
    }

    pub(crate) fn positional(name: String, description: String) -> Self {
        Self::with_slot(Keyword::new(name), description, Slot::Positional(String::new()))
    }

    pub(crate) fn subcommand(name: String, description: String) -> Self {
        Self::with_slot(Keyword::new(name), description, Slot::Subcommand(Parser::new()))
    }

    /// The entry's kind.
    pub fn kind(&self) -> EntryKind {
        match self.slot {
            Slot::Flag => EntryKind::Flag,
            Slot::Mandatory(_) => EntryKind::Mandatory,
            Slot::Optional(_) => EntryKind::Optional,
            Slot::Positional(_) => EntryKind::Positional,
            Slot::Subcommand(_) => EntryKind::Subcommand,
        }
    }

    /// The normalized keyword; positionals and subcommands carry their name
    /// verbatim as the primary slot.
    pub fn keyword(&self) -> &Keyword {
        &self.keyword
    }

    /// The primary spelling of the keyword, or the bare name.
    pub fn name(&self) -> &str {
        self.keyword.primary()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the entry was present in the last parse.
    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }

    /// The undecoded value from the last parse.
    ///
    /// Always `None` for flags, subcommands and unsatisfied entries.
    pub fn raw_value(&self) -> Option<&str> {
        if !self.satisfied {
            return None;
        }
        match &self.slot {
            Slot::Mandatory(value) | Slot::Positional(value) => Some(value.as_str()),
            Slot::Optional(value) => value.as_deref(),
            Slot::Flag | Slot::Subcommand(_) => None,
        }
    }

    /// The nested parser of a subcommand entry.
    pub fn parser(&self) -> Option<&Parser> {
        match &self.slot {
            Slot::Subcommand(parser) => Some(parser),
            _ => None,
        }
    }

    pub(crate) fn parser_mut(&mut self) -> Option<&mut Parser> {
        match &mut self.slot {
            Slot::Subcommand(parser) => Some(parser),
            _ => None,
        }
    }

    pub(crate) fn mark_satisfied(&mut self) {
        self.satisfied = true;
    }

    /// Stores a value and marks the entry satisfied.
    ///
    /// Flags and subcommands carry no value; for them this only marks.
    pub(crate) fn store(&mut self, value: String) {
        match &mut self.slot {
            Slot::Mandatory(slot) | Slot::Positional(slot) => *slot = value,
            Slot::Optional(slot) => *slot = Some(value),
            Slot::Flag | Slot::Subcommand(_) => {}
        }
        self.satisfied = true;
    }

    /// Clears the satisfied marker and payload, recursing into subcommands.
    pub(crate) fn reset(&mut self) {
        self.satisfied = false;
        match &mut self.slot {
            Slot::Mandatory(slot) | Slot::Positional(slot) => slot.clear(),
            Slot::Optional(slot) => *slot = None,
            Slot::Subcommand(parser) => parser.reset(),
            Slot::Flag => {}
        }
    }
}
