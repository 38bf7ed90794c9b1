//! The parsing engine.
//!
//! A [`Parser`] owns the registered entries of one command level. Schema
//! construction appends entries; [`Parser::parse`] then reduces a token list
//! in a fixed order:
//!
//! 1. reset every entry (recursively, including subcommand parsers),
//! 2. dispatch to a subcommand if the first token names one, and stop,
//! 3. extract keyed values (mandatory and optional) and check that every
//!    mandatory value was supplied,
//! 4. extract flags,
//! 5. assign the leftover tokens to positionals, which must match in number.
//!
//! `parse` takes `&mut self`, so one parse always completes (including all
//! subcommand recursion) before the parser can be read or parsed again.
//!
//! # Examples
//!
//! ```
//! use argscope_core::Parser;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut parser = Parser::new();
//! parser
//!     .add_flag(("verbose", "v"), "print more")?
//!     .add_optional_argument(("jobs", "j"), "parallel jobs")?
//!     .add_positional("input", "file to read")?;
//!
//! parser.parse(["-v", "-j=4", "data.txt"])?;
//! assert!(parser.flag("verbose"));
//! assert_eq!(parser.value::<u32>("jobs")?, Some(4));
//! assert_eq!(parser.value::<String>("input")?.as_deref(), Some("data.txt"));
//! # Ok(())
//! # }
//! ```

use tracing::{debug, trace};

use crate::entry::{Entry, EntryKind};
use crate::error::{DecodeError, ParseError, SchemaError};
use crate::keyword::Keyword;
use crate::matcher::{Decoded, decode_keyword};
use crate::value::FromValue;

/// Lookup order of [`Parser::value`].
const VALUE_LOOKUP_ORDER: [EntryKind; 3] = [
    EntryKind::Optional,
    EntryKind::Mandatory,
    EntryKind::Positional,
];

/// Registry and parser for one command level.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    /// Un-dashed keywords of every flag, value and subcommand in this scope.
    keywords: Vec<Keyword>,
    entries: Vec<Entry>,
}

/// A keyed-value match: which entry, and how the token spelled it.
struct KeyedMatch<'t> {
    entry: usize,
    decoded: Decoded<'t>,
}

impl Parser {
    /// Creates an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Registers a subcommand and returns its (empty) parser for further
    /// registration.
    ///
    /// The name is used verbatim. The child parser has its own keyword scope.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateKeyword`] if the name collides with a keyword
    /// in this scope, [`SchemaError::EmptyKeyword`] if it is empty.
    pub fn add_subcommand(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&mut Parser, SchemaError> {
        let name = name.into();
        self.register(&Keyword::new(name.as_str()))?;
        let index = self.entries.len();
        self.entries
            .push(Entry::subcommand(name, description.into()));
        match self.entries[index].parser_mut() {
            Some(parser) => Ok(parser),
            None => unreachable!("subcommand entry always owns a parser"),
        }
    }

    /// Registers a boolean flag.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateKeyword`] or [`SchemaError::EmptyKeyword`].
    pub fn add_flag(
        &mut self,
        keyword: impl Into<Keyword>,
        description: impl Into<String>,
    ) -> Result<&mut Self, SchemaError> {
        let keyword = keyword.into();
        self.register(&keyword)?;
        self.entries
            .push(Entry::flag(keyword.normalized(), description.into()));
        Ok(self)
    }

    /// Registers a keyed value that must be supplied on every parse.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateKeyword`] or [`SchemaError::EmptyKeyword`].
    pub fn add_mandatory_argument(
        &mut self,
        keyword: impl Into<Keyword>,
        description: impl Into<String>,
    ) -> Result<&mut Self, SchemaError> {
        let keyword = keyword.into();
        self.register(&keyword)?;
        self.entries
            .push(Entry::mandatory(keyword.normalized(), description.into()));
        Ok(self)
    }

    /// Registers a keyed value that may be omitted.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateKeyword`] or [`SchemaError::EmptyKeyword`].
    pub fn add_optional_argument(
        &mut self,
        keyword: impl Into<Keyword>,
        description: impl Into<String>,
    ) -> Result<&mut Self, SchemaError> {
        let keyword = keyword.into();
        self.register(&keyword)?;
        self.entries
            .push(Entry::optional(keyword.normalized(), description.into()));
        Ok(self)
    }

    /// Registers a keyed value, mandatory when `required` is set.
    pub fn add_argument(
        &mut self,
        keyword: impl Into<Keyword>,
        description: impl Into<String>,
        required: bool,
    ) -> Result<&mut Self, SchemaError> {
        if required {
            self.add_mandatory_argument(keyword, description)
        } else {
            self.add_optional_argument(keyword, description)
        }
    }

    /// Registers a positional slot. Positionals are filled in registration
    /// order.
    ///
    /// Positional names are not keywords and do not enter the uniqueness
    /// index; registering the same name twice is allowed.
    ///
    /// # Errors
    ///
    /// [`SchemaError::EmptyKeyword`] if the name is empty.
    pub fn add_positional(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&mut Self, SchemaError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::EmptyKeyword);
        }
        self.entries
            .push(Entry::positional(name, description.into()));
        Ok(self)
    }

    fn register(&mut self, keyword: &Keyword) -> Result<(), SchemaError> {
        if keyword.is_blank() {
            return Err(SchemaError::EmptyKeyword);
        }
        let bare = keyword.bare();
        if self.keywords.iter().any(|known| *known == bare) {
            return Err(SchemaError::DuplicateKeyword(keyword.clone()));
        }
        self.keywords.push(bare);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// All registered entries in registration order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Registered entries of one kind, in registration order.
    pub fn entries_of(&self, kind: EntryKind) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(move |entry| entry.kind() == kind)
    }

    /// Number of registered subcommands.
    pub fn subcommand_count(&self) -> usize {
        self.entries_of(EntryKind::Subcommand).count()
    }

    /// Number of registered flags.
    pub fn flag_count(&self) -> usize {
        self.entries_of(EntryKind::Flag).count()
    }

    /// Number of registered mandatory keyed values.
    pub fn mandatory_count(&self) -> usize {
        self.entries_of(EntryKind::Mandatory).count()
    }

    /// Number of registered optional keyed values.
    pub fn optional_count(&self) -> usize {
        self.entries_of(EntryKind::Optional).count()
    }

    /// Number of registered positionals.
    pub fn positional_count(&self) -> usize {
        self.entries_of(EntryKind::Positional).count()
    }

    /// The parser of a registered subcommand, or `None` if no subcommand has
    /// that name.
    pub fn subcommand(&self, name: &str) -> Option<&Parser> {
        self.entries_of(EntryKind::Subcommand)
            .find(|entry| entry.keyword().matches(name))
            .and_then(Entry::parser)
    }

    /// Mutable access to a registered subcommand's parser.
    pub fn subcommand_mut(&mut self, name: &str) -> Option<&mut Parser> {
        self.entries
            .iter_mut()
            .filter(|entry| entry.kind() == EntryKind::Subcommand)
            .find(|entry| entry.keyword().matches(name))
            .and_then(Entry::parser_mut)
    }

    /// Name of the subcommand that consumed the last parse at this level.
    pub fn dispatched(&self) -> Option<&str> {
        self.dispatched_entry().map(Entry::name)
    }

    /// The innermost parser reached by the last parse (`self` if no
    /// subcommand was dispatched).
    pub fn active(&self) -> &Parser {
        match self.dispatched_entry().and_then(Entry::parser) {
            Some(child) => child.active(),
            None => self,
        }
    }

    fn dispatched_entry(&self) -> Option<&Entry> {
        self.entries_of(EntryKind::Subcommand)
            .find(|entry| entry.is_satisfied())
    }

    // ------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------

    /// Parses a token list. The program name must already be stripped; see
    /// [`Parser::parse_args`] for a full argv.
    ///
    /// State from any earlier parse is discarded first, so sequential calls
    /// are independent.
    ///
    /// Keyed-value extraction runs before flag extraction, with two
    /// refinements:
    ///
    /// - when several keyword forms prefix a token, the longest one wins
    ///   (`-ot` over `-o` for `-otx`),
    /// - a token that exactly names a registered flag is left for flag
    ///   extraction and never decoded as a keyed value (with flag `flag` and
    ///   optional `fl`, `--flag` sets the flag rather than giving `fl` the
    ///   value `ag`).
    ///
    /// A keyword given as the last token with no value after it is not a
    /// positional; it is reported as an unknown argument (or as a missing
    /// mandatory value, which is checked first).
    ///
    /// # Errors
    ///
    /// - [`ParseError::MissingMandatory`] if a mandatory value is absent,
    /// - [`ParseError::UnknownArguments`] if more tokens remain than
    ///   positionals are registered,
    /// - [`ParseError::MissingPositionals`] if fewer remain,
    /// - [`ParseError::InSubcommand`] wrapping any of the above raised by a
    ///   dispatched subcommand.
    pub fn parse<I, S>(&mut self, tokens: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        self.reset();
        self.parse_tokens(tokens)
    }

    /// Parses a full argv, skipping the program name.
    pub fn parse_args<I, S>(&mut self, argv: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parse(argv.into_iter().skip(1))
    }

    /// Parses the arguments of the current process.
    pub fn parse_env(&mut self) -> Result<(), ParseError> {
        self.parse_args(std::env::args())
    }

    pub(crate) fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.reset();
        }
    }

    fn parse_tokens(&mut self, mut tokens: Vec<String>) -> Result<(), ParseError> {
        if let Some(index) = tokens.first().and_then(|first| self.find_subcommand(first)) {
            tokens.remove(0);
            return self.dispatch(index, tokens);
        }

        let dangling = self.extract_keyed_values(&mut tokens);
        self.check_mandatory()?;
        if let Some(token) = dangling {
            return Err(ParseError::UnknownArguments {
                tokens: vec![token],
            });
        }
        self.extract_flags(&mut tokens);
        self.assign_positionals(tokens)
    }

    fn find_subcommand(&self, token: &str) -> Option<usize> {
        self.entries.iter().position(|entry| {
            entry.kind() == EntryKind::Subcommand && entry.keyword().matches(token)
        })
    }

    fn dispatch(&mut self, index: usize, tokens: Vec<String>) -> Result<(), ParseError> {
        let entry = &mut self.entries[index];
        debug!(subcommand = %entry.name(), remaining = tokens.len(), "Dispatching to subcommand");
        entry.mark_satisfied();
        let name = entry.name().to_string();
        match entry.parser_mut() {
            Some(child) => child
                .parse_tokens(tokens)
                .map_err(|source| ParseError::InSubcommand {
                    name,
                    source: Box::new(source),
                }),
            None => Ok(()),
        }
    }

    fn is_flag_token(&self, token: &str) -> bool {
        self.entries_of(EntryKind::Flag)
            .any(|entry| entry.keyword().matches_bare(token))
    }

    /// Finds the keyed entry a token belongs to.
    ///
    /// When several keyword forms prefix the token (`-o` and `-ot` against
    /// `-otx`), the longest form wins. Two forms of equal length that both
    /// prefix the token are equal strings, which registration rejects.
    fn find_keyed<'t>(&self, token: &'t str, next: Option<&'t str>) -> Option<KeyedMatch<'t>> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                matches!(entry.kind(), EntryKind::Mandatory | EntryKind::Optional)
            })
            .filter_map(|(index, entry)| {
                decode_keyword(entry.keyword(), token, next).map(|decoded| KeyedMatch {
                    entry: index,
                    decoded,
                })
            })
            .max_by_key(|found| found.decoded.matched_len)
    }

    fn names_keyed_entry(&self, token: &str) -> bool {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.kind(), EntryKind::Mandatory | EntryKind::Optional))
            .any(|entry| entry.keyword().matches(token))
    }

    /// Removes keyed values from `tokens`, scanning left to right and
    /// re-examining the same position after each removal.
    ///
    /// A trailing token that names a keyed entry but has no value after it
    /// is removed too and returned, so it never reaches a positional.
    fn extract_keyed_values(&mut self, tokens: &mut Vec<String>) -> Option<String> {
        let mut dangling = None;
        let mut position = 0;
        while position < tokens.len() {
            let token = tokens[position].as_str();
            if self.is_flag_token(token) {
                position += 1;
                continue;
            }

            let next = tokens.get(position + 1).map(String::as_str);
            let Some(found) = self.find_keyed(token, next) else {
                if next.is_none() && self.names_keyed_entry(token) {
                    debug!(token, "Keyword without value");
                    dangling = tokens.pop();
                    break;
                }
                trace!(token, "No keyed value");
                position += 1;
                continue;
            };

            let value = found.decoded.value.to_string();
            let consumed = found.decoded.form.consumed();
            let entry = &mut self.entries[found.entry];
            debug!(
                keyword = %entry.keyword(),
                form = ?found.decoded.form,
                value = %value,
                "Matched keyed value"
            );
            entry.store(value);
            tokens.drain(position..position + consumed);
        }
        dangling
    }

    fn check_mandatory(&self) -> Result<(), ParseError> {
        let missing: Vec<Keyword> = self
            .entries_of(EntryKind::Mandatory)
            .filter(|entry| !entry.is_satisfied())
            .map(|entry| entry.keyword().clone())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ParseError::MissingMandatory { keywords: missing })
        }
    }

    fn extract_flags(&mut self, tokens: &mut Vec<String>) {
        let entries = &mut self.entries;
        tokens.retain(|token| {
            let flag = entries.iter_mut().find(|entry| {
                entry.kind() == EntryKind::Flag && entry.keyword().matches_bare(token)
            });
            match flag {
                Some(entry) => {
                    trace!(token = %token, "Matched flag");
                    entry.mark_satisfied();
                    false
                }
                None => true,
            }
        });
    }

    fn assign_positionals(&mut self, tokens: Vec<String>) -> Result<(), ParseError> {
        let slots: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.kind() == EntryKind::Positional)
            .map(|(index, _)| index)
            .collect();
        debug!(leftover = tokens.len(), positionals = slots.len(), "Assigning positionals");

        if tokens.len() > slots.len() {
            return Err(ParseError::UnknownArguments {
                tokens: tokens[slots.len()..].to_vec(),
            });
        }
        if tokens.len() < slots.len() {
            return Err(ParseError::MissingPositionals {
                names: slots[tokens.len()..]
                    .iter()
                    .map(|&index| self.entries[index].name().to_string())
                    .collect(),
            });
        }

        for (index, token) in slots.into_iter().zip(tokens) {
            self.entries[index].store(token);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Typed lookup
    // ------------------------------------------------------------------

    /// Decodes the value of the first optional, mandatory or positional
    /// entry named by `keyword`.
    ///
    /// Keywords are compared without leading dashes, so `"d"`, `"-d"` and
    /// `("double", "d")` all address an entry registered as
    /// `("double", "d")`.
    ///
    /// Returns `Ok(None)` if nothing is registered under `keyword` or the
    /// entry was not satisfied by the last parse.
    ///
    /// # Errors
    ///
    /// [`DecodeError`] if the stored text does not convert to `T`.
    pub fn value<T: FromValue>(&self, keyword: impl Into<Keyword>) -> Result<Option<T>, DecodeError> {
        self.raw_value(keyword).map(T::decode).transpose()
    }

    /// The undecoded value behind [`Parser::value`].
    pub fn raw_value(&self, keyword: impl Into<Keyword>) -> Option<&str> {
        let keyword = keyword.into();
        VALUE_LOOKUP_ORDER
            .iter()
            .find_map(|&kind| {
                self.entries_of(kind)
                    .find(|entry| entry.keyword().refers_to(&keyword))
            })
            .and_then(Entry::raw_value)
    }

    /// Whether the flag named by `keyword` was set. Unknown flags read as
    /// `false`.
    pub fn flag(&self, keyword: impl Into<Keyword>) -> bool {
        let keyword = keyword.into();
        self.entries_of(EntryKind::Flag)
            .find(|entry| entry.keyword().refers_to(&keyword))
            .is_some_and(Entry::is_satisfied)
    }
}
