//! Structured views of a parser: what a parse produced, and what a schema
//! declares.

use std::collections::BTreeMap;

use argscope_core::{EntryKind, Parser, TypedValue, ValueKind};
use serde::Serialize;
use tracing::trace;

use crate::error::{Result, SpecError};
use crate::spec::CommandSpec;

/// The outcome of a successful parse, with values decoded to their declared
/// types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport {
    pub command: String,
    /// Every declared flag and whether it was present.
    pub flags: BTreeMap<String, bool>,
    /// Supplied keyed values; omitted optionals are absent.
    pub values: BTreeMap<String, TypedValue>,
    /// Positional values in registration order.
    pub positionals: Vec<PositionalValue>,
    /// Report of the dispatched subcommand, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcommand: Option<Box<ParseReport>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionalValue {
    pub name: String,
    pub value: TypedValue,
}

impl ParseReport {
    /// Follows dispatched subcommands down to the innermost report.
    pub fn innermost(&self) -> &ParseReport {
        match &self.subcommand {
            Some(child) => child.innermost(),
            None => self,
        }
    }
}

fn decode(name: &str, kind: ValueKind, raw: Option<&str>) -> Result<Option<TypedValue>> {
    raw.map(|raw| kind.decode(raw))
        .transpose()
        .map_err(|source| SpecError::Decode {
            name: name.to_string(),
            source,
        })
}

impl CommandSpec {
    /// Builds a report from a parser that was built from this spec and has
    /// just parsed successfully.
    ///
    /// Spec entries are paired with parser entries by position, so `parser`
    /// must come from [`CommandSpec::build`] on this spec.
    ///
    /// # Errors
    ///
    /// [`SpecError::ParserMismatch`] if the entry counts of `parser` differ
    /// from this spec at any dispatched level, or [`SpecError::Decode`] if a
    /// value does not match its declared type.
    pub fn report(&self, parser: &Parser) -> Result<ParseReport> {
        self.check_shape(parser)?;

        let flags = self
            .flags
            .iter()
            .zip(parser.entries_of(EntryKind::Flag))
            .map(|(spec, entry)| (spec.name.clone(), entry.is_satisfied()))
            .collect();

        let mut values = BTreeMap::new();
        let keyed = parser
            .entries_of(EntryKind::Mandatory)
            .zip(&self.required)
            .chain(parser.entries_of(EntryKind::Optional).zip(&self.optional));
        for (entry, spec) in keyed {
            if let Some(value) = decode(&spec.name, spec.kind, entry.raw_value())? {
                values.insert(spec.name.clone(), value);
            }
        }

        let mut positionals = Vec::with_capacity(self.positionals.len());
        for (entry, spec) in parser.entries_of(EntryKind::Positional).zip(&self.positionals) {
            if let Some(value) = decode(&spec.name, spec.kind, entry.raw_value())? {
                positionals.push(PositionalValue {
                    name: spec.name.clone(),
                    value,
                });
            }
        }

        let subcommand = match parser.dispatched() {
            Some(name) => {
                trace!(command = %self.name, subcommand = %name, "Reporting subcommand");
                let spec = self.find_subcommand(name).ok_or_else(|| SpecError::ParserMismatch {
                    command: self.name.clone(),
                    detail: format!("unknown subcommand `{name}`"),
                })?;
                match parser.subcommand(name) {
                    Some(child) => Some(Box::new(spec.report(child)?)),
                    None => None,
                }
            }
            None => None,
        };

        Ok(ParseReport {
            command: self.name.clone(),
            flags,
            values,
            positionals,
            subcommand,
        })
    }

    fn check_shape(&self, parser: &Parser) -> Result<()> {
        let counts = [
            ("flags", self.flags.len(), parser.flag_count()),
            ("required values", self.required.len(), parser.mandatory_count()),
            ("optional values", self.optional.len(), parser.optional_count()),
            ("positionals", self.positionals.len(), parser.positional_count()),
            ("subcommands", self.subcommands.len(), parser.subcommand_count()),
        ];
        match counts.iter().find(|(_, declared, registered)| declared != registered) {
            Some((what, declared, registered)) => Err(SpecError::ParserMismatch {
                command: self.name.clone(),
                detail: format!("{declared} {what} declared, {registered} registered"),
            }),
            None => Ok(()),
        }
    }
}

/// A registered entry as shown by `describe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub kind: EntryKind,
    /// Keyword as matched on the command line, e.g. `--mode, -m`.
    pub keyword: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Shape of one command level of a built parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSummary {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub flags: usize,
    pub mandatory: usize,
    pub optional: usize,
    pub positionals: usize,
    pub entries: Vec<EntrySummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandSummary>,
}

/// Summarizes a parser and its subcommands in registration order.
pub fn describe(name: &str, description: &str, parser: &Parser) -> CommandSummary {
    let entries = parser
        .entries()
        .iter()
        .map(|entry| EntrySummary {
            kind: entry.kind(),
            keyword: entry.keyword().to_string(),
            description: entry.description().to_string(),
        })
        .collect();

    let subcommands = parser
        .entries_of(EntryKind::Subcommand)
        .filter_map(|entry| {
            entry
                .parser()
                .map(|child| describe(entry.name(), entry.description(), child))
        })
        .collect();

    CommandSummary {
        name: name.to_string(),
        description: description.to_string(),
        flags: parser.flag_count(),
        mandatory: parser.mandatory_count(),
        optional: parser.optional_count(),
        positionals: parser.positional_count(),
        entries,
        subcommands,
    }
}
