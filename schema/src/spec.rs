//! Declarative command specs.
//!
//! A [`CommandSpec`] describes one command level in YAML or JSON and turns
//! into a ready-to-use [`Parser`] through [`CommandSpec::build`].
//!
//! # Example YAML
//!
//! ```yaml
//! name: tool
//! description: Example tool
//! flags:
//!   - { name: verbose, short: v, description: Print more }
//! required:
//!   - { name: mode, short: m, type: string }
//! optional:
//!   - { name: jobs, short: j, type: integer }
//! positionals:
//!   - { name: input }
//! subcommands:
//!   - name: version
//!     description: Print the version
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use argscope_core::{Keyword, Parser, SchemaError, ValueKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SpecError};

/// On-disk encoding of a spec or report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Detects the format from a file extension (`.json`, `.yaml`, `.yml`).
    ///
    /// # Errors
    ///
    /// [`SpecError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(SpecError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Serializes `value` in this format.
    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        Ok(match self {
            Self::Json => serde_json::to_string_pretty(value)?,
            Self::Yaml => serde_yaml::to_string(value)?,
        })
    }
}

/// A boolean flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSpec {
    /// Long name, with or without leading dashes.
    pub name: String,
    /// Abbreviation, with or without a leading dash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// A keyed value, mandatory or optional depending on the list it is in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Declared type; values are decoded to it in reports.
    #[serde(default, rename = "type")]
    pub kind: ValueKind,
}

/// A positional slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: ValueKind,
}

fn keyword(name: &str, short: Option<&str>) -> Keyword {
    match short {
        Some(short) => Keyword::with_abbreviation(name, short),
        None => Keyword::new(name),
    }
}

impl FlagSpec {
    pub fn keyword(&self) -> Keyword {
        keyword(&self.name, self.short.as_deref())
    }
}

impl ValueSpec {
    pub fn keyword(&self) -> Keyword {
        keyword(&self.name, self.short.as_deref())
    }
}

/// One command level: its entries and nested subcommands.
///
/// Every list defaults to empty, so a spec only needs a `name`.
///
/// # Examples
///
/// ```
/// use argscope_schema::CommandSpec;
///
/// let spec = CommandSpec::from_yaml_str(
///     "name: tool\nflags:\n  - { name: verbose, short: v }\npositionals:\n  - { name: input }\n",
/// )
/// .unwrap();
///
/// let mut parser = spec.build().unwrap();
/// parser.parse(["-v", "in.txt"]).unwrap();
/// assert!(parser.flag("verbose"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub flags: Vec<FlagSpec>,
    /// Mandatory keyed values.
    #[serde(default)]
    pub required: Vec<ValueSpec>,
    /// Optional keyed values.
    #[serde(default)]
    pub optional: Vec<ValueSpec>,
    #[serde(default)]
    pub positionals: Vec<PositionalSpec>,
    #[serde(default)]
    pub subcommands: Vec<CommandSpec>,
}

impl CommandSpec {
    /// Creates a spec with no entries.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Loads a spec from a `.yaml`, `.yml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](SpecError::IoError) if the file cannot be read,
    /// [`UnsupportedFormat`](SpecError::UnsupportedFormat) for an unknown
    /// extension, or a JSON/YAML error if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = SpecFormat::from_path(path)?;
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let spec: Self = match format {
            SpecFormat::Json => serde_json::from_reader(reader)?,
            SpecFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        debug!(path = %path.display(), command = %spec.name, "Loaded command spec");
        Ok(spec)
    }

    /// Saves the spec, choosing the format from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = SpecFormat::from_path(path)?;
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        match format {
            SpecFormat::Json => serde_json::to_writer_pretty(writer, self)?,
            SpecFormat::Yaml => serde_yaml::to_writer(writer, self)?,
        }
        Ok(())
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Finds a direct subcommand by name.
    pub fn find_subcommand(&self, name: &str) -> Option<&CommandSpec> {
        self.subcommands.iter().find(|sub| sub.name == name)
    }

    /// Builds a parser with every entry of this spec registered, recursing
    /// into subcommands.
    ///
    /// # Errors
    ///
    /// [`SpecError::EmptyCommandName`] for an unnamed command, or
    /// [`SpecError::Registration`] naming the command whose keywords collide.
    pub fn build(&self) -> Result<Parser> {
        if self.name.trim().is_empty() {
            return Err(SpecError::EmptyCommandName);
        }
        let mut parser = Parser::new();
        self.register(&mut parser)?;
        Ok(parser)
    }

    fn register(&self, parser: &mut Parser) -> Result<()> {
        let registration = |source: SchemaError| SpecError::Registration {
            command: self.name.clone(),
            source,
        };

        for flag in &self.flags {
            parser
                .add_flag(flag.keyword(), flag.description.as_str())
                .map_err(registration)?;
        }
        for value in &self.required {
            parser
                .add_mandatory_argument(value.keyword(), value.description.as_str())
                .map_err(registration)?;
        }
        for value in &self.optional {
            parser
                .add_optional_argument(value.keyword(), value.description.as_str())
                .map_err(registration)?;
        }
        for positional in &self.positionals {
            parser
                .add_positional(positional.name.as_str(), positional.description.as_str())
                .map_err(registration)?;
        }
        for sub in &self.subcommands {
            if sub.name.trim().is_empty() {
                return Err(SpecError::EmptyCommandName);
            }
            let child = parser
                .add_subcommand(sub.name.as_str(), sub.description.as_str())
                .map_err(registration)?;
            sub.register(child)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argscope_core::EntryKind;

    fn sample_yaml() -> &'static str {
        r#"
name: tool
description: Example tool
flags:
  - name: verbose
    short: v
    description: Print more
required:
  - name: mode
    short: m
optional:
  - name: jobs
    short: j
    type: integer
  - name: ratio
    type: float
positionals:
  - name: input
subcommands:
  - name: remote
    flags:
      - name: verbose
    subcommands:
      - name: add
        positionals:
          - name: url
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let spec = CommandSpec::from_yaml_str(sample_yaml()).unwrap();
        assert_eq!(spec.name, "tool");
        assert_eq!(spec.flags[0].short.as_deref(), Some("v"));
        assert_eq!(spec.required[0].kind, ValueKind::String);
        assert_eq!(spec.optional[0].kind, ValueKind::Integer);
        assert_eq!(spec.optional[1].kind, ValueKind::Float);
        assert_eq!(spec.subcommands[0].subcommands[0].positionals[0].name, "url");
    }

    #[test]
    fn test_deserialize_minimal() {
        let spec = CommandSpec::from_json_str(r#"{"name": "bare"}"#).unwrap();
        assert_eq!(spec, CommandSpec::new("bare"));
    }

    #[test]
    fn test_build_registers_all_kinds() {
        let spec = CommandSpec::from_yaml_str(sample_yaml()).unwrap();
        let parser = spec.build().unwrap();

        assert_eq!(parser.flag_count(), 1);
        assert_eq!(parser.mandatory_count(), 1);
        assert_eq!(parser.optional_count(), 2);
        assert_eq!(parser.positional_count(), 1);
        assert_eq!(parser.subcommand_count(), 1);

        let remote = parser.subcommand("remote").unwrap();
        assert_eq!(remote.flag_count(), 1);
        let add = remote.subcommand("add").unwrap();
        assert_eq!(add.entries_of(EntryKind::Positional).count(), 1);
    }

    #[test]
    fn test_build_reports_colliding_keywords() {
        let mut spec = CommandSpec::new("tool");
        spec.flags.push(FlagSpec {
            name: "verbose".into(),
            short: Some("v".into()),
            description: String::new(),
        });
        spec.optional.push(ValueSpec {
            name: "value".into(),
            short: Some("v".into()),
            ..Default::default()
        });

        let err = spec.build().unwrap_err();
        match err {
            SpecError::Registration { command, .. } => assert_eq!(command, "tool"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_rejects_empty_names() {
        assert!(matches!(
            CommandSpec::new(" ").build(),
            Err(SpecError::EmptyCommandName)
        ));

        let mut spec = CommandSpec::new("tool");
        spec.subcommands.push(CommandSpec::new(""));
        assert!(matches!(spec.build(), Err(SpecError::EmptyCommandName)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(SpecFormat::from_path(Path::new("a.json")).unwrap(), SpecFormat::Json);
        assert_eq!(SpecFormat::from_path(Path::new("a.yml")).unwrap(), SpecFormat::Yaml);
        assert!(matches!(
            SpecFormat::from_path(Path::new("a.toml")),
            Err(SpecError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let original = CommandSpec::from_yaml_str(sample_yaml()).unwrap();

        for file in ["spec.yaml", "spec.json"] {
            let path = dir.path().join(file);
            original.save(&path).unwrap();
            let loaded = CommandSpec::load(&path).unwrap();
            assert_eq!(loaded, original);
        }
    }
}
