//! Declarative command specs for `argscope-core`.
//!
//! A [`CommandSpec`] is the serializable form of a parser schema. Load one
//! from YAML or JSON, [`build`](CommandSpec::build) a [`Parser`] from it,
//! and turn a successful parse into a typed [`ParseReport`].
//!
//! # Quick start
//!
//! ```
//! use argscope_schema::{CommandSpec, TypedValue};
//!
//! let spec = CommandSpec::from_yaml_str(r#"
//! name: tool
//! required:
//!   - { name: jobs, short: j, type: integer }
//! "#).unwrap();
//!
//! let mut parser = spec.build().unwrap();
//! parser.parse(["-j=4"]).unwrap();
//!
//! let report = spec.report(&parser).unwrap();
//! assert_eq!(report.values["jobs"], TypedValue::Integer(4));
//! ```
//!
//! [`Parser`]: argscope_core::Parser

mod error;
mod report;
mod spec;

pub use argscope_core::{TypedValue, ValueKind};
pub use error::{Result, SpecError};
pub use report::{CommandSummary, EntrySummary, ParseReport, PositionalValue, describe};
pub use spec::{CommandSpec, FlagSpec, PositionalSpec, SpecFormat, ValueSpec};
