//! Schema-driven command-line argument parsing engine.
//!
//! This crate turns a flat list of raw tokens into a validated view of what
//! was supplied, according to a schema registered up front:
//!
//! - [`Keyword`]: a primary name plus optional abbreviation, equal to another
//!   keyword when any slot matches.
//! - [`Parser`]: the registry of one command level; flags, mandatory and
//!   optional keyed values, positionals and nested subcommands.
//! - [`Entry`] / [`EntryKind`]: read-only access to registered entries, for
//!   usage and help renderers.
//! - [`FromValue`] / [`ValueKind`]: the value codec used by typed lookups.
//!
//! Registration fails with [`SchemaError`]; parsing fails with
//! [`ParseError`]; typed lookups fail with [`DecodeError`].
//!
//! # Example
//!
//! ```
//! use argscope_core::*;
//!
//! let mut parser = Parser::new();
//! parser
//!     .add_flag(("flag", "f"), "a switch")
//!     .unwrap()
//!     .add_optional_argument(("double", "d"), "a number")
//!     .unwrap();
//! parser
//!     .add_subcommand("sub", "a nested command")
//!     .unwrap()
//!     .add_flag("x", "nested switch")
//!     .unwrap();
//!
//! parser.parse(["f", "-d:3.14"]).unwrap();
//! assert!(parser.flag("flag"));
//! assert_eq!(parser.value::<f64>("d").unwrap(), Some(3.14));
//!
//! parser.parse(["sub", "x"]).unwrap();
//! assert!(!parser.flag("flag"));
//! assert_eq!(parser.dispatched(), Some("sub"));
//! assert!(parser.subcommand("sub").unwrap().flag("x"));
//! ```

mod entry;
mod error;
mod keyword;
mod matcher;
mod parser;
mod value;

pub use entry::{Entry, EntryKind};
pub use error::{DecodeError, ParseError, SchemaError};
pub use keyword::Keyword;
pub use matcher::ValueForm;
pub use parser::Parser;
pub use value::{FromValue, TypedValue, ValueKind};
