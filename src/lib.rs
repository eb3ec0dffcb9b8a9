//! # pm1
//!
//! A parser, validator and describer for PM1, a compact schema notation for
//! JSON-like data. A schema is a single value expression:
//!
//! ```text
//! {
//!   id: int<1>,                      // positive identifier
//!   name: /^[a-z]+$/i,
//!   state: (active=1, closed=0),
//!   plan?: { space: int<1000> },
//!   tags: [string<1,32>],
//!   created: datetime,
//! }
//! ```
//!
//! The crate turns notation text into a [`Definition`] tree, checks decoded
//! JSON values against it and renders a definition back to canonical text for
//! diagnostics.
//!
//! ## Notation
//!
//! - Primitives: `int`, `double`, `bool`, `string`, `byte` (an integer from 0
//!   to 255), `date` (`YYYY-MM-DD`), `datetime` and `time` (`HH:MM:SS`)
//! - Ranges on `int`, `double` and `string` with inclusive bounds:
//!   `int<1,10>`, `double<0.5>`, `string<,64>`. String bounds count
//!   characters
//! - Regular expressions with optional `g`, `i` and `m` flags, matching
//!   anywhere in a string unless anchored
//! - Objects with required and `?` optional members. Optional members may be
//!   absent or null and unknown members are ignored
//! - Enumerations of integers with optional labels
//! - Arrays of a primitive, enumeration or object, or `[]` for any array
//! - `//` line comments and `/* */` block comments
//!
//! ## Example
//!
//! ```
//! use pm1::{describe, parse, validate};
//! use serde_json::json;
//!
//! let definition = parse("{ id: int<1>, tags?: [string] }").unwrap();
//! assert_eq!(describe(&definition), "{ id: int<1>, tags?: [string] }");
//!
//! assert!(validate(&definition, &json!({ "id": 7 })).success);
//!
//! let outcome = validate(&definition, &json!({ "id": 7, "tags": ["a", 2] }));
//! assert_eq!(
//!   outcome.error_message().unwrap(),
//!   "value at /tags/1 does not satisfy string"
//! );
//! ```
//!
//! ## Features
//!
//! - `json`: validation of [`serde_json::Value`]s, with calendar checks backed
//!   by `chrono`
//! - `cache`: [`Filter`], which compiles schema files once and keeps
//!   serialized definitions in a cache directory
//! - `cli`: the `pm1` command-line tool
//!
//! All features are enabled by default. Parsing and describing are always
//! available.

#![warn(missing_docs)]

/// Parsed schema tree
pub mod ast;
/// Comment removal ahead of parsing
pub mod comments;
/// Rendering definitions back to notation
pub mod describe;
/// Syntax error messages
pub mod error;
/// Character cursor over notation text
pub mod lexer;
/// Notation parser
pub mod parser;
/// Primitive keywords and numeric literals
pub mod token;
/// Validation of JSON values
#[cfg(feature = "json")]
pub mod validator;
/// Compiled schema files with a disk cache
#[cfg(feature = "cache")]
pub mod filter;

#[doc(inline)]
pub use self::{
  ast::Definition,
  describe::describe,
  parser::{parse, Error as ParserError},
};

#[doc(inline)]
#[cfg(feature = "json")]
pub use self::validator::{validate, ValidationOutcome, ValidatorOptions};

#[doc(inline)]
#[cfg(feature = "cache")]
pub use self::filter::Filter;
