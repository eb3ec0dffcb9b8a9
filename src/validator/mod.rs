//! Validation of decoded JSON values against a parsed definition
//!
//! Validation is fail-fast: the first failure found walking the definition
//! depth-first in member order ends the walk. The outcome names the failing
//! sub-definition and the path of member names and array indices leading to
//! it.

#![cfg(feature = "json")]

/// JSON validation
pub mod json;
/// Calendar date and time checks
pub mod temporal;

use crate::{ast::Definition, parser};

use std::fmt;

use serde_json::Value;

pub use json::JSONValidator;

/// Validation result of [`validate_json_from_str`]
pub type Result = std::result::Result<(), Error>;

/// Error returned when validating JSON text against notation text
#[derive(Debug, displaydoc::Display)]
pub enum Error {
  /// {0}
  Notation(parser::Error),
  /// error parsing JSON: {0}
  JSONParsing(serde_json::Error),
  /// {0}
  Validation(ValidationError),
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Error::Notation(error) => Some(error),
      Error::JSONParsing(error) => Some(error),
      Error::Validation(error) => Some(error),
    }
  }
}

impl From<parser::Error> for Error {
  fn from(e: parser::Error) -> Self {
    Error::Notation(e)
  }
}

impl From<ValidationError> for Error {
  fn from(e: ValidationError) -> Self {
    Error::Validation(e)
  }
}

/// Step from a parent value into one of its children
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
  /// Object member name
  Name(String),
  /// Zero-based array index
  Index(usize),
}

impl fmt::Display for PathSegment {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      PathSegment::Name(name) => write!(f, "{}", name),
      PathSegment::Index(idx) => write!(f, "{}", idx),
    }
  }
}

impl From<&str> for PathSegment {
  fn from(name: &str) -> Self {
    PathSegment::Name(name.to_string())
  }
}

impl From<usize> for PathSegment {
  fn from(idx: usize) -> Self {
    PathSegment::Index(idx)
  }
}

/// Outcome of validating one value
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome<'a> {
  /// Whether the value satisfies the definition
  pub success: bool,
  /// The root definition on success, otherwise the sub-definition that
  /// rejected a value
  pub declaration: &'a Definition,
  /// Empty on success, otherwise the path from the root value to the
  /// rejected value
  pub path: Vec<PathSegment>,
}

impl<'a> ValidationOutcome<'a> {
  pub(crate) fn succeeded(declaration: &'a Definition) -> Self {
    ValidationOutcome {
      success: true,
      declaration,
      path: Vec::new(),
    }
  }

  pub(crate) fn failed(declaration: &'a Definition, path: Vec<PathSegment>) -> Self {
    ValidationOutcome {
      success: false,
      declaration,
      path,
    }
  }

  /// Slash separated rendering of the path
  pub fn location(&self) -> String {
    let segments = self.path.iter().map(ToString::to_string).collect::<Vec<_>>();

    format!("/{}", segments.join("/"))
  }

  /// Failure message, `None` on success
  pub fn error_message(&self) -> Option<String> {
    if self.success {
      return None;
    }

    Some(format!(
      "value at {} does not satisfy {}",
      self.location(),
      self.declaration
    ))
  }

  /// Converts the outcome into a `Result`, detaching it from the definition
  pub fn into_result(self) -> std::result::Result<(), ValidationError> {
    match self.error_message() {
      None => Ok(()),
      Some(reason) => Err(ValidationError {
        reason,
        declaration: self.declaration.clone(),
        path: self.path,
      }),
    }
  }
}

impl<'a> fmt::Display for ValidationOutcome<'a> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self.error_message() {
      Some(reason) => write!(f, "{}", reason),
      None => write!(f, "value satisfies {}", self.declaration),
    }
  }
}

/// Owned validation failure
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
  /// Error message
  pub reason: String,
  /// Sub-definition that rejected a value
  pub declaration: Definition,
  /// Path from the root value to the rejected value
  pub path: Vec<PathSegment>,
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.reason)
  }
}

impl std::error::Error for ValidationError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    None
  }
}

/// Validator settings
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
  trim_string_length: bool,
}

impl ValidatorOptions {
  /// Default settings
  pub fn new() -> Self {
    Self::default()
  }

  /// Ignore leading and trailing whitespace when measuring a string against
  /// a `string<..>` range. Off by default
  pub fn trim_string_length(mut self, trim: bool) -> Self {
    self.trim_string_length = trim;
    self
  }

  /// Whether string lengths are measured after trimming
  pub fn trims_string_length(&self) -> bool {
    self.trim_string_length
  }
}

/// Validates `value` against `definition` with default settings
///
/// # Example
///
/// ```
/// use pm1::{parse, validate};
/// use serde_json::json;
///
/// let definition = parse("{ plan: { space: int<1000> } }").unwrap();
///
/// let outcome = validate(&definition, &json!({ "plan": { "space": 10 } }));
/// assert!(!outcome.success);
/// assert_eq!(
///   outcome.error_message().unwrap(),
///   "value at /plan/space does not satisfy int<1000>"
/// );
/// ```
pub fn validate<'a>(definition: &'a Definition, value: &Value) -> ValidationOutcome<'a> {
  JSONValidator::new(definition).validate(value)
}

/// Validates a JSON document string against notation text
pub fn validate_json_from_str(notation: &str, json: &str) -> Result {
  let definition = parser::parse(notation)?;
  let value = serde_json::from_str::<Value>(json).map_err(Error::JSONParsing)?;

  validate(&definition, &value).into_result()?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{ast::*, token::Keyword};
  use pretty_assertions::assert_eq;
  use serde_json::json;

  #[test]
  fn verify_outcome_messages() {
    let definition = Definition::from(Keyword::Int);

    let outcome = ValidationOutcome::failed(&definition, vec!["tags".into(), PathSegment::Index(2)]);
    assert_eq!(outcome.location(), "/tags/2");
    assert_eq!(
      outcome.to_string(),
      "value at /tags/2 does not satisfy int"
    );

    let outcome = ValidationOutcome::failed(&definition, Vec::new());
    assert_eq!(
      outcome.error_message(),
      Some("value at / does not satisfy int".to_string())
    );

    assert_eq!(ValidationOutcome::succeeded(&definition).error_message(), None);
  }

  #[test]
  fn verify_into_result() {
    let definition = Definition::from(Object {
      members: vec![Member::new("id", false, Keyword::Int.into())],
    });

    assert!(validate(&definition, &json!({ "id": 7 })).into_result().is_ok());

    let err = validate(&definition, &json!({ "id": "7" }))
      .into_result()
      .unwrap_err();
    assert_eq!(err.declaration, Keyword::Int.into());
    assert_eq!(err.path, vec![PathSegment::from("id")]);
    assert_eq!(err.to_string(), "value at /id does not satisfy int");
  }

  #[test]
  fn verify_validate_json_from_str() {
    assert!(validate_json_from_str("[int]", "[0, 1, 2]").is_ok());

    assert!(matches!(
      validate_json_from_str("{ a: int<0> }", r#"{ "a": -1 }"#),
      Err(Error::Validation(_))
    ));
    assert!(matches!(
      validate_json_from_str("[int<0>]", "[0]"),
      Err(Error::Notation(_))
    ));
    assert!(matches!(
      validate_json_from_str("[int", "[0]"),
      Err(Error::Notation(_))
    ));
    assert!(matches!(
      validate_json_from_str("[int]", "[0,"),
      Err(Error::JSONParsing(_))
    ));
  }
}
