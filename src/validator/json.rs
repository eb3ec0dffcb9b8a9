use super::{temporal, PathSegment, ValidationOutcome, ValidatorOptions};
use crate::{
  ast::*,
  token::{Keyword, Numeric},
};

use std::{cell::RefCell, cmp::Ordering, collections::HashMap};

use regex::Regex;
use serde_json::{Number, Value};

/// Matches JSON values against a definition
///
/// One instance can validate any number of values. Regular expressions are
/// compiled the first time they are matched and reused afterwards.
#[derive(Debug, Clone)]
pub struct JSONValidator<'a> {
  definition: &'a Definition,
  options: ValidatorOptions,
  // Keyed by node address, `None` for patterns that fail to compile
  patterns: RefCell<HashMap<usize, Option<Regex>>>,
}

/// Sub-definition that rejected a value
type Rejection<'a> = std::result::Result<(), &'a Definition>;

/// Numeric measure of a value compared against range bounds
#[derive(Debug, Clone, Copy)]
enum Magnitude {
  Integer(i128),
  Float(f64),
}

impl<'a> JSONValidator<'a> {
  /// New validator with default options
  pub fn new(definition: &'a Definition) -> Self {
    Self::with_options(definition, ValidatorOptions::default())
  }

  /// New validator with the given options
  pub fn with_options(definition: &'a Definition, options: ValidatorOptions) -> Self {
    JSONValidator {
      definition,
      options,
      patterns: RefCell::new(HashMap::new()),
    }
  }

  /// Validates a value, stopping at the first failure
  pub fn validate(&self, value: &Value) -> ValidationOutcome<'a> {
    let mut path = Vec::new();

    match self.validate_definition(self.definition, value, &mut path) {
      Ok(()) => ValidationOutcome::succeeded(self.definition),
      Err(declaration) => {
        log::debug!(
          "rejected value at /{} against {}",
          path.iter().map(ToString::to_string).collect::<Vec<_>>().join("/"),
          declaration
        );

        ValidationOutcome::failed(declaration, path)
      }
    }
  }

  /// On failure `path` is left pointing at the rejected value
  fn validate_definition(
    &self,
    definition: &'a Definition,
    value: &Value,
    path: &mut Vec<PathSegment>,
  ) -> Rejection<'a> {
    let accepted = match definition {
      Definition::Primitive(keyword) => is_primitive(*keyword, value),
      Definition::Range(range) => self.is_in_range(range, value),
      Definition::RegularExpression(re) => self.is_match(re, value),
      Definition::Enumeration(enumeration) => is_enumerated(enumeration, value),
      Definition::Object(object) => return self.validate_object(definition, object, value, path),
      Definition::Array(array) => return self.validate_array(definition, array, value, path),
    };

    if accepted {
      Ok(())
    } else {
      Err(definition)
    }
  }

  fn validate_object(
    &self,
    definition: &'a Definition,
    object: &'a Object,
    value: &Value,
    path: &mut Vec<PathSegment>,
  ) -> Rejection<'a> {
    let map = match value {
      Value::Object(map) => map,
      _ => return Err(definition),
    };

    // Missing required members are validated as null so the failure names
    // the member definition
    let null = Value::Null;

    for member in object.members.iter() {
      let entry = map.get(&member.name);

      if member.optional && matches!(entry, None | Some(Value::Null)) {
        log::trace!("skipping absent optional member {}", member.name);
        continue;
      }

      path.push(PathSegment::Name(member.name.clone()));
      self.validate_definition(&member.value, entry.unwrap_or(&null), path)?;
      path.pop();
    }

    Ok(())
  }

  fn validate_array(
    &self,
    definition: &'a Definition,
    array: &'a Array,
    value: &Value,
    path: &mut Vec<PathSegment>,
  ) -> Rejection<'a> {
    let items = match value {
      Value::Array(items) => items,
      _ => return Err(definition),
    };

    let element = match &array.element {
      Some(element) => element,
      None => return Ok(()),
    };

    for (idx, item) in items.iter().enumerate() {
      path.push(PathSegment::Index(idx));
      self.validate_definition(element, item, path)?;
      path.pop();
    }

    Ok(())
  }

  /// Unanchored search. A pattern that fails to compile matches nothing
  fn is_match(&self, re: &RegularExpression, value: &Value) -> bool {
    let s = match value.as_str() {
      Some(s) => s,
      None => return false,
    };

    let mut patterns = self.patterns.borrow_mut();
    let compiled = patterns
      .entry(re as *const RegularExpression as usize)
      .or_insert_with(|| match re.to_regex() {
        Ok(regex) => Some(regex),
        Err(e) => {
          log::debug!("pattern /{}/ does not compile: {}", re.pattern, e);
          None
        }
      });

    compiled.as_ref().map_or(false, |regex| regex.is_match(s))
  }

  #[cfg(test)]
  fn compiled_patterns(&self) -> usize {
    self.patterns.borrow().len()
  }

  fn is_in_range(&self, range: &Range, value: &Value) -> bool {
    let magnitude = match (range.keyword, value) {
      (Keyword::Int, Value::Number(n)) => integer_magnitude(n),
      (Keyword::Double, Value::Number(n)) => n.as_f64().map(Magnitude::Float),
      (Keyword::String, Value::String(s)) => {
        let s = if self.options.trims_string_length() {
          s.trim()
        } else {
          s.as_str()
        };

        Some(Magnitude::Integer(s.chars().count() as i128))
      }
      // Ranges only apply to int, double and string
      _ => None,
    };

    let magnitude = match magnitude {
      Some(magnitude) => magnitude,
      None => return false,
    };

    let above_minimum = range
      .minimum
      .map_or(true, |min| magnitude.compare(min) != Some(Ordering::Less));
    let below_maximum = range
      .maximum
      .map_or(true, |max| magnitude.compare(max) != Some(Ordering::Greater));

    above_minimum && below_maximum
  }
}

impl Magnitude {
  /// `None` when either side is NaN
  fn compare(self, bound: Numeric) -> Option<Ordering> {
    match (self, bound) {
      (Magnitude::Integer(v), Numeric::INT(b)) => Some(v.cmp(&i128::from(b))),
      (Magnitude::Integer(v), Numeric::FLOAT(b)) => (v as f64).partial_cmp(&b),
      (Magnitude::Float(v), b) => v.partial_cmp(&b.as_f64()),
    }
  }
}

fn integer_magnitude(n: &Number) -> Option<Magnitude> {
  n.as_i64()
    .map(i128::from)
    .or_else(|| n.as_u64().map(i128::from))
    .map(Magnitude::Integer)
}

fn is_integer(value: &Value) -> bool {
  matches!(value, Value::Number(n) if n.is_i64() || n.is_u64())
}

fn is_primitive(keyword: Keyword, value: &Value) -> bool {
  match keyword {
    Keyword::Int => is_integer(value),
    Keyword::Double => value.is_number(),
    Keyword::Bool => value.is_boolean(),
    Keyword::String => value.is_string(),
    Keyword::Byte => value.as_u64().map_or(false, |b| b <= u64::from(u8::MAX)),
    Keyword::Date => value.as_str().map_or(false, temporal::is_date),
    Keyword::DateTime => value.as_str().map_or(false, temporal::is_datetime),
    Keyword::Time => value.as_str().map_or(false, temporal::is_time),
  }
}

fn is_enumerated(enumeration: &Enumeration, value: &Value) -> bool {
  match value {
    Value::Number(n) => n.as_i64().map_or(false, |v| enumeration.values.contains(&v)),
    _ => false,
  }
}
