//! Canonical notation text for diagnostics
//!
//! Labels and comments are not part of a `Definition`, so parsing the
//! description of a definition is not guaranteed to reproduce it exactly.

use crate::ast::*;
use itertools::Itertools;
use std::fmt;

/// Renders a definition back to notation text
///
/// # Example
///
/// ```
/// use pm1::{describe, parse};
///
/// let definition = parse("{id:int<200,20000>,tags?:[string]}").unwrap();
/// assert_eq!(describe(&definition), "{ id: int<200,20000>, tags?: [string] }");
/// ```
pub fn describe(definition: &Definition) -> String {
  definition.to_string()
}

impl fmt::Display for Definition {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Definition::Primitive(keyword) => write!(f, "{}", keyword),
      Definition::Range(range) => write!(f, "{}", range),
      Definition::RegularExpression(re) => write!(f, "{}", re),
      Definition::Object(object) => write!(f, "{}", object),
      Definition::Enumeration(enumeration) => write!(f, "{}", enumeration),
      Definition::Array(array) => write!(f, "{}", array),
    }
  }
}

impl fmt::Display for Range {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match (&self.minimum, &self.maximum) {
      (Some(min), Some(max)) => write!(f, "{}<{},{}>", self.keyword, min, max),
      (Some(min), None) => write!(f, "{}<{}>", self.keyword, min),
      (None, Some(max)) => write!(f, "{}<,{}>", self.keyword, max),
      (None, None) => write!(f, "{}", self.keyword),
    }
  }
}

impl fmt::Display for Flags {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    if self.global {
      write!(f, "g")?;
    }
    if self.case_insensitive {
      write!(f, "i")?;
    }
    if self.multiline {
      write!(f, "m")?;
    }

    Ok(())
  }
}

impl fmt::Display for RegularExpression {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "/{}/{}", self.pattern, self.flags)
  }
}

impl fmt::Display for Member {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    if self.optional {
      write!(f, "{}?: {}", self.name, self.value)
    } else {
      write!(f, "{}: {}", self.name, self.value)
    }
  }
}

impl fmt::Display for Object {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    if self.members.is_empty() {
      return write!(f, "{{}}");
    }

    write!(f, "{{ {} }}", self.members.iter().join(", "))
  }
}

impl fmt::Display for Enumeration {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "({})", self.values.iter().join(","))
  }
}

impl fmt::Display for Array {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match &self.element {
      Some(element) => write!(f, "[{}]", element),
      None => write!(f, "[]"),
    }
  }
}
