use crate::token::{Keyword, Numeric};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parsed schema tree
///
/// ```abnf
/// value = object / enumeration / regexp / array / primitive
/// ```
///
/// A `Definition` is immutable once returned by the parser. The validator and
/// the describer only ever borrow it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
  /// Bare primitive keyword
  Primitive(Keyword),
  /// Primitive keyword constrained by bounds
  Range(Range),
  /// Text constrained by a regular expression
  RegularExpression(RegularExpression),
  /// Object with named members
  Object(Object),
  /// Fixed set of integers
  Enumeration(Enumeration),
  /// Homogeneous array
  Array(Array),
}

/// Range on an `int`, `double` or `string` keyword
///
/// ```abnf
/// range = "<" [number] ["," [number]] ">"
/// ```
///
/// At least one bound is present. Bounds are not required to be ordered.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
  /// Keyword whose values are constrained
  pub keyword: Keyword,
  /// Inclusive lower bound
  pub minimum: Option<Numeric>,
  /// Inclusive upper bound
  pub maximum: Option<Numeric>,
}

/// Regular expression literal
///
/// ```abnf
/// regexp = "/" pattern "/" *("g" / "i" / "m")
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegularExpression {
  /// Raw pattern body, escapes kept as written
  pub pattern: String,
  /// Trailing flags
  pub flags: Flags,
}

/// Regular expression flags
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Flags {
  /// 'g'. Kept for display only, it has no effect on matching
  pub global: bool,
  /// 'i'
  pub case_insensitive: bool,
  /// 'm'
  pub multiline: bool,
}

/// Object
///
/// ```abnf
/// object = "{" [member *("," member) [","]] "}"
/// ```
///
/// Member order drives validation but two objects with the same members in a
/// different order are equal. Duplicate member names are kept as written.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct Object {
  /// Members in declaration order
  pub members: Vec<Member>,
}

impl PartialEq for Object {
  fn eq(&self, other: &Self) -> bool {
    let count = |members: &[Member], m: &Member| members.iter().filter(|o| *o == m).count();

    self.members.len() == other.members.len()
      && self
        .members
        .iter()
        .all(|m| count(&self.members, m) == count(&other.members, m))
  }
}

/// Object member
///
/// ```abnf
/// member = name ["?"] ":" value
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
  /// Member name
  pub name: String,
  /// Whether the member may be absent or null
  pub optional: bool,
  /// Definition of the member value
  pub value: Definition,
}

/// Enumeration of integers
///
/// ```abnf
/// enumeration = "(" [item *("," item) [","]] ")"
/// item        = [name "="] integer
/// ```
///
/// Labels are discarded. Values keep their source order and may repeat.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
  /// Accepted values
  pub values: Vec<i64>,
}

/// Array
///
/// ```abnf
/// array = "[" [primitive / enumeration / object] "]"
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Array {
  /// Element definition. `None` for the empty array notation `[]`, which
  /// accepts any array
  pub element: Option<Box<Definition>>,
}

impl RegularExpression {
  /// Compiles the pattern honouring the case-insensitive and multiline flags.
  /// An escaped delimiter `\/` matches a literal '/'
  pub fn to_regex(&self) -> Result<regex::Regex, regex::Error> {
    regex::RegexBuilder::new(&self.pattern.replace("\\/", "/"))
      .case_insensitive(self.flags.case_insensitive)
      .multi_line(self.flags.multiline)
      .build()
  }
}

impl Member {
  /// Creates a new member
  pub fn new(name: impl Into<String>, optional: bool, value: Definition) -> Self {
    Member {
      name: name.into(),
      optional,
      value,
    }
  }
}

impl From<Keyword> for Definition {
  fn from(kw: Keyword) -> Self {
    Definition::Primitive(kw)
  }
}

impl From<Range> for Definition {
  fn from(r: Range) -> Self {
    Definition::Range(r)
  }
}

impl From<RegularExpression> for Definition {
  fn from(re: RegularExpression) -> Self {
    Definition::RegularExpression(re)
  }
}

impl From<Object> for Definition {
  fn from(o: Object) -> Self {
    Definition::Object(o)
  }
}

impl From<Enumeration> for Definition {
  fn from(e: Enumeration) -> Self {
    Definition::Enumeration(e)
  }
}

impl From<Array> for Definition {
  fn from(a: Array) -> Self {
    Definition::Array(a)
  }
}
