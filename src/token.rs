use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Primitive type keyword
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Keyword {
  /// 'int'
  Int,
  /// 'double'
  Double,
  /// 'bool'
  Bool,
  /// 'string'
  String,
  /// 'byte'
  Byte,
  /// 'date'
  Date,
  /// 'datetime'
  DateTime,
  /// 'time'
  Time,
}

impl Keyword {
  /// Whether the keyword may be followed by a range `<min,max>`
  pub fn accepts_range(self) -> bool {
    matches!(self, Keyword::Int | Keyword::Double | Keyword::String)
  }

  /// Whether the bounds of a range on this keyword are decimal literals
  pub fn has_decimal_bounds(self) -> bool {
    self == Keyword::Double
  }

  /// Keyword literal as written in notation text
  pub fn as_str(self) -> &'static str {
    match self {
      Keyword::Int => "int",
      Keyword::Double => "double",
      Keyword::Bool => "bool",
      Keyword::String => "string",
      Keyword::Byte => "byte",
      Keyword::Date => "date",
      Keyword::DateTime => "datetime",
      Keyword::Time => "time",
    }
  }
}

impl fmt::Display for Keyword {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Numeric range bound
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Numeric {
  /// Signed integer bound of an `int` or `string` range
  INT(i64),
  /// Decimal bound of a `double` range
  FLOAT(f64),
}

impl Numeric {
  /// Bound as a floating point magnitude
  pub fn as_f64(self) -> f64 {
    match self {
      Numeric::INT(i) => i as f64,
      Numeric::FLOAT(f) => f,
    }
  }
}

impl fmt::Display for Numeric {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Numeric::INT(i) => write!(f, "{}", i),
      // Keep the point so the bound reads back as a decimal literal
      Numeric::FLOAT(fl) if fl.fract() == 0.0 => write!(f, "{:.1}", fl),
      Numeric::FLOAT(fl) => write!(f, "{}", fl),
    }
  }
}

/// Returns the primitive keyword matching the given word
///
/// No keyword is reserved outside of value position, so member names and
/// enumeration labels never go through this lookup.
pub fn lookup_keyword(word: &str) -> Option<Keyword> {
  match word {
    "int" => Some(Keyword::Int),
    "double" => Some(Keyword::Double),
    "bool" => Some(Keyword::Bool),
    "string" => Some(Keyword::String),
    "byte" => Some(Keyword::Byte),
    "date" => Some(Keyword::Date),
    "datetime" => Some(Keyword::DateTime),
    "time" => Some(Keyword::Time),
    _ => None,
  }
}
