use std::fmt;

/// Short message and optional extended explanation for a syntax error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMsg {
  /// One-line description shown under the offending source range
  pub short: String,
  /// Longer explanation, rendered as a diagnostic note
  pub extended: Option<String>,
}

impl fmt::Display for ErrorMsg {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.short)
  }
}

/// Kinds of syntax errors raised while reading notation text
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MsgType {
  /// `/*` without a closing `*/`
  UnterminatedComment,

  /// Input ended where a value was expected
  MissingValue,
  /// Significant input after the top-level value
  UnexpectedCharacter,
  /// Word that is not a primitive keyword
  InvalidPrimitiveType,

  /// Range bound followed by something other than ',' or '>'
  InvalidRangeDelimiter,
  /// Range maximum not followed by '>'
  MissingRangeCloser,
  /// Integer literal without digits
  InvalidIntegerLiteral,
  /// Decimal literal without digits
  InvalidDecimalLiteral,
  /// Decimal literal starting with '0' but not with "0."
  LeadingZeroWithoutDot,

  /// Regular expression without a closing '/'
  UnterminatedRegularExpression,

  /// Member name not starting with a letter or underscore
  InvalidMemberName,
  /// Member name not followed by ':'
  MissingMemberColon,
  /// Member not followed by ',' or '}'
  MissingObjectDelimiter,

  /// Enumeration label not followed by '='
  MissingEnumerationAssignment,
  /// Enumeration item that is not an integer
  InvalidEnumerationValue,
  /// Enumeration item not followed by ',' or ')'
  MissingEnumerationDelimiter,

  /// Array element that is a range, regular expression or array
  InvalidArrayElement,
  /// Array element not followed by ']'
  MissingClosingBracket,
}

impl From<MsgType> for ErrorMsg {
  fn from(mt: MsgType) -> ErrorMsg {
    match mt {
      MsgType::UnterminatedComment => ErrorMsg {
        short: "unterminated block comment. expected closing '*/'".into(),
        extended: None,
      },
      MsgType::MissingValue => ErrorMsg {
        short: "expected a value".into(),
        extended: Some(
          "a value is an object '{', an enumeration '(', a regular expression '/', an array '[' or a primitive type".into(),
        ),
      },
      MsgType::UnexpectedCharacter => ErrorMsg {
        short: "unexpected character after the end of the notation".into(),
        extended: None,
      },
      MsgType::InvalidPrimitiveType => ErrorMsg {
        short: "invalid primitive type".into(),
        extended: Some(
          "primitive types must be one of int, double, bool, string, byte, date, datetime or time".into(),
        ),
      },
      MsgType::InvalidRangeDelimiter => ErrorMsg {
        short: "invalid range delimiter. expected ',' or '>'".into(),
        extended: Some(
          "insert a ',' between the minimal and maximal value, or omit it when only a minimal value is given".into(),
        ),
      },
      MsgType::MissingRangeCloser => ErrorMsg {
        short: "missing closing '>' of range".into(),
        extended: None,
      },
      MsgType::InvalidIntegerLiteral => ErrorMsg {
        short: "invalid integer literal. expected a digit".into(),
        extended: None,
      },
      MsgType::InvalidDecimalLiteral => ErrorMsg {
        short: "invalid decimal literal. expected a digit".into(),
        extended: None,
      },
      MsgType::LeadingZeroWithoutDot => ErrorMsg {
        short: "decimal literal starting with zero must continue with '.'".into(),
        extended: Some("write 0.5 rather than 05, and 0. or 0.0 for zero itself".into()),
      },
      MsgType::UnterminatedRegularExpression => ErrorMsg {
        short: "unterminated regular expression. expected closing '/'".into(),
        extended: Some("a '/' inside the pattern must be escaped as '\\/'".into()),
      },
      MsgType::InvalidMemberName => ErrorMsg {
        short: "invalid member name".into(),
        extended: Some(
          "member names start with a letter or underscore, followed by letters, digits or underscores".into(),
        ),
      },
      MsgType::MissingMemberColon => ErrorMsg {
        short: "expected ':' after member name".into(),
        extended: None,
      },
      MsgType::MissingObjectDelimiter => ErrorMsg {
        short: "expected ',' or closing '}'".into(),
        extended: None,
      },
      MsgType::MissingEnumerationAssignment => ErrorMsg {
        short: "expected '=' after enumeration label".into(),
        extended: None,
      },
      MsgType::InvalidEnumerationValue => ErrorMsg {
        short: "invalid enumeration value. expected an integer".into(),
        extended: Some(
          "enumeration items are integers, optionally labelled as `name = 1`".into(),
        ),
      },
      MsgType::MissingEnumerationDelimiter => ErrorMsg {
        short: "expected ',' or closing ')'".into(),
        extended: None,
      },
      MsgType::InvalidArrayElement => ErrorMsg {
        short: "invalid array element".into(),
        extended: Some(
          "an array must contain a primitive type, an enumeration or an object. ranges, regular expressions and nested arrays are not allowed".into(),
        ),
      },
      MsgType::MissingClosingBracket => ErrorMsg {
        short: "missing closing ']'".into(),
        extended: None,
      },
    }
  }
}
