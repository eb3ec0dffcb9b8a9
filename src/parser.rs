use super::{
  ast::*,
  comments::strip_comments,
  error::{
    ErrorMsg,
    MsgType::{self, *},
  },
  lexer::{is_digit, is_name_continue, is_name_start, Lexer, Position},
  token::{self, Keyword, Numeric},
};
use codespan_reporting::{
  diagnostic::{Diagnostic, Label},
  files::SimpleFiles,
  term,
};
use lexical_core as lexical;
use log::{debug, trace};
use std::{fmt, num, result, str::FromStr};

/// Alias for `Result` with an error of type `pm1::ParserError`
pub type Result<T> = result::Result<T, Error>;

/// Syntax error
///
/// Parsing stops at the first error. The position refers to the
/// comment-stripped text.
#[derive(Debug)]
pub struct Error {
  /// Error type
  pub error_type: ParserErrorType,
  input: String,
  /// Location of the offending character or literal
  pub position: Position,
}

/// Various error types emitted by the parser
#[derive(Debug)]
pub enum ParserErrorType {
  /// Notation syntax error
  PARSER(MsgType),
  /// Integer literal does not fit in 64 bits
  PARSEINT(num::ParseIntError),
  /// Error parsing decimal literal
  PARSEFLOAT(lexical::Error),
  /// Regular expression body does not compile
  REGEX(regex::Error),
}

impl Error {
  fn new(input: &str, range: (usize, usize), error_type: ParserErrorType) -> Self {
    let consumed = &input[..range.0.min(input.len())];
    let line = consumed.matches('\n').count() + 1;
    let column = consumed
      .rfind('\n')
      .map_or(consumed, |nl| &consumed[nl + 1..])
      .chars()
      .count()
      + 1;

    Error {
      error_type,
      input: input.to_string(),
      position: Position {
        line,
        column,
        range,
        index: range.0,
      },
    }
  }

  /// Byte offset of the offending character
  pub fn offset(&self) -> usize {
    self.position.index
  }

  /// Short description of the error, without source excerpt
  pub fn message(&self) -> String {
    match &self.error_type {
      ParserErrorType::PARSER(mt) => ErrorMsg::from(*mt).short,
      ParserErrorType::PARSEINT(pie) => pie.to_string(),
      ParserErrorType::PARSEFLOAT(pfe) => format!("invalid decimal literal: {:?}", pfe),
      ParserErrorType::REGEX(re) => re.to_string(),
    }
  }

  /// Syntax error kind, if the error is a notation syntax error
  pub fn msg_type(&self) -> Option<MsgType> {
    match self.error_type {
      ParserErrorType::PARSER(mt) => Some(mt),
      _ => None,
    }
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match &self.error_type {
      ParserErrorType::PARSEINT(pie) => Some(pie),
      ParserErrorType::REGEX(re) => Some(re),
      _ => None,
    }
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let mut files = SimpleFiles::new();
    let file_id = files.add("input", self.input.as_str());
    let config = term::Config::default();
    let mut buffer = Vec::new();
    let mut writer = term::termcolor::NoColor::new(&mut buffer);

    let mut diagnostic = Diagnostic::error()
      .with_message("syntax error")
      .with_labels(vec![Label::primary(
        file_id,
        self.position.range.0..self.position.range.1,
      )
      .with_message(self.message())]);

    if let ParserErrorType::PARSER(mt) = &self.error_type {
      if let Some(extended) = ErrorMsg::from(*mt).extended {
        diagnostic = diagnostic.with_notes(vec![extended]);
      }
    }

    term::emit(&mut writer, &config, &files, &diagnostic).map_err(|_| fmt::Error)?;

    write!(f, "{}", String::from_utf8(buffer).map_err(|_| fmt::Error)?)
  }
}

impl From<(&str, (usize, usize), MsgType)> for Error {
  fn from(e: (&str, (usize, usize), MsgType)) -> Self {
    Error::new(e.0, e.1, ParserErrorType::PARSER(e.2))
  }
}

impl From<(&str, (usize, usize), num::ParseIntError)> for Error {
  fn from(e: (&str, (usize, usize), num::ParseIntError)) -> Self {
    Error::new(e.0, e.1, ParserErrorType::PARSEINT(e.2))
  }
}

impl From<(&str, (usize, usize), lexical::Error)> for Error {
  fn from(e: (&str, (usize, usize), lexical::Error)) -> Self {
    Error::new(e.0, e.1, ParserErrorType::PARSEFLOAT(e.2))
  }
}

impl From<(&str, (usize, usize), regex::Error)> for Error {
  fn from(e: (&str, (usize, usize), regex::Error)) -> Self {
    Error::new(e.0, e.1, ParserErrorType::REGEX(e.2))
  }
}

/// Returns a `Definition` from notation text
///
/// Comments are stripped first; error offsets refer to the stripped text.
///
/// # Example
///
/// ```
/// use pm1::parse;
///
/// let definition = parse("{ id: int<1>, name?: string }").unwrap();
/// assert_eq!(definition.to_string(), "{ id: int<1>, name?: string }");
/// ```
pub fn parse(input: &str) -> Result<Definition> {
  let cleaned = strip_comments(input)?;

  let definition = Parser::new(&cleaned).parse_definition()?;
  debug!("parsed notation into {}", definition);

  Ok(definition)
}

impl FromStr for Definition {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    parse(s)
  }
}

/// Recursive descent parser over comment-free notation text
pub struct Parser<'a> {
  lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
  /// Creates a new `Parser` over comment-free notation text
  pub fn new(input: &'a str) -> Self {
    Parser {
      lexer: Lexer::new(input),
    }
  }

  /// Parses a single value followed only by whitespace
  pub fn parse_definition(&mut self) -> Result<Definition> {
    let definition = self.parse_value()?;

    self.lexer.skip_whitespace();
    if let Some(found) = self.lexer.peek_raw() {
      return Err(self.error_at_char(Some(found), UnexpectedCharacter));
    }

    Ok(definition)
  }

  fn error(&self, range: (usize, usize), mt: MsgType) -> Error {
    (self.lexer.str_input, range, mt).into()
  }

  fn error_at_char(&self, found: Option<(usize, char)>, mt: MsgType) -> Error {
    let range = match found {
      Some((idx, ch)) => (idx, idx + ch.len_utf8()),
      None => (self.lexer.str_input.len(), self.lexer.str_input.len()),
    };

    self.error(range, mt)
  }

  fn parse_value(&mut self) -> Result<Definition> {
    match self.lexer.peek_char() {
      Some((_, '{')) => {
        let _ = self.lexer.next_char(true);
        self.parse_object().map(Definition::Object)
      }
      Some((_, '(')) => {
        let _ = self.lexer.next_char(true);
        self.parse_enumeration().map(Definition::Enumeration)
      }
      Some((idx, '/')) => {
        let _ = self.lexer.next_char(true);
        self
          .parse_regular_expression(idx)
          .map(Definition::RegularExpression)
      }
      Some((_, '[')) => {
        let _ = self.lexer.next_char(true);
        self.parse_array().map(Definition::Array)
      }
      Some(_) => self.parse_primitive(),
      None => Err(self.error_at_char(None, MissingValue)),
    }
  }

  fn parse_keyword(&mut self) -> Result<Keyword> {
    self.lexer.skip_whitespace();

    let start = self.lexer.position.index;
    let word = self.lexer.read_while(is_name_continue);

    if word.is_empty() {
      return Err(self.error_at_char(self.lexer.peek_raw(), InvalidPrimitiveType));
    }

    token::lookup_keyword(word)
      .ok_or_else(|| self.error((start, start + word.len()), InvalidPrimitiveType))
  }

  fn parse_primitive(&mut self) -> Result<Definition> {
    let keyword = self.parse_keyword()?;

    if keyword.accepts_range() {
      if let Some(range) = self.parse_range(keyword)? {
        return Ok(Definition::Range(range));
      }
    }

    Ok(Definition::Primitive(keyword))
  }

  fn parse_range(&mut self, keyword: Keyword) -> Result<Option<Range>> {
    let mark = self.lexer.mark();

    match self.lexer.next_char(true) {
      Some((_, '<')) => {}
      _ => {
        trace!("no range after keyword {}, backtracking", keyword);
        self.lexer.reset(mark);
        return Ok(None);
      }
    }

    let minimum = self.parse_bound(keyword)?;

    let maximum = match self.lexer.next_char(true) {
      Some((_, '>')) => None,
      Some((_, ',')) => {
        let maximum = self.parse_bound(keyword)?;

        match self.lexer.next_char(true) {
          Some((_, '>')) => maximum,
          found => return Err(self.error_at_char(found, MissingRangeCloser)),
        }
      }
      found => return Err(self.error_at_char(found, InvalidRangeDelimiter)),
    };

    // `<>` and `<,>` constrain nothing
    if minimum.is_none() && maximum.is_none() {
      return Ok(None);
    }

    Ok(Some(Range {
      keyword,
      minimum,
      maximum,
    }))
  }

  fn parse_bound(&mut self, keyword: Keyword) -> Result<Option<Numeric>> {
    match self.lexer.peek_char() {
      Some((_, ch)) if ch == '-' || is_digit(ch) => {
        if keyword.has_decimal_bounds() {
          self.parse_decimal().map(|f| Some(Numeric::FLOAT(f)))
        } else {
          self.parse_integer().map(|i| Some(Numeric::INT(i)))
        }
      }
      _ => Ok(None),
    }
  }

  fn parse_sign(&mut self) {
    if let Some((_, '-')) = self.lexer.peek_raw() {
      let _ = self.lexer.read_char();
    }
  }

  /// Signed integer. Leading zeros are allowed
  fn parse_integer(&mut self) -> Result<i64> {
    self.lexer.skip_whitespace();

    let start = self.lexer.position.index;
    self.parse_sign();

    if self.lexer.read_while(is_digit).is_empty() {
      return Err(self.error_at_char(self.lexer.peek_raw(), InvalidIntegerLiteral));
    }

    let end = self.lexer.position.index;
    let literal = &self.lexer.str_input[start..end];

    literal
      .parse::<i64>()
      .map_err(|e| (self.lexer.str_input, (start, end), e).into())
  }

  /// Signed decimal. A leading zero must be followed by '.', and a trailing
  /// '.' reads as '.0'
  fn parse_decimal(&mut self) -> Result<f64> {
    self.lexer.skip_whitespace();

    let start = self.lexer.position.index;
    self.parse_sign();

    match self.lexer.peek_raw() {
      Some((_, '0')) => {
        let _ = self.lexer.read_char();

        match self.lexer.peek_raw() {
          Some((_, '.')) => {}
          found => return Err(self.error_at_char(found, LeadingZeroWithoutDot)),
        }
      }
      Some((_, ch)) if is_digit(ch) => {
        let _ = self.lexer.read_while(is_digit);
      }
      found => return Err(self.error_at_char(found, InvalidDecimalLiteral)),
    }

    if let Some((_, '.')) = self.lexer.peek_raw() {
      let _ = self.lexer.read_char();
      let _ = self.lexer.read_while(is_digit);
    }

    let end = self.lexer.position.index;
    let mut literal = self.lexer.str_input[start..end].to_string();
    if literal.ends_with('.') {
      literal.push('0');
    }

    lexical::parse::<f64>(literal.as_bytes())
      .map_err(|e| (self.lexer.str_input, (start, end), e).into())
  }

  fn parse_name(&mut self, mt: MsgType) -> Result<String> {
    self.lexer.skip_whitespace();

    match self.lexer.peek_raw() {
      Some((_, ch)) if is_name_start(ch) => {
        Ok(self.lexer.read_while(is_name_continue).to_string())
      }
      found => Err(self.error_at_char(found, mt)),
    }
  }

  fn parse_regular_expression(&mut self, open: usize) -> Result<RegularExpression> {
    let mut pattern = String::new();

    loop {
      match self.lexer.next_char(false) {
        Some((_, '/')) if self.lexer.previous_raw() != Some('\\') => break,
        Some((_, ch)) => pattern.push(ch),
        None => {
          return Err(self.error(
            (open, self.lexer.str_input.len()),
            UnterminatedRegularExpression,
          ))
        }
      }
    }

    let mut flags = Flags::default();

    loop {
      match self.lexer.peek_raw() {
        Some((_, 'g')) => flags.global = true,
        Some((_, 'i')) => flags.case_insensitive = true,
        Some((_, 'm')) => flags.multiline = true,
        _ => break,
      }

      let _ = self.lexer.read_char();
    }

    let re = RegularExpression { pattern, flags };

    re.to_regex()
      .map_err(|e| (self.lexer.str_input, (open, self.lexer.position.index), e))?;

    Ok(re)
  }

  fn parse_object(&mut self) -> Result<Object> {
    let mut members = Vec::new();

    loop {
      if let Some((_, '}')) = self.lexer.peek_char() {
        let _ = self.lexer.next_char(true);
        break;
      }

      let name = self.parse_name(InvalidMemberName)?;

      let optional = match self.lexer.peek_char() {
        Some((_, '?')) => {
          let _ = self.lexer.next_char(true);
          true
        }
        _ => false,
      };

      match self.lexer.next_char(true) {
        Some((_, ':')) => {}
        found => return Err(self.error_at_char(found, MissingMemberColon)),
      }

      trace!("parsing value of member {}", name);
      let value = self.parse_value()?;

      members.push(Member {
        name,
        optional,
        value,
      });

      match self.lexer.next_char(true) {
        Some((_, ',')) => continue,
        Some((_, '}')) => break,
        found => return Err(self.error_at_char(found, MissingObjectDelimiter)),
      }
    }

    Ok(Object { members })
  }

  fn parse_enumeration(&mut self) -> Result<Enumeration> {
    let mut values = Vec::new();

    loop {
      match self.lexer.peek_char() {
        Some((_, ')')) => {
          let _ = self.lexer.next_char(true);
          break;
        }
        // Labels document the value and are not retained
        Some((_, ch)) if is_name_start(ch) => {
          let _ = self.parse_name(InvalidEnumerationValue)?;

          match self.lexer.next_char(true) {
            Some((_, '=')) => {}
            found => return Err(self.error_at_char(found, MissingEnumerationAssignment)),
          }
        }
        _ => {}
      }

      match self.lexer.peek_char() {
        Some((_, ch)) if ch == '-' || is_digit(ch) => values.push(self.parse_integer()?),
        found => return Err(self.error_at_char(found, InvalidEnumerationValue)),
      }

      match self.lexer.next_char(true) {
        Some((_, ',')) => continue,
        Some((_, ')')) => break,
        found => return Err(self.error_at_char(found, MissingEnumerationDelimiter)),
      }
    }

    Ok(Enumeration { values })
  }

  fn parse_array(&mut self) -> Result<Array> {
    let element = match self.lexer.peek_char() {
      Some((_, ']')) => {
        let _ = self.lexer.next_char(true);
        return Ok(Array { element: None });
      }
      Some((_, '(')) => {
        let _ = self.lexer.next_char(true);
        Definition::Enumeration(self.parse_enumeration()?)
      }
      Some((_, '{')) => {
        let _ = self.lexer.next_char(true);
        Definition::Object(self.parse_object()?)
      }
      found @ Some((_, '[')) | found @ Some((_, '/')) => {
        return Err(self.error_at_char(found, InvalidArrayElement))
      }
      Some(_) => Definition::Primitive(self.parse_keyword()?),
      None => return Err(self.error_at_char(None, MissingClosingBracket)),
    };

    match self.lexer.next_char(true) {
      Some((_, ']')) => {}
      found @ Some((_, '<')) => return Err(self.error_at_char(found, InvalidArrayElement)),
      found => return Err(self.error_at_char(found, MissingClosingBracket)),
    }

    Ok(Array {
      element: Some(Box::new(element)),
    })
  }
}
