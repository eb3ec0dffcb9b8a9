use std::str::CharIndices;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Lexer position
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Position {
  /// Line number
  pub line: usize,
  /// Column number
  pub column: usize,
  /// Begin and end byte index of the most recent token or error
  pub range: (usize, usize),
  /// Byte index of the next unread character
  pub index: usize,
}

impl Default for Position {
  fn default() -> Self {
    Position {
      line: 1,
      column: 1,
      range: (0, 0),
      index: 0,
    }
  }
}

/// Character cursor over notation text
///
/// The whole cursor state is a `Position`, so a lookahead is undone by
/// handing back the `Position` returned from [`Lexer::mark`].
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
  /// Notation input string
  pub str_input: &'a str,
  /// Lexer position in input
  pub position: Position,
}

impl<'a> Lexer<'a> {
  /// Creates a new `Lexer` from a given `&str` input
  pub fn new(str_input: &'a str) -> Lexer<'a> {
    Lexer {
      str_input,
      position: Position::default(),
    }
  }

  fn remaining(&self) -> CharIndices<'a> {
    self.str_input[self.position.index..].char_indices()
  }

  /// Consumes and returns the next character and its byte index, whitespace
  /// included
  pub fn read_char(&mut self) -> Option<(usize, char)> {
    let (offset, ch) = self.remaining().next()?;
    let idx = self.position.index + offset;

    if ch == '\n' {
      self.position.line += 1;
      self.position.column = 1;
    } else {
      self.position.column += 1;
    }

    self.position.index = idx + ch.len_utf8();

    Some((idx, ch))
  }

  /// Consumes and returns the next character. With `skip_whitespace`, leading
  /// whitespace is consumed and the first significant character returned
  pub fn next_char(&mut self, skip_whitespace: bool) -> Option<(usize, char)> {
    if skip_whitespace {
      self.skip_whitespace();
    }

    self.read_char()
  }

  /// Returns the next significant character without consuming anything
  pub fn peek_char(&self) -> Option<(usize, char)> {
    let base = self.position.index;

    self
      .remaining()
      .find(|(_, ch)| !is_whitespace(*ch))
      .map(|(offset, ch)| (base + offset, ch))
  }

  /// Returns the next character, whitespace included, without consuming it
  pub fn peek_raw(&self) -> Option<(usize, char)> {
    let base = self.position.index;

    self.remaining().next().map(|(offset, ch)| (base + offset, ch))
  }

  /// Consumes whitespace up to the next significant character
  pub fn skip_whitespace(&mut self) {
    while let Some((_, ch)) = self.peek_raw() {
      if !is_whitespace(ch) {
        break;
      }

      let _ = self.read_char();
    }
  }

  /// Consumes the longest run of characters satisfying `pred`, starting at
  /// the cursor, and returns it. Whitespace is not skipped
  pub fn read_while<F>(&mut self, pred: F) -> &'a str
  where
    F: Fn(char) -> bool,
  {
    let start = self.position.index;

    while let Some((_, ch)) = self.peek_raw() {
      if !pred(ch) {
        break;
      }

      let _ = self.read_char();
    }

    &self.str_input[start..self.position.index]
  }

  /// Snapshot of the cursor
  pub fn mark(&self) -> Position {
    self.position
  }

  /// Restores a snapshot taken with [`Lexer::mark`]
  pub fn reset(&mut self, mark: Position) {
    self.position = mark;
  }

  /// Source character immediately preceding the most recently consumed
  /// character, regardless of whitespace skipping
  pub fn previous_raw(&self) -> Option<char> {
    let consumed = &self.str_input[..self.position.index];
    let mut chars = consumed.chars();

    chars.next_back()?;
    chars.next_back()
  }

  /// Whether all input has been consumed
  pub fn is_eof(&self) -> bool {
    self.position.index >= self.str_input.len()
  }
}

/// Whitespace is exactly space, tab, line feed and carriage return
pub fn is_whitespace(ch: char) -> bool {
  matches!(ch, ' ' | '\t' | '\n' | '\r')
}

/// First character of a member name or enumeration label
pub fn is_name_start(ch: char) -> bool {
  ch.is_ascii_alphabetic() || ch == '_'
}

/// Subsequent character of a member name or enumeration label
pub fn is_name_continue(ch: char) -> bool {
  ch.is_ascii_alphanumeric() || ch == '_'
}

/// ASCII decimal digit
pub fn is_digit(ch: char) -> bool {
  ch.is_ascii_digit()
}
