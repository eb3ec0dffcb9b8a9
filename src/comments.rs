//! Comment removal
//!
//! `//` line comments and `/* */` block comments are dropped in one pass over
//! the source. Outside of comments a '/' can only open a regular expression
//! literal, so the literal is copied through its closing unescaped '/' without
//! looking for comments inside it. A pattern starting with '*' therefore reads
//! as a block comment.

use crate::{
  error::MsgType::UnterminatedComment,
  lexer::Lexer,
  parser::{Error, Result},
};

/// Returns `input` with comments removed. The line feed ending a line comment
/// is kept
///
/// # Example
///
/// ```
/// use pm1::comments::strip_comments;
///
/// let cleaned = strip_comments("int<1> // identifier\n").unwrap();
/// assert_eq!(cleaned, "int<1> \n");
/// ```
pub fn strip_comments(input: &str) -> Result<String> {
  let mut lexer = Lexer::new(input);
  let mut output = String::with_capacity(input.len());

  while let Some((idx, ch)) = lexer.read_char() {
    if ch != '/' {
      output.push(ch);
      continue;
    }

    match lexer.peek_raw() {
      Some((_, '/')) => {
        let _ = lexer.read_while(|c| c != '\n');
      }
      Some((_, '*')) => {
        let _ = lexer.read_char();

        if !skip_block_comment(&mut lexer) {
          return Err(Error::from((input, (idx, idx + 2), UnterminatedComment)));
        }
      }
      _ => copy_regular_expression(&mut lexer, &mut output),
    }
  }

  Ok(output)
}

/// Consumes through the closing `*/`. Returns false if input ends first
fn skip_block_comment(lexer: &mut Lexer) -> bool {
  while let Some((_, ch)) = lexer.read_char() {
    if ch == '*' {
      if let Some((_, '/')) = lexer.peek_raw() {
        let _ = lexer.read_char();
        return true;
      }
    }
  }

  false
}

/// Copies a regular expression literal whose opening '/' was just consumed.
/// An unterminated literal is copied as is and left for the parser to report
fn copy_regular_expression(lexer: &mut Lexer, output: &mut String) {
  output.push('/');

  while let Some((_, ch)) = lexer.read_char() {
    output.push(ch);

    if ch == '/' && lexer.previous_raw() != Some('\\') {
      break;
    }
  }
}
