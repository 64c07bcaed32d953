use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::KEYWORDS_MAPPING;
use crate::token::TT;
use core::ops::Index;

fn is_id_start(c: u8) -> bool {
  c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

fn is_id_continue(c: u8) -> bool {
  is_id_start(c) || c.is_ascii_digit()
}

pub struct Lexer<'a> {
  source: &'a [u8],
  next: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(source: &'a [u8]) -> Lexer<'a> {
    Lexer { source, next: 0 }
  }

  fn peek(&self, n: usize) -> Option<u8> {
    self.source.get(self.next + n).copied()
  }

  fn at_end(&self) -> bool {
    self.next >= self.source.len()
  }

  fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
    while self.peek(0).is_some_and(&pred) {
      self.next += 1;
    }
  }

  // Skips whitespace and comments, returning the contents of the last JSDoc comment seen.
  fn skip_trivia(&mut self) -> SyntaxResult<Option<Loc>> {
    let mut jsdoc = None;
    loop {
      self.skip_while(|c| c.is_ascii_whitespace());
      match (self.peek(0), self.peek(1)) {
        (Some(b'/'), Some(b'/')) => {
          self.skip_while(|c| c != b'\n');
        }
        (Some(b'/'), Some(b'*')) => {
          let start = self.next;
          let is_jsdoc = self.peek(2) == Some(b'*') && self.peek(3) != Some(b'/');
          self.next += 2;
          loop {
            match (self.peek(0), self.peek(1)) {
              (Some(b'*'), Some(b'/')) => break,
              (Some(_), _) => self.next += 1,
              (None, _) => {
                return Err(Loc(start, self.next).error(SyntaxErrorType::UnterminatedComment, None));
              }
            };
          }
          if is_jsdoc {
            jsdoc = Some(Loc(start + 3, self.next));
          };
          self.next += 2;
        }
        _ => return Ok(jsdoc),
      };
    }
  }

  fn lex_string(&mut self, quote: u8) -> SyntaxResult<TT> {
    let start = self.next;
    self.next += 1;
    loop {
      match self.peek(0) {
        None | Some(b'\n') => {
          return Err(Loc(start, self.next).error(SyntaxErrorType::UnterminatedString, None));
        }
        Some(b'\\') => self.next += 2,
        Some(c) if c == quote => {
          self.next += 1;
          return Ok(TT::LiteralString);
        }
        Some(_) => self.next += 1,
      };
    }
  }

  fn lex_number(&mut self) -> SyntaxResult<TT> {
    let start = self.next;
    self.skip_while(|c| c.is_ascii_digit());
    if self.peek(0) == Some(b'.') {
      self.next += 1;
      self.skip_while(|c| c.is_ascii_digit());
    };
    if self.peek(0).is_some_and(is_id_start) {
      return Err(Loc(start, self.next + 1).error(SyntaxErrorType::MalformedLiteralNumber, None));
    };
    Ok(TT::LiteralNumber)
  }

  fn lex_punctuator(&mut self) -> Option<TT> {
    let (tt, len) = match (self.peek(0)?, self.peek(1), self.peek(2)) {
      (b'=', Some(b'='), Some(b'=')) => (TT::EqualsEqualsEquals, 3),
      (b'=', Some(b'='), _) => (TT::EqualsEquals, 2),
      (b'=', _, _) => (TT::Equals, 1),
      (b'!', Some(b'='), Some(b'=')) => (TT::ExclamationEqualsEquals, 3),
      (b'!', Some(b'='), _) => (TT::ExclamationEquals, 2),
      (b'!', _, _) => (TT::Exclamation, 1),
      (b'&', Some(b'&'), _) => (TT::AmpersandAmpersand, 2),
      (b'|', Some(b'|'), _) => (TT::BarBar, 2),
      (b'(', _, _) => (TT::ParenthesisOpen, 1),
      (b')', _, _) => (TT::ParenthesisClose, 1),
      (b'{', _, _) => (TT::BraceOpen, 1),
      (b'}', _, _) => (TT::BraceClose, 1),
      (b'[', _, _) => (TT::BracketOpen, 1),
      (b']', _, _) => (TT::BracketClose, 1),
      (b'<', _, _) => (TT::ChevronLeft, 1),
      (b'>', _, _) => (TT::ChevronRight, 1),
      (b';', _, _) => (TT::Semicolon, 1),
      (b',', _, _) => (TT::Comma, 1),
      (b':', _, _) => (TT::Colon, 1),
      (b'.', _, _) => (TT::Dot, 1),
      (b'+', _, _) => (TT::Plus, 1),
      (b'-', _, _) => (TT::Hyphen, 1),
      (b'*', _, _) => (TT::Asterisk, 1),
      (b'/', _, _) => (TT::Slash, 1),
      _ => return None,
    };
    self.next += len;
    Some(tt)
  }
}

pub fn lex_next(lexer: &mut Lexer) -> SyntaxResult<Token> {
  let jsdoc = lexer.skip_trivia()?;
  let start = lexer.next;
  if lexer.at_end() {
    return Ok(Token {
      loc: Loc(start, start),
      typ: TT::EOF,
      jsdoc,
    });
  };
  let c = lexer.source[start];
  let typ = if is_id_start(c) {
    lexer.skip_while(is_id_continue);
    let word = &lexer.source[start..lexer.next];
    std::str::from_utf8(word)
      .ok()
      .and_then(|w| KEYWORDS_MAPPING.get(w).copied())
      .unwrap_or(TT::Identifier)
  } else if c.is_ascii_digit() {
    lexer.lex_number()?
  } else if c == b'"' || c == b'\'' {
    lexer.lex_string(c)?
  } else if let Some(tt) = lexer.lex_punctuator() {
    tt
  } else {
    return Err(Loc(start, start + 1).error(SyntaxErrorType::InvalidCharacter, None));
  };
  Ok(Token {
    loc: Loc(start, lexer.next),
    typ,
    jsdoc,
  })
}

impl<'a> Index<Loc> for Lexer<'a> {
  type Output = [u8];

  fn index(&self, index: Loc) -> &Self::Output {
    &self.source[index.0..index.1]
  }
}
