use crate::loc::Loc;
use crate::token::TT;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use thiserror::Error;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorType {
  ExpectedSyntax(&'static str),
  InvalidAssigmentTarget,
  InvalidCharacter,
  MalformedJsDocType,
  MalformedLiteralNumber,
  RequiredTokenNotFound(TT),
  UnexpectedEnd,
  UnterminatedComment,
  UnterminatedString,
}

impl SyntaxErrorType {
  pub fn message(&self) -> String {
    match self {
      SyntaxErrorType::ExpectedSyntax(expected) => format!("expected {}", expected),
      SyntaxErrorType::InvalidAssigmentTarget => "invalid assignment target".into(),
      SyntaxErrorType::InvalidCharacter => "invalid character".into(),
      SyntaxErrorType::MalformedJsDocType => "malformed JSDoc type expression".into(),
      SyntaxErrorType::MalformedLiteralNumber => "malformed number literal".into(),
      SyntaxErrorType::RequiredTokenNotFound(tt) => format!("expected token {:?}", tt),
      SyntaxErrorType::UnexpectedEnd => "unexpected end of input".into(),
      SyntaxErrorType::UnterminatedComment => "unterminated comment".into(),
      SyntaxErrorType::UnterminatedString => "unterminated string literal".into(),
    }
  }
}

impl Display for SyntaxErrorType {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(&self.message())
  }
}

#[derive(Clone, Debug, Error)]
#[error("{typ} around {loc:?}")]
pub struct SyntaxError {
  pub typ: SyntaxErrorType,
  pub loc: Loc,
  pub actual_token: Option<TT>,
}

impl SyntaxError {
  pub fn new(typ: SyntaxErrorType, loc: Loc, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError {
      typ,
      loc,
      actual_token,
    }
  }
}

impl PartialEq for SyntaxError {
  fn eq(&self, other: &Self) -> bool {
    self.typ == other.typ
  }
}

pub type SyntaxResult<T> = Result<T, SyntaxError>;
