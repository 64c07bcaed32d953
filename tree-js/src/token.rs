use crate::loc::Loc;
use ahash::HashMap;
use ahash::HashMapExt;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum TT {
  // Special token used to represent the end of the source code. Easier than using and handling Option everywhere.
  EOF,

  AmpersandAmpersand,
  Asterisk,
  BarBar,
  BraceClose,
  BraceOpen,
  BracketClose,
  BracketOpen,
  ChevronLeft,
  ChevronRight,
  Colon,
  Comma,
  Dot,
  Equals,
  EqualsEquals,
  EqualsEqualsEquals,
  Exclamation,
  ExclamationEquals,
  ExclamationEqualsEquals,
  Hyphen,
  Identifier,
  KeywordConst,
  KeywordElse,
  KeywordFunction,
  KeywordIf,
  KeywordLet,
  KeywordReturn,
  KeywordThis,
  KeywordTypeof,
  KeywordVar,
  KeywordVoid,
  LiteralFalse,
  LiteralNull,
  LiteralNumber,
  LiteralString,
  LiteralTrue,
  ParenthesisClose,
  ParenthesisOpen,
  Plus,
  Semicolon,
  Slash,
}

impl TT {
  pub fn is_keyword(self) -> bool {
    KEYWORDS_MAPPING.values().any(|&tt| tt == self)
  }
}

#[derive(Clone, Copy, Debug)]
pub struct Token {
  pub loc: Loc,
  pub typ: TT,
  // Contents (without the delimiters) of the last `/** ... */` comment between the previous token and this one.
  pub jsdoc: Option<Loc>,
}

pub static KEYWORDS_MAPPING: Lazy<HashMap<&'static str, TT>> = Lazy::new(|| {
  let mut map = HashMap::<&'static str, TT>::new();
  map.insert("const", TT::KeywordConst);
  map.insert("else", TT::KeywordElse);
  map.insert("false", TT::LiteralFalse);
  map.insert("function", TT::KeywordFunction);
  map.insert("if", TT::KeywordIf);
  map.insert("let", TT::KeywordLet);
  map.insert("null", TT::LiteralNull);
  map.insert("return", TT::KeywordReturn);
  map.insert("this", TT::KeywordThis);
  map.insert("true", TT::LiteralTrue);
  map.insert("typeof", TT::KeywordTypeof);
  map.insert("var", TT::KeywordVar);
  map.insert("void", TT::KeywordVoid);
  map
});
