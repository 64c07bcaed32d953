use crate::ast::Ast;
use crate::ast::BinaryOp;
use crate::ast::ModuleId;
use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::UnaryOp;
use crate::ast::VarKind;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::jsdoc::parse_jsdoc;
use crate::lex::lex_next;
use crate::lex::Lexer;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;

#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
  /// Module recorded on the produced `Script` node.
  pub module: Option<ModuleId>,
  /// Whether `/** ... */` comments are parsed and attached. When false they're skipped like any other comment.
  pub jsdoc: bool,
}

impl Default for ParseOptions {
  fn default() -> Self {
    ParseOptions {
      module: None,
      jsdoc: true,
    }
  }
}

fn binary_operator(tt: TT) -> Option<(BinaryOp, u8)> {
  Some(match tt {
    TT::BarBar => (BinaryOp::LogicalOr, 1),
    TT::AmpersandAmpersand => (BinaryOp::LogicalAnd, 2),
    TT::EqualsEquals => (BinaryOp::Equality, 3),
    TT::EqualsEqualsEquals => (BinaryOp::StrictEquality, 3),
    TT::ExclamationEquals => (BinaryOp::Inequality, 3),
    TT::ExclamationEqualsEquals => (BinaryOp::StrictInequality, 3),
    TT::ChevronLeft => (BinaryOp::LessThan, 4),
    TT::ChevronRight => (BinaryOp::GreaterThan, 4),
    TT::Plus => (BinaryOp::Add, 5),
    TT::Hyphen => (BinaryOp::Sub, 5),
    TT::Asterisk => (BinaryOp::Mul, 6),
    TT::Slash => (BinaryOp::Div, 6),
    _ => return None,
  })
}

fn unescape(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  let mut chars = raw.chars();
  while let Some(c) = chars.next() {
    if c != '\\' {
      out.push(c);
      continue;
    };
    match chars.next() {
      Some('n') => out.push('\n'),
      Some('t') => out.push('\t'),
      Some('r') => out.push('\r'),
      Some('0') => out.push('\0'),
      Some(other) => out.push(other),
      None => {}
    };
  }
  out
}

pub struct Parser<'a> {
  lexer: Lexer<'a>,
  source: &'a [u8],
  ast: &'a mut Ast,
  options: ParseOptions,
  buffered: Option<Token>,
  last_end: usize,
}

impl<'a> Parser<'a> {
  pub fn new(ast: &'a mut Ast, source: &'a [u8], options: ParseOptions) -> Parser<'a> {
    Parser {
      lexer: Lexer::new(source),
      source,
      ast,
      options,
      buffered: None,
      last_end: 0,
    }
  }

  fn peek(&mut self) -> SyntaxResult<Token> {
    if let Some(t) = self.buffered {
      return Ok(t);
    };
    let t = lex_next(&mut self.lexer)?;
    self.buffered = Some(t);
    Ok(t)
  }

  fn consume(&mut self) -> SyntaxResult<Token> {
    let t = self.peek()?;
    self.buffered = None;
    self.last_end = t.loc.1;
    Ok(t)
  }

  fn consume_if(&mut self, typ: TT) -> SyntaxResult<Option<Token>> {
    Ok(if self.peek()?.typ == typ {
      Some(self.consume()?)
    } else {
      None
    })
  }

  fn require(&mut self, typ: TT) -> SyntaxResult<Token> {
    let t = self.peek()?;
    if t.typ != typ {
      return Err(self.unexpected(t, SyntaxErrorType::RequiredTokenNotFound(typ)));
    };
    self.consume()
  }

  fn unexpected(&self, t: Token, typ: SyntaxErrorType) -> SyntaxError {
    let typ = if t.typ == TT::EOF {
      SyntaxErrorType::UnexpectedEnd
    } else {
      typ
    };
    t.loc.error(typ, Some(t.typ))
  }

  fn string(&self, loc: Loc) -> String {
    String::from_utf8_lossy(&self.lexer[loc]).into_owned()
  }

  fn loc_from(&self, start: Loc) -> Loc {
    Loc(start.0, self.last_end.max(start.1))
  }

  fn node(&mut self, kind: NodeKind, loc: Loc, children: Vec<NodeId>) -> NodeId {
    let node = self.ast.push(kind, loc);
    for c in children {
      self.ast.append_child(node, c);
    }
    node
  }

  fn attach_jsdoc(&mut self, node: NodeId, jsdoc: Option<Loc>) -> SyntaxResult<()> {
    let Some(loc) = jsdoc.filter(|_| self.options.jsdoc) else {
      return Ok(());
    };
    let source = self.source;
    let doc = parse_jsdoc(self.ast, &source[loc.0..loc.1], loc)?;
    self.ast.set_jsdoc(node, doc);
    Ok(())
  }

  pub fn parse_script(&mut self) -> SyntaxResult<NodeId> {
    let mut body = Vec::new();
    while self.peek()?.typ != TT::EOF {
      body.push(self.parse_stmt()?);
    }
    let loc = Loc(0, self.source.len());
    Ok(self.node(NodeKind::Script(self.options.module), loc, body))
  }

  fn parse_stmt(&mut self) -> SyntaxResult<NodeId> {
    let t = self.peek()?;
    let (stmt, doc_target) = match t.typ {
      TT::BraceOpen => {
        let block = self.parse_block()?;
        (block, block)
      }
      TT::KeywordVar | TT::KeywordLet | TT::KeywordConst => {
        let var = self.parse_var()?;
        (var, var)
      }
      TT::KeywordFunction => {
        let func = self.parse_function()?;
        (func, func)
      }
      TT::KeywordIf => {
        let stmt = self.parse_if()?;
        (stmt, stmt)
      }
      TT::KeywordReturn => {
        self.consume()?;
        let mut children = Vec::new();
        if !matches!(self.peek()?.typ, TT::Semicolon | TT::BraceClose | TT::EOF) {
          children.push(self.parse_expr()?);
        };
        self.consume_if(TT::Semicolon)?;
        let stmt = self.node(NodeKind::Return, self.loc_from(t.loc), children);
        (stmt, stmt)
      }
      TT::Semicolon => {
        self.consume()?;
        let stmt = self.node(NodeKind::Empty, t.loc, Vec::new());
        (stmt, stmt)
      }
      _ => {
        let expr = self.parse_expr()?;
        self.consume_if(TT::Semicolon)?;
        let stmt = self.node(NodeKind::ExprResult, self.loc_from(t.loc), vec![expr]);
        // JSDoc on an expression statement documents the expression (e.g. a declaration stub `a.b;`).
        (stmt, expr)
      }
    };
    self.attach_jsdoc(doc_target, t.jsdoc)?;
    Ok(stmt)
  }

  fn parse_block(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::BraceOpen)?.loc;
    let mut body = Vec::new();
    while self.consume_if(TT::BraceClose)?.is_none() {
      body.push(self.parse_stmt()?);
    }
    Ok(self.node(NodeKind::Block, self.loc_from(start), body))
  }

  fn parse_var(&mut self) -> SyntaxResult<NodeId> {
    let t = self.consume()?;
    let kind = match t.typ {
      TT::KeywordLet => VarKind::Let,
      TT::KeywordConst => VarKind::Const,
      _ => VarKind::Var,
    };
    let mut names = Vec::new();
    loop {
      let name_tok = self.require(TT::Identifier)?;
      let mut init = Vec::new();
      if self.consume_if(TT::Equals)?.is_some() {
        init.push(self.parse_assignment()?);
      };
      let name = self.string(name_tok.loc);
      names.push(self.node(NodeKind::Name(name), self.loc_from(name_tok.loc), init));
      if self.consume_if(TT::Comma)?.is_none() {
        break;
      };
    }
    self.consume_if(TT::Semicolon)?;
    Ok(self.node(NodeKind::Var(kind), self.loc_from(t.loc), names))
  }

  fn parse_if(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::KeywordIf)?.loc;
    self.require(TT::ParenthesisOpen)?;
    let test = self.parse_expr()?;
    self.require(TT::ParenthesisClose)?;
    let mut children = vec![test, self.parse_stmt()?];
    if self.consume_if(TT::KeywordElse)?.is_some() {
      children.push(self.parse_stmt()?);
    };
    Ok(self.node(NodeKind::If, self.loc_from(start), children))
  }

  // Used for both declarations and expressions; which one it is depends on where the node ends up.
  fn parse_function(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::KeywordFunction)?.loc;
    let name = match self.consume_if(TT::Identifier)? {
      Some(t) => {
        let name = self.string(t.loc);
        self.node(NodeKind::Name(name), t.loc, Vec::new())
      }
      None => self.node(NodeKind::Name(String::new()), Loc(self.last_end, self.last_end), Vec::new()),
    };
    let params_start = self.require(TT::ParenthesisOpen)?.loc;
    let mut params = Vec::new();
    while self.consume_if(TT::ParenthesisClose)?.is_none() {
      let t = self.require(TT::Identifier)?;
      let param = self.string(t.loc);
      params.push(self.node(NodeKind::Name(param), t.loc, Vec::new()));
      if self.consume_if(TT::Comma)?.is_none() {
        self.require(TT::ParenthesisClose)?;
        break;
      };
    }
    let param_list = self.node(NodeKind::ParamList, self.loc_from(params_start), params);
    let body = self.parse_block()?;
    Ok(self.node(NodeKind::Function, self.loc_from(start), vec![name, param_list, body]))
  }

  pub fn parse_expr(&mut self) -> SyntaxResult<NodeId> {
    self.parse_assignment()
  }

  fn parse_assignment(&mut self) -> SyntaxResult<NodeId> {
    let start = self.peek()?.loc;
    let left = self.parse_binary(1)?;
    let Some(eq) = self.consume_if(TT::Equals)? else {
      return Ok(left);
    };
    if !matches!(
      self.ast.kind(left),
      NodeKind::Name(_) | NodeKind::GetProp(_) | NodeKind::GetElem
    ) {
      return Err(eq.loc.error(SyntaxErrorType::InvalidAssigmentTarget, Some(eq.typ)));
    };
    let right = self.parse_assignment()?;
    Ok(self.node(NodeKind::Assign, self.loc_from(start), vec![left, right]))
  }

  fn parse_binary(&mut self, min_precedence: u8) -> SyntaxResult<NodeId> {
    let start = self.peek()?.loc;
    let mut left = self.parse_unary()?;
    loop {
      let Some((op, precedence)) = binary_operator(self.peek()?.typ) else {
        break;
      };
      if precedence < min_precedence {
        break;
      };
      self.consume()?;
      let right = self.parse_binary(precedence + 1)?;
      left = self.node(NodeKind::Binary(op), self.loc_from(start), vec![left, right]);
    }
    Ok(left)
  }

  fn parse_unary(&mut self) -> SyntaxResult<NodeId> {
    let t = self.peek()?;
    let op = match t.typ {
      TT::Exclamation => UnaryOp::Not,
      TT::Hyphen => UnaryOp::Neg,
      TT::Plus => UnaryOp::Plus,
      TT::KeywordVoid => UnaryOp::Void,
      TT::KeywordTypeof => UnaryOp::Typeof,
      _ => return self.parse_postfix(),
    };
    self.consume()?;
    let operand = self.parse_unary()?;
    Ok(self.node(NodeKind::Unary(op), self.loc_from(t.loc), vec![operand]))
  }

  fn parse_postfix(&mut self) -> SyntaxResult<NodeId> {
    let start = self.peek()?.loc;
    let mut expr = self.parse_primary()?;
    loop {
      let t = self.peek()?;
      match t.typ {
        TT::Dot => {
          self.consume()?;
          let prop = self.consume()?;
          if prop.typ != TT::Identifier && !prop.typ.is_keyword() {
            return Err(self.unexpected(prop, SyntaxErrorType::ExpectedSyntax("property name")));
          };
          let name = self.string(prop.loc);
          expr = self.node(NodeKind::GetProp(name), self.loc_from(start), vec![expr]);
        }
        TT::BracketOpen => {
          self.consume()?;
          let member = self.parse_expr()?;
          self.require(TT::BracketClose)?;
          expr = self.node(NodeKind::GetElem, self.loc_from(start), vec![expr, member]);
        }
        TT::ParenthesisOpen => {
          self.consume()?;
          let mut children = vec![expr];
          while self.consume_if(TT::ParenthesisClose)?.is_none() {
            children.push(self.parse_assignment()?);
            if self.consume_if(TT::Comma)?.is_none() {
              self.require(TT::ParenthesisClose)?;
              break;
            };
          }
          expr = self.node(NodeKind::Call, self.loc_from(start), children);
        }
        _ => break,
      };
    }
    Ok(expr)
  }

  fn parse_primary(&mut self) -> SyntaxResult<NodeId> {
    let t = self.peek()?;
    let kind = match t.typ {
      TT::KeywordFunction => return self.parse_function(),
      TT::ParenthesisOpen => {
        self.consume()?;
        let inner = self.parse_expr()?;
        self.require(TT::ParenthesisClose)?;
        return Ok(inner);
      }
      TT::BraceOpen => return self.parse_object_literal(),
      TT::BracketOpen => return self.parse_array_literal(),
      TT::Identifier => NodeKind::Name(self.string(t.loc)),
      TT::LiteralNumber => {
        let raw = self.string(t.loc);
        let value = raw
          .parse::<f64>()
          .map_err(|_| t.loc.error(SyntaxErrorType::MalformedLiteralNumber, Some(t.typ)))?;
        NodeKind::Number(value)
      }
      TT::LiteralString => {
        let raw = self.string(Loc(t.loc.0 + 1, t.loc.1 - 1));
        NodeKind::Str(unescape(&raw))
      }
      TT::LiteralTrue => NodeKind::True,
      TT::LiteralFalse => NodeKind::False,
      TT::LiteralNull => NodeKind::Null,
      TT::KeywordThis => NodeKind::This,
      _ => return Err(self.unexpected(t, SyntaxErrorType::ExpectedSyntax("expression"))),
    };
    self.consume()?;
    Ok(self.node(kind, t.loc, Vec::new()))
  }

  fn parse_object_literal(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::BraceOpen)?.loc;
    let mut members = Vec::new();
    while self.consume_if(TT::BraceClose)?.is_none() {
      let key = self.consume()?;
      let name = match key.typ {
        TT::LiteralString => unescape(&self.string(Loc(key.loc.0 + 1, key.loc.1 - 1))),
        TT::Identifier | TT::LiteralNumber => self.string(key.loc),
        tt if tt.is_keyword() => self.string(key.loc),
        _ => return Err(self.unexpected(key, SyntaxErrorType::ExpectedSyntax("object key"))),
      };
      self.require(TT::Colon)?;
      let value = self.parse_assignment()?;
      members.push(self.node(NodeKind::StringKey(name), self.loc_from(key.loc), vec![value]));
      if self.consume_if(TT::Comma)?.is_none() {
        self.require(TT::BraceClose)?;
        break;
      };
    }
    Ok(self.node(NodeKind::ObjectLit, self.loc_from(start), members))
  }

  fn parse_array_literal(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::BracketOpen)?.loc;
    let mut elements = Vec::new();
    while self.consume_if(TT::BracketClose)?.is_none() {
      elements.push(self.parse_assignment()?);
      if self.consume_if(TT::Comma)?.is_none() {
        self.require(TT::BracketClose)?;
        break;
      };
    }
    Ok(self.node(NodeKind::ArrayLit, self.loc_from(start), elements))
  }
}
