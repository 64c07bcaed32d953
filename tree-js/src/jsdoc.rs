use crate::ast::Ast;
use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;

// Tags that declare something about the annotated name, as opposed to purely descriptive ones like `@deprecated` or `@see`.
const DECLARATION_TAGS: &[&str] = &[
  "const",
  "constructor",
  "define",
  "enum",
  "export",
  "extends",
  "final",
  "implements",
  "interface",
  "package",
  "param",
  "private",
  "protected",
  "public",
  "record",
  "return",
  "this",
  "type",
  "typedef",
];

#[derive(Clone, Debug, PartialEq)]
pub struct JsDocTag {
  pub name: String,
  // Root of the parsed `{...}` type expression. Type nodes live in the same arena but have no parent.
  pub type_root: Option<NodeId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsDoc {
  pub tags: Vec<JsDocTag>,
}

impl JsDoc {
  pub fn has_tag(&self, name: &str) -> bool {
    self.tags.iter().any(|t| t.name == name)
  }

  /// Roots of every type expression in this comment, in source order.
  pub fn type_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
    self.tags.iter().filter_map(|t| t.type_root)
  }

  /// Whether the comment actually declares something (a type, visibility, constness, etc.).
  pub fn contains_declaration(&self) -> bool {
    self
      .tags
      .iter()
      .any(|t| DECLARATION_TAGS.contains(&t.name.as_str()))
  }
}

fn is_type_name_char(c: u8) -> bool {
  c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'.')
}

/// Parses the contents of a `/** ... */` comment. `loc` is the location of the contents within the source.
pub fn parse_jsdoc(ast: &mut Ast, text: &[u8], loc: Loc) -> SyntaxResult<JsDoc> {
  let mut tags = Vec::new();
  let mut i = 0;
  while i < text.len() {
    let at_word_start = i == 0 || matches!(text[i - 1], b' ' | b'\t' | b'\n' | b'\r' | b'*');
    if text[i] != b'@' || !at_word_start {
      i += 1;
      continue;
    };
    let name_start = i + 1;
    i = name_start;
    while i < text.len() && text[i].is_ascii_alphabetic() {
      i += 1;
    }
    let name = String::from_utf8_lossy(&text[name_start..i]).into_owned();
    while i < text.len() && matches!(text[i], b' ' | b'\t') {
      i += 1;
    }
    let mut type_root = None;
    if i < text.len() && text[i] == b'{' {
      let end = matching_brace(text, i).ok_or_else(|| {
        Loc(loc.0 + i, loc.1).error(SyntaxErrorType::MalformedJsDocType, None)
      })?;
      let mut parser = TypeParser {
        ast: &mut *ast,
        src: &text[i + 1..end],
        pos: 0,
        base: loc.0 + i + 1,
      };
      type_root = Some(parser.parse_complete()?);
      i = end + 1;
    };
    if !name.is_empty() {
      tags.push(JsDocTag { name, type_root });
    };
  }
  Ok(JsDoc { tags })
}

fn matching_brace(text: &[u8], open: usize) -> Option<usize> {
  let mut depth = 0usize;
  for (j, &c) in text.iter().enumerate().skip(open) {
    match c {
      b'{' => depth += 1,
      b'}' => {
        depth -= 1;
        if depth == 0 {
          return Some(j);
        };
      }
      _ => {}
    };
  }
  None
}

struct TypeParser<'a> {
  ast: &'a mut Ast,
  src: &'a [u8],
  pos: usize,
  base: usize,
}

impl<'a> TypeParser<'a> {
  fn loc_from(&self, start: usize) -> Loc {
    Loc(self.base + start, self.base + self.pos)
  }

  fn error(&self) -> crate::error::SyntaxError {
    Loc(self.base + self.pos, self.base + self.pos + 1).error(SyntaxErrorType::MalformedJsDocType, None)
  }

  fn skip_ws(&mut self) {
    while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
      self.pos += 1;
    }
  }

  fn peek(&mut self) -> Option<u8> {
    self.skip_ws();
    self.src.get(self.pos).copied()
  }

  fn consume_if(&mut self, c: u8) -> bool {
    if self.peek() == Some(c) {
      self.pos += 1;
      true
    } else {
      false
    }
  }

  fn require(&mut self, c: u8) -> SyntaxResult<()> {
    if self.consume_if(c) {
      Ok(())
    } else {
      Err(self.error())
    }
  }

  fn consume_keyword(&mut self, kw: &str) -> bool {
    self.skip_ws();
    let end = self.pos + kw.len();
    let matches = self.src.get(self.pos..end) == Some(kw.as_bytes())
      && !self.src.get(end).copied().is_some_and(is_type_name_char);
    if matches {
      self.pos = end;
    };
    matches
  }

  fn node(&mut self, kind: NodeKind, start: usize, children: Vec<NodeId>) -> NodeId {
    let loc = self.loc_from(start);
    let node = self.ast.push(kind, loc);
    for c in children {
      self.ast.append_child(node, c);
    }
    node
  }

  fn parse_complete(&mut self) -> SyntaxResult<NodeId> {
    let root = self.parse_union()?;
    if self.peek().is_some() {
      return Err(self.error());
    };
    Ok(root)
  }

  fn parse_union(&mut self) -> SyntaxResult<NodeId> {
    self.skip_ws();
    let start = self.pos;
    let mut alternatives = vec![self.parse_prefixed()?];
    while self.consume_if(b'|') {
      alternatives.push(self.parse_prefixed()?);
    }
    if alternatives.len() == 1 {
      return Ok(alternatives.remove(0));
    };
    Ok(self.node(NodeKind::TypeUnion, start, alternatives))
  }

  fn ends_type(c: Option<u8>) -> bool {
    matches!(c, None | Some(b'|' | b',' | b'>' | b')' | b'=' | b'}'))
  }

  fn parse_prefixed(&mut self) -> SyntaxResult<NodeId> {
    self.skip_ws();
    let start = self.pos;
    let node = match self.peek() {
      Some(b'?') => {
        self.pos += 1;
        if Self::ends_type(self.peek()) {
          self.node(NodeKind::TypeUnknown, start, Vec::new())
        } else {
          let inner = self.parse_prefixed()?;
          self.node(NodeKind::TypeNullable, start, vec![inner])
        }
      }
      Some(b'!') => {
        self.pos += 1;
        let inner = self.parse_prefixed()?;
        self.node(NodeKind::TypeNonNull, start, vec![inner])
      }
      Some(b'*') => {
        self.pos += 1;
        self.node(NodeKind::TypeAll, start, Vec::new())
      }
      Some(b'.') if self.src[self.pos..].starts_with(b"...") => {
        self.pos += 3;
        self.parse_prefixed()?
      }
      _ => self.parse_basic()?,
    };
    // Optional parameter marker.
    self.consume_if(b'=');
    Ok(node)
  }

  fn parse_basic(&mut self) -> SyntaxResult<NodeId> {
    self.skip_ws();
    let start = self.pos;
    if self.consume_if(b'(') {
      let inner = self.parse_union()?;
      self.require(b')')?;
      return Ok(inner);
    };
    if self.consume_keyword("function") {
      return self.parse_function(start);
    };
    while self.pos < self.src.len() && is_type_name_char(self.src[self.pos]) {
      self.pos += 1;
    }
    // A trailing `.` belongs to the `.<T>` template syntax.
    let mut name_end = self.pos;
    if name_end > start && self.src[name_end - 1] == b'.' {
      name_end -= 1;
    };
    if name_end == start {
      return Err(self.error());
    };
    let name = String::from_utf8_lossy(&self.src[start..name_end]).into_owned();
    let mut args = Vec::new();
    if self.consume_if(b'<') {
      loop {
        args.push(self.parse_union()?);
        if !self.consume_if(b',') {
          break;
        };
      }
      self.require(b'>')?;
    };
    Ok(self.node(NodeKind::TypeName(name), start, args))
  }

  // Produces `Function[ParamList[...], return?]`, the same shape the traversal filter uses to tell type expressions apart from real functions.
  fn parse_function(&mut self, start: usize) -> SyntaxResult<NodeId> {
    self.require(b'(')?;
    let params_start = self.pos;
    let mut params = Vec::new();
    if !self.consume_if(b')') {
      loop {
        // `this:` and `new:` label the context type; only the type itself matters.
        for label in ["this", "new"] {
          let checkpoint = self.pos;
          if self.consume_keyword(label) && !self.consume_if(b':') {
            self.pos = checkpoint;
          };
        }
        params.push(self.parse_union()?);
        if !self.consume_if(b',') {
          break;
        };
      }
      self.require(b')')?;
    };
    let param_list = self.node(NodeKind::ParamList, params_start, params);
    let mut children = vec![param_list];
    if self.consume_if(b':') {
      children.push(self.parse_prefixed()?);
    };
    Ok(self.node(NodeKind::Function, start, children))
  }
}

#[cfg(test)]
mod tests {
  use super::parse_jsdoc;
  use crate::ast::Ast;
  use crate::ast::NodeKind;
  use crate::loc::Loc;

  fn parse(ast: &mut Ast, text: &str) -> super::JsDoc {
    parse_jsdoc(ast, text.as_bytes(), Loc(0, text.len())).unwrap()
  }

  #[test]
  fn test_declaration_tags() {
    let mut ast = Ast::new();
    assert!(parse(&mut ast, " @const ").contains_declaration());
    assert!(parse(&mut ast, "\n * @return {number}\n ").contains_declaration());
    assert!(!parse(&mut ast, " @deprecated use foo@bar instead ").contains_declaration());
    assert!(!parse(&mut ast, " Just a description. ").contains_declaration());
  }

  #[test]
  fn test_type_expressions() {
    let mut ast = Ast::new();
    let doc = parse(&mut ast, " @type {!Array<ns.Foo|string>} ");
    let roots: Vec<_> = doc.type_nodes().collect();
    assert_eq!(roots.len(), 1);
    let root = roots[0];
    assert_eq!(ast.kind(root), &NodeKind::TypeNonNull);
    assert_eq!(ast.parent(root), None);
    let array = ast.first_child(root).unwrap();
    assert_eq!(ast.kind(array), &NodeKind::TypeName("Array".into()));
    let union = ast.first_child(array).unwrap();
    assert_eq!(ast.kind(union), &NodeKind::TypeUnion);
    let names: Vec<_> = ast
      .children(union)
      .iter()
      .map(|&c| ast.kind(c).clone())
      .collect();
    assert_eq!(names, vec![
      NodeKind::TypeName("ns.Foo".into()),
      NodeKind::TypeName("string".into()),
    ]);
  }

  #[test]
  fn test_function_type_shape() {
    let mut ast = Ast::new();
    let doc = parse(&mut ast, " @param {function(this:Foo, number=): ?} cb ");
    let f = doc.type_nodes().next().unwrap();
    assert!(ast.is_function(f));
    let params = ast.first_child(f).unwrap();
    assert_eq!(ast.kind(params), &NodeKind::ParamList);
    assert_eq!(ast.children(params).len(), 2);
    assert_eq!(ast.kind(ast.child(f, 1).unwrap()), &NodeKind::TypeUnknown);
    assert!(!ast.is_name(params));
  }

  #[test]
  fn test_malformed_type() {
    let mut ast = Ast::new();
    let text = " @type {Array<} ";
    assert!(parse_jsdoc(&mut ast, text.as_bytes(), Loc(0, text.len())).is_err());
  }
}
