use crate::jsdoc::JsDoc;
use crate::loc::Loc;
use serde::Serialize;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;

/// Identity of a node within an [`Ast`]. Two structurally equal nodes at different positions have different IDs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
  fn index(self) -> usize {
    self.0 as usize
  }
}

impl Debug for NodeId {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// The compilation module (chunk) a script belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize)]
pub struct ModuleId(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum VarKind {
  Var,
  Let,
  Const,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum BinaryOp {
  Add,
  Div,
  Equality,
  GreaterThan,
  Inequality,
  LessThan,
  LogicalAnd,
  LogicalOr,
  Mul,
  StrictEquality,
  StrictInequality,
  Sub,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum UnaryOp {
  Neg,
  Not,
  Plus,
  Typeof,
  Void,
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(tag = "$t", content = "v")]
pub enum NodeKind {
  // Container for the scripts of one region (externs or source).
  Root,
  Script(Option<ModuleId>),
  Block,
  // Children are `Name` nodes; an initializer is the only child of its `Name`.
  Var(VarKind),
  ExprResult,
  Return,
  If,
  Empty,
  // Children are `[Name, ParamList, Block]`; the name is empty for anonymous functions.
  // JSDoc function types are `[ParamList, return type?]` instead.
  Function,
  ParamList,
  Name(String),
  // The only child is the receiver.
  GetProp(String),
  GetElem,
  // Children are the callee followed by the arguments.
  Call,
  Assign,
  Binary(BinaryOp),
  Unary(UnaryOp),
  ObjectLit,
  // The only child is the value.
  StringKey(String),
  ArrayLit,
  Number(f64),
  Str(String),
  True,
  False,
  Null,
  This,

  // JSDoc type expressions. Children of `TypeName` are its template arguments.
  TypeName(String),
  TypeUnion,
  TypeNullable,
  TypeNonNull,
  TypeAll,
  TypeUnknown,
}

#[derive(Debug)]
pub struct NodeData {
  pub kind: NodeKind,
  pub parent: Option<NodeId>,
  pub children: Vec<NodeId>,
  pub jsdoc: Option<JsDoc>,
  pub loc: Loc,
}

/// Arena holding every node of a program. Nodes are never removed, so a [`NodeId`] stays valid for the lifetime of the arena.
#[derive(Debug, Default)]
pub struct Ast {
  nodes: Vec<NodeData>,
}

impl Ast {
  pub fn new() -> Ast {
    Ast::default()
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Creates a detached container for one region's scripts.
  pub fn add_root(&mut self) -> NodeId {
    self.push(NodeKind::Root, Loc::default())
  }

  pub fn push(&mut self, kind: NodeKind, loc: Loc) -> NodeId {
    let id = NodeId(self.nodes.len() as u32);
    self.nodes.push(NodeData {
      kind,
      parent: None,
      children: Vec::new(),
      jsdoc: None,
      loc,
    });
    id
  }

  pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
    debug_assert!(self.nodes[child.index()].parent.is_none());
    self.nodes[child.index()].parent = Some(parent);
    self.nodes[parent.index()].children.push(child);
  }

  pub fn set_jsdoc(&mut self, node: NodeId, jsdoc: JsDoc) {
    self.nodes[node.index()].jsdoc = Some(jsdoc);
  }

  pub fn data(&self, node: NodeId) -> &NodeData {
    &self.nodes[node.index()]
  }

  pub fn kind(&self, node: NodeId) -> &NodeKind {
    &self.data(node).kind
  }

  pub fn parent(&self, node: NodeId) -> Option<NodeId> {
    self.data(node).parent
  }

  pub fn children(&self, node: NodeId) -> &[NodeId] {
    &self.data(node).children
  }

  pub fn child(&self, node: NodeId, i: usize) -> Option<NodeId> {
    self.children(node).get(i).copied()
  }

  pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
    self.child(node, 0)
  }

  pub fn jsdoc(&self, node: NodeId) -> Option<&JsDoc> {
    self.data(node).jsdoc.as_ref()
  }

  pub fn loc(&self, node: NodeId) -> Loc {
    self.data(node).loc
  }

  /// Pre-order iterator over `root` and everything below it.
  pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
    Descendants {
      ast: self,
      stack: vec![root],
    }
  }

  pub fn name_str(&self, node: NodeId) -> Option<&str> {
    match self.kind(node) {
      NodeKind::Name(name) => Some(name.as_str()),
      _ => None,
    }
  }

  pub fn is_name(&self, node: NodeId) -> bool {
    matches!(self.kind(node), NodeKind::Name(_))
  }

  pub fn is_get_prop(&self, node: NodeId) -> bool {
    matches!(self.kind(node), NodeKind::GetProp(_))
  }

  pub fn is_function(&self, node: NodeId) -> bool {
    matches!(self.kind(node), NodeKind::Function)
  }

  pub fn is_expr_result(&self, node: NodeId) -> bool {
    matches!(self.kind(node), NodeKind::ExprResult)
  }

  pub fn is_object_lit(&self, node: NodeId) -> bool {
    matches!(self.kind(node), NodeKind::ObjectLit)
  }

  /// A function in statement position with a name. Anything else (including JSDoc function types) is an expression.
  pub fn is_function_declaration(&self, node: NodeId) -> bool {
    if !self.is_function(node) {
      return false;
    };
    let named = self
      .first_child(node)
      .and_then(|name| self.name_str(name))
      .is_some_and(|name| !name.is_empty());
    let in_statement_position = self
      .parent(node)
      .is_some_and(|p| matches!(self.kind(p), NodeKind::Script(_) | NodeKind::Block));
    named && in_statement_position
  }

  pub fn is_function_expression(&self, node: NodeId) -> bool {
    self.is_function(node) && !self.is_function_declaration(node)
  }

  pub fn is_qualified_name(&self, node: NodeId) -> bool {
    match self.kind(node) {
      NodeKind::Name(name) => !name.is_empty(),
      NodeKind::This => true,
      NodeKind::GetProp(_) => self
        .first_child(node)
        .is_some_and(|receiver| self.is_qualified_name(receiver)),
      _ => false,
    }
  }

  /// The dotted path of a qualified name, e.g. `a.b.c`.
  pub fn qualified_name(&self, node: NodeId) -> Option<String> {
    match self.kind(node) {
      NodeKind::Name(name) if !name.is_empty() => Some(name.clone()),
      NodeKind::This => Some("this".to_string()),
      NodeKind::GetProp(prop) => {
        let receiver = self.qualified_name(self.first_child(node)?)?;
        Some(format!("{receiver}.{prop}"))
      }
      _ => None,
    }
  }

  /// Whether two nodes are the same qualified name. Nodes that aren't qualified names never match.
  pub fn matches_qualified_name(&self, a: NodeId, b: NodeId) -> bool {
    match (self.kind(a), self.kind(b)) {
      (NodeKind::Name(x), NodeKind::Name(y)) => !x.is_empty() && x == y,
      (NodeKind::This, NodeKind::This) => true,
      (NodeKind::GetProp(x), NodeKind::GetProp(y)) if x == y => {
        match (self.first_child(a), self.first_child(b)) {
          (Some(ra), Some(rb)) => self.matches_qualified_name(ra, rb),
          _ => false,
        }
      }
      _ => false,
    }
  }

  /// Literals and other values that can neither be reassigned nor have side effects.
  pub fn is_immutable_value(&self, node: NodeId) -> bool {
    match self.kind(node) {
      NodeKind::Str(_) | NodeKind::Number(_) | NodeKind::True | NodeKind::False | NodeKind::Null => {
        true
      }
      NodeKind::Name(name) => matches!(name.as_str(), "undefined" | "Infinity" | "NaN"),
      NodeKind::Unary(UnaryOp::Not | UnaryOp::Neg | UnaryOp::Plus | UnaryOp::Void) => self
        .first_child(node)
        .is_some_and(|operand| self.is_immutable_value(operand)),
      _ => false,
    }
  }

  /// The node naming a function: the variable it initializes, the target it's assigned to, the object literal key it's the value of, or its own name.
  pub fn function_name_node(&self, function: NodeId) -> Option<NodeId> {
    debug_assert!(self.is_function(function));
    if let Some(parent) = self.parent(function) {
      match self.kind(parent) {
        NodeKind::Name(_) | NodeKind::StringKey(_) => return Some(parent),
        NodeKind::Assign if self.child(parent, 1) == Some(function) => {
          return self.first_child(parent);
        }
        _ => {}
      };
    };
    self
      .first_child(function)
      .filter(|&name| self.name_str(name).is_some_and(|n| !n.is_empty()))
  }
}

pub struct Descendants<'a> {
  ast: &'a Ast,
  stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
  type Item = NodeId;

  fn next(&mut self) -> Option<NodeId> {
    let node = self.stack.pop()?;
    self
      .stack
      .extend(self.ast.children(node).iter().rev().copied());
    Some(node)
  }
}

#[cfg(test)]
mod tests {
  use super::Ast;
  use super::NodeKind;
  use super::UnaryOp;
  use crate::loc::Loc;

  fn get_prop(ast: &mut Ast, receiver: &str, prop: &str) -> super::NodeId {
    let r = ast.push(NodeKind::Name(receiver.into()), Loc::default());
    let g = ast.push(NodeKind::GetProp(prop.into()), Loc::default());
    ast.append_child(g, r);
    g
  }

  #[test]
  fn test_qualified_name_matching() {
    let mut ast = Ast::new();
    let ab1 = get_prop(&mut ast, "a", "b");
    let ab2 = get_prop(&mut ast, "a", "b");
    let xb = get_prop(&mut ast, "x", "b");
    assert!(ast.matches_qualified_name(ab1, ab2));
    assert!(!ast.matches_qualified_name(ab1, xb));
    assert_eq!(ast.qualified_name(ab1).as_deref(), Some("a.b"));

    let abc = ast.push(NodeKind::GetProp("c".into()), Loc::default());
    ast.append_child(abc, ab1);
    assert_eq!(ast.qualified_name(abc).as_deref(), Some("a.b.c"));
    assert!(ast.is_qualified_name(abc));
  }

  #[test]
  fn test_computed_receiver_is_not_qualified() {
    let mut ast = Ast::new();
    let call = ast.push(NodeKind::Call, Loc::default());
    let callee = ast.push(NodeKind::Name("f".into()), Loc::default());
    ast.append_child(call, callee);
    let prop = ast.push(NodeKind::GetProp("x".into()), Loc::default());
    ast.append_child(prop, call);
    assert!(!ast.is_qualified_name(prop));
    assert!(!ast.matches_qualified_name(prop, prop));
    assert_eq!(ast.qualified_name(prop), None);
  }

  #[test]
  fn test_immutable_values() {
    let mut ast = Ast::new();
    let num = ast.push(NodeKind::Number(1.0), Loc::default());
    let neg = ast.push(NodeKind::Unary(UnaryOp::Neg), Loc::default());
    ast.append_child(neg, num);
    let undef = ast.push(NodeKind::Name("undefined".into()), Loc::default());
    let other = ast.push(NodeKind::Name("other".into()), Loc::default());
    let arr = ast.push(NodeKind::ArrayLit, Loc::default());
    assert!(ast.is_immutable_value(neg));
    assert!(ast.is_immutable_value(undef));
    assert!(!ast.is_immutable_value(other));
    assert!(!ast.is_immutable_value(arr));
  }

  #[test]
  fn test_object_literal_keys() {
    let mut ast = Ast::new();
    let object = ast.push(NodeKind::ObjectLit, Loc::default());
    let key = ast.push(NodeKind::StringKey("foo".into()), Loc::default());
    let function = ast.push(NodeKind::Function, Loc::default());
    let name = ast.push(NodeKind::Name(String::new()), Loc::default());
    ast.append_child(function, name);
    ast.append_child(key, function);
    ast.append_child(object, key);
    assert!(ast.is_object_lit(object));
    assert!(!ast.is_qualified_name(key));
    assert_eq!(ast.function_name_node(function), Some(key));
  }
}
