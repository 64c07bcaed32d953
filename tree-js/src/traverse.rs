use crate::ast::Ast;
use crate::ast::ModuleId;
use crate::ast::NodeId;
use crate::ast::NodeKind;

/// Hooks invoked by [`NodeTraversal`].
pub trait Callback {
  /// Called before a node is visited. Returning false skips the node and its entire subtree.
  fn should_traverse(&mut self, _t: &NodeTraversal<'_>, _node: NodeId, _parent: Option<NodeId>) -> bool {
    true
  }

  /// Called once per node, before its children. May start nested traversals of detached subtrees via [`NodeTraversal::traverse`].
  fn visit(&mut self, t: &mut NodeTraversal<'_>, node: NodeId, parent: Option<NodeId>);
}

/// Pre-order walker that tracks the current module and lexical scope nesting.
pub struct NodeTraversal<'a> {
  ast: &'a Ast,
  module: Option<ModuleId>,
  // Nodes that opened the currently active scopes, innermost last.
  scopes: Vec<NodeId>,
}

impl<'a> NodeTraversal<'a> {
  pub fn new(ast: &'a Ast) -> NodeTraversal<'a> {
    NodeTraversal {
      ast,
      module: None,
      scopes: Vec::new(),
    }
  }

  /// Convenience for a one-off traversal of `root` with a fresh traversal state.
  pub fn traverse_root<C: Callback + ?Sized>(ast: &'a Ast, root: NodeId, cb: &mut C) {
    NodeTraversal::new(ast).traverse(root, cb);
  }

  pub fn ast(&self) -> &'a Ast {
    self.ast
  }

  /// Module of the script currently being traversed.
  pub fn module(&self) -> Option<ModuleId> {
    self.module
  }

  pub fn in_global_scope(&self) -> bool {
    self.scopes.is_empty()
  }

  /// Traverses `root` as a subtree without a parent, keeping the current module and scope.
  pub fn traverse<C: Callback + ?Sized>(&mut self, root: NodeId, cb: &mut C) {
    self.traverse_branch(root, None, cb);
  }

  fn traverse_branch<C: Callback + ?Sized>(&mut self, node: NodeId, parent: Option<NodeId>, cb: &mut C) {
    if !cb.should_traverse(self, node, parent) {
      return;
    };
    let ast = self.ast;
    match ast.kind(node) {
      NodeKind::Script(module) => {
        let outer = std::mem::replace(&mut self.module, *module);
        cb.visit(self, node, parent);
        self.traverse_children(node, cb);
        self.module = outer;
      }
      NodeKind::Function => self.traverse_function(node, parent, cb),
      NodeKind::Block if !parent.is_some_and(|p| ast.is_function(p)) => {
        cb.visit(self, node, parent);
        self.scopes.push(node);
        self.traverse_children(node, cb);
        self.scopes.pop();
      }
      _ => {
        cb.visit(self, node, parent);
        self.traverse_children(node, cb);
      }
    };
  }

  fn traverse_children<C: Callback + ?Sized>(&mut self, node: NodeId, cb: &mut C) {
    let ast = self.ast;
    for &child in ast.children(node) {
      self.traverse_branch(child, Some(node), cb);
    }
  }

  // A declaration's name binds in the enclosing scope, while a function expression's name is only visible inside the function itself.
  fn traverse_function<C: Callback + ?Sized>(&mut self, node: NodeId, parent: Option<NodeId>, cb: &mut C) {
    let ast = self.ast;
    cb.visit(self, node, parent);
    let children = ast.children(node);
    let mut rest = children;
    if ast.is_function_declaration(node) {
      if let Some((&name, tail)) = children.split_first() {
        self.traverse_branch(name, Some(node), cb);
        rest = tail;
      };
    };
    self.scopes.push(node);
    for &child in rest {
      self.traverse_branch(child, Some(node), cb);
    }
    self.scopes.pop();
  }
}
