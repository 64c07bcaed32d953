use crate::definition::Definition;
use crate::definition::DefinitionSite;
use crate::extract::DefinitionExtractor;
use crate::name::canonical_name;
use crate::store::DefinitionStore;
use tree_js::ast::Ast;
use tree_js::ast::NodeId;
use tree_js::traverse::Callback;
use tree_js::traverse::NodeTraversal;

/// Traversal callback that records every definition in one region.
pub(crate) struct DefinitionGatherer<'s, E: ?Sized> {
  pub store: &'s mut DefinitionStore,
  pub extractor: &'s E,
  pub in_externs: bool,
}

impl<'s, E: DefinitionExtractor + ?Sized> DefinitionGatherer<'s, E> {
  // Sites are keyed by the visited node, which an extractor may pick apart from the l-value.
  fn record(&mut self, t: &NodeTraversal<'_>, node: NodeId, name: String, definition: Definition) {
    let site = DefinitionSite {
      node,
      definition,
      module: t.module(),
      in_global_scope: t.in_global_scope(),
      in_externs: self.in_externs,
    };
    self.store.insert(name, site);
  }

  fn declares(ast: &Ast, node: NodeId) -> bool {
    ast.jsdoc(node).is_some_and(|doc| doc.contains_declaration())
  }

  // A real definition of `a.b` in the externs supersedes an earlier untyped `a.b;`.
  fn drop_superseded_stubs(&mut self, ast: &Ast, node: NodeId, name: &str) {
    if !ast.is_qualified_name(node) || Self::declares(ast, node) {
      return;
    };
    let snapshot = self.store.definitions(name).to_vec();
    for stub in snapshot.iter().filter(|d| d.is_external_name_only()) {
      if ast.matches_qualified_name(stub.lvalue(), node) {
        tracing::trace!(target: "definition_js::stubs", canonical = name, stub = ?stub.lvalue(), by = ?node, "dropping superseded stub");
        self.store.remove(name, stub);
      };
    }
  }

  // An expression statement like `a.b;` in the externs declares `a.b` without a value, unless it is untyped and repeats a name that is already defined.
  fn record_stub(&mut self, t: &NodeTraversal<'_>, node: NodeId) {
    let ast = t.ast();
    let Some(name) = canonical_name(ast, node) else {
      return;
    };
    let redundant = !Self::declares(ast, node)
      && ast.is_qualified_name(node)
      && self
        .store
        .definitions(&name)
        .iter()
        .any(|d| ast.matches_qualified_name(d.lvalue(), node));
    if redundant {
      tracing::trace!(target: "definition_js::stubs", canonical = name.as_str(), node = ?node, "skipping redundant stub");
      return;
    };
    self.record(t, node, name, Definition::ExternalNameOnly { lvalue: node });
  }
}

impl<'s, E: DefinitionExtractor + ?Sized> Callback for DefinitionGatherer<'s, E> {
  fn should_traverse(&mut self, t: &NodeTraversal<'_>, node: NodeId, parent: Option<NodeId>) -> bool {
    if !self.in_externs {
      return true;
    };
    let ast = t.ast();
    // JSDoc function types start with their parameter list rather than a name.
    if ast.is_function(node) && !ast.first_child(node).is_some_and(|c| ast.is_name(c)) {
      return false;
    };
    // Parameters and bodies of extern functions are documentation only.
    match parent {
      Some(p) if ast.is_function(p) => ast.first_child(p) == Some(node),
      _ => true,
    }
  }

  fn visit(&mut self, t: &mut NodeTraversal<'_>, node: NodeId, parent: Option<NodeId>) {
    let ast = t.ast();
    if self.in_externs {
      if let Some(doc) = ast.jsdoc(node) {
        for root in doc.type_nodes() {
          t.traverse(root, self);
        }
      };
    };

    if let Some(mut definition) = self.extractor.extract(ast, node, self.in_externs) {
      let lvalue = definition.lvalue();
      if let Some(name) = canonical_name(ast, lvalue) {
        if let Some(rvalue) = definition.rvalue() {
          if !ast.is_immutable_value(rvalue) && !ast.is_function(rvalue) {
            definition = Definition::Unknown {
              lvalue,
              in_externs: self.in_externs,
            };
          };
        };
        if self.in_externs {
          self.drop_superseded_stubs(ast, node, &name);
        };
        self.record(t, node, name, definition);
      };
    };

    if self.in_externs && parent.is_some_and(|p| ast.is_expr_result(p)) {
      self.record_stub(t, node);
    };
  }
}
