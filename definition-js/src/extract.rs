use crate::definition::Definition;
use tree_js::ast::Ast;
use tree_js::ast::NodeId;
use tree_js::ast::NodeKind;

/// Decides whether a node defines a name.
pub trait DefinitionExtractor {
  fn extract(&self, ast: &Ast, node: NodeId, in_externs: bool) -> Option<Definition>;
}

impl<F: Fn(&Ast, NodeId, bool) -> Option<Definition>> DefinitionExtractor for F {
  fn extract(&self, ast: &Ast, node: NodeId, in_externs: bool) -> Option<Definition> {
    self(ast, node, in_externs)
  }
}

/// Recognizes definitions from syntax alone: variable declarations, function names, assignment targets, function parameters, and object literal keys.
///
/// A declared variable without an initializer is still a definition, with no value.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyntacticExtractor;

impl DefinitionExtractor for SyntacticExtractor {
  fn extract(&self, ast: &Ast, node: NodeId, in_externs: bool) -> Option<Definition> {
    let parent = ast.parent(node)?;
    let concrete = |rvalue| Definition::Concrete {
      lvalue: node,
      rvalue,
      in_externs,
    };
    match ast.kind(parent) {
      NodeKind::Var(_) if ast.name_str(node).is_some_and(|n| !n.is_empty()) => {
        Some(concrete(ast.first_child(node)))
      }
      NodeKind::Function if ast.first_child(parent) == Some(node) => {
        let name = ast.name_str(node)?;
        (ast.is_function_declaration(parent) || !name.is_empty()).then(|| concrete(Some(parent)))
      }
      NodeKind::Assign if ast.first_child(parent) == Some(node) => Some(concrete(ast.child(parent, 1))),
      NodeKind::ObjectLit if matches!(ast.kind(node), NodeKind::StringKey(_)) => {
        Some(concrete(ast.first_child(node)))
      }
      NodeKind::ParamList if ast.is_name(node) => {
        let function = ast.parent(parent)?;
        ast.is_function(function).then(|| concrete(None))
      }
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::DefinitionExtractor;
  use super::SyntacticExtractor;
  use crate::definition::Definition;
  use tree_js::ast::Ast;
  use tree_js::ast::NodeId;
  use tree_js::ast::NodeKind;
  use tree_js::Program;

  fn extracted(source: &str) -> Vec<(NodeKind, Option<NodeKind>)> {
    let program = Program::parse("", source).unwrap();
    let ast = &program.ast;
    ast
      .descendants(program.source)
      .filter_map(|n| SyntacticExtractor.extract(ast, n, false))
      .map(|def| {
        assert!(!def.in_externs());
        (
          ast.kind(def.lvalue()).clone(),
          def.rvalue().map(|r| ast.kind(r).clone()),
        )
      })
      .collect()
  }

  #[test]
  fn test_var_declarations() {
    assert_eq!(extracted("var a = 1, b;"), vec![
      (NodeKind::Name("a".into()), Some(NodeKind::Number(1.0))),
      (NodeKind::Name("b".into()), None),
    ]);
  }

  #[test]
  fn test_functions_and_parameters() {
    assert_eq!(extracted("function f(p) {} (function () {}); (function g() {});"), vec![
      (NodeKind::Name("f".into()), Some(NodeKind::Function)),
      (NodeKind::Name("p".into()), None),
      (NodeKind::Name("g".into()), Some(NodeKind::Function)),
    ]);
  }

  #[test]
  fn test_assignment_targets() {
    assert_eq!(extracted("a.b = c; d[0] = 1;"), vec![
      (NodeKind::GetProp("b".into()), Some(NodeKind::Name("c".into()))),
      (NodeKind::GetElem, Some(NodeKind::Number(1.0))),
    ]);
  }

  #[test]
  fn test_object_literal_keys() {
    assert_eq!(extracted("({ k: 1, 'm': n });"), vec![
      (NodeKind::StringKey("k".into()), Some(NodeKind::Number(1.0))),
      (NodeKind::StringKey("m".into()), Some(NodeKind::Name("n".into()))),
    ]);
  }

  #[test]
  fn test_uses_are_not_definitions() {
    assert_eq!(extracted("f(a.b); x = y;").len(), 1);
    assert!(extracted("({});").is_empty());
  }

  #[test]
  fn test_closures_are_extractors() {
    let program = Program::parse("", "a;").unwrap();
    let always_stub = |_: &Ast, n: NodeId, _: bool| Some(Definition::ExternalNameOnly { lvalue: n });
    assert!(always_stub.extract(&program.ast, program.source, false).is_some());
  }
}
