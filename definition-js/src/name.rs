use tree_js::ast::Ast;
use tree_js::ast::NodeId;
use tree_js::ast::NodeKind;

/// Extracts the key a definition or use site is indexed under.
///
/// For property accesses the receiver is replaced with `this`, so `x.foo` and `y.foo` share the key `this.foo`. This loses precision, but after property disambiguation has run, property names are unique enough in practice that qualifying them isn't worth the cost.
///
/// An object literal key names the property it defines, so `{ foo: 1 }` is keyed like `x.foo`.
pub fn canonical_name(ast: &Ast, node: NodeId) -> Option<String> {
  match ast.kind(node) {
    NodeKind::Name(name) if !name.is_empty() => Some(name.clone()),
    NodeKind::GetProp(prop) => Some(format!("this.{prop}")),
    NodeKind::StringKey(key) if ast.parent(node).is_some_and(|p| ast.is_object_lit(p)) => {
      Some(format!("this.{key}"))
    }
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::canonical_name;
  use tree_js::ast::NodeKind;
  use tree_js::Program;

  fn name_of_first(source: &str, pred: impl Fn(&NodeKind) -> bool) -> Option<String> {
    let program = Program::parse("", source).unwrap();
    let ast = &program.ast;
    let node = ast
      .descendants(program.source)
      .find(|&n| pred(ast.kind(n)))
      .unwrap();
    canonical_name(ast, node)
  }

  #[test]
  fn test_names_are_verbatim() {
    assert_eq!(name_of_first("foo;", |k| matches!(k, NodeKind::Name(_))).as_deref(), Some("foo"));
  }

  #[test]
  fn test_receiver_is_discarded() {
    assert_eq!(
      name_of_first("a.b.c;", |k| matches!(k, NodeKind::GetProp(_))).as_deref(),
      Some("this.c"),
    );
    assert_eq!(
      name_of_first("f().x;", |k| matches!(k, NodeKind::GetProp(_))).as_deref(),
      Some("this.x"),
    );
  }

  #[test]
  fn test_object_keys_are_properties() {
    assert_eq!(
      name_of_first("({ 'foo': 1 });", |k| matches!(k, NodeKind::StringKey(_))).as_deref(),
      Some("this.foo"),
    );
    assert_eq!(name_of_first("({ foo: 1 });", |k| matches!(k, NodeKind::ObjectLit)), None);
  }

  #[test]
  fn test_unresolvable_shapes() {
    assert_eq!(name_of_first("a[b];", |k| matches!(k, NodeKind::GetElem)), None);
    assert_eq!(name_of_first("f();", |k| matches!(k, NodeKind::Call)), None);
    assert_eq!(name_of_first("'s';", |k| matches!(k, NodeKind::Str(_))), None);
    assert_eq!(name_of_first("this;", |k| matches!(k, NodeKind::This)), None);
    // Anonymous functions carry an empty name node.
    assert_eq!(
      name_of_first("(function () {});", |k| matches!(k, NodeKind::Name(_))),
      None,
    );
  }
}
