use definition_js::name::canonical_name;
use definition_js::NameBasedDefinitionProvider;
use proptest::prelude::*;
use std::collections::HashMap;
use tree_js::ast::NodeId;
use tree_js::Program;

#[derive(Clone, Debug)]
struct ProgramCase {
  externs: String,
  source: String,
}

// A small pool so that names and properties collide often.
fn ident() -> impl Strategy<Value = &'static str> {
  prop::sample::select(vec!["a", "b", "foo", "bar"])
}

fn value() -> impl Strategy<Value = String> {
  prop_oneof![
    Just("1".to_string()),
    Just("'s'".to_string()),
    Just("{}".to_string()),
    Just("function () {}".to_string()),
    ident().prop_map(|name| name.to_string()),
    (ident(), ident()).prop_map(|(obj, prop)| format!("{obj}.{prop}")),
  ]
}

fn statement() -> impl Strategy<Value = String> {
  prop_oneof![
    (ident(), value()).prop_map(|(name, value)| format!("var {name} = {value};")),
    ident().prop_map(|name| format!("var {name};")),
    (ident(), ident(), value()).prop_map(|(obj, prop, value)| format!("{obj}.{prop} = {value};")),
    (ident(), ident(), value()).prop_map(|(name, key, value)| format!("var {name} = {{ {key}: {value} }};")),
    (ident(), ident(), ident()).prop_map(|(name, param, prop)| format!(
      "function {name}({param}) {{ return {param}.{prop}; }}"
    )),
    (ident(), ident()).prop_map(|(obj, prop)| format!("{obj}.{prop};")),
    (ident(), ident()).prop_map(|(obj, prop)| format!("/** @type {{number}} */ {obj}.{prop};")),
    (ident(), ident()).prop_map(|(obj, prop)| format!("{obj}.{prop}.call(null);")),
    (ident(), ident()).prop_map(|(obj, key)| format!("{obj}[{key}] = 1;")),
    ident().prop_map(|name| format!("{name};")),
  ]
}

fn program() -> impl Strategy<Value = ProgramCase> {
  (
    prop::collection::vec(statement(), 0..6),
    prop::collection::vec(statement(), 0..6),
  )
    .prop_map(|(externs, source)| ProgramCase {
      externs: externs.join("\n"),
      source: source.join("\n"),
    })
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  #[test]
  fn definition_sites_never_resolve(case in program()) {
    let program = Program::parse(&case.externs, &case.source).expect("generated program must parse");
    let mut provider = NameBasedDefinitionProvider::new(&program.ast);
    provider.gather(program.externs, program.source);
    for site in provider.definition_sites().unwrap() {
      prop_assert_eq!(provider.definitions_referenced_at(site.node).unwrap(), None);
      let name = canonical_name(&program.ast, site.node);
      prop_assert!(name.is_some(), "site {:?} has no canonical name", site.node);
      let bucket = provider.definitions_named(name.as_deref().unwrap()).unwrap();
      prop_assert!(bucket.contains(&site.definition));
    }
  }

  #[test]
  fn gathering_is_idempotent(case in program()) {
    let program = Program::parse(&case.externs, &case.source).expect("generated program must parse");
    let mut provider = NameBasedDefinitionProvider::new(&program.ast);
    provider.gather(program.externs, program.source);
    let sites: Vec<_> = provider.definition_sites().unwrap().copied().collect();
    let buckets: Vec<_> = provider
      .names()
      .unwrap()
      .map(|name| (name.to_string(), provider.definitions_named(name).unwrap().to_vec()))
      .collect();
    provider.gather(program.externs, program.source);
    prop_assert_eq!(provider.definition_sites().unwrap().copied().collect::<Vec<_>>(), sites);
    for (name, defs) in buckets {
      prop_assert_eq!(provider.definitions_named(&name).unwrap(), defs.as_slice());
    }
  }

  #[test]
  fn buckets_follow_traversal_order(case in program()) {
    let program = Program::parse(&case.externs, &case.source).expect("generated program must parse");
    let ast = &program.ast;
    let position: HashMap<NodeId, usize> = ast
      .descendants(program.externs)
      .chain(ast.descendants(program.source))
      .enumerate()
      .map(|(i, n)| (n, i))
      .collect();
    let mut provider = NameBasedDefinitionProvider::new(ast);
    provider.gather(program.externs, program.source);
    for name in provider.names().unwrap() {
      let defs = provider.definitions_named(name).unwrap();
      prop_assert!(!defs.is_empty());
      let order: Vec<_> = defs.iter().map(|d| position[&d.lvalue()]).collect();
      prop_assert!(order.windows(2).all(|w| w[0] < w[1]), "bucket {} out of order: {:?}", name, order);
      // Extern definitions always precede source ones.
      let externs: Vec<_> = defs.iter().map(|d| d.in_externs()).collect();
      prop_assert!(externs.windows(2).all(|w| w[0] || !w[1]));
    }
  }
}
