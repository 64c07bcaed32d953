use crate::definition::Definition;
use crate::definition::DefinitionSite;
use crate::error::DefinitionError;
use crate::error::DefinitionResult;
use crate::extract::DefinitionExtractor;
use crate::extract::SyntacticExtractor;
use crate::gather::DefinitionGatherer;
use crate::name::canonical_name;
use crate::store::DefinitionStore;
use serde::Serialize;
use tracing::debug;
use tracing::debug_span;
use tree_js::ast::Ast;
use tree_js::ast::NodeId;
use tree_js::ast::NodeKind;
use tree_js::traverse::NodeTraversal;

/// Answers "what could this reference refer to?" for later passes.
pub trait DefinitionProvider {
  /// Every definition the name at `use_site` could refer to, or `None` if it's unknown.
  fn definitions_referenced_at(&self, use_site: NodeId) -> DefinitionResult<Option<&[Definition]>>;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum GatherState {
  NotRun,
  Done,
}

/// Resolves references purely by name, with no scope or type analysis.
///
/// Because property accesses are keyed as `this.<prop>`, every property with the same name
/// collides into one set of candidates. Callers must treat a result with several definitions
/// as ambiguous rather than pick one.
pub struct NameBasedDefinitionProvider<'a, E = SyntacticExtractor> {
  ast: &'a Ast,
  extractor: E,
  store: DefinitionStore,
  state: GatherState,
}

impl<'a> NameBasedDefinitionProvider<'a> {
  pub fn new(ast: &'a Ast) -> Self {
    NameBasedDefinitionProvider::with_extractor(ast, SyntacticExtractor)
  }
}

impl<'a, E: DefinitionExtractor> NameBasedDefinitionProvider<'a, E> {
  pub fn with_extractor(ast: &'a Ast, extractor: E) -> Self {
    NameBasedDefinitionProvider {
      ast,
      extractor,
      store: DefinitionStore::new(),
      state: GatherState::NotRun,
    }
  }

  pub fn state(&self) -> GatherState {
    self.state
  }

  pub fn is_gathered(&self) -> bool {
    self.state == GatherState::Done
  }

  /// Collects definitions from `externs` and then `source`. Only the first call does anything.
  pub fn gather(&mut self, externs: NodeId, source: NodeId) {
    if self.is_gathered() {
      debug!("definitions already gathered");
      return;
    };
    let span = debug_span!("definition_js.gather", externs = ?externs, source = ?source);
    let _enter = span.enter();
    for (root, in_externs) in [(externs, true), (source, false)] {
      let region = if in_externs { "externs" } else { "source" };
      let _region = debug_span!("definition_js.gather_region", region).entered();
      let mut gatherer = DefinitionGatherer {
        store: &mut self.store,
        extractor: &self.extractor,
        in_externs,
      };
      NodeTraversal::traverse_root(self.ast, root, &mut gatherer);
    }
    self.state = GatherState::Done;
    debug!(
      names = self.store.name_count(),
      sites = self.store.site_count(),
      "gathered definitions"
    );
  }

  fn store(&self) -> DefinitionResult<&DefinitionStore> {
    match self.state {
      GatherState::Done => Ok(&self.store),
      GatherState::NotRun => Err(DefinitionError::NotGathered),
    }
  }

  /// Every definition the name at `use_site` could refer to.
  ///
  /// Definition sites are not references, so they resolve to `None`. `f.call` and `f.apply` resolve like `f`.
  pub fn definitions_referenced_at(&self, use_site: NodeId) -> DefinitionResult<Option<&[Definition]>> {
    let store = self.store()?;
    if store.site(use_site).is_some() {
      return Ok(None);
    };
    let ast = self.ast;
    let mut node = use_site;
    if let NodeKind::GetProp(prop) = ast.kind(node) {
      if prop == "apply" || prop == "call" {
        if let Some(receiver) = ast.first_child(node) {
          node = receiver;
        };
      };
    };
    let Some(name) = canonical_name(ast, node) else {
      return Ok(None);
    };
    let defs = store.definitions(&name);
    Ok((!defs.is_empty()).then_some(defs))
  }

  /// The site defining `function` through the name it's bound to, if it has one.
  pub fn definition_for_function(&self, function: NodeId) -> DefinitionResult<Option<&DefinitionSite>> {
    let store = self.store()?;
    if !self.ast.is_function(function) {
      return Err(DefinitionError::NotAFunction(function));
    };
    Ok(
      self
        .ast
        .function_name_node(function)
        .and_then(|name| store.site(name)),
    )
  }

  /// All definition sites in the order they were found.
  pub fn definition_sites(&self) -> DefinitionResult<impl ExactSizeIterator<Item = &DefinitionSite> + '_> {
    Ok(self.store()?.sites())
  }

  /// Definitions recorded under a canonical name such as `foo` or `this.bar`.
  pub fn definitions_named(&self, name: &str) -> DefinitionResult<&[Definition]> {
    Ok(self.store()?.definitions(name))
  }

  pub fn names(&self) -> DefinitionResult<impl ExactSizeIterator<Item = &str> + '_> {
    Ok(self.store()?.names())
  }
}

impl<'a, E: DefinitionExtractor> DefinitionProvider for NameBasedDefinitionProvider<'a, E> {
  fn definitions_referenced_at(&self, use_site: NodeId) -> DefinitionResult<Option<&[Definition]>> {
    NameBasedDefinitionProvider::definitions_referenced_at(self, use_site)
  }
}
