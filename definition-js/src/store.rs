use crate::definition::Definition;
use crate::definition::DefinitionSite;
use ahash::RandomState;
use indexmap::IndexMap;
use tree_js::ast::NodeId;

/// Definitions grouped by canonical name, plus the site record of every definition node.
///
/// Both maps preserve insertion order, which is traversal order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefinitionStore {
  by_name: IndexMap<String, Vec<Definition>, RandomState>,
  sites: IndexMap<NodeId, DefinitionSite, RandomState>,
}

impl DefinitionStore {
  pub fn new() -> DefinitionStore {
    DefinitionStore::default()
  }

  /// All definitions under `name`, in insertion order. Empty if there are none.
  pub fn definitions(&self, name: &str) -> &[Definition] {
    self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn site(&self, node: NodeId) -> Option<&DefinitionSite> {
    self.sites.get(&node)
  }

  pub fn sites(&self) -> impl ExactSizeIterator<Item = &DefinitionSite> + '_ {
    self.sites.values()
  }

  pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
    self.by_name.keys().map(String::as_str)
  }

  pub fn name_count(&self) -> usize {
    self.by_name.len()
  }

  pub fn site_count(&self) -> usize {
    self.sites.len()
  }

  /// Records `site` under `name`. A node that already has a site keeps its position but gets the new record.
  pub fn insert(&mut self, name: String, site: DefinitionSite) {
    self.by_name.entry(name).or_default().push(site.definition);
    self.sites.insert(site.node, site);
  }

  /// Removes one occurrence of `definition` from `name`, along with the site that still records it.
  pub fn remove(&mut self, name: &str, definition: &Definition) -> bool {
    let Some(defs) = self.by_name.get_mut(name) else {
      return false;
    };
    let Some(pos) = defs.iter().position(|d| d == definition) else {
      return false;
    };
    defs.remove(pos);
    if defs.is_empty() {
      self.by_name.shift_remove(name);
    };
    // A site's node is usually its l-value, but an extractor may have recorded it elsewhere.
    let lvalue = definition.lvalue();
    let index = match self.sites.get_index_of(&lvalue) {
      Some(i) if self.sites[i].definition == *definition => Some(i),
      _ => self.sites.values().position(|s| s.definition == *definition),
    };
    if let Some(i) = index {
      self.sites.shift_remove_index(i);
    };
    true
  }
}

#[cfg(test)]
mod tests {
  use super::DefinitionStore;
  use crate::definition::Definition;
  use crate::definition::DefinitionSite;
  use tree_js::ast::NodeId;

  fn stub_site(node: u32) -> DefinitionSite {
    DefinitionSite {
      node: NodeId(node),
      definition: Definition::ExternalNameOnly { lvalue: NodeId(node) },
      module: None,
      in_global_scope: true,
      in_externs: true,
    }
  }

  #[test]
  fn test_buckets_preserve_order_and_duplicates() {
    let mut store = DefinitionStore::new();
    store.insert("this.b".into(), stub_site(3));
    store.insert("a".into(), stub_site(1));
    store.insert("this.b".into(), stub_site(2));
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["this.b", "a"]);
    let lvalues: Vec<_> = store.definitions("this.b").iter().map(|d| d.lvalue()).collect();
    assert_eq!(lvalues, vec![NodeId(3), NodeId(2)]);
    assert!(store.definitions("missing").is_empty());
  }

  #[test]
  fn test_remove_drops_empty_bucket_and_site() {
    let mut store = DefinitionStore::new();
    store.insert("a".into(), stub_site(1));
    store.insert("b".into(), stub_site(2));
    let def = store.definitions("a")[0];
    assert!(store.remove("a", &def));
    assert!(!store.remove("a", &def));
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["b"]);
    assert!(store.site(NodeId(1)).is_none());
    assert_eq!(store.site_count(), 1);
  }

  #[test]
  fn test_remove_finds_sites_recorded_away_from_the_lvalue() {
    let mut store = DefinitionStore::new();
    let mut site = stub_site(4);
    site.node = NodeId(3);
    store.insert("a".into(), site);
    store.insert("b".into(), stub_site(5));
    assert!(store.remove("a", &site.definition));
    assert!(store.site(NodeId(3)).is_none());
    assert_eq!(store.sites().map(|s| s.node).collect::<Vec<_>>(), vec![NodeId(5)]);
  }

  #[test]
  fn test_reinserting_a_node_replaces_its_site_in_place() {
    let mut store = DefinitionStore::new();
    store.insert("a".into(), stub_site(1));
    store.insert("b".into(), stub_site(2));
    let mut replacement = stub_site(1);
    replacement.in_global_scope = false;
    store.insert("a".into(), replacement);
    let nodes: Vec<_> = store.sites().map(|s| s.node).collect();
    assert_eq!(nodes, vec![NodeId(1), NodeId(2)]);
    assert!(!store.site(NodeId(1)).unwrap().in_global_scope);
    assert_eq!(store.definitions("a").len(), 2);
  }
}
