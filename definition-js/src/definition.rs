use serde::Serialize;
use tree_js::ast::ModuleId;
use tree_js::ast::NodeId;

/// Something that may define the value of a name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(tag = "kind")]
pub enum Definition {
  /// The value is absent, an immutable literal, or a function.
  Concrete {
    lvalue: NodeId,
    rvalue: Option<NodeId>,
    in_externs: bool,
  },
  /// Defined somewhere, but the value is too complex to characterize.
  Unknown { lvalue: NodeId, in_externs: bool },
  /// A declaration stub in the externs with no value at all, e.g. `a.b;`.
  ExternalNameOnly { lvalue: NodeId },
}

impl Definition {
  pub fn lvalue(&self) -> NodeId {
    match *self {
      Definition::Concrete { lvalue, .. }
      | Definition::Unknown { lvalue, .. }
      | Definition::ExternalNameOnly { lvalue } => lvalue,
    }
  }

  pub fn rvalue(&self) -> Option<NodeId> {
    match *self {
      Definition::Concrete { rvalue, .. } => rvalue,
      Definition::Unknown { .. } | Definition::ExternalNameOnly { .. } => None,
    }
  }

  pub fn in_externs(&self) -> bool {
    match *self {
      Definition::Concrete { in_externs, .. } | Definition::Unknown { in_externs, .. } => in_externs,
      Definition::ExternalNameOnly { .. } => true,
    }
  }

  pub fn is_external_name_only(&self) -> bool {
    matches!(self, Definition::ExternalNameOnly { .. })
  }
}

/// A node classified as a definition, with the context it was found in.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct DefinitionSite {
  pub node: NodeId,
  pub definition: Definition,
  pub module: Option<ModuleId>,
  pub in_global_scope: bool,
  pub in_externs: bool,
}
