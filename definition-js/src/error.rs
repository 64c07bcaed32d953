use thiserror::Error;
use tree_js::ast::NodeId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
  #[error("definitions have not been gathered")]
  NotGathered,
  #[error("node {0:?} is not a function")]
  NotAFunction(NodeId),
}

pub type DefinitionResult<T> = Result<T, DefinitionError>;
