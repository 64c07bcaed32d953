//! Name-based definition resolution for JavaScript programs.
//!
//! [`NameBasedDefinitionProvider`] walks an externs region and a source region
//! of a [`tree_js`] arena once, recording every node that defines a name. It
//! can then answer which definitions a reference might point to, keyed only by
//! a [canonical name](name::canonical_name): identifiers by their text and
//! property accesses as `this.<prop>`, regardless of receiver. Results are a
//! set of candidates, never a single resolved binding.
//!
//! ```
//! use definition_js::NameBasedDefinitionProvider;
//! use tree_js::Program;
//!
//! let program = Program::parse("", "x.foo = function () {}; y.foo = 1; x.foo();").unwrap();
//! let mut provider = NameBasedDefinitionProvider::new(&program.ast);
//! provider.gather(program.externs, program.source);
//! assert_eq!(provider.definitions_named("this.foo").unwrap().len(), 2);
//! ```

pub mod definition;
pub mod error;
pub mod extract;
mod gather;
pub mod name;
pub mod provider;
pub mod store;

pub use definition::Definition;
pub use definition::DefinitionSite;
pub use error::DefinitionError;
pub use extract::DefinitionExtractor;
pub use extract::SyntacticExtractor;
pub use provider::DefinitionProvider;
pub use provider::GatherState;
pub use provider::NameBasedDefinitionProvider;
