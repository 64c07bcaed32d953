//! Arena syntax tree for JavaScript extern and program fragments.
//!
//! Nodes live in a single [`Ast`](ast::Ast) and are referenced by
//! [`NodeId`](ast::NodeId), so analyses can key side tables by node identity
//! without owning or copying the tree. `/** ... */` comments are parsed into
//! [`JsDoc`](jsdoc::JsDoc) records whose type expressions are detached
//! subtrees of the same arena. [`NodeTraversal`](traverse::NodeTraversal)
//! walks the tree in pre-order while tracking module and scope nesting.

use ast::Ast;
use ast::NodeId;
use error::SyntaxResult;
use parse::Parser;

pub mod ast;
pub mod error;
pub mod jsdoc;
pub mod lex;
pub mod loc;
pub mod parse;
pub mod token;
pub mod traverse;

pub use parse::ParseOptions;

/// Parses `source` as a script and appends it to `root`.
pub fn parse_script(ast: &mut Ast, root: NodeId, source: &str, options: ParseOptions) -> SyntaxResult<NodeId> {
  let script = Parser::new(ast, source.as_bytes(), options).parse_script()?;
  ast.append_child(root, script);
  Ok(script)
}

/// An externs region and a source region sharing one arena.
#[derive(Debug)]
pub struct Program {
  pub ast: Ast,
  pub externs: NodeId,
  pub source: NodeId,
}

impl Program {
  pub fn new() -> Program {
    let mut ast = Ast::new();
    let externs = ast.add_root();
    let source = ast.add_root();
    Program {
      ast,
      externs,
      source,
    }
  }

  /// Parses one extern script and one source script, neither assigned to a module.
  pub fn parse(externs: &str, source: &str) -> SyntaxResult<Program> {
    let mut program = Program::new();
    program.add_extern(externs, ParseOptions::default())?;
    program.add_source(source, ParseOptions::default())?;
    Ok(program)
  }

  pub fn add_extern(&mut self, source: &str, options: ParseOptions) -> SyntaxResult<NodeId> {
    parse_script(&mut self.ast, self.externs, source, options)
  }

  pub fn add_source(&mut self, source: &str, options: ParseOptions) -> SyntaxResult<NodeId> {
    parse_script(&mut self.ast, self.source, source, options)
  }
}

impl Default for Program {
  fn default() -> Self {
    Program::new()
  }
}
