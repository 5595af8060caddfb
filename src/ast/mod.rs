/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: the source file, declarations and identifiers
/// - expressions: expression nodes and operators
/// - statements: statement nodes and blocks
/// - types: type expressions as written in source
///
/// Nodes the semantic passes annotate carry a `NodeId`.
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
