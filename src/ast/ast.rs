use crate::Span;

use super::{expressions::Expr, statements::Block, types::TypeExpr};

/// Identifies a syntax node in the side tables the semantic passes fill.
pub type NodeId = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn line(&self) -> u32 {
        self.span.start.line
    }
}

/// Root of a parsed file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: NodeId,
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<TopLevelDecl>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ImportSpec {
    pub id: NodeId,
    /// Import path with its quotes removed.
    pub path: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TopLevelDecl {
    Decl(Decl),
    Function(FunctionDecl),
}

/// A `const`, `type` or `var` declaration, possibly grouped in parentheses.
#[derive(Debug, Clone)]
pub enum Decl {
    Const(Vec<ConstSpec>),
    Type(Vec<TypeSpec>),
    Var(Vec<VarSpec>),
}

#[derive(Debug, Clone)]
pub struct ConstSpec {
    pub id: NodeId,
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VarSpec {
    pub id: NodeId,
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub id: NodeId,
    pub name: Ident,
    pub ty: TypeExpr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub id: NodeId,
    pub name: Ident,
    pub signature: Signature,
    /// Absent for declarations of externally implemented functions.
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Signature {
    pub id: NodeId,
    pub params: Vec<ParameterDecl>,
    pub result: Option<TypeExpr>,
    pub span: Span,
}

/// `a, b int32`
#[derive(Debug, Clone)]
pub struct ParameterDecl {
    pub id: NodeId,
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
}
