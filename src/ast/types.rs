use crate::Span;

use super::{
    ast::{Ident, NodeId},
    expressions::Expr,
};

#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub id: NodeId,
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeExprKind {
    /// A type name, optionally qualified by a package: `T` or `pkg.T`.
    Name {
        package: Option<Ident>,
        name: Ident,
    },
    Array {
        len: ArrayLength,
        elem: Box<TypeExpr>,
    },
    Slice(Box<TypeExpr>),
    Pointer(Box<TypeExpr>),
    Struct(Vec<FieldDecl>),
}

#[derive(Debug, Clone)]
pub enum ArrayLength {
    Expr(Box<Expr>),
    /// `[...]T`, only valid in composite literals.
    Inferred,
}

/// `x, y int32` inside a struct type.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub id: NodeId,
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
}
