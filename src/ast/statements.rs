use crate::Span;

use super::{
    ast::{Decl, Ident, NodeId},
    expressions::{BinaryOp, Expr},
};

#[derive(Debug, Clone)]
pub struct Block {
    pub id: NodeId,
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn line(&self) -> u32 {
        self.span.start.line
    }
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Decl(Decl),
    Labeled {
        label: Ident,
        stmt: Box<Stmt>,
    },
    Simple(SimpleStmt),
    Return(Vec<Expr>),
    Break(Option<Ident>),
    Continue(Option<Ident>),
    Goto(Ident),
    Block(Block),
    If(IfStmt),
    For {
        init: Option<SimpleStmt>,
        cond: Option<Expr>,
        post: Option<SimpleStmt>,
        body: Block,
    },
}

#[derive(Debug, Clone)]
pub enum SimpleStmt {
    Expr(Expr),
    IncDec {
        expr: Expr,
        increment: bool,
    },
    /// `lhs = rhs`, or `lhs op= rhs` when `op` is set.
    Assign {
        lhs: Vec<Expr>,
        op: Option<BinaryOp>,
        rhs: Vec<Expr>,
    },
    ShortVarDecl {
        names: Vec<Ident>,
        values: Vec<Expr>,
    },
    Empty,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub init: Option<SimpleStmt>,
    pub cond: Expr,
    pub then: Block,
    pub otherwise: Option<ElseBranch>,
}

#[derive(Debug, Clone)]
pub enum ElseBranch {
    If(Box<Stmt>),
    Block(Block),
}
