//! AST node definitions for Tascal.
//!
//! Every node the parser can build; the tree exclusively owns its children,
//! and `IdRef` carries a back-reference into the symbol table that produced
//! the compilation's [`crate::SymbolTable`] rather than a raw pointer.

use crate::symbol::{SymbolId, Type};
use tascal_util::Line;

/// The root of a compiled program.
#[derive(Debug, Clone)]
pub struct Program {
    pub name: String,
    pub block: Block,
    pub total_vars: usize,
}

/// A sequence of commands executed in source order.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub commands: Vec<Command>,
}

/// A `var` declaration. Installed into the symbol table as it is parsed;
/// the node itself carries no storage — `AMEM` reserves everything once at
/// program entry.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub names: Vec<String>,
    pub kind: Type,
}

#[derive(Debug, Clone)]
pub enum Command {
    Declaration(Declaration),
    Assign(Assign),
    Read(Read),
    Write(Write),
    If(If),
    While(While),
    Repeat(Repeat),
    Block(Block),
}

#[derive(Debug, Clone)]
pub struct Assign {
    pub target: IdRef,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct Read {
    pub targets: Vec<IdRef>,
}

#[derive(Debug, Clone)]
pub struct Write {
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct If {
    pub cond: Box<Expr>,
    pub then_branch: Box<Block>,
    pub else_branch: Option<Box<Block>>,
}

#[derive(Debug, Clone)]
pub struct While {
    pub cond: Box<Expr>,
    pub body: Box<Block>,
}

/// `repeat ... until cond` — executed at least once, loops while `cond` is
/// false. No surface syntax reaches this node; it exists for the code
/// generator and is exercised directly by tests there.
#[derive(Debug, Clone)]
pub struct Repeat {
    pub body: Box<Block>,
    pub cond: Box<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOpKind {
    Negate,
    Not,
}

#[derive(Debug, Clone)]
pub enum Expr {
    BinOp {
        left: Box<Expr>,
        op: BinOpKind,
        right: Box<Expr>,
        kind: Type,
    },
    UnOp {
        op: UnOpKind,
        operand: Box<Expr>,
        kind: Type,
    },
    IdRef(IdRef),
    NumConst {
        value: i64,
    },
    BoolConst {
        value: bool,
    },
}

impl Expr {
    /// The type this expression was inferred to have. `Type::Unknown` iff
    /// at least one diagnostic was raised somewhere in this sub-tree.
    pub fn kind(&self) -> Type {
        match self {
            Expr::BinOp { kind, .. } => *kind,
            Expr::UnOp { kind, .. } => *kind,
            Expr::IdRef(id_ref) => id_ref.kind,
            Expr::NumConst { .. } => Type::Integer,
            Expr::BoolConst { .. } => Type::Boolean,
        }
    }
}

/// A reference to an identifier, annotated during parsing.
///
/// `symbol` is `None` only when the name never resolved; the parser is
/// required to have emitted an "undeclared" diagnostic whenever that holds.
#[derive(Debug, Clone)]
pub struct IdRef {
    pub name: String,
    pub symbol: Option<SymbolId>,
    pub kind: Type,
    pub line: Line,
}
