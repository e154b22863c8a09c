//! tascal-ast - the annotated syntax tree Tascal programs are parsed into.
//!
//! The tree is produced fully type-annotated: the parser in `tascal-par`
//! fuses parsing with semantic analysis, so by the time a [`Program`] exists
//! every [`ast::Expr`] already carries its inferred [`symbol::Type`] and
//! every [`ast::IdRef`] already carries its resolved [`symbol::SymbolId`].

mod ast;
mod symbol;

pub use ast::{
    Assign, BinOpKind, Block, Command, Declaration, Expr, IdRef, If, Program, Read, Repeat,
    UnOpKind, While, Write,
};
pub use symbol::{Symbol, SymbolId, SymbolTable, Type};
