//! AST and IR primitives for the Tarn compiler.
//!
//! This crate provides:
//!
//! - **Interned names** ([`Name`], [`StringInterner`]) — compact 32-bit
//!   identifiers with O(1) equality, shared across the whole compilation.
//! - **Flat AST** ([`Expr`], [`Stmt`], [`ExprArena`]) — expression and
//!   statement nodes stored in contiguous arrays and referenced by
//!   [`ExprId`]/[`StmtId`] indices instead of boxes.
//! - **Traversal** ([`Visitor`]) — a read-only walker over the arena.
//!
//! Every downstream pass (type inference, class generation, emission)
//! operates on these types; none of them own the AST.

pub mod arena;
pub mod ast;
pub mod ids;
pub mod interner;
pub mod name;
pub mod span;
pub mod visit;

pub use arena::{to_u16, to_u32, ExprArena};
pub use ast::{
    BinaryOp, Binding, CallExpr, Expr, ExprKind, LambdaParam, Stmt, StmtKind, VarExpr, VarInfo,
};
pub use ids::{ExprId, ExprRange, ParamRange, StmtId, StmtRange, VarId};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::Span;
pub use visit::{walk_expr, walk_stmt, Visitor};
