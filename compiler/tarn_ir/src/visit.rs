//! AST visitor.
//!
//! Provides generic read-only traversal of the arena. Default `visit_*`
//! implementations call the `walk_*` free functions, which recurse into
//! children; override a `visit_*` method to observe specific nodes and call
//! the matching `walk_*` to continue downward.
//!
//! The visitor may mutate its own state, never the arena.

use crate::ast::{ExprKind, StmtKind};
use crate::{ExprArena, ExprId, StmtId};

/// AST visitor trait.
pub trait Visitor {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        walk_expr(self, id, arena);
    }

    fn visit_stmt(&mut self, id: StmtId, arena: &ExprArena) {
        walk_stmt(self, id, arena);
    }
}

/// Recurse into an expression's children.
pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, id: ExprId, arena: &ExprArena) {
    match *arena.kind(id) {
        ExprKind::Int(_)
        | ExprKind::Bool(_)
        | ExprKind::Str(_)
        | ExprKind::Null
        | ExprKind::Var(_) => {}
        ExprKind::Assign { target, value } => {
            visitor.visit_expr(target, arena);
            visitor.visit_expr(value, arena);
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            visitor.visit_expr(lhs, arena);
            visitor.visit_expr(rhs, arena);
        }
        ExprKind::Call(call) => {
            visitor.visit_expr(call.receiver, arena);
            for &arg in arena.exprs(call.args) {
                visitor.visit_expr(arg, arena);
            }
        }
        ExprKind::Lambda { body, .. } => {
            visitor.visit_stmt(body, arena);
        }
    }
}

/// Recurse into a statement's children.
pub fn walk_stmt<V: Visitor + ?Sized>(visitor: &mut V, id: StmtId, arena: &ExprArena) {
    match arena.stmt(id).kind {
        StmtKind::Expr(expr) => visitor.visit_expr(expr, arena),
        StmtKind::Let { init, .. } => {
            if init.is_valid() {
                visitor.visit_expr(init, arena);
            }
        }
        StmtKind::Return(expr) => {
            if expr.is_valid() {
                visitor.visit_expr(expr, arena);
            }
        }
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(cond, arena);
            visitor.visit_stmt(then_branch, arena);
            if else_branch.is_valid() {
                visitor.visit_stmt(else_branch, arena);
            }
        }
        StmtKind::Block(range) => {
            for &stmt in arena.stmts(range) {
                visitor.visit_stmt(stmt, arena);
            }
        }
    }
}
