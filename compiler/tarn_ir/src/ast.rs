//! Expression and statement nodes.
//!
//! All children are arena indices, never boxes. Nodes are `Copy` so that
//! rewriting passes can lift a node out of the arena, transform it, and push
//! a fresh copy without touching the original — the class generator's body
//! rewrite depends on this (it must never mutate the unlowered lambda body).

use std::fmt;

use crate::{ExprId, ExprRange, Name, ParamRange, Span, StmtId, StmtRange, VarId};

/// Expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// How a variable reference resolves.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Binding {
    /// Not yet resolved to any declaration. An unresolved receiver on a
    /// non-static call is how an implicit-receiver call appears in the AST.
    Unresolved,
    /// A local variable of the enclosing method.
    Local(VarId),
    /// A parameter of the enclosing callable, by position.
    Param(u16),
}

/// Variable reference.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct VarExpr {
    pub name: Name,
    pub binding: Binding,
    /// Set by resolution when the variable is declared in an enclosing scope
    /// and referenced from inside a lambda body. Cleared by the body rewrite
    /// once the reference is rebound to a synthesized parameter.
    pub shared: bool,
}

impl VarExpr {
    /// An unresolved, unshared reference (parse-time state).
    pub fn unresolved(name: Name) -> Self {
        VarExpr {
            name,
            binding: Binding::Unresolved,
            shared: false,
        }
    }
}

/// Method call.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CallExpr {
    pub receiver: ExprId,
    pub method: Name,
    pub args: ExprRange,
    /// True while the receiver is the enclosing instance left implicit in
    /// source. Cleared once an explicit receiver expression is substituted.
    pub implicit_this: bool,
}

/// Binary operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Lt,
}

/// Expression variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// Integer literal: 42
    Int(i64),

    /// Boolean literal: true, false
    Bool(bool),

    /// String literal (interned)
    Str(Name),

    /// Null literal
    Null,

    /// Variable reference
    Var(VarExpr),

    /// Assignment: target = value
    Assign { target: ExprId, value: ExprId },

    /// Binary operation: lhs op rhs
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },

    /// Method call: receiver.method(args...)
    Call(CallExpr),

    /// Lambda expression: |params| body
    ///
    /// Parameter and return types are inferred upstream and recorded in the
    /// inference side tables, keyed by this expression's id.
    Lambda { params: ParamRange, body: StmtId },
}

/// Statement node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// Statement variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// Expression statement.
    Expr(ExprId),

    /// Local declaration: let var = init
    ///
    /// `init` is `ExprId::INVALID` for a bare declaration.
    Let { var: VarId, init: ExprId },

    /// Return: return expr
    ///
    /// `expr` is `ExprId::INVALID` for a bare return.
    Return(ExprId),

    /// Conditional. `else_branch` is `StmtId::INVALID` when absent.
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: StmtId,
    },

    /// Block of statements.
    Block(StmtRange),
}

/// A lambda's formal parameter as written in source.
///
/// The declared type is syntactic only; the exact type comes from inference.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LambdaParam {
    pub name: Name,
    /// Declared type name, `Name::EMPTY` when the type is inferred.
    pub ty_name: Name,
    /// Default value expression, `ExprId::INVALID` when absent.
    pub default: ExprId,
    pub span: Span,
}

/// A local variable declaration record.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct VarInfo {
    pub name: Name,
    pub span: Span,
}
