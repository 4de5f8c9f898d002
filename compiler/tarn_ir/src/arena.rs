//! Expression arena.
//!
//! [`ExprArena`] stores expressions in struct-of-arrays layout (parallel
//! `kinds` and `spans` arrays indexed by [`ExprId`]), statements and
//! declaration records in plain arrays, and id lists flattened into side
//! vectors addressed by ranges.

use crate::ast::{Expr, ExprKind, LambdaParam, Stmt, VarInfo};
use crate::{ExprId, ExprRange, ParamRange, StmtId, StmtRange, VarId};

/// Convert a length to u32, panicking with context on overflow.
///
/// Arena growth past `u32::MAX` nodes is not a recoverable condition.
#[inline]
pub fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what}: {len}"))
}

/// Convert a length to u16, panicking with context on overflow.
#[inline]
pub fn to_u16(len: usize, what: &str) -> u16 {
    u16::try_from(len).unwrap_or_else(|_| panic!("too many {what}: {len}"))
}

/// Arena for expressions, statements, and declaration records.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    /// Expression kinds (parallel with `expr_spans`).
    kinds: Vec<ExprKind>,
    /// Source spans (parallel with `kinds`).
    expr_spans: Vec<crate::Span>,
    /// Statements.
    stmts: Vec<Stmt>,
    /// Flattened expression id lists (call arguments).
    expr_lists: Vec<ExprId>,
    /// Flattened statement id lists (blocks).
    stmt_lists: Vec<StmtId>,
    /// Lambda parameters, addressed by [`ParamRange`].
    params: Vec<LambdaParam>,
    /// Local variable declarations, addressed by [`VarId`].
    vars: Vec<VarInfo>,
}

impl ExprArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its id.
    pub fn push_expr(&mut self, kind: ExprKind, span: crate::Span) -> ExprId {
        let id = ExprId::new(to_u32(self.kinds.len(), "expressions"));
        self.kinds.push(kind);
        self.expr_spans.push(span);
        id
    }

    /// Get the expression kind for a node.
    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.kinds[id.index()]
    }

    /// Get the source span for an expression.
    #[inline]
    pub fn span(&self, id: ExprId) -> crate::Span {
        self.expr_spans[id.index()]
    }

    /// Reconstruct the full expression node.
    #[inline]
    pub fn expr(&self, id: ExprId) -> Expr {
        Expr::new(self.kinds[id.index()], self.expr_spans[id.index()])
    }

    /// Number of expressions allocated.
    pub fn expr_count(&self) -> usize {
        self.kinds.len()
    }

    /// Allocate a statement, returning its id.
    pub fn push_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(to_u32(self.stmts.len(), "statements"));
        self.stmts.push(stmt);
        id
    }

    /// Get a statement.
    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    /// Flatten a list of expression ids into the side list.
    pub fn alloc_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = to_u32(self.expr_lists.len(), "expression list entries");
        let len = to_u16(ids.len(), "expressions in one list");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, len)
    }

    /// Get the expression ids in a range.
    #[inline]
    pub fn exprs(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.start as usize..range.start as usize + range.len()]
    }

    /// Flatten a list of statement ids into the side list.
    pub fn alloc_stmt_list(&mut self, ids: &[StmtId]) -> StmtRange {
        let start = to_u32(self.stmt_lists.len(), "statement list entries");
        let len = to_u16(ids.len(), "statements in one block");
        self.stmt_lists.extend_from_slice(ids);
        StmtRange::new(start, len)
    }

    /// Get the statement ids in a range.
    #[inline]
    pub fn stmts(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.start as usize..range.start as usize + range.len()]
    }

    /// Store a lambda's parameter list.
    pub fn alloc_params(&mut self, params: &[LambdaParam]) -> ParamRange {
        let start = to_u32(self.params.len(), "lambda parameters");
        let len = to_u16(params.len(), "parameters of one lambda");
        self.params.extend_from_slice(params);
        ParamRange::new(start, len)
    }

    /// Get the parameters in a range.
    #[inline]
    pub fn params(&self, range: ParamRange) -> &[LambdaParam] {
        &self.params[range.start as usize..range.start as usize + range.len()]
    }

    /// Record a local variable declaration.
    pub fn push_var(&mut self, info: VarInfo) -> VarId {
        let id = VarId::new(to_u32(self.vars.len(), "local variables"));
        self.vars.push(info);
        id
    }

    /// Get a local variable declaration.
    #[inline]
    pub fn var(&self, id: VarId) -> &VarInfo {
        &self.vars[id.index()]
    }
}
