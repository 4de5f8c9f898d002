//! Body rewrite.
//!
//! The lambda body was resolved against the enclosing instance; the body
//! method is static with a widened parameter list. This pass deep-copies the
//! body into fresh arena nodes and, along the way:
//!
//! - rebinds every shared variable reference to the synthesized parameter of
//!   the same name (exactly one must exist — zero or several is a defect in
//!   capture analysis or parameter synthesis, not in user code),
//! - shifts the lambda's own parameter indices past the captures and the
//!   receiver placeholder,
//! - qualifies implicit-receiver calls with the receiver placeholder
//!   parameter.
//!
//! The original body is never touched: the lambda expression may be visited
//! again (and its unlowered form may be shared with other consumers), so all
//! rewriting lands on nodes owned exclusively by the body method. Inference
//! facts are mirrored from each original node onto its copy.
//!
//! A lambda nested inside the body is copied structurally but not rebound:
//! its parameter indices, shared flags, and implicit receivers belong to its
//! own lowering pass, which runs when the copied nested expression is
//! visited.

use tracing::trace;

use tarn_ir::{
    to_u16, Binding, CallExpr, ExprArena, ExprId, ExprKind, Stmt, StmtId, StmtKind,
    StringInterner, VarExpr,
};
use tarn_types::{ClassPool, InferenceResult, ParamInfo};

use crate::error::{ClassGenError, Result};

/// Rewrite `body` against the body method's parameter list, returning the
/// root of the fresh tree.
///
/// `receiver_index` is the position of the receiver placeholder in `params`;
/// `param_shift` is what the lambda's own parameter indices move by
/// (captures + 1).
pub fn rewrite_body(
    arena: &mut ExprArena,
    inference: &mut InferenceResult,
    pool: &ClassPool,
    interner: &StringInterner,
    params: &[ParamInfo],
    receiver_index: u16,
    param_shift: u16,
    body: StmtId,
) -> Result<StmtId> {
    let mut rewriter = Rewriter {
        arena,
        inference,
        pool,
        interner,
        params,
        receiver_index,
        param_shift,
        nested: 0,
    };
    rewriter.copy_stmt(body)
}

struct Rewriter<'a> {
    arena: &'a mut ExprArena,
    inference: &'a mut InferenceResult,
    pool: &'a ClassPool,
    interner: &'a StringInterner,
    params: &'a [ParamInfo],
    receiver_index: u16,
    param_shift: u16,
    /// Lambda nesting depth below the body being rewritten. Nodes at depth
    /// > 0 are owned by a nested lambda and only copied, never rebound.
    nested: u32,
}

impl Rewriter<'_> {
    fn copy_stmt(&mut self, id: StmtId) -> Result<StmtId> {
        let stmt = *self.arena.stmt(id);
        let kind = match stmt.kind {
            StmtKind::Expr(expr) => StmtKind::Expr(self.copy_expr(expr)?),
            StmtKind::Let { var, init } => StmtKind::Let {
                var,
                init: self.copy_expr_opt(init)?,
            },
            StmtKind::Return(expr) => StmtKind::Return(self.copy_expr_opt(expr)?),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => StmtKind::If {
                cond: self.copy_expr(cond)?,
                then_branch: self.copy_stmt(then_branch)?,
                else_branch: if else_branch.is_valid() {
                    self.copy_stmt(else_branch)?
                } else {
                    StmtId::INVALID
                },
            },
            StmtKind::Block(range) => {
                let originals = self.arena.stmts(range).to_vec();
                let mut copies = Vec::with_capacity(originals.len());
                for original in originals {
                    copies.push(self.copy_stmt(original)?);
                }
                StmtKind::Block(self.arena.alloc_stmt_list(&copies))
            }
        };
        Ok(self.arena.push_stmt(Stmt::new(kind, stmt.span)))
    }

    fn copy_expr(&mut self, id: ExprId) -> Result<ExprId> {
        let span = self.arena.span(id);
        let kind = match *self.arena.kind(id) {
            lit @ (ExprKind::Int(_) | ExprKind::Bool(_) | ExprKind::Str(_) | ExprKind::Null) => lit,
            ExprKind::Var(var) => ExprKind::Var(self.rebind(var)?),
            ExprKind::Assign { target, value } => ExprKind::Assign {
                target: self.copy_expr(target)?,
                value: self.copy_expr(value)?,
            },
            ExprKind::Binary { op, lhs, rhs } => ExprKind::Binary {
                op,
                lhs: self.copy_expr(lhs)?,
                rhs: self.copy_expr(rhs)?,
            },
            ExprKind::Call(call) => ExprKind::Call(self.copy_call(id, call)?),
            ExprKind::Lambda { params, body } => {
                self.nested += 1;
                let copied = self.copy_stmt(body)?;
                self.nested -= 1;
                ExprKind::Lambda {
                    params,
                    body: copied,
                }
            }
        };
        let copy = self.arena.push_expr(kind, span);
        self.inference.copy_expr_facts(id, copy);
        Ok(copy)
    }

    fn copy_expr_opt(&mut self, id: ExprId) -> Result<ExprId> {
        if id.is_valid() {
            self.copy_expr(id)
        } else {
            Ok(ExprId::INVALID)
        }
    }

    fn copy_call(&mut self, id: ExprId, call: CallExpr) -> Result<CallExpr> {
        // An implicit-receiver call carries an unresolved variable as its
        // receiver. When the resolved target is an instance method, the
        // receiver becomes the explicit placeholder parameter. Calls inside
        // a nested lambda keep their implicit receiver for that lambda's
        // own rewrite.
        let qualify = self.nested == 0 && matches!(
            self.arena.kind(call.receiver),
            ExprKind::Var(v) if v.binding == Binding::Unresolved && !v.shared
        ) && self
            .inference
            .call_target(id)
            .is_some_and(|target| !self.pool.method(target).is_static());

        let receiver = if qualify {
            let receiver_param = &self.params[usize::from(self.receiver_index)];
            let var = VarExpr {
                name: receiver_param.name,
                binding: Binding::Param(self.receiver_index),
                shared: false,
            };
            let receiver_span = self.arena.span(call.receiver);
            let copy = self.arena.push_expr(ExprKind::Var(var), receiver_span);
            trace!(method = self.interner.resolve(call.method), "qualified implicit-receiver call");
            copy
        } else {
            self.copy_expr(call.receiver)?
        };

        let originals = self.arena.exprs(call.args).to_vec();
        let mut args = Vec::with_capacity(originals.len());
        for arg in originals {
            args.push(self.copy_expr(arg)?);
        }
        let args = self.arena.alloc_expr_list(&args);

        Ok(CallExpr {
            receiver,
            method: call.method,
            args,
            implicit_this: call.implicit_this && !qualify,
        })
    }

    fn rebind(&mut self, var: VarExpr) -> Result<VarExpr> {
        // References inside a nested lambda bind against that lambda's own
        // body-method parameter list, not this one.
        if self.nested > 0 {
            return Ok(var);
        }
        if var.shared {
            let mut position = None;
            let mut count = 0usize;
            for (index, param) in self.params.iter().enumerate() {
                if param.name == var.name {
                    count += 1;
                    position = Some(to_u16(index, "body-method parameters"));
                }
            }
            let (Some(index), 1) = (position, count) else {
                return Err(ClassGenError::CaptureParamMismatch {
                    name: self.interner.resolve(var.name).to_owned(),
                    count,
                });
            };
            trace!(name = self.interner.resolve(var.name), index, "rebound shared variable");
            return Ok(VarExpr {
                name: var.name,
                binding: Binding::Param(index),
                shared: false,
            });
        }
        // The lambda's own parameters moved past the captures and the
        // receiver placeholder.
        if let Binding::Param(index) = var.binding {
            return Ok(VarExpr {
                binding: Binding::Param(index + self.param_shift),
                ..var
            });
        }
        Ok(var)
    }
}
