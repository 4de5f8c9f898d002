//! Inference side tables.
//!
//! The upstream inference pass annotates the AST by recording facts here,
//! keyed by arena ids, rather than by mutating nodes. Code generation only
//! reads these tables — with one exception: when the body rewrite copies a
//! lambda body into fresh nodes, the facts of each original node are
//! mirrored onto its copy so the body method still sees a fully typed tree.

use rustc_hash::FxHashMap;
use tarn_ir::{ExprId, VarId};

use crate::{ClassId, MethodId, TypeRef};

/// Facts produced by type inference, keyed by parse-time arena ids.
#[derive(Debug, Default)]
pub struct InferenceResult {
    /// Inferred type of each expression.
    expr_types: FxHashMap<ExprId, TypeRef>,
    /// Inferred type of each local variable.
    var_types: FxHashMap<VarId, TypeRef>,
    /// Resolved target method of each call.
    call_targets: FxHashMap<ExprId, MethodId>,
    /// Declared target type of each lambda (the parameter type the lambda
    /// flows into).
    lambda_targets: FxHashMap<ExprId, ClassId>,
    /// Inferred return type of each lambda body.
    lambda_returns: FxHashMap<ExprId, TypeRef>,
    /// Exact inferred type of each lambda parameter, in declaration order.
    lambda_param_types: FxHashMap<ExprId, Vec<TypeRef>>,
}

impl InferenceResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_expr_type(&mut self, expr: ExprId, ty: TypeRef) {
        self.expr_types.insert(expr, ty);
    }

    pub fn expr_type(&self, expr: ExprId) -> Option<TypeRef> {
        self.expr_types.get(&expr).copied()
    }

    pub fn set_var_type(&mut self, var: VarId, ty: TypeRef) {
        self.var_types.insert(var, ty);
    }

    pub fn var_type(&self, var: VarId) -> Option<TypeRef> {
        self.var_types.get(&var).copied()
    }

    pub fn set_call_target(&mut self, call: ExprId, target: MethodId) {
        self.call_targets.insert(call, target);
    }

    pub fn call_target(&self, call: ExprId) -> Option<MethodId> {
        self.call_targets.get(&call).copied()
    }

    pub fn set_lambda_target(&mut self, lambda: ExprId, target: ClassId) {
        self.lambda_targets.insert(lambda, target);
    }

    pub fn lambda_target(&self, lambda: ExprId) -> Option<ClassId> {
        self.lambda_targets.get(&lambda).copied()
    }

    pub fn set_lambda_return(&mut self, lambda: ExprId, ty: TypeRef) {
        self.lambda_returns.insert(lambda, ty);
    }

    pub fn lambda_return(&self, lambda: ExprId) -> Option<TypeRef> {
        self.lambda_returns.get(&lambda).copied()
    }

    pub fn set_lambda_param_types(&mut self, lambda: ExprId, types: Vec<TypeRef>) {
        self.lambda_param_types.insert(lambda, types);
    }

    pub fn lambda_param_type(&self, lambda: ExprId, index: usize) -> Option<TypeRef> {
        self.lambda_param_types
            .get(&lambda)
            .and_then(|types| types.get(index))
            .copied()
    }

    /// Mirror every fact recorded for `from` onto `to`.
    ///
    /// Used by the body rewrite: copied nodes get fresh ids, and downstream
    /// emission of the body method looks facts up by those fresh ids.
    pub fn copy_expr_facts(&mut self, from: ExprId, to: ExprId) {
        if let Some(ty) = self.expr_type(from) {
            self.expr_types.insert(to, ty);
        }
        if let Some(target) = self.call_target(from) {
            self.call_targets.insert(to, target);
        }
        if let Some(target) = self.lambda_target(from) {
            self.lambda_targets.insert(to, target);
        }
        if let Some(ty) = self.lambda_return(from) {
            self.lambda_returns.insert(to, ty);
        }
        if let Some(types) = self.lambda_param_types.get(&from).cloned() {
            self.lambda_param_types.insert(to, types);
        }
    }
}
