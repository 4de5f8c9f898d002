//! Capture analysis.
//!
//! Walks a lambda body collecting every variable reference flagged as shared
//! with an enclosing scope, in first-discovered order. The order is the walk
//! order of the arena-backed tree, so two runs over the same body always
//! produce the same list — generated code must be stable when a branch is
//! visited more than once.

use smallvec::SmallVec;
use tracing::trace;

use rustc_hash::FxHashSet;
use tarn_ir::{walk_expr, Binding, ExprArena, ExprId, ExprKind, Name, StmtId, StringInterner, VarId, Visitor};
use tarn_types::{InferenceResult, TypeRef};

use crate::error::{ClassGenError, Result};

/// A free variable of a lambda body.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct CapturedVar {
    pub name: Name,
    pub var: VarId,
    pub ty: TypeRef,
}

/// Inline capacity: most lambdas capture a handful of variables at most.
pub type CaptureList = SmallVec<[CapturedVar; 4]>;

struct CaptureCollector<'a> {
    inference: &'a InferenceResult,
    interner: &'a StringInterner,
    seen: FxHashSet<Name>,
    captures: CaptureList,
    error: Option<ClassGenError>,
}

impl Visitor for CaptureCollector<'_> {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        if self.error.is_some() {
            return;
        }
        if let ExprKind::Var(var) = *arena.kind(id) {
            // Dedupe by name: several references to one shared variable
            // produce one capture, at its first discovery position.
            if var.shared && self.seen.insert(var.name) {
                match var.binding {
                    Binding::Local(var_id) => match self.inference.var_type(var_id) {
                        Some(ty) => {
                            trace!(name = self.interner.resolve(var.name), ?ty, "captured variable");
                            self.captures.push(CapturedVar {
                                name: var.name,
                                var: var_id,
                                ty,
                            });
                        }
                        None => {
                            self.error = Some(ClassGenError::MissingCaptureType {
                                name: self.interner.resolve(var.name).to_owned(),
                            });
                        }
                    },
                    Binding::Unresolved | Binding::Param(_) => {
                        self.error = Some(ClassGenError::UnresolvedCapture {
                            name: self.interner.resolve(var.name).to_owned(),
                        });
                    }
                }
            }
        }
        walk_expr(self, id, arena);
    }
}

/// Collect the lambda body's captured variables, in first-discovered order.
///
/// Nested lambda bodies are included: a variable the inner lambda shares
/// with a scope outside the outer lambda is a capture of the outer one too.
pub fn collect_captures(
    arena: &ExprArena,
    inference: &InferenceResult,
    interner: &StringInterner,
    body: StmtId,
) -> Result<CaptureList> {
    let mut collector = CaptureCollector {
        inference,
        interner,
        seen: FxHashSet::default(),
        captures: CaptureList::new(),
        error: None,
    };
    collector.visit_stmt(body, arena);
    match collector.error {
        Some(err) => Err(err),
        None => Ok(collector.captures),
    }
}
