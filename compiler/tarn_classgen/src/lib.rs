//! Lambda call-site lowering for the Tarn compiler.
//!
//! This crate turns a source lambda expression into a generated class plus a
//! dynamic-linkage call site:
//!
//! - **Eligibility** ([`classify`]) — a lambda takes the zero-allocation
//!   `invokedynamic` path only when its target type is a genuine
//!   single-abstract-method functional interface; anything else delegates to
//!   the closure-object fallback through [`FallbackLowering`].
//! - **Captures** ([`collect_captures`]) — the ordered free variables of the
//!   body, discovered deterministically so repeated visits generate
//!   identical code.
//! - **Synthesis** ([`get_or_create`]) — one generated class per lambda,
//!   cached in the [`LambdaRegistry`], holding a static body method whose
//!   parameters are `[captures...] ++ [receiver] ++ [exact lambda params]`
//!   and whose signature is recorded in three views ([`DescriptorSet`]:
//!   declared, erased, exact).
//! - **Rewrite** ([`rewrite_body`]) — a copying pass that rebinds shared
//!   variables and implicit-receiver calls against the new parameter list.
//! - **Emission** ([`emit_call_site`]) — receiver push, capture loads, and
//!   the metafactory-bootstrapped call-site instruction.
//!
//! [`LambdaLowerer`] orchestrates the whole sequence. The crate is a single
//! pass inside a single-threaded pipeline; the registry makes re-visiting a
//! lambda idempotent rather than duplicating units.

pub mod captures;
pub mod context;
pub mod eligibility;
pub mod emit;
mod error;
pub mod fallback;
pub mod registry;
pub mod rewrite;
pub mod synth;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;

use tracing::debug;

use tarn_ir::ExprId;
use tarn_types::AccessFlags;

pub use captures::{collect_captures, CaptureList, CapturedVar};
pub use context::{EnclosingMethod, LowerCx};
pub use eligibility::{classify, Eligibility, FallbackReason};
pub use emit::emit_call_site;
pub use error::{ClassGenError, Result};
pub use fallback::FallbackLowering;
pub use registry::{DescriptorSet, GeneratedUnit, LambdaRegistry};
pub use rewrite::rewrite_body;
pub use synth::get_or_create;

/// Orchestrates lambda lowering for one compilation.
///
/// Owns the registry (one generated unit per lambda expression) and the
/// fallback strategy for ineligible targets.
pub struct LambdaLowerer<F> {
    registry: LambdaRegistry,
    fallback: F,
}

impl<F: FallbackLowering> LambdaLowerer<F> {
    pub fn new(fallback: F) -> Self {
        LambdaLowerer {
            registry: LambdaRegistry::new(),
            fallback,
        }
    }

    /// Lower one lambda expression at its original source position.
    ///
    /// On the fast path this leaves one value of the target functional type
    /// on the evaluation stack; on the fallback path the closure-object
    /// strategy decides the stack effect.
    pub fn lower(&mut self, cx: &mut LowerCx<'_>, expr: ExprId) -> Result<()> {
        let target = cx
            .inference
            .lambda_target(expr)
            .ok_or(ClassGenError::MissingTargetType {
                span: cx.arena.span(expr),
            })?;

        let mut access = AccessFlags::PUBLIC;
        if cx.class_is_interface() {
            access |= AccessFlags::STATIC;
        }

        match classify(cx.pool, target) {
            Eligibility::Fallback(reason) => {
                debug!(?reason, "delegating lambda to closure-object lowering");
                self.fallback.lower_closure(cx, expr, access)
            }
            Eligibility::FastPath { sam } => {
                let unit = get_or_create(cx, &mut self.registry, expr, sam, access)?;
                emit_call_site(cx, &unit, target, sam)
            }
        }
    }

    /// The unit cache, for whole-program packaging to walk.
    pub fn registry(&self) -> &LambdaRegistry {
        &self.registry
    }

    /// The fallback strategy.
    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}
