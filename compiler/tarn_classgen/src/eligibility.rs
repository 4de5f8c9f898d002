//! Fast-path eligibility classification.
//!
//! A lambda can take the zero-allocation dynamic-linkage path only when its
//! target type is a genuine single-abstract-method functional interface.
//! Everything else falls back to the closure-object strategy. The check is
//! deliberately conservative: a type carrying the functional marker but
//! exposing zero or several abstract methods is still rejected, because
//! generating a call site for it would implement the wrong contract.

use tracing::debug;

use tarn_types::{ClassId, ClassPool, MethodId};

/// Why a lambda takes the fallback path.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FallbackReason {
    NotAnInterface,
    NotMarkedFunctional,
    /// The target exposes this many abstract methods instead of exactly one.
    AbstractMethodCount { count: usize },
}

/// Classification of one lambda's target type.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Eligibility {
    /// Dynamic-linkage lowering against the target's single abstract method.
    FastPath { sam: MethodId },
    Fallback(FallbackReason),
}

/// Classify a target type. Pure; depends only on the target's shape.
pub fn classify(pool: &ClassPool, target: ClassId) -> Eligibility {
    let info = pool.class(target);

    if !info.is_interface() {
        debug!(target = ?target, "lambda target is not an interface, falling back");
        return Eligibility::Fallback(FallbackReason::NotAnInterface);
    }
    if !pool.is_functional_marked(target) {
        debug!(target = ?target, "lambda target lacks the functional marker, falling back");
        return Eligibility::Fallback(FallbackReason::NotMarkedFunctional);
    }

    let abstracts: Vec<MethodId> = pool.abstract_methods(target).collect();
    match abstracts.as_slice() {
        &[sam] => Eligibility::FastPath { sam },
        _ => {
            let count = abstracts.len();
            debug!(target = ?target, count, "abstract method count is not one, falling back");
            Eligibility::Fallback(FallbackReason::AbstractMethodCount { count })
        }
    }
}
