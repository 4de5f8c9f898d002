//! Generated-unit registry and name counters.
//!
//! One generated class per lambda expression, keyed by the lambda's stable
//! parse-time [`ExprId`] — re-visiting a branch fetches the cached unit
//! instead of generating a sibling. Name counters are scoped per
//! (outermost class, enclosing class, enclosing method) so sibling lambdas
//! get distinct suffixes that are stable run to run for identical source.

use rustc_hash::FxHashMap;

use tarn_bytecode::MethodDescriptor;
use tarn_ir::ExprId;
use tarn_types::{ClassId, MethodId};

use crate::captures::CaptureList;
use crate::error::{ClassGenError, Result};

/// The three signature views of a generated body method.
///
/// Constructed together and validated for arity consistency, so the
/// call-site emitter can take any view without re-checking.
#[derive(Clone, Debug)]
pub struct DescriptorSet {
    /// Erased signature of the target abstract method being implemented.
    pub declared: MethodDescriptor,
    /// Full signature of the body method: captures + receiver + exact params.
    pub erased: MethodDescriptor,
    /// Signature over the lambda's exact parameter types only.
    pub exact: MethodDescriptor,
}

impl DescriptorSet {
    /// Build the set, validating that the three views agree on arity.
    pub fn build(
        declared: MethodDescriptor,
        erased: MethodDescriptor,
        exact: MethodDescriptor,
        capture_count: usize,
    ) -> Result<Self> {
        if declared.args().len() != exact.args().len() {
            return Err(ClassGenError::DescriptorArity {
                view: "declared",
                expected: exact.args().len(),
                found: declared.args().len(),
            });
        }
        let full = capture_count + 1 + exact.args().len();
        if erased.args().len() != full {
            return Err(ClassGenError::DescriptorArity {
                view: "erased",
                expected: full,
                found: erased.args().len(),
            });
        }
        // The receiver placeholder sits right after the captures and must be
        // a raw reference so the written descriptor stays non-parameterized.
        debug_assert!(erased.args()[capture_count].is_raw());
        Ok(DescriptorSet {
            declared,
            erased,
            exact,
        })
    }
}

/// A lambda's generated class and body method.
#[derive(Clone, Debug)]
pub struct GeneratedUnit {
    pub class: ClassId,
    pub body_method: MethodId,
    /// Captures in discovery order; the call-site emitter pushes values in
    /// exactly this order.
    pub captures: CaptureList,
    pub descriptors: DescriptorSet,
}

/// Created-once cache of generated units plus the name-counter table.
#[derive(Debug, Default)]
pub struct LambdaRegistry {
    units: FxHashMap<ExprId, GeneratedUnit>,
    counters: FxHashMap<(ClassId, ClassId, MethodId), u32>,
}

impl LambdaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached unit for a lambda, if one was already generated.
    pub fn get(&self, expr: ExprId) -> Option<&GeneratedUnit> {
        self.units.get(&expr)
    }

    /// Cache a freshly generated unit.
    pub fn insert(&mut self, expr: ExprId, unit: GeneratedUnit) {
        debug_assert!(!self.units.contains_key(&expr));
        self.units.insert(expr, unit);
    }

    /// Next name suffix for a lambda in the given scope. Starts at 1, so the
    /// first generated class in a method is `Outer$1`.
    pub fn next_unit_index(
        &mut self,
        outermost: ClassId,
        enclosing: ClassId,
        method: MethodId,
    ) -> u32 {
        let counter = self
            .counters
            .entry((outermost, enclosing, method))
            .or_insert(0);
        *counter += 1;
        *counter
    }

    /// Number of cached units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether no unit has been generated yet.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
