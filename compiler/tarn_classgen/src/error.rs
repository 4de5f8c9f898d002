//! Class generation errors.
//!
//! Every variant here is an internal-consistency defect: either a pass
//! upstream failed to record a fact it owes this stage, or capture analysis
//! and parameter synthesis disagreed. None of these are user diagnostics —
//! they abort the compilation unit with an internal-error report. An
//! ineligible lambda is not an error at all; it silently takes the
//! closure-object fallback.

use thiserror::Error;

use tarn_bytecode::StackUnderflow;
use tarn_ir::Span;

/// Fatal internal defect during lambda lowering.
#[derive(Debug, Error)]
pub enum ClassGenError {
    /// Body rewrite found zero or several body-method parameters matching a
    /// shared variable's name. Capture analysis and parameter synthesis
    /// must agree by construction.
    #[error("{count} body-method parameters named `{name}` (expected exactly one)")]
    CaptureParamMismatch { name: String, count: usize },

    /// A reference flagged shared-with-enclosing-scope is not bound to an
    /// enclosing local.
    #[error("shared variable `{name}` is not bound to an enclosing local")]
    UnresolvedCapture { name: String },

    /// Inference recorded no type for a captured variable.
    #[error("no inferred type for captured variable `{name}`")]
    MissingCaptureType { name: String },

    /// The expression handed to the lowerer is not a lambda.
    #[error("expression at {span:?} is not a lambda")]
    NotALambda { span: Span },

    /// Inference recorded no target functional type for the lambda.
    #[error("lambda at {span:?} has no inferred target type")]
    MissingTargetType { span: Span },

    /// Inference recorded no exact type for a lambda parameter.
    #[error("lambda parameter `{name}` has no inferred exact type")]
    MissingParamType { name: String },

    /// Inference recorded no return type for the lambda body.
    #[error("lambda at {span:?} has no inferred return type")]
    MissingReturnType { span: Span },

    /// A captured variable has no slot in the enclosing method's frame.
    #[error("captured variable `{name}` has no slot in the enclosing frame")]
    MissingLocal { name: String },

    /// The three descriptor views disagree on arity.
    #[error("{view} descriptor has {found} arguments, expected {expected}")]
    DescriptorArity {
        view: &'static str,
        expected: usize,
        found: usize,
    },

    /// The call-site instruction consumed more values than were pushed.
    #[error(transparent)]
    Stack(#[from] StackUnderflow),
}

pub type Result<T> = std::result::Result<T, ClassGenError>;
