//! Operand stack model.
//!
//! Tracks the types on the evaluation stack during emission so call-site
//! instructions can account for what they consume and produce.

use thiserror::Error;
use tarn_types::TypeRef;

/// Attempt to consume more values than the stack holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operand stack underflow: wanted {wanted} values, stack depth is {depth}")]
pub struct StackUnderflow {
    pub wanted: usize,
    pub depth: usize,
}

/// Evaluation-stack model for one method body.
#[derive(Debug, Default)]
pub struct OperandStack {
    stack: Vec<TypeRef>,
    max_depth: usize,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one value.
    pub fn push(&mut self, ty: TypeRef) {
        self.stack.push(ty);
        self.max_depth = self.max_depth.max(self.stack.len());
    }

    /// Replace the top `consumed` values with one value of `ty`.
    ///
    /// This is the stack effect of a call: arguments off, result on.
    pub fn replace(&mut self, ty: TypeRef, consumed: usize) -> Result<(), StackUnderflow> {
        if self.stack.len() < consumed {
            return Err(StackUnderflow {
                wanted: consumed,
                depth: self.stack.len(),
            });
        }
        self.stack.truncate(self.stack.len() - consumed);
        self.push(ty);
        Ok(())
    }

    /// Current stack depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// High-water mark of the stack.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The value on top of the stack, if any.
    pub fn top(&self) -> Option<TypeRef> {
        self.stack.last().copied()
    }
}
