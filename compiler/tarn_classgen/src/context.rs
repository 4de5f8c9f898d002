//! Lowering context.

use tarn_bytecode::{CodeSink, LocalTable, OperandStack};
use tarn_ir::{ExprArena, StringInterner};
use tarn_types::{ClassId, ClassPool, InferenceResult, MethodId};

/// Where in the program the lambda occurs.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct EnclosingMethod {
    /// The outermost class of the nesting chain (top-level source class).
    pub outermost: ClassId,
    /// The class whose body is currently being emitted.
    pub class: ClassId,
    /// The method whose body is currently being emitted.
    pub method: MethodId,
}

/// Everything lambda lowering needs from the surrounding compilation.
///
/// The context borrows; it owns nothing. The arena, pool, and inference
/// tables are mutated (fresh nodes, the generated class, mirrored facts),
/// the rest is read or written through its own seam.
pub struct LowerCx<'a> {
    pub arena: &'a mut ExprArena,
    pub interner: &'a StringInterner,
    pub pool: &'a mut ClassPool,
    pub inference: &'a mut InferenceResult,
    pub enclosing: EnclosingMethod,
    /// Instruction sink of the enclosing method's emitter.
    pub sink: &'a mut dyn CodeSink,
    /// Evaluation-stack model of the enclosing method.
    pub stack: &'a mut OperandStack,
    /// Local-variable slots of the enclosing method's frame.
    pub frame: &'a LocalTable,
}

impl LowerCx<'_> {
    /// Whether the enclosing method is static.
    pub fn method_is_static(&self) -> bool {
        self.pool.method(self.enclosing.method).is_static()
    }

    /// Whether the enclosing class is an interface.
    pub fn class_is_interface(&self) -> bool {
        self.pool.class(self.enclosing.class).is_interface()
    }
}
