//! The instruction subset lambda lowering emits.
//!
//! The general-purpose method emitter lives elsewhere; this stage only ever
//! writes a receiver push, capture loads, and one dynamic call-site
//! instruction, so only those are modeled. [`CodeSink`] is the seam the
//! surrounding emitter implements; [`InstructionBuffer`] is the in-memory
//! implementation used by tests and deferred emission.

use tarn_ir::Name;
use tarn_types::{ClassId, TypeRef};

use crate::handle::{BootstrapArg, Handle};

/// Operand-stack category of a value, selecting the typed load opcode.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueKind {
    Ref,
    Int,
    Long,
    Float,
    Double,
}

impl ValueKind {
    /// Classify a type reference. Sub-int primitives load as `Int`.
    pub fn of(ty: TypeRef) -> ValueKind {
        if ty.dims() > 0 {
            return ValueKind::Ref;
        }
        match ty.class() {
            ClassId::BOOLEAN | ClassId::BYTE | ClassId::CHAR | ClassId::SHORT | ClassId::INT => {
                ValueKind::Int
            }
            ClassId::LONG => ValueKind::Long,
            ClassId::FLOAT => ValueKind::Float,
            ClassId::DOUBLE => ValueKind::Double,
            _ => ValueKind::Ref,
        }
    }

    /// Whether values of this kind occupy two local slots.
    pub const fn is_wide(self) -> bool {
        matches!(self, ValueKind::Long | ValueKind::Double)
    }
}

/// An emitted instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Push the null reference.
    AConstNull,
    /// Load a local variable onto the stack.
    Load { kind: ValueKind, slot: u16 },
    /// A dynamic-linkage call site.
    InvokeDynamic {
        /// Name of the method the call site implements.
        name: Name,
        /// Rendered call-site descriptor (interned).
        desc: Name,
        bootstrap: Handle,
        args: Vec<BootstrapArg>,
    },
}

/// Sink for emitted instructions.
pub trait CodeSink {
    fn emit(&mut self, instr: Instruction);
}

/// In-memory instruction sink.
#[derive(Debug, Default)]
pub struct InstructionBuffer {
    instrs: Vec<Instruction>,
}

impl InstructionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The emitted instructions, in order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instrs
    }
}

impl CodeSink for InstructionBuffer {
    fn emit(&mut self, instr: Instruction) {
        self.instrs.push(instr);
    }
}
