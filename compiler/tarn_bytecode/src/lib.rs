//! Target-model plumbing for the Tarn compiler's JVM backend.
//!
//! This crate provides:
//!
//! - **Descriptors** ([`MethodDescriptor`], [`type_descriptor`]) — rendering
//!   [`TypeRef`](tarn_types::TypeRef)s into class-file descriptor strings.
//! - **Handles** ([`Handle`], [`BootstrapArg`]) — method references and the
//!   bootstrap argument payload of a dynamic call site.
//! - **Instructions** ([`Instruction`], [`CodeSink`]) — the small instruction
//!   subset lambda lowering emits, plus the sink seam the surrounding method
//!   emitter implements.
//! - **Stack and frame models** ([`OperandStack`], [`LocalTable`]) — the
//!   evaluation-stack bookkeeping and the enclosing method's local-variable
//!   slot table.

pub mod descriptor;
pub mod frame;
pub mod handle;
pub mod instr;
pub mod stack;

pub use descriptor::{internal_name, type_descriptor, MethodDescriptor};
pub use frame::{LocalSlot, LocalTable};
pub use handle::{metafactory, BootstrapArg, Handle, HandleTag};
pub use instr::{CodeSink, Instruction, InstructionBuffer, ValueKind};
pub use stack::{OperandStack, StackUnderflow};
