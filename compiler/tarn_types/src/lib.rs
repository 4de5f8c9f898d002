//! Class model for the Tarn compiler's JVM backend.
//!
//! This crate provides:
//!
//! - **Class handles** ([`ClassId`], [`MethodId`]) — 32-bit indices into the
//!   [`ClassPool`], with fixed indices for the well-known classes the backend
//!   needs (JVM primitives, `java.lang.Object`, the runtime's lambda base
//!   class and generated-lambda marker interface).
//! - **Class records** ([`ClassInfo`], [`MethodInfo`], [`ParamInfo`]) — the
//!   resolved shape of every class visible to code generation: access flags,
//!   supertypes, annotations, members, inner classes, enclosing method.
//! - **Type references** ([`TypeRef`]) — a class handle plus array dimensions
//!   plus a raw (non-parameterized) bit, used everywhere a descriptor is
//!   eventually written.
//! - **Inference side tables** ([`InferenceResult`]) — per-expression facts
//!   produced by the upstream inference pass and consumed by code generation.
//!
//! `tarn_types` depends only on `tarn_ir`; it knows nothing about bytecode.

pub mod class;
pub mod flags;
pub mod infer;
pub mod type_ref;

pub use class::{ClassId, ClassInfo, ClassPool, MethodId, MethodInfo, ParamInfo};
pub use flags::AccessFlags;
pub use infer::InferenceResult;
pub use type_ref::TypeRef;
