//! JVM descriptor rendering.
//!
//! Descriptors are erased by construction: a [`TypeRef`] carries no type
//! arguments, so a raw and a parameterized reference to the same class
//! render identically. The raw bit only matters to the signature writer,
//! which this stage never invokes for synthesized members.

use tarn_ir::{Name, StringInterner};
use tarn_types::{ClassId, ClassPool, TypeRef};

/// Descriptor code for a primitive class, `None` for reference types.
fn primitive_code(class: ClassId) -> Option<char> {
    match class {
        ClassId::VOID => Some('V'),
        ClassId::BOOLEAN => Some('Z'),
        ClassId::BYTE => Some('B'),
        ClassId::CHAR => Some('C'),
        ClassId::SHORT => Some('S'),
        ClassId::INT => Some('I'),
        ClassId::LONG => Some('J'),
        ClassId::FLOAT => Some('F'),
        ClassId::DOUBLE => Some('D'),
        _ => None,
    }
}

/// Convert a dotted class name to its internal (slash-separated) form.
pub fn internal_name(interner: &StringInterner, name: Name) -> String {
    interner.resolve(name).replace('.', "/")
}

/// Render one type descriptor, e.g. `I`, `[J`, `Ljava/lang/Object;`.
pub fn type_descriptor(pool: &ClassPool, interner: &StringInterner, ty: TypeRef) -> String {
    let mut out = String::new();
    for _ in 0..ty.dims() {
        out.push('[');
    }
    match primitive_code(ty.class()) {
        Some(code) => out.push(code),
        None => {
            out.push('L');
            out.push_str(&internal_name(interner, pool.class(ty.class()).name));
            out.push(';');
        }
    }
    out
}

/// A method signature as argument and return type references.
///
/// Kept structured until the last moment; [`render`](Self::render) produces
/// the `(args)ret` descriptor string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDescriptor {
    args: Vec<TypeRef>,
    ret: TypeRef,
}

impl MethodDescriptor {
    pub fn new(args: Vec<TypeRef>, ret: TypeRef) -> Self {
        MethodDescriptor { args, ret }
    }

    pub fn args(&self) -> &[TypeRef] {
        &self.args
    }

    pub fn ret(&self) -> TypeRef {
        self.ret
    }

    /// Render to the class-file form, e.g. `(ILjava/lang/String;)V`.
    pub fn render(&self, pool: &ClassPool, interner: &StringInterner) -> String {
        let mut out = String::from("(");
        for &arg in &self.args {
            out.push_str(&type_descriptor(pool, interner, arg));
        }
        out.push(')');
        out.push_str(&type_descriptor(pool, interner, self.ret));
        out
    }
}
