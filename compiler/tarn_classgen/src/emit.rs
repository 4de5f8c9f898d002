//! Call-site emission.
//!
//! Emits, at the lambda's original position, the receiver push, the capture
//! loads, and the dynamic call-site instruction. Capture values are loaded
//! from the enclosing frame's slots — never re-evaluated — in exactly the
//! order capture analysis discovered them, which is also the order of the
//! body method's parameter prefix.

use tracing::{debug, trace};

use tarn_bytecode::{
    internal_name, metafactory, BootstrapArg, Handle, HandleTag, Instruction, MethodDescriptor,
    ValueKind,
};
use tarn_types::{ClassId, MethodId, TypeRef};

use crate::context::LowerCx;
use crate::error::{ClassGenError, Result};
use crate::registry::GeneratedUnit;

/// Emit the dynamic-linkage call site for a generated unit.
///
/// Afterwards the evaluation stack holds one value of the target functional
/// type in place of the receiver and captures.
pub fn emit_call_site(
    cx: &mut LowerCx<'_>,
    unit: &GeneratedUnit,
    target: ClassId,
    sam: MethodId,
) -> Result<()> {
    // Receiver first: the current instance, or null in a static context.
    if cx.method_is_static() {
        cx.sink.emit(Instruction::AConstNull);
        cx.stack.push(TypeRef::of(ClassId::OBJECT));
    } else {
        cx.sink.emit(Instruction::Load {
            kind: ValueKind::Ref,
            slot: 0,
        });
        cx.stack.push(TypeRef::of(cx.enclosing.class));
    }

    // Captures in discovery order, loaded by value from the frame.
    for capture in &unit.captures {
        let local = cx.frame.lookup(capture.name).ok_or_else(|| {
            ClassGenError::MissingLocal {
                name: cx.interner.resolve(capture.name).to_owned(),
            }
        })?;
        trace!(
            name = cx.interner.resolve(capture.name),
            slot = local.slot,
            "loading captured value"
        );
        cx.sink.emit(Instruction::Load {
            kind: ValueKind::of(local.ty),
            slot: local.slot,
        });
        cx.stack.push(local.ty);
    }

    // The call-site type consumes the receiver and captures and produces
    // the functional interface.
    let mut site_args = Vec::with_capacity(unit.captures.len() + 1);
    site_args.push(TypeRef::raw(cx.enclosing.class));
    site_args.extend(unit.captures.iter().map(|capture| capture.ty));
    let site = MethodDescriptor::new(site_args, TypeRef::of(target));
    let site_desc = cx.interner.intern(&site.render(cx.pool, cx.interner));

    let body_handle = Handle {
        tag: HandleTag::InvokeStatic,
        owner: cx
            .interner
            .intern(&internal_name(cx.interner, cx.pool.class(unit.class).name)),
        name: cx.pool.method(unit.body_method).name,
        desc: cx
            .interner
            .intern(&unit.descriptors.erased.render(cx.pool, cx.interner)),
        is_interface: false,
    };

    let sam_name = cx.pool.method(sam).name;
    cx.sink.emit(Instruction::InvokeDynamic {
        name: sam_name,
        desc: site_desc,
        bootstrap: metafactory(cx.interner, cx.class_is_interface()),
        args: vec![
            BootstrapArg::MethodType(unit.descriptors.declared.clone()),
            BootstrapArg::Handle(body_handle),
            BootstrapArg::MethodType(unit.descriptors.exact.clone()),
        ],
    });

    // Receiver + captures off, one functional value on.
    cx.stack.replace(TypeRef::of(target), unit.captures.len() + 1)?;
    debug!(
        name = cx.interner.resolve(sam_name),
        captures = unit.captures.len(),
        "emitted lambda call site"
    );
    Ok(())
}
