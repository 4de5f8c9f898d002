//! Synthetic unit construction.
//!
//! Builds (or fetches) the generated class holding a lambda's body as a
//! static method. The body method's parameter list is
//! `[captures...] ++ [receiver placeholder] ++ [exact-typed lambda params]`;
//! the receiver placeholder is present even in static contexts so the method
//! shape stays uniform — the call site binds it to null there.

use tracing::debug;

use tarn_bytecode::MethodDescriptor;
use tarn_ir::{to_u16, ExprId, ExprKind};
use tarn_types::{AccessFlags, ClassId, ClassInfo, MethodId, MethodInfo, ParamInfo, TypeRef};

use crate::captures::collect_captures;
use crate::context::LowerCx;
use crate::error::{ClassGenError, Result};
use crate::registry::{DescriptorSet, GeneratedUnit, LambdaRegistry};
use crate::rewrite::rewrite_body;

/// Name of the generated body method.
const BODY_METHOD: &str = "lambdaBody";
/// Name of the receiver placeholder parameter.
const RECEIVER: &str = "$receiver";

/// Get the generated unit for a lambda, creating it on first visit.
///
/// Creation registers the new class as an inner class of the enclosing one
/// and rewrites the body exactly once; the cached unit is immutable after
/// that. `sam` is the target's single abstract method, `access` the access
/// flags the caller computed for the generated class.
pub fn get_or_create(
    cx: &mut LowerCx<'_>,
    registry: &mut LambdaRegistry,
    expr: ExprId,
    sam: MethodId,
    access: AccessFlags,
) -> Result<GeneratedUnit> {
    if let Some(unit) = registry.get(expr) {
        debug!(?expr, class = ?unit.class, "registry hit, reusing generated unit");
        return Ok(unit.clone());
    }

    let span = cx.arena.span(expr);
    let ExprKind::Lambda {
        params: lambda_params,
        body,
    } = *cx.arena.kind(expr)
    else {
        return Err(ClassGenError::NotALambda { span });
    };

    let return_ty = cx
        .inference
        .lambda_return(expr)
        .ok_or(ClassGenError::MissingReturnType { span })?;

    // Exact-typed lambda parameters: the inferred exact type lands in both
    // type fields, since downstream consumers read either.
    let declared_params = cx.arena.params(lambda_params).to_vec();
    let mut exact_params = Vec::with_capacity(declared_params.len());
    for (index, param) in declared_params.iter().enumerate() {
        let ty = cx.inference.lambda_param_type(expr, index).ok_or_else(|| {
            ClassGenError::MissingParamType {
                name: cx.interner.resolve(param.name).to_owned(),
            }
        })?;
        exact_params.push(ParamInfo {
            name: param.name,
            ty,
            origin_ty: ty,
            default: param.default,
        });
    }

    let captures = collect_captures(cx.arena, cx.inference, cx.interner, body)?;

    // Captured variables become parameters; a parameter cannot carry an
    // initializer, so `ParamInfo::plain` leaves the default invalid.
    let mut params: Vec<ParamInfo> = captures
        .iter()
        .map(|capture| ParamInfo::plain(capture.name, capture.ty))
        .collect();
    let receiver_index = to_u16(params.len(), "captured variables");
    params.push(ParamInfo::plain(
        cx.interner.intern(RECEIVER),
        TypeRef::raw(cx.enclosing.class),
    ));
    params.extend(exact_params.iter().copied());

    // Deterministic name: enclosing class + "$" + scoped counter.
    let index = registry.next_unit_index(cx.enclosing.outermost, cx.enclosing.class, cx.enclosing.method);
    let class_name = format!(
        "{}${index}",
        cx.interner.resolve(cx.pool.class(cx.enclosing.class).name)
    );
    let name = cx.interner.intern(&class_name);

    let static_context =
        cx.method_is_static() || cx.pool.class(cx.enclosing.class).is_static_class;
    let mut info = ClassInfo::new(name, access | AccessFlags::SYNTHETIC);
    info.superclass = ClassId::LAMBDA_BASE;
    info.interfaces.push(ClassId::GENERATED_LAMBDA);
    info.enclosing_method = Some((cx.enclosing.class, cx.enclosing.method));
    info.is_static_class = static_context;
    info.span = span;
    let class = cx.pool.add_class(info);
    cx.pool.add_inner_class(cx.enclosing.class, class);

    // One rewrite, before the body method is recorded; the unit is
    // immutable afterwards.
    let param_shift = receiver_index + 1;
    let rewritten = rewrite_body(
        cx.arena,
        cx.inference,
        cx.pool,
        cx.interner,
        &params,
        receiver_index,
        param_shift,
        body,
    )?;

    let body_method = cx.pool.add_method(MethodInfo {
        owner: class,
        name: cx.interner.intern(BODY_METHOD),
        access: AccessFlags::PUBLIC | AccessFlags::STATIC | AccessFlags::SYNTHETIC,
        params: params.clone(),
        return_ty,
        body: rewritten,
        span,
    });

    let descriptors = build_descriptors(cx, sam, &params, &exact_params, return_ty, captures.len())?;

    let unit = GeneratedUnit {
        class,
        body_method,
        captures,
        descriptors,
    };
    registry.insert(expr, unit.clone());
    debug!(
        class = cx.interner.resolve(name),
        captures = unit.captures.len(),
        "generated lambda unit"
    );
    Ok(unit)
}

/// Construct the three descriptor views of the body method.
fn build_descriptors(
    cx: &LowerCx<'_>,
    sam: MethodId,
    params: &[ParamInfo],
    exact_params: &[ParamInfo],
    return_ty: TypeRef,
    capture_count: usize,
) -> Result<DescriptorSet> {
    let sam_info = cx.pool.method(sam);
    let declared = MethodDescriptor::new(
        sam_info.params.iter().map(|p| p.ty).collect(),
        sam_info.return_ty,
    );
    let erased = MethodDescriptor::new(params.iter().map(|p| p.ty).collect(), return_ty);
    let exact = MethodDescriptor::new(exact_params.iter().map(|p| p.ty).collect(), return_ty);
    DescriptorSet::build(declared, erased, exact, capture_count)
}
