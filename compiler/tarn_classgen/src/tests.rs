//! Scenario and property tests for lambda lowering.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use tarn_bytecode::{BootstrapArg, Instruction, ValueKind};
use tarn_ir::{
    walk_expr, BinaryOp, Binding, ExprArena, ExprId, ExprKind, Span, Stmt, StmtId, StmtKind,
    StringInterner, VarExpr, Visitor,
};
use tarn_types::{AccessFlags, ClassId, ClassInfo, ClassPool, MethodInfo, TypeRef};

use crate::captures::collect_captures;
use crate::eligibility::{classify, Eligibility};
use crate::error::ClassGenError;
use crate::test_helpers::{Fixture, RecordingFallback};
use crate::LambdaLowerer;

fn object() -> TypeRef {
    TypeRef::of(ClassId::OBJECT)
}

/// Counts leftovers the body rewrite is required to eliminate.
#[derive(Default)]
struct RewriteAudit {
    shared_refs: usize,
    implicit_calls: usize,
}

impl Visitor for RewriteAudit {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        match arena.kind(id) {
            ExprKind::Var(var) if var.shared => self.shared_refs += 1,
            ExprKind::Call(call) if call.implicit_this => self.implicit_calls += 1,
            _ => {}
        }
        walk_expr(self, id, arena);
    }
}

fn audit(arena: &ExprArena, body: StmtId) -> RewriteAudit {
    let mut audit = RewriteAudit::default();
    audit.visit_stmt(body, arena);
    audit
}

fn var_at(arena: &ExprArena, expr: ExprId) -> VarExpr {
    let ExprKind::Var(var) = *arena.kind(expr) else {
        panic!("expected a variable reference, got {:?}", arena.kind(expr))
    };
    var
}

fn block_stmts(arena: &ExprArena, stmt: StmtId) -> Vec<StmtId> {
    let StmtKind::Block(range) = arena.stmt(stmt).kind else {
        panic!("expected a block, got {:?}", arena.stmt(stmt).kind)
    };
    arena.stmts(range).to_vec()
}

#[test]
fn zero_captures_instance_context() {
    let mut fx = Fixture::new(false);
    let helper = fx.instance_helper();
    let (target, _) = fx.functional_target(&[object()], object());

    // |x| -> helper(x), with `helper` resolving against the enclosing
    // instance.
    let arg = fx.param_ref("x", 0);
    let call = fx.implicit_call(helper, &[arg]);
    let body = fx.return_stmt(call);
    let lambda = fx.lambda(&["x"], &[object()], object(), target, body);

    let mut lowerer = LambdaLowerer::new(RecordingFallback::default());
    let result = lowerer.lower(&mut fx.cx(), lambda);
    assert!(result.is_ok(), "{result:?}");

    let Some(unit) = lowerer.registry().get(lambda) else {
        panic!("no generated unit for the lambda");
    };

    // Body method shape: receiver placeholder then the lambda's own param.
    assert_eq!(fx.param_names(unit.body_method), vec!["$receiver", "x"]);
    assert!(unit.captures.is_empty());

    // Generated class shape.
    let info = fx.pool.class(unit.class);
    assert_eq!(fx.interner.resolve(info.name), "demo.Outer$1");
    assert!(info.access.contains(AccessFlags::SYNTHETIC));
    assert_eq!(info.superclass, ClassId::LAMBDA_BASE);
    assert!(info.interfaces.contains(&ClassId::GENERATED_LAMBDA));
    assert_eq!(
        info.enclosing_method,
        Some((fx.enclosing.class, fx.enclosing.method))
    );
    assert!(fx
        .pool
        .class(fx.enclosing.class)
        .inner_classes
        .contains(&unit.class));

    // Call site: current receiver, then one invokedynamic.
    let instrs = fx.sink.instructions();
    assert_eq!(instrs.len(), 2);
    assert_eq!(
        instrs[0],
        Instruction::Load {
            kind: ValueKind::Ref,
            slot: 0
        }
    );
    let Instruction::InvokeDynamic { name, args, .. } = &instrs[1] else {
        panic!("expected invokedynamic, got {:?}", instrs[1]);
    };
    assert_eq!(fx.interner.resolve(*name), "apply");
    assert_eq!(args.len(), 3);
    let BootstrapArg::Handle(handle) = &args[1] else {
        panic!("expected the body-method handle, got {:?}", args[1]);
    };
    assert_eq!(fx.interner.resolve(handle.owner), "demo/Outer$1");
    assert_eq!(fx.interner.resolve(handle.name), "lambdaBody");

    // Exactly one functional value remains.
    assert_eq!(fx.stack.depth(), 1);
    assert_eq!(fx.stack.top(), Some(TypeRef::of(target)));

    // Rewrite completeness on the body method's tree.
    let rewritten = fx.pool.method(unit.body_method).body;
    let leftovers = audit(&fx.arena, rewritten);
    assert_eq!(leftovers.shared_refs, 0);
    assert_eq!(leftovers.implicit_calls, 0);

    // The rewritten call is qualified with the receiver placeholder and the
    // lambda's own parameter shifted past it.
    let StmtKind::Return(expr) = fx.arena.stmt(rewritten).kind else {
        panic!("rewritten body should be a return");
    };
    let ExprKind::Call(rewritten_call) = *fx.arena.kind(expr) else {
        panic!("rewritten body should return a call");
    };
    assert!(!rewritten_call.implicit_this);
    let ExprKind::Var(receiver) = *fx.arena.kind(rewritten_call.receiver) else {
        panic!("receiver should be a variable reference");
    };
    assert_eq!(receiver.binding, Binding::Param(0));
    let ExprKind::Var(shifted) = *fx.arena.kind(fx.arena.exprs(rewritten_call.args)[0]) else {
        panic!("argument should be a variable reference");
    };
    assert_eq!(shifted.binding, Binding::Param(1));

    // The original body is untouched.
    let ExprKind::Call(original) = *fx.arena.kind(call) else {
        panic!("original call node changed kind");
    };
    assert!(original.implicit_this);

    assert!(lowerer.fallback().calls.is_empty());
}

#[test]
fn two_captures_static_context() {
    let mut fx = Fixture::new(true);
    let (target, _) = fx.functional_target(&[], object());

    let a = fx.local("a", TypeRef::of(ClassId::INT));
    let b = fx.local("b", TypeRef::of(ClassId::DOUBLE));
    let ra = fx.shared_ref(a);
    let rb = fx.shared_ref(b);
    let sum = fx.arena.push_expr(
        ExprKind::Binary {
            op: BinaryOp::Add,
            lhs: ra,
            rhs: rb,
        },
        Span::DUMMY,
    );
    let body = fx.return_stmt(sum);
    let lambda = fx.lambda(&[], &[], object(), target, body);

    let mut lowerer = LambdaLowerer::new(RecordingFallback::default());
    let result = lowerer.lower(&mut fx.cx(), lambda);
    assert!(result.is_ok(), "{result:?}");

    let Some(unit) = lowerer.registry().get(lambda) else {
        panic!("no generated unit for the lambda");
    };

    // Captures prefix the parameter list; the receiver placeholder is
    // present even though the context is static.
    assert_eq!(fx.param_names(unit.body_method), vec!["a", "b", "$receiver"]);
    let capture_names: Vec<&str> = unit
        .captures
        .iter()
        .map(|c| fx.interner.resolve(c.name))
        .collect();
    assert_eq!(capture_names, vec!["a", "b"]);

    // Null receiver, then captures in discovery order from their slots.
    assert_eq!(
        fx.sink.instructions()[..3],
        [
            Instruction::AConstNull,
            Instruction::Load {
                kind: ValueKind::Int,
                slot: 0
            },
            Instruction::Load {
                kind: ValueKind::Double,
                slot: 1
            },
        ]
    );
    let Instruction::InvokeDynamic { desc, .. } = &fx.sink.instructions()[3] else {
        panic!("expected invokedynamic");
    };
    assert_eq!(fx.interner.resolve(*desc), "(Ldemo/Outer;ID)Ldemo/Fn;");

    assert_eq!(fx.stack.depth(), 1);
    assert_eq!(fx.stack.top(), Some(TypeRef::of(target)));
}

#[test]
fn stack_balance_across_capture_counts() {
    for count in 0..3usize {
        let mut fx = Fixture::new(false);
        let (target, _) = fx.functional_target(&[], object());

        let mut stmts = Vec::new();
        for i in 0..count {
            let var = fx.local(&format!("c{i}"), TypeRef::of(ClassId::INT));
            let reference = fx.shared_ref(var);
            stmts.push(
                fx.arena
                    .push_stmt(Stmt::new(StmtKind::Expr(reference), Span::DUMMY)),
            );
        }
        let null = fx.arena.push_expr(ExprKind::Null, Span::DUMMY);
        stmts.push(fx.return_stmt(null));
        let range = fx.arena.alloc_stmt_list(&stmts);
        let body = fx
            .arena
            .push_stmt(Stmt::new(StmtKind::Block(range), Span::DUMMY));
        let lambda = fx.lambda(&[], &[], object(), target, body);

        let mut lowerer = LambdaLowerer::new(RecordingFallback::default());
        let result = lowerer.lower(&mut fx.cx(), lambda);
        assert!(result.is_ok(), "{result:?}");

        // Pushes before the call site: one receiver plus one per capture.
        assert_eq!(fx.sink.instructions().len(), count + 2);
        assert_eq!(fx.stack.max_depth(), count + 1);
        assert_eq!(fx.stack.depth(), 1);
        assert_eq!(fx.stack.top(), Some(TypeRef::of(target)));
    }
}

#[test]
fn unit_creation_is_idempotent() {
    let mut fx = Fixture::new(false);
    let (target, _) = fx.functional_target(&[], object());
    let null = fx.arena.push_expr(ExprKind::Null, Span::DUMMY);
    let body = fx.return_stmt(null);
    let lambda = fx.lambda(&[], &[], object(), target, body);

    let mut lowerer = LambdaLowerer::new(RecordingFallback::default());
    let first = lowerer.lower(&mut fx.cx(), lambda);
    assert!(first.is_ok(), "{first:?}");
    let first_class = lowerer
        .registry()
        .get(lambda)
        .map(|unit| unit.class);
    let classes_after_first = fx.pool.class_count();

    // Re-visiting the same expression must reuse the cached unit.
    let second = lowerer.lower(&mut fx.cx(), lambda);
    assert!(second.is_ok(), "{second:?}");
    assert_eq!(lowerer.registry().len(), 1);
    assert_eq!(
        lowerer.registry().get(lambda).map(|unit| unit.class),
        first_class
    );
    assert_eq!(fx.pool.class_count(), classes_after_first);
}

#[test]
fn sibling_lambdas_get_distinct_names() {
    let mut fx = Fixture::new(false);
    let (target, _) = fx.functional_target(&[], object());

    let mut lowerer = LambdaLowerer::new(RecordingFallback::default());
    let mut names = Vec::new();
    for _ in 0..2 {
        let null = fx.arena.push_expr(ExprKind::Null, Span::DUMMY);
        let body = fx.return_stmt(null);
        let lambda = fx.lambda(&[], &[], object(), target, body);
        let result = lowerer.lower(&mut fx.cx(), lambda);
        assert!(result.is_ok(), "{result:?}");
        let Some(unit) = lowerer.registry().get(lambda) else {
            panic!("no generated unit");
        };
        names.push(fx.interner.resolve(fx.pool.class(unit.class).name));
    }
    assert_eq!(names, vec!["demo.Outer$1", "demo.Outer$2"]);
}

#[test]
fn ineligible_target_delegates_to_fallback() {
    let mut fx = Fixture::new(false);
    let mut info = ClassInfo::new(
        fx.interner.intern("demo.Multi"),
        AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
    );
    info.annotations.push(ClassId::FUNCTIONAL_INTERFACE);
    let target = fx.pool.add_class(info);
    for name in ["first", "second"] {
        fx.pool.add_method(MethodInfo {
            owner: target,
            name: fx.interner.intern(name),
            access: AccessFlags::PUBLIC | AccessFlags::ABSTRACT,
            params: vec![],
            return_ty: object(),
            body: StmtId::INVALID,
            span: Span::DUMMY,
        });
    }

    let null = fx.arena.push_expr(ExprKind::Null, Span::DUMMY);
    let body = fx.return_stmt(null);
    let lambda = fx.lambda(&[], &[], object(), target, body);

    let mut lowerer = LambdaLowerer::new(RecordingFallback::default());
    let result = lowerer.lower(&mut fx.cx(), lambda);
    assert!(result.is_ok(), "{result:?}");

    // No unit, no instructions; the fallback got the expression and
    // modifiers unchanged.
    assert!(lowerer.registry().is_empty());
    assert!(fx.sink.instructions().is_empty());
    assert_eq!(fx.stack.depth(), 0);
    assert_eq!(lowerer.fallback().calls, vec![(lambda, AccessFlags::PUBLIC)]);
}

#[test]
fn capture_and_param_name_clash_is_fatal() {
    let mut fx = Fixture::new(false);
    let (target, _) = fx.functional_target(&[object()], object());

    // The capture and the lambda's own parameter are both named `n`, so the
    // rewrite finds two matching body-method parameters.
    let n = fx.local("n", TypeRef::of(ClassId::INT));
    let reference = fx.shared_ref(n);
    let body = fx.return_stmt(reference);
    let lambda = fx.lambda(&["n"], &[object()], object(), target, body);

    let mut lowerer = LambdaLowerer::new(RecordingFallback::default());
    let result = lowerer.lower(&mut fx.cx(), lambda);
    assert!(matches!(
        result,
        Err(ClassGenError::CaptureParamMismatch { count: 2, .. })
    ));
}

#[test]
fn capture_discovery_is_deterministic() {
    let mut fx = Fixture::new(false);
    let a = fx.local("a", TypeRef::of(ClassId::INT));
    let b = fx.local("b", TypeRef::of(ClassId::LONG));

    // b is referenced first and again later; discovery order is b, a.
    let rb1 = fx.shared_ref(b);
    let ra = fx.shared_ref(a);
    let rb2 = fx.shared_ref(b);
    let stmts: Vec<StmtId> = [rb1, ra, rb2]
        .into_iter()
        .map(|e| fx.arena.push_stmt(Stmt::new(StmtKind::Expr(e), Span::DUMMY)))
        .collect();
    let range = fx.arena.alloc_stmt_list(&stmts);
    let body = fx
        .arena
        .push_stmt(Stmt::new(StmtKind::Block(range), Span::DUMMY));

    let first = collect_captures(&fx.arena, &fx.inference, &fx.interner, body);
    let second = collect_captures(&fx.arena, &fx.inference, &fx.interner, body);
    let (Ok(first), Ok(second)) = (first, second) else {
        panic!("capture analysis failed");
    };
    assert_eq!(first, second);
    let names: Vec<&str> = first.iter().map(|c| fx.interner.resolve(c.name)).collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn nested_lambda_bodies_are_copied_untouched() {
    let mut fx = Fixture::new(false);
    let (outer_target, _) = fx.functional_target(&[], object());
    let (inner_target, _) = fx.functional_target(&[object()], object());
    let c = fx.local("c", TypeRef::of(ClassId::INT));

    // Inner: |y| { c; return y }
    let inner_c = fx.shared_ref(c);
    let inner_y = fx.param_ref("y", 0);
    let s1 = fx
        .arena
        .push_stmt(Stmt::new(StmtKind::Expr(inner_c), Span::DUMMY));
    let s2 = fx.return_stmt(inner_y);
    let range = fx.arena.alloc_stmt_list(&[s1, s2]);
    let inner_body = fx
        .arena
        .push_stmt(Stmt::new(StmtKind::Block(range), Span::DUMMY));
    let inner = fx.lambda(&["y"], &[object()], object(), inner_target, inner_body);

    // Outer: || { c; return inner }
    let outer_c = fx.shared_ref(c);
    let s3 = fx
        .arena
        .push_stmt(Stmt::new(StmtKind::Expr(outer_c), Span::DUMMY));
    let s4 = fx.return_stmt(inner);
    let range = fx.arena.alloc_stmt_list(&[s3, s4]);
    let outer_body = fx
        .arena
        .push_stmt(Stmt::new(StmtKind::Block(range), Span::DUMMY));
    let outer = fx.lambda(&[], &[], object(), outer_target, outer_body);

    let mut lowerer = LambdaLowerer::new(RecordingFallback::default());
    let result = lowerer.lower(&mut fx.cx(), outer);
    assert!(result.is_ok(), "{result:?}");

    let Some(outer_unit) = lowerer.registry().get(outer) else {
        panic!("no generated unit for the outer lambda");
    };
    // The outer capture walk reaches into the nested body, so `c` is an
    // outer capture even where it is only referenced inside the inner one.
    assert_eq!(fx.param_names(outer_unit.body_method), vec!["c", "$receiver"]);

    let rewritten = fx.pool.method(outer_unit.body_method).body;
    let stmts = block_stmts(&fx.arena, rewritten);
    let own_ref = var_at(&fx.arena, {
        let StmtKind::Expr(expr) = fx.arena.stmt(stmts[0]).kind else {
            panic!("first statement should be the outer reference");
        };
        expr
    });
    assert_eq!(own_ref.binding, Binding::Param(0));
    assert!(!own_ref.shared);

    // The nested lambda was copied, not rebound: its parameter index is
    // unshifted and its shared reference still points at the local.
    let StmtKind::Return(inner_copy) = fx.arena.stmt(stmts[1]).kind else {
        panic!("second statement should return the nested lambda");
    };
    let ExprKind::Lambda {
        body: copied_body, ..
    } = *fx.arena.kind(inner_copy)
    else {
        panic!("expected the nested lambda copy");
    };
    let copied_stmts = block_stmts(&fx.arena, copied_body);
    let StmtKind::Expr(c_copy) = fx.arena.stmt(copied_stmts[0]).kind else {
        panic!("copied inner body should start with the shared reference");
    };
    let c_var = var_at(&fx.arena, c_copy);
    assert!(c_var.shared);
    assert_eq!(c_var.binding, Binding::Local(c));
    let StmtKind::Return(y_copy) = fx.arena.stmt(copied_stmts[1]).kind else {
        panic!("copied inner body should end with the return");
    };
    assert_eq!(var_at(&fx.arena, y_copy).binding, Binding::Param(0));

    // Facts were mirrored onto the copy, so it lowers on its own.
    assert_eq!(fx.inference.lambda_target(inner_copy), Some(inner_target));
    let result = lowerer.lower(&mut fx.cx(), inner_copy);
    assert!(result.is_ok(), "{result:?}");

    let Some(inner_unit) = lowerer.registry().get(inner_copy) else {
        panic!("no generated unit for the nested lambda copy");
    };
    assert_eq!(
        fx.param_names(inner_unit.body_method),
        vec!["c", "$receiver", "y"]
    );
    let capture_names: Vec<&str> = inner_unit
        .captures
        .iter()
        .map(|cap| fx.interner.resolve(cap.name))
        .collect();
    assert_eq!(capture_names, vec!["c"]);
    assert_eq!(
        fx.interner.resolve(fx.pool.class(inner_unit.class).name),
        "demo.Outer$2"
    );

    // Only the nested lambda's own rewrite shifts its parameter, once.
    let inner_rewritten = fx.pool.method(inner_unit.body_method).body;
    let inner_stmts = block_stmts(&fx.arena, inner_rewritten);
    let StmtKind::Expr(c_rebound) = fx.arena.stmt(inner_stmts[0]).kind else {
        panic!("rewritten inner body should start with the capture reference");
    };
    let c_var = var_at(&fx.arena, c_rebound);
    assert_eq!(c_var.binding, Binding::Param(0));
    assert!(!c_var.shared);
    let StmtKind::Return(y_shifted) = fx.arena.stmt(inner_stmts[1]).kind else {
        panic!("rewritten inner body should end with the return");
    };
    assert_eq!(var_at(&fx.arena, y_shifted).binding, Binding::Param(2));
}

#[test]
fn missing_inference_facts_are_internal_errors() {
    let mut fx = Fixture::new(false);
    let (target, _) = fx.functional_target(&[], object());
    let null = fx.arena.push_expr(ExprKind::Null, Span::DUMMY);
    let body = fx.return_stmt(null);

    // A lambda the inference pass never annotated with a target type.
    let params = fx.arena.alloc_params(&[]);
    let bare = fx
        .arena
        .push_expr(ExprKind::Lambda { params, body }, Span::DUMMY);

    let mut lowerer = LambdaLowerer::new(RecordingFallback::default());
    assert!(matches!(
        lowerer.lower(&mut fx.cx(), bare),
        Err(ClassGenError::MissingTargetType { .. })
    ));

    // Target known, return type missing.
    let half = fx
        .arena
        .push_expr(ExprKind::Lambda { params, body }, Span::DUMMY);
    fx.inference.set_lambda_target(half, target);
    assert!(matches!(
        lowerer.lower(&mut fx.cx(), half),
        Err(ClassGenError::MissingReturnType { .. })
    ));
}

fn classify_shape(is_interface: bool, marked: bool, abstract_count: usize) -> Eligibility {
    let interner = StringInterner::new();
    let mut pool = ClassPool::new(&interner);
    let mut access = AccessFlags::PUBLIC | AccessFlags::ABSTRACT;
    if is_interface {
        access |= AccessFlags::INTERFACE;
    }
    let mut info = ClassInfo::new(interner.intern("prop.Target"), access);
    if marked {
        info.annotations.push(ClassId::FUNCTIONAL_INTERFACE);
    }
    let target = pool.add_class(info);
    for i in 0..abstract_count {
        pool.add_method(MethodInfo {
            owner: target,
            name: interner.intern(&format!("m{i}")),
            access: AccessFlags::PUBLIC | AccessFlags::ABSTRACT,
            params: vec![],
            return_ty: TypeRef::of(ClassId::VOID),
            body: StmtId::INVALID,
            span: Span::DUMMY,
        });
    }
    classify(&pool, target)
}

proptest! {
    /// Classification depends only on (interface, marker, abstract count)
    /// and is stable across repeated calls.
    #[test]
    fn eligibility_depends_only_on_shape(
        is_interface: bool,
        marked: bool,
        abstract_count in 0usize..4,
    ) {
        let first = classify_shape(is_interface, marked, abstract_count);
        let second = classify_shape(is_interface, marked, abstract_count);
        prop_assert_eq!(first, second);

        let expect_fast = is_interface && marked && abstract_count == 1;
        prop_assert_eq!(matches!(first, Eligibility::FastPath { .. }), expect_fast);
    }
}
