//! Shared test utilities for lambda lowering.
//!
//! `Fixture` assembles the full collaborator set one lowering needs — arena,
//! interner, pool, inference tables, instruction buffer, stack model, frame —
//! around a `demo.Outer.run` enclosing method. Only compiled in test builds.

use tarn_bytecode::{InstructionBuffer, LocalTable, OperandStack};
use tarn_ir::{
    Binding, CallExpr, ExprArena, ExprId, ExprKind, LambdaParam, Name, Span, Stmt, StmtId,
    StmtKind, StringInterner, VarExpr, VarId, VarInfo,
};
use tarn_types::{
    AccessFlags, ClassId, ClassInfo, ClassPool, InferenceResult, MethodId, MethodInfo, ParamInfo,
    TypeRef,
};

use crate::context::{EnclosingMethod, LowerCx};
use crate::error::Result;
use crate::fallback::FallbackLowering;

/// A fallback that records its invocations and does nothing else.
#[derive(Default)]
pub(crate) struct RecordingFallback {
    pub(crate) calls: Vec<(ExprId, AccessFlags)>,
}

impl FallbackLowering for RecordingFallback {
    fn lower_closure(
        &mut self,
        _cx: &mut LowerCx<'_>,
        expr: ExprId,
        access: AccessFlags,
    ) -> Result<()> {
        self.calls.push((expr, access));
        Ok(())
    }
}

/// Complete collaborator set for one lowering.
pub(crate) struct Fixture {
    pub(crate) arena: ExprArena,
    pub(crate) interner: StringInterner,
    pub(crate) pool: ClassPool,
    pub(crate) inference: InferenceResult,
    pub(crate) sink: InstructionBuffer,
    pub(crate) stack: OperandStack,
    pub(crate) frame: LocalTable,
    pub(crate) enclosing: EnclosingMethod,
}

impl Fixture {
    /// A fixture whose enclosing method `demo.Outer.run` is instance or
    /// static as requested.
    pub(crate) fn new(static_method: bool) -> Self {
        let interner = StringInterner::new();
        let mut pool = ClassPool::new(&interner);
        let outer = pool.add_class(ClassInfo::new(
            interner.intern("demo.Outer"),
            AccessFlags::PUBLIC,
        ));
        let mut access = AccessFlags::PUBLIC;
        if static_method {
            access |= AccessFlags::STATIC;
        }
        let method = pool.add_method(MethodInfo {
            owner: outer,
            name: interner.intern("run"),
            access,
            params: vec![],
            return_ty: TypeRef::of(ClassId::VOID),
            body: StmtId::INVALID,
            span: Span::DUMMY,
        });

        Fixture {
            arena: ExprArena::new(),
            interner,
            pool,
            inference: InferenceResult::new(),
            sink: InstructionBuffer::new(),
            stack: OperandStack::new(),
            frame: LocalTable::new(static_method),
            enclosing: EnclosingMethod {
                outermost: outer,
                class: outer,
                method,
            },
        }
    }

    /// Borrow everything as a lowering context.
    pub(crate) fn cx(&mut self) -> LowerCx<'_> {
        LowerCx {
            arena: &mut self.arena,
            interner: &self.interner,
            pool: &mut self.pool,
            inference: &mut self.inference,
            enclosing: self.enclosing,
            sink: &mut self.sink,
            stack: &mut self.stack,
            frame: &self.frame,
        }
    }

    /// Register `demo.Fn`, a marked functional interface with one abstract
    /// method `apply`.
    pub(crate) fn functional_target(
        &mut self,
        param_tys: &[TypeRef],
        ret: TypeRef,
    ) -> (ClassId, MethodId) {
        let mut info = ClassInfo::new(
            self.interner.intern("demo.Fn"),
            AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
        );
        info.annotations.push(ClassId::FUNCTIONAL_INTERFACE);
        let class = self.pool.add_class(info);
        let params = param_tys
            .iter()
            .enumerate()
            .map(|(i, &ty)| ParamInfo::plain(self.interner.intern(&format!("arg{i}")), ty))
            .collect();
        let sam = self.pool.add_method(MethodInfo {
            owner: class,
            name: self.interner.intern("apply"),
            access: AccessFlags::PUBLIC | AccessFlags::ABSTRACT,
            params,
            return_ty: ret,
            body: StmtId::INVALID,
            span: Span::DUMMY,
        });
        (class, sam)
    }

    /// Add an instance method `helper` to the enclosing class.
    pub(crate) fn instance_helper(&mut self) -> MethodId {
        self.pool.add_method(MethodInfo {
            owner: self.enclosing.class,
            name: self.interner.intern("helper"),
            access: AccessFlags::PUBLIC,
            params: vec![ParamInfo::plain(
                self.interner.intern("value"),
                TypeRef::of(ClassId::OBJECT),
            )],
            return_ty: TypeRef::of(ClassId::OBJECT),
            body: StmtId::INVALID,
            span: Span::DUMMY,
        })
    }

    /// Declare a local of the enclosing method: arena record, inferred type,
    /// and frame slot.
    pub(crate) fn local(&mut self, name: &str, ty: TypeRef) -> VarId {
        let name = self.interner.intern(name);
        let var = self.arena.push_var(VarInfo {
            name,
            span: Span::DUMMY,
        });
        self.inference.set_var_type(var, ty);
        self.frame.declare(name, ty);
        var
    }

    /// A reference to a local, flagged shared-with-enclosing-scope.
    pub(crate) fn shared_ref(&mut self, var: VarId) -> ExprId {
        let name = self.arena.var(var).name;
        self.arena.push_expr(
            ExprKind::Var(VarExpr {
                name,
                binding: Binding::Local(var),
                shared: true,
            }),
            Span::DUMMY,
        )
    }

    /// A reference to the lambda's own parameter at `index`.
    pub(crate) fn param_ref(&mut self, name: &str, index: u16) -> ExprId {
        let name = self.interner.intern(name);
        self.arena.push_expr(
            ExprKind::Var(VarExpr {
                name,
                binding: Binding::Param(index),
                shared: false,
            }),
            Span::DUMMY,
        )
    }

    /// An implicit-receiver call: unresolved receiver variable, resolved
    /// instance target.
    pub(crate) fn implicit_call(&mut self, target: MethodId, args: &[ExprId]) -> ExprId {
        let receiver = self.arena.push_expr(
            ExprKind::Var(VarExpr::unresolved(self.interner.intern("this"))),
            Span::DUMMY,
        );
        let method = self.pool.method(target).name;
        let args = self.arena.alloc_expr_list(args);
        let call = self.arena.push_expr(
            ExprKind::Call(CallExpr {
                receiver,
                method,
                args,
                implicit_this: true,
            }),
            Span::DUMMY,
        );
        self.inference.set_call_target(call, target);
        call
    }

    /// Wrap an expression in a `return` statement.
    pub(crate) fn return_stmt(&mut self, expr: ExprId) -> StmtId {
        self.arena
            .push_stmt(Stmt::new(StmtKind::Return(expr), Span::DUMMY))
    }

    /// Build a lambda over `body` and record its inference facts.
    pub(crate) fn lambda(
        &mut self,
        param_names: &[&str],
        param_tys: &[TypeRef],
        ret: TypeRef,
        target: ClassId,
        body: StmtId,
    ) -> ExprId {
        debug_assert_eq!(param_names.len(), param_tys.len());
        let params: Vec<LambdaParam> = param_names
            .iter()
            .map(|&name| LambdaParam {
                name: self.interner.intern(name),
                ty_name: Name::EMPTY,
                default: ExprId::INVALID,
                span: Span::DUMMY,
            })
            .collect();
        let params = self.arena.alloc_params(&params);
        let lambda = self
            .arena
            .push_expr(ExprKind::Lambda { params, body }, Span::DUMMY);
        self.inference.set_lambda_target(lambda, target);
        self.inference.set_lambda_return(lambda, ret);
        self.inference
            .set_lambda_param_types(lambda, param_tys.to_vec());
        lambda
    }

    /// The names of a method's parameters, resolved to strings.
    pub(crate) fn param_names(&self, method: MethodId) -> Vec<&'static str> {
        self.pool
            .method(method)
            .params
            .iter()
            .map(|p| self.interner.resolve(p.name))
            .collect()
    }
}
