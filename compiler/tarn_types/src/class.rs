//! Class and method records.
//!
//! [`ClassPool`] is the arena of every class visible to code generation.
//! Classes are referenced by [`ClassId`]; well-known classes the backend
//! needs (primitives, `java.lang.Object`, the Tarn runtime's lambda support
//! types) are registered at pool creation with fixed indices, so lookups are
//! O(1) index comparisons.

use tarn_ir::{Name, Span, StmtId, StringInterner};

use crate::{AccessFlags, TypeRef};

/// A 32-bit index into the class pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ClassId(u32);

impl ClassId {
    // === Well-known classes (fixed indices) ===
    // Pre-registered by `ClassPool::new` in exactly this order.

    /// `java.lang.Object`.
    pub const OBJECT: Self = Self(0);
    /// `java.lang.String`.
    pub const STRING: Self = Self(1);
    /// `java.lang.FunctionalInterface` — the single-abstract-method marker
    /// annotation.
    pub const FUNCTIONAL_INTERFACE: Self = Self(2);
    /// `tarn.runtime.Lambda` — superclass of every generated lambda class.
    pub const LAMBDA_BASE: Self = Self(3);
    /// `tarn.runtime.GeneratedLambda` — marker interface implemented by
    /// every generated lambda class.
    pub const GENERATED_LAMBDA: Self = Self(4);

    // === Primitive types ===

    pub const VOID: Self = Self(5);
    pub const BOOLEAN: Self = Self(6);
    pub const BYTE: Self = Self(7);
    pub const CHAR: Self = Self(8);
    pub const SHORT: Self = Self(9);
    pub const INT: Self = Self(10);
    pub const LONG: Self = Self(11);
    pub const FLOAT: Self = Self(12);
    pub const DOUBLE: Self = Self(13);

    /// First index for classes registered after the well-known set.
    pub const FIRST_DYNAMIC: u32 = 14;

    /// Sentinel for "no class".
    pub const NONE: Self = Self(u32::MAX);

    /// Create from a raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the index into the pool.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this is one of the pre-registered primitive types.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 >= Self::VOID.0 && self.0 <= Self::DOUBLE.0
    }
}

/// A 32-bit index into the pool's method table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct MethodId(u32);

impl MethodId {
    /// Sentinel for "no method".
    pub const INVALID: Self = Self(u32::MAX);

    /// Create from a raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the index into the method table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is a valid id.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

/// A method parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParamInfo {
    pub name: Name,
    /// The parameter's type as used in descriptors.
    pub ty: TypeRef,
    /// The declared (pre-coercion) type. Downstream consumers read either
    /// field, so synthesized parameters set both.
    pub origin_ty: TypeRef,
    /// Default value expression, `ExprId::INVALID` when absent. Parameters
    /// synthesized from captured variables never carry one.
    pub default: tarn_ir::ExprId,
}

impl ParamInfo {
    /// A parameter with no default and identical declared/descriptor types.
    pub fn plain(name: Name, ty: TypeRef) -> Self {
        ParamInfo {
            name,
            ty,
            origin_ty: ty,
            default: tarn_ir::ExprId::INVALID,
        }
    }
}

/// A method record.
#[derive(Clone, Debug)]
pub struct MethodInfo {
    pub owner: ClassId,
    pub name: Name,
    pub access: AccessFlags,
    pub params: Vec<ParamInfo>,
    pub return_ty: TypeRef,
    /// Body statement, `StmtId::INVALID` for abstract methods.
    pub body: StmtId,
    pub span: Span,
}

impl MethodInfo {
    /// Whether the method is abstract.
    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.access.contains(AccessFlags::ABSTRACT)
    }

    /// Whether the method is static.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.access.contains(AccessFlags::STATIC)
    }
}

/// A class record.
#[derive(Clone, Debug)]
pub struct ClassInfo {
    /// Fully qualified dotted name, e.g. `demo.Outer$1`.
    pub name: Name,
    pub access: AccessFlags,
    /// `ClassId::NONE` only for `java.lang.Object` and primitives.
    pub superclass: ClassId,
    pub interfaces: Vec<ClassId>,
    /// Annotation classes present on this class.
    pub annotations: Vec<ClassId>,
    /// Members, in declaration order.
    pub methods: Vec<MethodId>,
    /// Nested classes registered under this class.
    pub inner_classes: Vec<ClassId>,
    /// For a local/synthetic class, the method it was generated in.
    pub enclosing_method: Option<(ClassId, MethodId)>,
    /// True for a static nested class.
    pub is_static_class: bool,
    /// Source position, `Span::DUMMY` for library classes.
    pub span: Span,
}

impl ClassInfo {
    /// A class with the given name and access, everything else defaulted.
    pub fn new(name: Name, access: AccessFlags) -> Self {
        ClassInfo {
            name,
            access,
            superclass: ClassId::OBJECT,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            methods: Vec::new(),
            inner_classes: Vec::new(),
            enclosing_method: None,
            is_static_class: false,
            span: Span::DUMMY,
        }
    }

    /// Whether the class is an interface.
    #[inline]
    pub fn is_interface(&self) -> bool {
        self.access.contains(AccessFlags::INTERFACE)
    }
}

/// Arena of class and method records.
pub struct ClassPool {
    classes: Vec<ClassInfo>,
    methods: Vec<MethodInfo>,
}

impl ClassPool {
    /// Create a pool with the well-known classes pre-registered.
    ///
    /// Registration order must match the fixed [`ClassId`] constants.
    pub fn new(interner: &StringInterner) -> Self {
        let mut pool = ClassPool {
            classes: Vec::with_capacity(ClassId::FIRST_DYNAMIC as usize + 16),
            methods: Vec::new(),
        };

        let mut well_known = |name: &str, access: AccessFlags| {
            let mut info = ClassInfo::new(interner.intern(name), access);
            info.superclass = ClassId::NONE;
            pool.classes.push(info);
        };

        well_known("java.lang.Object", AccessFlags::PUBLIC);
        well_known("java.lang.String", AccessFlags::PUBLIC | AccessFlags::FINAL);
        well_known(
            "java.lang.FunctionalInterface",
            AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ANNOTATION,
        );
        well_known("tarn.runtime.Lambda", AccessFlags::PUBLIC | AccessFlags::ABSTRACT);
        well_known(
            "tarn.runtime.GeneratedLambda",
            AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
        );
        for prim in ["void", "boolean", "byte", "char", "short", "int", "long", "float", "double"]
        {
            well_known(prim, AccessFlags::PUBLIC | AccessFlags::FINAL);
        }

        debug_assert_eq!(pool.classes.len() as u32, ClassId::FIRST_DYNAMIC);
        pool
    }

    /// Register a class, returning its id.
    pub fn add_class(&mut self, info: ClassInfo) -> ClassId {
        let id = ClassId::from_raw(tarn_ir::to_u32(self.classes.len(), "classes"));
        self.classes.push(info);
        id
    }

    /// Get a class record.
    #[inline]
    pub fn class(&self, id: ClassId) -> &ClassInfo {
        &self.classes[id.index()]
    }

    /// Get a mutable class record.
    #[inline]
    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassInfo {
        &mut self.classes[id.index()]
    }

    /// Register a method and append it to its owner's member list.
    pub fn add_method(&mut self, info: MethodInfo) -> MethodId {
        let id = MethodId::from_raw(tarn_ir::to_u32(self.methods.len(), "methods"));
        let owner = info.owner;
        self.methods.push(info);
        self.classes[owner.index()].methods.push(id);
        id
    }

    /// Get a method record.
    #[inline]
    pub fn method(&self, id: MethodId) -> &MethodInfo {
        &self.methods[id.index()]
    }

    /// The abstract members of a class, in declaration order.
    pub fn abstract_methods(&self, class: ClassId) -> impl Iterator<Item = MethodId> + '_ {
        self.classes[class.index()]
            .methods
            .iter()
            .copied()
            .filter(|&m| self.method(m).is_abstract())
    }

    /// Whether a class carries the functional-interface marker annotation.
    pub fn is_functional_marked(&self, class: ClassId) -> bool {
        self.class(class)
            .annotations
            .contains(&ClassId::FUNCTIONAL_INTERFACE)
    }

    /// Register `inner` as a nested class of `outer`.
    pub fn add_inner_class(&mut self, outer: ClassId, inner: ClassId) {
        self.classes[outer.index()].inner_classes.push(inner);
    }

    /// Number of registered classes (including the well-known set).
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}
