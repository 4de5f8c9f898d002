//! Method handles and bootstrap arguments.

use tarn_ir::{Name, StringInterner};

use crate::MethodDescriptor;

/// Descriptor of `LambdaMetafactory.metafactory`, the well-known bootstrap
/// for lambda call sites.
const METAFACTORY_DESC: &str = "(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;\
Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodHandle;\
Ljava/lang/invoke/MethodType;)Ljava/lang/invoke/CallSite;";

/// Kind of member reference a [`Handle`] makes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum HandleTag {
    GetField,
    GetStatic,
    PutField,
    PutStatic,
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

impl HandleTag {
    /// Class-file reference kind value.
    pub const fn value(self) -> u8 {
        match self {
            HandleTag::GetField => 1,
            HandleTag::GetStatic => 2,
            HandleTag::PutField => 3,
            HandleTag::PutStatic => 4,
            HandleTag::InvokeVirtual => 5,
            HandleTag::InvokeStatic => 6,
            HandleTag::InvokeSpecial => 7,
            HandleTag::NewInvokeSpecial => 8,
            HandleTag::InvokeInterface => 9,
        }
    }
}

/// A direct reference to a class member.
///
/// `owner` and `desc` are interned strings in class-file form (internal
/// names, rendered descriptors); the bootstrap handle's descriptor mentions
/// types this compiler never models, so handles do not go through the pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Handle {
    pub tag: HandleTag,
    pub owner: Name,
    pub name: Name,
    pub desc: Name,
    /// Whether the owner is an interface. The metafactory handle mirrors
    /// the enclosing class's interface-ness here.
    pub is_interface: bool,
}

/// One bootstrap argument of a dynamic call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrapArg {
    /// A method-type constant.
    MethodType(MethodDescriptor),
    /// A method-handle constant.
    Handle(Handle),
}

/// The fixed `LambdaMetafactory.metafactory` bootstrap handle.
pub fn metafactory(interner: &StringInterner, is_interface: bool) -> Handle {
    Handle {
        tag: HandleTag::InvokeStatic,
        owner: interner.intern("java/lang/invoke/LambdaMetafactory"),
        name: interner.intern("metafactory"),
        desc: interner.intern(METAFACTORY_DESC),
        is_interface,
    }
}
