//! Local-variable slot table for the enclosing method.
//!
//! Capture emission loads each captured variable's current value from the
//! enclosing frame by name; this table is where those slots come from. Wide
//! primitives occupy two slots, and slot 0 belongs to the receiver in an
//! instance method.

use rustc_hash::FxHashMap;
use tarn_ir::Name;
use tarn_types::TypeRef;

use crate::ValueKind;

/// A declared local's slot and type.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct LocalSlot {
    pub slot: u16,
    pub ty: TypeRef,
}

/// Name-to-slot mapping for one method frame.
#[derive(Debug)]
pub struct LocalTable {
    slots: FxHashMap<Name, LocalSlot>,
    next: u16,
}

impl LocalTable {
    /// A fresh frame. Instance methods reserve slot 0 for the receiver.
    pub fn new(is_static: bool) -> Self {
        LocalTable {
            slots: FxHashMap::default(),
            next: u16::from(!is_static),
        }
    }

    /// Declare a local, returning its slot.
    pub fn declare(&mut self, name: Name, ty: TypeRef) -> u16 {
        let slot = self.next;
        self.next += if ValueKind::of(ty).is_wide() { 2 } else { 1 };
        self.slots.insert(name, LocalSlot { slot, ty });
        slot
    }

    /// Look up a declared local by name.
    pub fn lookup(&self, name: Name) -> Option<LocalSlot> {
        self.slots.get(&name).copied()
    }
}
