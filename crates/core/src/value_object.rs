//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. `Amount` is a
/// value object (two amounts of 50 are the same thing); a catalog entry is an
/// entity (two entries named "Sword" priced 50 are still different entries).
///
/// To "modify" a value object, compute a new one (`a.checked_add(b)`).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
