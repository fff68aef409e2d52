//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one and replace the old value wholesale.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Grant {
///     location: LocationId,
///     role: Role,
/// }
///
/// impl ValueObject for Grant {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
