//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two instances with the same attribute values
/// are interchangeable. They are immutable; to "modify" one, build a new one.
///
/// - **Value Object**: `EmailAddress("qa.lead@flexothene.com")`
/// - **Entity**: `AttendeeGroup { id: "qa-team", .. }`
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
