//! Attendee directory domain module.
//!
//! Attendee groups, product categories and the many-to-many "required groups"
//! relation between them, implemented as plain domain logic (no IO, no HTTP,
//! no storage). Both the admin API service and the client depend on these types.

pub mod category;
pub mod dto;
pub mod group;
pub mod kind;

pub use category::{CategoryPatch, CategoryWithGroups, NewCategory, ProductCategory};
pub use group::{AttendeeGroup, GroupPatch, NewGroup};
pub use kind::EntityKind;
