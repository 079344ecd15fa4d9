//! Derived join between categories and the groups they require.
//!
//! Everything here is a pure read of the [`EntityStore`]; nothing is cached, so
//! callers re-derive after every change to either collection.

use std::collections::HashSet;

use huddle_core::{CategoryId, EmailAddress, GroupId};
use huddle_directory::{AttendeeGroup, CategoryWithGroups, ProductCategory};

use crate::store::EntityStore;

/// Resolve a category's refs against the local groups. Refs that do not resolve
/// are left out of `required_groups`; `required_group_ids` is kept as is.
pub fn materialize(store: &EntityStore, category: &ProductCategory) -> CategoryWithGroups {
    category.with_groups(|id| store.get::<AttendeeGroup>(id))
}

/// Everyone a meeting of `category` must invite: the union of the resolved groups'
/// emails, deduplicated, in first-seen order.
pub fn required_attendees(store: &EntityStore, category: &ProductCategory) -> Vec<EmailAddress> {
    let mut seen = HashSet::new();
    category
        .required_group_ids
        .iter()
        .filter_map(|id| store.get::<AttendeeGroup>(id))
        .flat_map(|group| group.emails.iter())
        .filter(|email| seen.insert(*email))
        .cloned()
        .collect()
}

/// Reverse lookup: categories whose refs name `group_id`, in store order.
pub fn categories_requiring(store: &EntityStore, group_id: &GroupId) -> Vec<CategoryId> {
    store
        .iter::<ProductCategory>()
        .filter(|c| c.required_group_ids.contains(group_id))
        .map(|c| c.id.clone())
        .collect()
}

/// Refs of `category` that name no local group.
pub fn dangling_refs(store: &EntityStore, category: &ProductCategory) -> Vec<GroupId> {
    category
        .required_group_ids
        .iter()
        .filter(|id| store.get::<AttendeeGroup>(id).is_none())
        .cloned()
        .collect()
}
