use std::sync::RwLock;

use chrono::Utc;
use indexmap::IndexMap;

use huddle_core::{CategoryId, GroupId};
use huddle_directory::{
    AttendeeGroup, CategoryPatch, CategoryWithGroups, EntityKind, GroupPatch, NewCategory,
    NewGroup, ProductCategory,
};

use super::{DirectoryRepository, RepositoryError, RepositoryResult};

#[derive(Debug, Default)]
struct State {
    groups: IndexMap<GroupId, AttendeeGroup>,
    categories: IndexMap<CategoryId, ProductCategory>,
}

impl State {
    fn join(&self, category: &ProductCategory) -> CategoryWithGroups {
        category.with_groups(|id| self.groups.get(id))
    }

    fn check_refs<'a>(&self, ids: impl IntoIterator<Item = &'a GroupId>) -> RepositoryResult<()> {
        match ids.into_iter().find(|id| !self.groups.contains_key(*id)) {
            Some(missing) => Err(RepositoryError::UnknownGroup(missing.clone())),
            None => Ok(()),
        }
    }
}

/// In-memory directory for tests/dev.
///
/// Collections keep insertion order, so listings are stable across calls.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<State>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<R>(&self, f: impl FnOnce(&State) -> RepositoryResult<R>) -> RepositoryResult<R> {
        let state = self.inner.read().map_err(|_| RepositoryError::Poisoned)?;
        f(&state)
    }

    fn write<R>(&self, f: impl FnOnce(&mut State) -> RepositoryResult<R>) -> RepositoryResult<R> {
        let mut state = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        f(&mut state)
    }
}

impl DirectoryRepository for InMemoryDirectory {
    fn list_groups(&self) -> RepositoryResult<Vec<AttendeeGroup>> {
        self.read(|state| Ok(state.groups.values().cloned().collect()))
    }

    fn create_group(&self, new: NewGroup) -> RepositoryResult<AttendeeGroup> {
        new.validate()?;
        self.write(|state| {
            if state.groups.contains_key(&new.id) {
                return Err(RepositoryError::conflict(EntityKind::Group, &new.id));
            }
            let group = AttendeeGroup::from_new(&new, Utc::now());
            state.groups.insert(group.id.clone(), group.clone());
            tracing::debug!(group_id = %group.id, "attendee group created");
            Ok(group)
        })
    }

    fn update_group(&self, id: &GroupId, patch: GroupPatch) -> RepositoryResult<AttendeeGroup> {
        patch.validate()?;
        self.write(|state| {
            let slot = state
                .groups
                .get_mut(id)
                .ok_or_else(|| RepositoryError::not_found(EntityKind::Group, id))?;
            *slot = slot.apply_patch(&patch, Utc::now());
            Ok(slot.clone())
        })
    }

    fn delete_group(&self, id: &GroupId) -> RepositoryResult<()> {
        self.write(|state| {
            if state.groups.shift_remove(id).is_none() {
                return Err(RepositoryError::not_found(EntityKind::Group, id));
            }
            // Drop the join rows so no category keeps referencing the group.
            let mut detached = 0usize;
            for category in state.categories.values_mut() {
                if category.required_group_ids.remove(id) {
                    detached += 1;
                }
            }
            tracing::debug!(group_id = %id, detached, "attendee group deleted");
            Ok(())
        })
    }

    fn list_categories(&self) -> RepositoryResult<Vec<CategoryWithGroups>> {
        self.read(|state| Ok(state.categories.values().map(|c| state.join(c)).collect()))
    }

    fn create_category(&self, new: NewCategory) -> RepositoryResult<CategoryWithGroups> {
        new.validate()?;
        self.write(|state| {
            if state.categories.contains_key(&new.id) {
                return Err(RepositoryError::conflict(EntityKind::Category, &new.id));
            }
            state.check_refs(&new.required_group_ids)?;
            let category = ProductCategory::from_new(&new, Utc::now());
            let joined = state.join(&category);
            state.categories.insert(category.id.clone(), category);
            Ok(joined)
        })
    }

    fn update_category(
        &self,
        id: &CategoryId,
        patch: CategoryPatch,
    ) -> RepositoryResult<CategoryWithGroups> {
        patch.validate()?;
        self.write(|state| {
            let current = state
                .categories
                .get(id)
                .ok_or_else(|| RepositoryError::not_found(EntityKind::Category, id))?;
            if let Some(ids) = &patch.required_group_ids {
                state.check_refs(ids)?;
            }
            let updated = current.apply_patch(&patch, Utc::now());
            let joined = state.join(&updated);
            state.categories.insert(id.clone(), updated);
            Ok(joined)
        })
    }

    fn delete_category(&self, id: &CategoryId) -> RepositoryResult<()> {
        self.write(|state| match state.categories.shift_remove(id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::not_found(EntityKind::Category, id)),
        })
    }
}
