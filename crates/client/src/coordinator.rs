//! Optimistic mutation coordinator: the only writer of the local projection.
//!
//! Every mutation runs the same four phases:
//!
//! 1. snapshot the touched entity,
//! 2. apply the change to the [`EntityStore`] from client data alone,
//! 3. call the [`RemoteGateway`] (the only suspension point),
//! 4. commit the authoritative value, or restore the snapshot and re-raise.
//!
//! Phases 1, 2 and 4 run under the store lock; the lock is never held across the
//! remote call. Overlapping mutations on the same id are not serialized: the last
//! response to arrive wins.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use huddle_core::{CategoryId, EmailAddress, GroupId};
use huddle_directory::{
    AttendeeGroup, CategoryPatch, CategoryWithGroups, EntityKind, GroupPatch, NewCategory,
    NewGroup, ProductCategory,
};

use crate::error::{ClientError, ClientResult};
use crate::gateway::{GatewayResult, RemoteGateway};
use crate::notify::{NotificationKind, NotificationSink};
use crate::resolver;
use crate::snapshot::MutationSnapshot;
use crate::store::{EntityStore, Stored};

const FETCH_FAILED: &str = "Failed to fetch admin data";

/// Correlates the log lines of one mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MutationId(Uuid);

impl MutationId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for MutationId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for MutationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Action::Create => "created",
            Action::Update => "updated",
            Action::Delete => "deleted",
        }
    }

    fn success_message(self, kind: EntityKind) -> String {
        format!("{} {} successfully", kind.label(), self.past())
    }

    fn failure_message(self, kind: EntityKind) -> String {
        format!("Failed to {} {}", self.as_str(), kind.as_str())
    }
}

pub struct Coordinator {
    store: Mutex<EntityStore>,
    gateway: Arc<dyn RemoteGateway>,
    sink: Arc<dyn NotificationSink>,
    loading: AtomicBool,
}

impl Coordinator {
    /// Start with an empty projection; it stays `is_loading` until the first
    /// [`Coordinator::refresh`] completes.
    pub fn new(gateway: Arc<dyn RemoteGateway>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            store: Mutex::new(EntityStore::new()),
            gateway,
            sink,
            loading: AtomicBool::new(true),
        }
    }

    /// Build and load in one step.
    pub async fn connect(
        gateway: Arc<dyn RemoteGateway>,
        sink: Arc<dyn NotificationSink>,
    ) -> ClientResult<Self> {
        let coordinator = Self::new(gateway, sink);
        coordinator.refresh().await?;
        Ok(coordinator)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    fn with_store<R>(&self, f: impl FnOnce(&mut EntityStore) -> R) -> R {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub fn groups(&self) -> Vec<AttendeeGroup> {
        self.with_store(|store| store.list::<AttendeeGroup>())
    }

    pub fn group(&self, id: &GroupId) -> Option<AttendeeGroup> {
        self.with_store(|store| store.get::<AttendeeGroup>(id).cloned())
    }

    /// Every category, joined against the current local groups.
    pub fn categories(&self) -> Vec<CategoryWithGroups> {
        self.with_store(|store| {
            store
                .iter::<ProductCategory>()
                .map(|c| resolver::materialize(store, c))
                .collect()
        })
    }

    pub fn category(&self, id: &CategoryId) -> Option<CategoryWithGroups> {
        self.with_store(|store| {
            store
                .get::<ProductCategory>(id)
                .map(|c| resolver::materialize(store, c))
        })
    }

    pub fn required_attendees(&self, id: &CategoryId) -> ClientResult<Vec<EmailAddress>> {
        self.with_store(|store| {
            let category = store
                .get::<ProductCategory>(id)
                .ok_or_else(|| ClientError::not_found(EntityKind::Category, id))?;
            Ok(resolver::required_attendees(store, category))
        })
    }

    pub fn categories_requiring(&self, id: &GroupId) -> Vec<CategoryId> {
        self.with_store(|store| resolver::categories_requiring(store, id))
    }

    pub fn dangling_refs(&self, id: &CategoryId) -> ClientResult<Vec<GroupId>> {
        self.with_store(|store| {
            let category = store
                .get::<ProductCategory>(id)
                .ok_or_else(|| ClientError::not_found(EntityKind::Category, id))?;
            Ok(resolver::dangling_refs(store, category))
        })
    }

    // ---------------------------------------------------------------------
    // Load
    // ---------------------------------------------------------------------

    /// Replace the whole projection with the remote collections.
    ///
    /// On failure the projection is left as it was.
    pub async fn refresh(&self) -> ClientResult<()> {
        let fetched = tokio::try_join!(self.gateway.list_groups(), self.gateway.list_categories());

        let result = match fetched {
            Ok((groups, categories)) => {
                let (group_count, category_count) = (groups.len(), categories.len());
                self.with_store(|store| {
                    store.reset(groups);
                    store.reset(categories.iter().map(CategoryWithGroups::to_category));
                });
                tracing::info!(groups = group_count, categories = category_count, "admin data loaded");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch admin data");
                self.sink.notify(FETCH_FAILED, NotificationKind::Error);
                Err(ClientError::Remote(err))
            }
        };
        self.loading.store(false, Ordering::Release);
        result
    }

    // ---------------------------------------------------------------------
    // Groups
    // ---------------------------------------------------------------------

    pub async fn create_group(&self, new: NewGroup) -> ClientResult<AttendeeGroup> {
        new.validate()?;
        let mutation = MutationId::new();
        let placeholder = AttendeeGroup::from_new(&new, Utc::now());
        let snapshot = self.apply(mutation, Action::Create, |store| {
            MutationSnapshot::create(store, placeholder)
        });

        self.settle(mutation, Action::Create, snapshot, self.gateway.create_group(&new), |saved| {
            Some(saved.clone())
        })
        .await
    }

    pub async fn update_group(&self, id: &GroupId, patch: GroupPatch) -> ClientResult<AttendeeGroup> {
        patch.validate()?;
        let mutation = MutationId::new();
        let now = Utc::now();
        let snapshot = self
            .stage(mutation, Action::Update, |store| {
                MutationSnapshot::update(store, id, |prior: &AttendeeGroup| {
                    prior.apply_patch(&patch, now)
                })
            })
            .ok_or_else(|| ClientError::not_found(EntityKind::Group, id))?;

        self.settle(mutation, Action::Update, snapshot, self.gateway.update_group(id, &patch), |saved| {
            Some(saved.clone())
        })
        .await
    }

    /// Categories still referencing the group keep the ref; it simply stops resolving.
    pub async fn delete_group(&self, id: &GroupId) -> ClientResult<()> {
        let mutation = MutationId::new();
        let snapshot = self
            .stage(mutation, Action::Delete, |store| {
                MutationSnapshot::<AttendeeGroup>::delete(store, id)
            })
            .ok_or_else(|| ClientError::not_found(EntityKind::Group, id))?;

        self.settle(mutation, Action::Delete, snapshot, self.gateway.delete_group(id), |_| None)
            .await
    }

    // ---------------------------------------------------------------------
    // Categories
    // ---------------------------------------------------------------------

    pub async fn create_category(&self, new: NewCategory) -> ClientResult<CategoryWithGroups> {
        new.validate()?;
        let mutation = MutationId::new();
        let placeholder = ProductCategory::from_new(&new, Utc::now());
        let snapshot = self.apply(mutation, Action::Create, |store| {
            MutationSnapshot::create(store, placeholder)
        });

        self.settle(
            mutation,
            Action::Create,
            snapshot,
            self.gateway.create_category(&new),
            |saved| Some(saved.to_category()),
        )
        .await
    }

    pub async fn update_category(
        &self,
        id: &CategoryId,
        patch: CategoryPatch,
    ) -> ClientResult<CategoryWithGroups> {
        patch.validate()?;
        let mutation = MutationId::new();
        let now = Utc::now();
        let snapshot = self
            .stage(mutation, Action::Update, |store| {
                MutationSnapshot::update(store, id, |prior: &ProductCategory| {
                    prior.apply_patch(&patch, now)
                })
            })
            .ok_or_else(|| ClientError::not_found(EntityKind::Category, id))?;

        self.settle(
            mutation,
            Action::Update,
            snapshot,
            self.gateway.update_category(id, &patch),
            |saved| Some(saved.to_category()),
        )
        .await
    }

    pub async fn delete_category(&self, id: &CategoryId) -> ClientResult<()> {
        let mutation = MutationId::new();
        let snapshot = self
            .stage(mutation, Action::Delete, |store| {
                MutationSnapshot::<ProductCategory>::delete(store, id)
            })
            .ok_or_else(|| ClientError::not_found(EntityKind::Category, id))?;

        self.settle(mutation, Action::Delete, snapshot, self.gateway.delete_category(id), |_| None)
            .await
    }

    // ---------------------------------------------------------------------
    // Protocol
    // ---------------------------------------------------------------------

    /// Phases 1 and 2 for a change that always applies.
    fn apply<T: Stored>(
        &self,
        mutation: MutationId,
        action: Action,
        change: impl FnOnce(&mut EntityStore) -> MutationSnapshot<T>,
    ) -> MutationSnapshot<T> {
        let snapshot = self.with_store(change);
        log_applied(mutation, action, &snapshot);
        snapshot
    }

    /// Phases 1 and 2 for a change whose target may be missing locally. `None` means
    /// nothing was applied; callers report `NotFound` without notifying or calling out.
    fn stage<T: Stored>(
        &self,
        mutation: MutationId,
        action: Action,
        change: impl FnOnce(&mut EntityStore) -> Option<MutationSnapshot<T>>,
    ) -> Option<MutationSnapshot<T>> {
        let snapshot = self.with_store(change);
        match &snapshot {
            Some(snapshot) => log_applied(mutation, action, snapshot),
            None => {
                let kind = T::KIND;
                tracing::debug!(
                    mutation_id = %mutation,
                    kind = %kind,
                    action = action.as_str(),
                    "target missing locally; nothing applied"
                );
            }
        }
        snapshot
    }

    /// Phases 3 and 4. `commit` maps the response to the authoritative local value
    /// (`None` removes the entry).
    async fn settle<T, R>(
        &self,
        mutation: MutationId,
        action: Action,
        snapshot: MutationSnapshot<T>,
        remote: impl Future<Output = GatewayResult<R>>,
        commit: impl FnOnce(&R) -> Option<T>,
    ) -> ClientResult<R>
    where
        T: Stored,
    {
        let id = snapshot.id().clone();
        let kind = T::KIND;
        tracing::debug!(mutation_id = %mutation, kind = %kind, id = %id, phase = "remote", "calling remote store");

        match remote.await {
            Ok(response) => {
                let authoritative = commit(&response);
                self.with_store(|store| {
                    store.replace::<T>(&id, authoritative);
                });
                tracing::debug!(mutation_id = %mutation, kind = %kind, id = %id, phase = "commit", "mutation committed");
                self.sink
                    .notify(&action.success_message(kind), NotificationKind::Success);
                Ok(response)
            }
            Err(err) => {
                self.with_store(|store| snapshot.restore(store));
                tracing::warn!(
                    mutation_id = %mutation,
                    kind = %kind,
                    id = %id,
                    action = action.as_str(),
                    error = %err,
                    "remote call failed; optimistic change rolled back"
                );
                self.sink
                    .notify(&action.failure_message(kind), NotificationKind::Error);
                Err(ClientError::from_gateway(kind, &id, err))
            }
        }
    }
}

fn log_applied<T: Stored>(mutation: MutationId, action: Action, snapshot: &MutationSnapshot<T>) {
    let kind = T::KIND;
    tracing::debug!(
        mutation_id = %mutation,
        kind = %kind,
        id = %snapshot.id(),
        action = action.as_str(),
        phase = "apply",
        "optimistic change applied"
    );
}
