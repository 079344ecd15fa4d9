//! Gateway backed directly by a [`DirectoryRepository`], for tests and local demos.
//!
//! Calls can be scripted: [`InMemoryGateway::inject_failure`] makes the next call fail
//! without reaching the repository, and [`InMemoryGateway::gate_next`] holds the next
//! call's response (after the repository has processed it) until the returned sender
//! fires or is dropped.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;

use huddle_core::{CategoryId, GroupId};
use huddle_directory::{
    AttendeeGroup, CategoryPatch, CategoryWithGroups, GroupPatch, NewCategory, NewGroup,
};
use huddle_infra::{DirectoryRepository, RepositoryError, RepositoryResult};

use super::{GatewayError, GatewayResult, RemoteGateway};

impl From<RepositoryError> for GatewayError {
    fn from(err: RepositoryError) -> Self {
        let message = err.to_string();
        match err {
            RepositoryError::NotFound { .. } => GatewayError::NotFound(message),
            RepositoryError::Conflict { .. } => GatewayError::Conflict(message),
            RepositoryError::UnknownGroup(_) => GatewayError::Api { status: 422, message },
            RepositoryError::Validation(_) => GatewayError::Api { status: 400, message },
            RepositoryError::Poisoned => GatewayError::Api { status: 500, message },
        }
    }
}

pub struct InMemoryGateway {
    directory: Arc<dyn DirectoryRepository>,
    failures: Mutex<VecDeque<GatewayError>>,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    calls: AtomicUsize,
}

impl InMemoryGateway {
    pub fn new(directory: Arc<dyn DirectoryRepository>) -> Self {
        Self {
            directory,
            failures: Mutex::new(VecDeque::new()),
            gates: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// The repository this gateway writes through to.
    pub fn directory(&self) -> &Arc<dyn DirectoryRepository> {
        &self.directory
    }

    /// Queue a failure; each queued error is consumed by exactly one call.
    pub fn inject_failure(&self, err: GatewayError) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(err);
    }

    /// Hold the response of the next call until the returned sender fires.
    pub fn gate_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(rx);
        tx
    }

    /// Number of calls received so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn call<R, F>(&self, op: F) -> GatewayResult<R>
    where
        R: Send,
        F: FnOnce(&dyn DirectoryRepository) -> RepositoryResult<R> + Send,
    {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let failure = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(err) = failure {
            return Err(err);
        }

        let gate = self
            .gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        let result = op(self.directory.as_ref()).map_err(GatewayError::from);

        if let Some(gate) = gate {
            // A dropped sender releases the call too.
            let _ = gate.await;
        }
        result
    }
}

#[async_trait]
impl RemoteGateway for InMemoryGateway {
    async fn list_groups(&self) -> GatewayResult<Vec<AttendeeGroup>> {
        self.call(|dir| dir.list_groups()).await
    }

    async fn create_group(&self, new: &NewGroup) -> GatewayResult<AttendeeGroup> {
        self.call(|dir| dir.create_group(new.clone())).await
    }

    async fn update_group(&self, id: &GroupId, patch: &GroupPatch) -> GatewayResult<AttendeeGroup> {
        self.call(|dir| dir.update_group(id, patch.clone())).await
    }

    async fn delete_group(&self, id: &GroupId) -> GatewayResult<()> {
        self.call(|dir| dir.delete_group(id)).await
    }

    async fn list_categories(&self) -> GatewayResult<Vec<CategoryWithGroups>> {
        self.call(|dir| dir.list_categories()).await
    }

    async fn create_category(&self, new: &NewCategory) -> GatewayResult<CategoryWithGroups> {
        self.call(|dir| dir.create_category(new.clone())).await
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        patch: &CategoryPatch,
    ) -> GatewayResult<CategoryWithGroups> {
        self.call(|dir| dir.update_category(id, patch.clone())).await
    }

    async fn delete_category(&self, id: &CategoryId) -> GatewayResult<()> {
        self.call(|dir| dir.delete_category(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_infra::seed;

    fn gateway() -> InMemoryGateway {
        InMemoryGateway::new(Arc::new(seed::seeded().unwrap()))
    }

    #[tokio::test]
    async fn injected_failure_is_consumed_once() {
        let gw = gateway();
        gw.inject_failure(GatewayError::Network("connection reset".into()));

        assert!(matches!(gw.list_groups().await, Err(GatewayError::Network(_))));
        assert_eq!(gw.list_groups().await.unwrap().len(), 3);
        assert_eq!(gw.calls(), 2);
    }

    #[tokio::test]
    async fn repository_errors_map_to_statuses() {
        let gw = gateway();
        let err = gw.delete_group(&GroupId::new("ghost").unwrap()).await.unwrap_err();
        assert_eq!(err.status(), Some(404));

        let new = NewCategory::new(
            CategoryId::new("design-review").unwrap(),
            "Design Review",
            [GroupId::new("design-team").unwrap()],
        )
        .unwrap();
        let err = gw.create_category(&new).await.unwrap_err();
        assert_eq!(err.status(), Some(422));
    }

    #[tokio::test]
    async fn gated_call_applies_before_release() {
        let gw = Arc::new(gateway());
        let release = gw.gate_next();

        let pending = {
            let gw = gw.clone();
            tokio::spawn(async move { gw.delete_group(&GroupId::new("qa-team").unwrap()).await })
        };

        // The repository sees the delete while the caller is still waiting.
        for _ in 0..50 {
            if gw.directory().list_groups().unwrap().len() == 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(gw.directory().list_groups().unwrap().len(), 2);
        assert!(!pending.is_finished());

        release.send(()).unwrap();
        pending.await.unwrap().unwrap();
    }
}
