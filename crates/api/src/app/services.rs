use std::sync::Arc;

use huddle_infra::{seed, DirectoryRepository, InMemoryDirectory, RepositoryResult};

/// Shared state handed to every handler through an `Extension`.
#[derive(Clone)]
pub struct AppServices {
    pub directory: Arc<dyn DirectoryRepository>,
}

impl AppServices {
    pub fn new(directory: Arc<dyn DirectoryRepository>) -> Self {
        Self { directory }
    }
}

/// Build the in-memory directory the service runs on, seeded on request.
pub fn build_directory(seed_defaults: bool) -> RepositoryResult<Arc<dyn DirectoryRepository>> {
    let directory = InMemoryDirectory::new();
    if seed_defaults {
        seed::seed(&directory)?;
    }
    Ok(Arc::new(directory))
}
