//! Request/response bodies shared by the admin API and its clients.
//!
//! Create requests reuse [`NewGroup`](crate::NewGroup) / [`NewCategory`](crate::NewCategory)
//! directly. Updates and deletes carry the identifier in the body.

use serde::{Deserialize, Serialize};

use crate::category::CategoryPatch;
use crate::group::GroupPatch;

/// `PUT` body: `{ "id": ..., ...partial }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest<I, P> {
    pub id: I,
    #[serde(flatten)]
    pub patch: P,
}

pub type UpdateGroupRequest = UpdateRequest<huddle_core::GroupId, GroupPatch>;
pub type UpdateCategoryRequest = UpdateRequest<huddle_core::CategoryId, CategoryPatch>;

/// `DELETE` body: `{ "id": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest<I> {
    pub id: I,
}

/// `DELETE` response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Error body returned for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}
