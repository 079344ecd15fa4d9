//! `huddle-client`
//!
//! **Responsibility:** the admin client's local projection of the attendee directory.
//!
//! This crate provides:
//! - An ordered in-memory entity store and the category/group relation resolver
//! - The remote gateway boundary (HTTP and in-memory implementations)
//! - The optimistic mutation coordinator, the only writer of the local store
//!
//! The remote admin API remains the authority; the local store is a speculative view of it.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod resolver;
pub mod snapshot;
pub mod store;

pub use config::ClientConfig;
pub use coordinator::{Coordinator, MutationId};
pub use error::{ClientError, ClientResult};
pub use gateway::{GatewayError, GatewayResult, HttpGateway, InMemoryGateway, RemoteGateway};
pub use notify::{MemorySink, Notification, NotificationKind, NotificationSink, TracingSink};
pub use snapshot::MutationSnapshot;
pub use store::{Collection, EntityStore, Stored};
