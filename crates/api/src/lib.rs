//! Admin API: the authoritative HTTP store for attendee groups and product categories.

pub mod app;
pub mod config;
