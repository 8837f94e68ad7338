//! Sitedesk domain layer.
//!
//! Pure logic for the material indent approval workflow: the request model,
//! the role-gated status transition table, payload validation, and the
//! progress tracker. Nothing in this crate touches a database or the HTTP
//! layer; the stores and handlers consume it through the [`store`] traits.

pub mod archive;
pub mod dpr;
pub mod error;
pub mod indent;
pub mod roles;
pub mod store;
pub mod tracker;
pub mod types;
pub mod workflow;

pub use error::CoreError;
