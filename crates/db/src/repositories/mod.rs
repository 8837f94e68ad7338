//! Postgres-backed store implementations.

pub mod dpr_repo;
pub mod indent_repo;

pub use dpr_repo::PgDprStore;
pub use indent_repo::PgIndentStore;
