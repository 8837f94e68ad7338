//! Shared primitive type aliases.

use chrono::{DateTime, Utc};

/// Opaque unique identifier for an indent or DPR record.
pub type RecordId = uuid::Uuid;

/// UTC timestamp type used across all entities.
pub type Timestamp = DateTime<Utc>;
