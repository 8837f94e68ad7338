//! Actor roles in the indent approval chain.
//!
//! Role names must match the static credential directory seeded in the API
//! crate's auth module.

use serde::{Deserialize, Serialize};

/// An actor role. Each workflow action is gated to exactly one role; the
/// gate is enforced server-side before the compare-and-swap write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SiteEngineer,
    ProjectManager,
    Qs,
    Procurement,
    OpsHead,
    Md,
    Finance,
}

impl Role {
    /// Stable string form, used in logs and the credential directory.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SiteEngineer => "site_engineer",
            Role::ProjectManager => "project_manager",
            Role::Qs => "qs",
            Role::Procurement => "procurement",
            Role::OpsHead => "ops_head",
            Role::Md => "md",
            Role::Finance => "finance",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "site_engineer" => Some(Role::SiteEngineer),
            "project_manager" => Some(Role::ProjectManager),
            "qs" => Some(Role::Qs),
            "procurement" => Some(Role::Procurement),
            "ops_head" => Some(Role::OpsHead),
            "md" => Some(Role::Md),
            "finance" => Some(Role::Finance),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
