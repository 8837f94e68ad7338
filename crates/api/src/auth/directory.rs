//! The static credential directory.

use sitedesk_core::roles::Role;

/// One entry of the credential directory.
#[derive(Debug, Clone, Copy)]
pub struct StaticUser {
    pub username: &'static str,
    pub password: &'static str,
    pub display_name: &'static str,
    pub role: Role,
}

/// The fixed user directory, one account per role.
pub const DIRECTORY: &[StaticUser] = &[
    StaticUser {
        username: "se",
        password: "se123",
        display_name: "Site Engineer",
        role: Role::SiteEngineer,
    },
    StaticUser {
        username: "pm",
        password: "pm123",
        display_name: "Project Manager",
        role: Role::ProjectManager,
    },
    StaticUser {
        username: "qs",
        password: "qs123",
        display_name: "QS / Costing",
        role: Role::Qs,
    },
    StaticUser {
        username: "proc",
        password: "proc123",
        display_name: "Procurement",
        role: Role::Procurement,
    },
    StaticUser {
        username: "ops",
        password: "ops123",
        display_name: "Ops Head",
        role: Role::OpsHead,
    },
    StaticUser {
        username: "md",
        password: "md123",
        display_name: "Managing Director",
        role: Role::Md,
    },
    StaticUser {
        username: "fin",
        password: "fin123",
        display_name: "Finance",
        role: Role::Finance,
    },
];

/// Look up a credential pair. Exact match on both fields.
pub fn authenticate(username: &str, password: &str) -> Option<&'static StaticUser> {
    DIRECTORY
        .iter()
        .find(|u| u.username == username && u.password == password)
}
