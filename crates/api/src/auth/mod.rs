//! Authentication: static credential directory and in-memory sessions.
//!
//! Login is a lookup against a fixed directory mapping a username/password
//! pair to a role. This mirrors the deployment reality of a small site
//! office — it is an identity convenience, not a security boundary. The
//! role attached to the session is what the workflow engine enforces
//! server-side on every transition.

pub mod directory;
pub mod session;
