//! Row types mapping database tables onto the core domain entities.

pub mod dpr;
pub mod indent;
