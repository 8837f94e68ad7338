pub mod archive;
pub mod auth;
pub mod costs;
pub mod dpr;
pub mod indent;
pub mod uploads;
