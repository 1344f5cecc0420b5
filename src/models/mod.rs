//! Typed records used across the db and http layers.

pub mod log;
pub mod response;
