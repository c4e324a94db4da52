//! CLI library for testing purposes

pub mod session;
pub mod validation;
