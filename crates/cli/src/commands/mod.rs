//! CLI command implementations

pub mod predict;
