//! CLI command implementations.

pub mod bins;
pub mod common;
pub mod tone;
