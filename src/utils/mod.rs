//! Utility functions and helpers.

pub mod fields;
pub mod http;
