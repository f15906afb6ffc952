//! In-crate test support and property tests.

pub mod common;
mod property;
