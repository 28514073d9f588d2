//! Configuration validation module
//!
//! This module provides the `Validate` trait and its implementations for the
//! configuration structures.

mod cleanup_validators;
mod trait_def;


pub use trait_def::Validate;
