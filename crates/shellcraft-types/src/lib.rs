//! Foundation types for shellcraft.
//!
//! This crate contains the types shared by the shellcraft crates: argument
//! kinds and coerced values, the shell configuration, and the error type.

pub mod config;
pub mod error;
pub mod value;
