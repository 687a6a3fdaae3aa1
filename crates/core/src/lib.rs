//! Hunar Bazaar Core - Shared types library.
//!
//! This crate provides common types used across all Hunar Bazaar components:
//! - `checkout` - Cart and checkout pipeline library
//! - `cli` - Command-line tool driving the pipeline
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and money amounts
#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
