//! Foodgram Core - Shared domain types.
//!
//! This crate provides the types used across all Foodgram components:
//! - `server` - The recipe-sharing HTTP API
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. Database encoding is opt-in through the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, validated strings (email, color, slug) and
//!   shopping list lines

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
