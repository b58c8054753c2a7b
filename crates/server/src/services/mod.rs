//! Business logic services.
//!
//! # Services
//!
//! - `recipes` - Recipe request validation
//! - `shopping_list` - Cart aggregation and PDF export

pub mod recipes;
pub mod shopping_list;
