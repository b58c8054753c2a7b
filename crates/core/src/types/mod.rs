//! Core types for Foodgram.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart_line;
pub mod color;
pub mod email;
pub mod id;
pub mod slug;

pub use cart_line::{CartLine, IngredientLine};
pub use color::{ColorError, HexColor};
pub use email::{Email, EmailError};
pub use id::*;
pub use slug::{Slug, SlugError};
