//! Foodgram recipe-sharing API.
//!
//! This crate provides the server as a library so the shopping list export
//! and recipe validation can be tested and reused outside the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
