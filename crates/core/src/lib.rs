//! Minimart Core - Shared types library.
//!
//! This crate provides common types used across all Minimart components:
//! - `server` - HTTP API (catalog, cart, checkout, orders, admin)
//! - `cli` - Command-line tools for migrations, seeding, and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, usernames, and
//!   order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
