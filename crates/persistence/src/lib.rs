//! Persistence layer for the Menuboard backend.
//!
//! This crate contains:
//! - Database connection management and embedded migrations
//! - Entity definitions (database row mappings)
//! - Owner-scoped repository implementations

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
