//! Shared utilities and common types for the Menuboard backend.
//!
//! This crate provides functionality used across all other crates:
//! - Verification of auth-provider session tokens
//! - Common validation logic
//! - Partial-update payload helpers

pub mod jwt;
pub mod patch;
pub mod validation;
