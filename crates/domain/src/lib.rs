//! Domain layer for the Menuboard backend.
//!
//! This crate contains:
//! - Domain models (Restaurant, Menu, Category, Item, QrCode, analytics)
//! - QR planning and rendering, PDF sheets, scan aggregation

pub mod models;
pub mod services;
