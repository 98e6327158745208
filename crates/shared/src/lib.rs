//! Shared types and configuration for Furlough.
//!
//! This crate provides common types used across all other crates:
//! - `DayCount` for entitlement arithmetic with decimal precision
//! - Typed IDs for type-safe entity references
//! - Pagination types for list surfaces
//! - Policy configuration loading

pub mod config;
pub mod types;

pub use config::PolicyConfig;
