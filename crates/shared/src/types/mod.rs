//! Common types used across the application.

pub mod days;
pub mod id;
pub mod pagination;

pub use days::DayCount;
pub use id::*;
pub use pagination::{PageRequest, PageResponse};
