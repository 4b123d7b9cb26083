//! API Routes
//!
//! Route handlers organized by functionality.

pub mod components;
pub mod health;
pub mod page;
