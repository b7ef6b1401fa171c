//! HTTP handlers for the advisory service.

pub mod advisory;
pub mod health;
