//! HTTP request handlers

pub mod advisory;
pub mod farmer;
pub mod health;
pub mod notification;
pub mod weather;

pub use health::{health_check, root};
