//! Shared types and models for the Krishi Sakhi farmer advisory platform
//!
//! This crate contains the advisory engine and the types shared between the
//! backend, the browser (via WASM), and other components of the system.

pub mod advisory;
pub mod models;
pub mod types;
pub mod validation;

pub use advisory::*;
pub use models::*;
pub use types::*;
pub use validation::*;
