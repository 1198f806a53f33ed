//! Domain models for the Krishi Sakhi advisory platform

mod alert;
mod chat;
mod profile;
mod weather;

pub use alert::*;
pub use chat::*;
pub use profile::*;
pub use weather::*;
