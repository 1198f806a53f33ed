//! Business logic services

pub mod advisory;
pub mod auth;
pub mod farmer;
pub mod notification;
pub mod store;
pub mod weather;

pub use advisory::{AdviceResponse, AdviceSource, AdvisoryService};
pub use auth::{Claims, SessionService, SessionToken};
pub use farmer::{FarmerService, SessionResponse};
pub use notification::{DeliveryOutcome, NotificationService, WeatherAlertOutcome};
pub use store::{FarmerStore, InMemoryFarmerStore, PgFarmerStore};
pub use weather::{WeatherReading, WeatherReport, WeatherService};
