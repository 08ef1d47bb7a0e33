//! API endpoint implementations.

mod auth;
mod health;
mod journals;

pub use auth::AuthApi;
pub use health::HealthApi;
pub use journals::{JournalsApi, ListJournalsQuery};
