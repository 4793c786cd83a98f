// wxdeck-api: Async Rust client for the weather-station fleet REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod api_keys;
mod devices;
mod health;
mod settings;
mod users;
mod weather;

pub use auth::AuthHook;
pub use client::ApiClient;
pub use error::{Error, UNEXPECTED_ERROR};
pub use transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};
pub use weather::{DEFAULT_SUMMARY_HOURS, MAX_SUMMARY_HOURS};
