// ── Reactive state containers ──
//
// One container per resource. Each keeps its data, loading flag and last
// error in a single `watch` channel and mirrors the service operations.

mod api_keys;
mod auth;
mod collection;
mod device_detail;
mod devices;
mod settings;
pub(crate) mod tracked;
mod users;
mod weather;

pub use api_keys::{ApiKeysState, ApiKeysStore};
pub use auth::{AuthState, AuthStore};
pub use collection::Collection;
pub use device_detail::{DeviceDetailState, DeviceDetailStore};
pub use devices::{DevicesState, DevicesStore};
pub use settings::{SettingsState, SettingsStore};
pub use tracked::Status;
pub use users::{UsersState, UsersStore};
pub use weather::{WeatherState, WeatherStore};
