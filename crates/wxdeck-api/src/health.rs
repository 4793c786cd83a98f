// Backend liveness probe: `GET /health/` on the server root.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::HealthStatus;

impl ApiClient {
    /// Ask the backend whether it and its database are up.
    ///
    /// Health lives outside the versioned API prefix, so the path is
    /// resolved against the host root rather than the base URL.
    pub async fn health(&self) -> Result<HealthStatus, Error> {
        let url = self.base_url().join("/health/")?;
        debug!("GET {url}");
        self.fetch(self.http().get(url)).await
    }
}
