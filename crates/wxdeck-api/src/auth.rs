// Authentication plumbing
//
// Bearer-token attachment and 401 reaction are delegated to an `AuthHook`
// supplied by the owner of the session, so this crate never holds
// session state itself. Login posts an OAuth2 password form.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::TokenResponse;

/// Seam between the HTTP client and whoever owns the session.
///
/// The client asks for a token before every request and reports every
/// HTTP 401 it sees. Implementations must be cheap and non-blocking:
/// both methods run on the request path.
pub trait AuthHook: Send + Sync {
    /// The bearer token to attach, if a session is active.
    fn bearer_token(&self) -> Option<SecretString>;

    /// Called once per response that came back with HTTP 401.
    fn on_unauthorized(&self);
}

impl ApiClient {
    /// Exchange email + password for an access token.
    ///
    /// The backend follows the OAuth2 password flow, so the email travels
    /// in the `username` form field.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<TokenResponse, Error> {
        let url = self.url(&["auth", "login"])?;
        debug!("logging in at {url}");

        let form = [
            ("username", email),
            ("password", password.expose_secret()),
        ];
        let builder = self.http().post(url).form(&form);
        let token: TokenResponse = self.fetch(builder).await?;

        info!(token_type = %token.token_type, "login successful");
        Ok(token)
    }
}
