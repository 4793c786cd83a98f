// ── Bearer token claim decoding ──
//
// Reads the payload segment of a JWT to learn who is logged in and when
// the token expires. The signature is NOT verified: the result only
// decides what the client offers to show. The backend checks every
// request on its own and stays the sole authority.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use wxdeck_api::models::{Id, UserRole};

use crate::session::AuthUser;

/// URL-safe alphabet; accepts payloads with or without `=` padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token has no payload segment")]
    MissingPayload,

    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not a JSON claim set: {0}")]
    Json(#[from] serde_json::Error),

    #[error("subject {0:?} is not a numeric user id")]
    InvalidSubject(String),
}

/// The subset of claims the backend puts in its access tokens.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    #[serde(deserialize_with = "subject")]
    pub sub: Id,
    /// Expiry in seconds since the epoch. Absent means unusable.
    #[serde(default)]
    pub exp: Option<f64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Claims {
    /// Decode the payload of `token` without checking its signature.
    pub fn decode(token: &str) -> Result<Self, JwtError> {
        let payload = token
            .split('.')
            .nth(1)
            .filter(|p| !p.is_empty())
            .ok_or(JwtError::MissingPayload)?;
        let bytes = PAYLOAD_ENGINE.decode(payload)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// A token without `exp`, or with `exp` at or before `now`, is expired.
    #[allow(clippy::cast_precision_loss)]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let now_secs = now.timestamp_millis() as f64 / 1000.0;
        match self.exp {
            Some(exp) if exp > 0.0 => exp <= now_secs,
            _ => true,
        }
    }

    /// Role claim, falling back to the least-privileged role when absent
    /// or unknown.
    pub fn role(&self) -> UserRole {
        self.role
            .as_deref()
            .and_then(|r| r.parse().ok())
            .unwrap_or_default()
    }

    pub fn to_user(&self) -> AuthUser {
        AuthUser {
            id: self.sub,
            email: self.email.clone().unwrap_or_default(),
            full_name: self.full_name.clone(),
            role: self.role(),
        }
    }
}

/// `sub` is a string per RFC 7519, but some issuers emit a bare number.
fn subject<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Id, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Sub {
        Num(Id),
        Str(String),
    }

    match Sub::deserialize(d)? {
        Sub::Num(id) => Ok(id),
        Sub::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(JwtError::InvalidSubject(s))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    /// Build an unsigned token around `claims`.
    pub(crate) fn token_with(claims: &serde_json::Value) -> String {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = engine.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = engine.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    pub(crate) fn valid_token(role: &str) -> String {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        token_with(&json!({
            "sub": "7",
            "exp": exp,
            "email": "ops@example.com",
            "full_name": "Ops",
            "role": role,
        }))
    }

    pub(crate) fn expired_token() -> String {
        let exp = (Utc::now() - Duration::minutes(5)).timestamp();
        token_with(&json!({ "sub": "7", "exp": exp, "role": "admin" }))
    }

    #[test]
    fn decodes_claims() {
        let claims = Claims::decode(&valid_token("admin")).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role(), UserRole::Admin);
        assert!(!claims.is_expired_at(Utc::now()));

        let user = claims.to_user();
        assert_eq!(user.email, "ops@example.com");
        assert_eq!(user.full_name.as_deref(), Some("Ops"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let token = token_with(&json!({ "sub": 3, "exp": 4_102_444_800_i64 }));
        let user = Claims::decode(&token).unwrap().to_user();
        assert_eq!(user.id, 3);
        assert_eq!(user.email, "");
        assert_eq!(user.full_name, None);
        assert_eq!(user.role, UserRole::User);
    }

    #[test]
    fn unknown_role_is_least_privileged() {
        let token = token_with(&json!({ "sub": "1", "exp": 4_102_444_800_i64, "role": "root" }));
        assert_eq!(Claims::decode(&token).unwrap().role(), UserRole::User);
    }

    #[test]
    fn expiry_is_checked_against_now() {
        let claims = Claims::decode(&expired_token()).unwrap();
        assert!(claims.is_expired_at(Utc::now()));
    }

    #[test]
    fn missing_exp_counts_as_expired() {
        let token = token_with(&json!({ "sub": "1" }));
        assert!(Claims::decode(&token).unwrap().is_expired_at(Utc::now()));
    }

    #[test]
    fn padded_payload_decodes() {
        let engine = base64::engine::general_purpose::URL_SAFE;
        let payload = engine.encode(json!({ "sub": "1", "exp": 1 }).to_string());
        assert!(Claims::decode(&format!("h.{payload}.s")).is_ok());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            Claims::decode("not-a-jwt"),
            Err(JwtError::MissingPayload)
        ));
        assert!(matches!(
            Claims::decode("a.!!!.c"),
            Err(JwtError::Base64(_))
        ));
        let not_json = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode("hello");
        assert!(matches!(
            Claims::decode(&format!("a.{not_json}.c")),
            Err(JwtError::Json(_))
        ));
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let token = token_with(&json!({ "sub": "alice", "exp": 4_102_444_800_i64 }));
        assert!(Claims::decode(&token).is_err());
    }
}
