// Wire types for the fleet REST API.
//
// Field names follow the backend's snake_case JSON. Create/update payloads
// skip `None` fields so partial updates only touch what the caller set.

use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Numeric primary key used by every backend entity except settings.
pub type Id = i64;

// ── Pagination ───────────────────────────────────────────────────────

/// `skip` / `limit` pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

impl Page {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    pub(crate) fn params(self) -> Vec<(&'static str, String)> {
        vec![("skip", self.skip.to_string()), ("limit", self.limit.to_string())]
    }
}

// ── Auth ─────────────────────────────────────────────────────────────

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(deserialize_with = "secret_from_str")]
    pub access_token: SecretString,
    pub token_type: String,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum DeviceType {
    #[serde(rename = "ESP32")]
    #[strum(serialize = "ESP32")]
    Esp32,
    #[serde(rename = "ESP8266")]
    #[strum(serialize = "ESP8266")]
    Esp8266,
    #[serde(rename = "ESP32-S3")]
    #[strum(serialize = "ESP32-S3")]
    Esp32S3,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceFunction {
    Sensor,
    Display,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceStatus {
    Online,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: Id,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub location: String,
    #[serde(default)]
    pub function: Option<DeviceFunction>,
    pub status: DeviceStatus,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceCreate {
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<DeviceFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceUpdate {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<DeviceFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceList {
    pub devices: Vec<Device>,
    pub total: u64,
}

// ── API keys ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: Id,
    pub name: String,
    pub device_id: Id,
    pub is_active: bool,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// An API key as returned by creation: the only time the secret is sent.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeyWithSecret {
    #[serde(flatten)]
    pub key: ApiKey,
    #[serde(rename = "key", deserialize_with = "secret_from_str")]
    pub secret: SecretString,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiKeyCreate {
    pub name: String,
    pub device_id: Id,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyList {
    pub api_keys: Vec<ApiKey>,
    pub total: u64,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserRole {
    Admin,
    /// Least-privileged role; assumed when a token carries no role claim.
    #[default]
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub is_active: bool,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserCreate {
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_optional_secret"
    )]
    pub password: Option<SecretString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserList {
    pub users: Vec<User>,
    pub total: u64,
}

fn secret_from_str<'de, D: serde::Deserializer<'de>>(d: D) -> Result<SecretString, D::Error> {
    String::deserialize(d).map(SecretString::from)
}

fn expose_secret<S: serde::Serializer>(secret: &SecretString, s: S) -> Result<S::Ok, S::Error> {
    use secrecy::ExposeSecret;
    s.serialize_str(secret.expose_secret())
}

#[allow(clippy::ref_option)]
fn expose_optional_secret<S: serde::Serializer>(
    secret: &Option<SecretString>,
    s: S,
) -> Result<S::Ok, S::Error> {
    use secrecy::ExposeSecret;
    match secret {
        Some(v) => s.serialize_str(v.expose_secret()),
        None => s.serialize_none(),
    }
}

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingUpdate {
    pub value: String,
}

// ── Weather readings ─────────────────────────────────────────────────

/// Largest series the backend will aggregate into.
pub const MAX_SERIES_POINTS: i64 = 2000;

/// Time-bucket width for aggregated readings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Granularity {
    Minute,
    FiveMin,
    FifteenMin,
    Hour,
    SixHour,
    Day,
}

impl Granularity {
    const ALL: [Self; 6] = [
        Self::Minute,
        Self::FiveMin,
        Self::FifteenMin,
        Self::Hour,
        Self::SixHour,
        Self::Day,
    ];

    /// Width of one bucket in seconds.
    pub fn bucket_secs(self) -> i64 {
        match self {
            Self::Minute => 60,
            Self::FiveMin => 5 * 60,
            Self::FifteenMin => 15 * 60,
            Self::Hour => 60 * 60,
            Self::SixHour => 6 * 60 * 60,
            Self::Day => 24 * 60 * 60,
        }
    }

    /// Number of buckets needed to cover `range` (rounded up).
    pub fn points_for(self, range: Duration) -> i64 {
        let secs = range.num_seconds().max(0);
        let bucket = self.bucket_secs();
        (secs + bucket - 1) / bucket
    }

    /// The granularity the backend picks when `auto_granularity` is set.
    ///
    /// A width is chosen from the range length, then widened until the
    /// series fits in [`MAX_SERIES_POINTS`].
    pub fn auto(range: Duration) -> Self {
        let secs = range.num_seconds();
        if secs <= 0 {
            return Self::Minute;
        }
        let base = match secs {
            s if s <= 6 * 3600 => Self::Minute,
            s if s <= 2 * 86_400 => Self::FiveMin,
            s if s <= 7 * 86_400 => Self::FifteenMin,
            s if s <= 31 * 86_400 => Self::Hour,
            s if s <= 180 * 86_400 => Self::SixHour,
            _ => Self::Day,
        };
        let min_bucket = (secs + MAX_SERIES_POINTS - 1) / MAX_SERIES_POINTS;
        let required = base.bucket_secs().max(min_bucket);
        Self::ALL
            .into_iter()
            .find(|g| g.bucket_secs() >= required)
            .unwrap_or(Self::Day)
    }
}

/// Query for reading lists and sensor history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingQuery {
    pub skip: u32,
    pub limit: u32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub granularity: Option<Granularity>,
    pub auto_granularity: bool,
}

impl Default for ReadingQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
            start_time: None,
            end_time: None,
            granularity: None,
            auto_granularity: false,
        }
    }
}

impl ReadingQuery {
    /// Defaults for sensor history: a larger page and automatic bucketing.
    pub fn history() -> Self {
        Self {
            limit: 1000,
            auto_granularity: true,
            ..Self::default()
        }
    }

    /// Whether this query asks the backend to aggregate.
    pub fn wants_aggregation(&self) -> bool {
        self.granularity.is_some() || self.auto_granularity
    }

    /// Reject queries the backend would answer with 422.
    ///
    /// `require_range` is set for the fleet-wide endpoint, which has no
    /// default window when aggregating.
    pub fn validate(&self, require_range: bool) -> Result<(), String> {
        if self.limit == 0 || self.limit > 5000 {
            return Err("limit must be between 1 and 5000".into());
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start >= end {
                return Err("start_time must be earlier than end_time".into());
            }
            if let Some(g) = self.granularity {
                let points = g.points_for(end - start);
                if points > MAX_SERIES_POINTS {
                    return Err(format!(
                        "granularity {g} would return ~{points} points (> {MAX_SERIES_POINTS}); \
                         widen the granularity or shorten the range"
                    ));
                }
            }
        } else if require_range && self.wants_aggregation() {
            return Err("start_time and end_time are required when aggregating".into());
        }
        Ok(())
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("skip", self.skip.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(start) = self.start_time {
            params.push(("start_time", start.to_rfc3339()));
        }
        if let Some(end) = self.end_time {
            params.push(("end_time", end.to_rfc3339()));
        }
        if let Some(g) = self.granularity {
            params.push(("granularity", g.to_string()));
        }
        params.push(("auto_granularity", self.auto_granularity.to_string()));
        params
    }
}

/// A point in time carrying optional sensor metrics.
///
/// Implemented by both raw readings and aggregated buckets so display code
/// can treat a series uniformly.
pub trait ReadingPoint {
    fn device_id(&self) -> Option<Id>;
    fn recorded_at(&self) -> DateTime<Utc>;
    fn temperature(&self) -> Option<f64>;
    fn humidity(&self) -> Option<f64>;
    fn pressure(&self) -> Option<f64>;
    fn wind_speed(&self) -> Option<f64>;
    fn rain_amount(&self) -> Option<f64>;
    /// How many raw readings this point stands for.
    fn reading_count(&self) -> u64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub id: Id,
    pub device_id: Id,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub rain_amount: Option<f64>,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// One time bucket of an aggregated series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReadingAggregate {
    #[serde(default)]
    pub device_id: Option<Id>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub rain_amount: Option<f64>,
    pub recorded_at: DateTime<Utc>,
    pub reading_count: u64,
}

macro_rules! metric_accessors {
    () => {
        fn recorded_at(&self) -> DateTime<Utc> {
            self.recorded_at
        }
        fn temperature(&self) -> Option<f64> {
            self.temperature
        }
        fn humidity(&self) -> Option<f64> {
            self.humidity
        }
        fn pressure(&self) -> Option<f64> {
            self.pressure
        }
        fn wind_speed(&self) -> Option<f64> {
            self.wind_speed
        }
        fn rain_amount(&self) -> Option<f64> {
            self.rain_amount
        }
    };
}

impl ReadingPoint for WeatherReading {
    metric_accessors!();

    fn device_id(&self) -> Option<Id> {
        Some(self.device_id)
    }
    fn reading_count(&self) -> u64 {
        1
    }
}

impl ReadingPoint for WeatherReadingAggregate {
    metric_accessors!();

    fn device_id(&self) -> Option<Id> {
        self.device_id
    }
    fn reading_count(&self) -> u64 {
        self.reading_count
    }
}

/// Readings as returned by the list and history endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingSeries {
    Raw(Vec<WeatherReading>),
    Aggregated {
        granularity: Option<Granularity>,
        points: Vec<WeatherReadingAggregate>,
    },
}

impl ReadingSeries {
    pub fn len(&self) -> usize {
        match self {
            Self::Raw(r) => r.len(),
            Self::Aggregated { points, .. } => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_aggregated(&self) -> bool {
        matches!(self, Self::Aggregated { .. })
    }

    /// Uniform view over either variant.
    pub fn points(&self) -> Vec<&dyn ReadingPoint> {
        match self {
            Self::Raw(r) => r.iter().map(|p| p as &dyn ReadingPoint).collect(),
            Self::Aggregated { points, .. } => {
                points.iter().map(|p| p as &dyn ReadingPoint).collect()
            }
        }
    }
}

/// A page of readings. Whether the points are raw or bucketed is decided
/// by the response's `aggregated` flag, never by which fields are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReadingList")]
pub struct ReadingPage {
    pub total: u64,
    pub series: ReadingSeries,
}

#[derive(Deserialize)]
struct RawReadingList {
    readings: Vec<serde_json::Value>,
    total: u64,
    #[serde(default)]
    aggregated: bool,
    #[serde(default)]
    granularity: Option<Granularity>,
}

impl TryFrom<RawReadingList> for ReadingPage {
    type Error = serde_json::Error;

    fn try_from(raw: RawReadingList) -> Result<Self, Self::Error> {
        let series = if raw.aggregated {
            ReadingSeries::Aggregated {
                granularity: raw.granularity,
                points: raw
                    .readings
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<_, _>>()?,
            }
        } else {
            ReadingSeries::Raw(
                raw.readings
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<_, _>>()?,
            )
        };
        Ok(Self {
            total: raw.total,
            series,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReadingWithLocation {
    #[serde(flatten)]
    pub reading: WeatherReading,
    pub device_location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestReadings {
    pub readings: Vec<WeatherReadingWithLocation>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub device_id: Id,
    pub device_location: String,
    #[serde(default)]
    pub avg_temperature: Option<f64>,
    #[serde(default)]
    pub min_temperature: Option<f64>,
    #[serde(default)]
    pub max_temperature: Option<f64>,
    #[serde(default)]
    pub avg_humidity: Option<f64>,
    #[serde(default)]
    pub avg_pressure: Option<f64>,
    pub reading_count: u64,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

// ── Health ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn device_wire_names() {
        let dev: Device = serde_json::from_value(json!({
            "id": 4,
            "type": "ESP32-S3",
            "location": "Garden",
            "function": "sensor",
            "status": "online",
            "last_seen": "2025-03-01T12:00:00Z",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-02-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(dev.device_type, DeviceType::Esp32S3);
        assert_eq!(dev.function, Some(DeviceFunction::Sensor));
        assert_eq!(dev.status, DeviceStatus::Online);
    }

    #[test]
    fn device_update_skips_unset_fields() {
        let upd = DeviceUpdate {
            location: Some("Attic".into()),
            ..DeviceUpdate::default()
        };
        assert_eq!(serde_json::to_value(&upd).unwrap(), json!({"location": "Attic"}));
    }

    #[test]
    fn user_create_sends_password() {
        let create = UserCreate {
            email: "ops@example.com".into(),
            password: SecretString::from("hunter22"),
            full_name: None,
            role: Some(UserRole::Admin),
        };
        assert_eq!(
            serde_json::to_value(&create).unwrap(),
            json!({"email": "ops@example.com", "password": "hunter22", "role": "admin"})
        );
    }

    #[test]
    fn api_key_secret_comes_from_key_field() {
        use secrecy::ExposeSecret;
        let created: ApiKeyWithSecret = serde_json::from_value(json!({
            "id": 9,
            "name": "garden",
            "device_id": 4,
            "is_active": true,
            "last_used": null,
            "created_at": "2025-01-01T00:00:00Z",
            "key": "wx_live_abc"
        }))
        .unwrap();
        assert_eq!(created.key.id, 9);
        assert_eq!(created.secret.expose_secret(), "wx_live_abc");
    }

    #[test]
    fn reading_page_without_flag_is_raw() {
        let page: ReadingPage = serde_json::from_value(json!({
            "readings": [{
                "id": 1, "device_id": 4, "temperature": 21.5,
                "recorded_at": "2025-03-01T12:00:00Z",
                "created_at": "2025-03-01T12:00:01Z"
            }],
            "total": 57
        }))
        .unwrap();
        assert_eq!(page.total, 57);
        assert!(!page.series.is_aggregated());
        assert_eq!(page.series.points()[0].temperature(), Some(21.5));
        assert_eq!(page.series.points()[0].reading_count(), 1);
    }

    #[test]
    fn reading_page_with_flag_is_aggregated() {
        let page: ReadingPage = serde_json::from_value(json!({
            "readings": [{
                "device_id": 4, "temperature": 20.0, "humidity": 40.0,
                "recorded_at": "2025-03-01T12:00:00Z", "reading_count": 12
            }],
            "total": 1,
            "aggregated": true,
            "granularity": "five_min"
        }))
        .unwrap();
        match &page.series {
            ReadingSeries::Aggregated { granularity, points } => {
                assert_eq!(*granularity, Some(Granularity::FiveMin));
                assert_eq!(points[0].reading_count, 12);
            }
            ReadingSeries::Raw(_) => panic!("expected aggregated series"),
        }
    }

    #[test]
    fn aggregated_flag_wins_over_field_shape() {
        // Aggregated points lack `id`, so a raw decode must fail loudly
        // instead of silently guessing.
        let res: Result<ReadingPage, _> = serde_json::from_value(json!({
            "readings": [{"recorded_at": "2025-03-01T12:00:00Z", "reading_count": 3}],
            "total": 1
        }));
        assert!(res.is_err());
    }

    #[test]
    fn auto_granularity_follows_range() {
        assert_eq!(Granularity::auto(Duration::hours(6)), Granularity::Minute);
        assert_eq!(Granularity::auto(Duration::hours(24)), Granularity::FiveMin);
        assert_eq!(Granularity::auto(Duration::days(7)), Granularity::FifteenMin);
        assert_eq!(Granularity::auto(Duration::days(30)), Granularity::Hour);
        assert_eq!(Granularity::auto(Duration::days(365)), Granularity::Day);
        assert_eq!(Granularity::auto(Duration::zero()), Granularity::Minute);
    }

    #[test]
    fn auto_granularity_widens_to_fit_point_cap() {
        // 5 hours of minutes is 300 points; 6h boundary stays at minute.
        assert_eq!(Granularity::auto(Duration::hours(5)), Granularity::Minute);
        // 150 days at six-hour buckets is 600 points: within the cap.
        assert_eq!(Granularity::auto(Duration::days(150)), Granularity::SixHour);
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let now = Utc::now();
        let q = ReadingQuery {
            start_time: Some(now),
            end_time: Some(now - Duration::hours(1)),
            ..ReadingQuery::default()
        };
        assert!(q.validate(false).is_err());
    }

    #[test]
    fn validate_rejects_oversized_series() {
        let end = Utc::now();
        let q = ReadingQuery {
            start_time: Some(end - Duration::days(30)),
            end_time: Some(end),
            granularity: Some(Granularity::Minute),
            ..ReadingQuery::default()
        };
        let err = q.validate(false).unwrap_err();
        assert!(err.contains("points"), "{err}");
    }

    #[test]
    fn validate_requires_range_for_fleet_aggregation() {
        let q = ReadingQuery {
            auto_granularity: true,
            ..ReadingQuery::default()
        };
        assert!(q.validate(true).is_err());
        assert!(q.validate(false).is_ok());
    }

    #[test]
    fn history_defaults() {
        let q = ReadingQuery::history();
        assert_eq!(q.skip, 0);
        assert_eq!(q.limit, 1000);
        assert!(q.auto_granularity);
        assert!(q.granularity.is_none());
    }

    #[test]
    fn query_params_include_granularity() {
        let q = ReadingQuery {
            granularity: Some(Granularity::SixHour),
            ..ReadingQuery::default()
        };
        let params = q.params();
        assert!(params.contains(&("granularity", "six_hour".to_owned())));
        assert!(params.contains(&("auto_granularity", "false".to_owned())));
        assert!(params.contains(&("limit", "100".to_owned())));
    }
}
