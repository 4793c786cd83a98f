// Weather endpoints: `/weather/readings` and `/weather/display/...`

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    Id, LatestReadings, ReadingPage, ReadingQuery, WeatherReadingWithLocation, WeatherSummary,
};

/// Default window for [`ApiClient::sensor_summary`].
pub const DEFAULT_SUMMARY_HOURS: u32 = 24;

/// Largest window the summary endpoint accepts (one week).
pub const MAX_SUMMARY_HOURS: u32 = 168;

impl ApiClient {
    /// Most recent reading from every sensor, for display boards.
    pub async fn latest_readings(&self) -> Result<LatestReadings, Error> {
        self.get(&["weather", "display", "latest"]).await
    }

    /// Most recent reading from one sensor.
    pub async fn sensor_latest(&self, device_id: Id) -> Result<WeatherReadingWithLocation, Error> {
        self.get(&[
            "weather",
            "display",
            "sensor",
            &device_id.to_string(),
            "latest",
        ])
        .await
    }

    /// Fleet-wide readings. Aggregation needs an explicit time range here.
    pub async fn list_readings(&self, query: &ReadingQuery) -> Result<ReadingPage, Error> {
        query.validate(true).map_err(Error::InvalidInput)?;
        self.get_with_params(&["weather", "readings"], &query.params())
            .await
    }

    /// History for one sensor. Without a range the backend aggregates the
    /// last 24 hours.
    pub async fn sensor_history(
        &self,
        device_id: Id,
        query: &ReadingQuery,
    ) -> Result<ReadingPage, Error> {
        query.validate(false).map_err(Error::InvalidInput)?;
        self.get_with_params(
            &[
                "weather",
                "display",
                "sensor",
                &device_id.to_string(),
                "history",
            ],
            &query.params(),
        )
        .await
    }

    /// Min/max/avg summary over the last `hours` (1–168).
    pub async fn sensor_summary(&self, device_id: Id, hours: u32) -> Result<WeatherSummary, Error> {
        if !(1..=MAX_SUMMARY_HOURS).contains(&hours) {
            return Err(Error::InvalidInput(format!(
                "hours must be between 1 and {MAX_SUMMARY_HOURS}, got {hours}"
            )));
        }
        self.get_with_params(
            &[
                "weather",
                "display",
                "sensor",
                &device_id.to_string(),
                "summary",
            ],
            &[("hours", hours.to_string())],
        )
        .await
    }
}
