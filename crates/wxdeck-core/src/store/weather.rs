// ── Weather readings ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use wxdeck_api::ApiClient;
use wxdeck_api::models::{
    Id, LatestReadings, ReadingPage, ReadingQuery, ReadingSeries, WeatherReadingWithLocation,
    WeatherSummary,
};

use super::tracked::{StateCell, Status, impl_has_status};
use crate::error::CoreError;

#[derive(Debug, Clone, Default)]
pub struct WeatherState {
    /// Last list or history page, raw or aggregated.
    pub readings: Option<Arc<ReadingSeries>>,
    pub total: u64,
    pub latest: Arc<Vec<WeatherReadingWithLocation>>,
    pub latest_fetched_at: Option<DateTime<Utc>>,
    pub summary: Option<Arc<WeatherSummary>>,
    pub status: Status,
}

impl_has_status!(WeatherState);

pub struct WeatherStore {
    api: Arc<ApiClient>,
    state: StateCell<WeatherState>,
}

impl WeatherStore {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> WeatherState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherState> {
        self.state.subscribe()
    }

    pub fn loading(&self) -> bool {
        self.state.snapshot().status.loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.snapshot().status.last_error
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    // ── Operations ───────────────────────────────────────────────────

    pub async fn fetch_readings(&self, query: &ReadingQuery) -> Result<ReadingPage, CoreError> {
        self.state
            .track("fetch_readings", self.api.list_readings(query), |s, page| {
                s.readings = Some(Arc::new(page.series.clone()));
                s.total = page.total;
            })
            .await
    }

    pub async fn fetch_latest(&self) -> Result<LatestReadings, CoreError> {
        self.state
            .track("fetch_latest", self.api.latest_readings(), |s, latest| {
                s.latest = Arc::new(latest.readings.clone());
                s.latest_fetched_at = Some(latest.fetched_at);
            })
            .await
    }

    /// Latest reading of one sensor. Returned only; nothing is held.
    pub async fn fetch_sensor_latest(
        &self,
        device_id: Id,
    ) -> Result<WeatherReadingWithLocation, CoreError> {
        self.state
            .track("fetch_sensor_latest", self.api.sensor_latest(device_id), |_, _| {})
            .await
    }

    pub async fn fetch_sensor_history(
        &self,
        device_id: Id,
        query: &ReadingQuery,
    ) -> Result<ReadingPage, CoreError> {
        self.state
            .track(
                "fetch_sensor_history",
                self.api.sensor_history(device_id, query),
                |s, page| {
                    s.readings = Some(Arc::new(page.series.clone()));
                    s.total = page.total;
                },
            )
            .await
    }

    pub async fn fetch_sensor_summary(
        &self,
        device_id: Id,
        hours: u32,
    ) -> Result<WeatherSummary, CoreError> {
        self.state
            .track(
                "fetch_sensor_summary",
                self.api.sensor_summary(device_id, hours),
                |s, summary| {
                    s.summary = Some(Arc::new(summary.clone()));
                },
            )
            .await
    }
}
