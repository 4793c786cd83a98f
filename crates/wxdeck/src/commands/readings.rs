//! Weather reading command handlers.

use chrono::Utc;
use tabled::Tabled;
use wxdeck_core::Console;
use wxdeck_core::models::{
    Granularity, ReadingPage, ReadingPoint, ReadingQuery, ReadingSeries,
    WeatherReadingWithLocation, WeatherSummary,
};

use crate::cli::{GlobalOpts, GranularityArg, RangeArgs, ReadingsArgs, ReadingsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PointRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Temp °C")]
    temperature: String,
    #[tabled(rename = "Hum %")]
    humidity: String,
    #[tabled(rename = "hPa")]
    pressure: String,
    #[tabled(rename = "Wind m/s")]
    wind: String,
    #[tabled(rename = "Rain mm")]
    rain: String,
    #[tabled(rename = "Samples")]
    samples: u64,
}

impl From<&dyn ReadingPoint> for PointRow {
    fn from(p: &dyn ReadingPoint) -> Self {
        Self {
            time: output::timestamp(p.recorded_at()),
            device: output::opt(p.device_id()),
            temperature: output::metric(p.temperature()),
            humidity: output::metric(p.humidity()),
            pressure: output::metric(p.pressure()),
            wind: output::metric(p.wind_speed()),
            rain: output::metric(p.rain_amount()),
            samples: p.reading_count(),
        }
    }
}

#[derive(Tabled)]
struct LatestRow {
    #[tabled(rename = "Device")]
    device: i64,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Temp °C")]
    temperature: String,
    #[tabled(rename = "Hum %")]
    humidity: String,
    #[tabled(rename = "hPa")]
    pressure: String,
    #[tabled(rename = "Wind m/s")]
    wind: String,
    #[tabled(rename = "Rain mm")]
    rain: String,
}

impl From<&WeatherReadingWithLocation> for LatestRow {
    fn from(r: &WeatherReadingWithLocation) -> Self {
        let p = &r.reading;
        Self {
            device: p.device_id,
            location: r.device_location.clone(),
            time: output::timestamp(p.recorded_at),
            temperature: output::metric(p.temperature),
            humidity: output::metric(p.humidity),
            pressure: output::metric(p.pressure),
            wind: output::metric(p.wind_speed),
            rain: output::metric(p.rain_amount),
        }
    }
}

/// Bucket width the query implies, for pages that come back without one.
fn requested_granularity(query: &ReadingQuery) -> Option<Granularity> {
    if query.granularity.is_some() {
        return query.granularity;
    }
    match (query.auto_granularity, query.start_time, query.end_time) {
        (true, Some(start), Some(end)) => Some(Granularity::auto(end - start)),
        _ => None,
    }
}

fn series_table(page: &ReadingPage, requested: Option<Granularity>) -> String {
    let rows: Vec<PointRow> = page.series.points().into_iter().map(|p| PointRow::from(p)).collect();
    let heading = match &page.series {
        ReadingSeries::Raw(_) => "raw readings".to_owned(),
        ReadingSeries::Aggregated {
            granularity: Some(g),
            ..
        } => format!("aggregated by {g}"),
        ReadingSeries::Aggregated { granularity: None, .. } => match requested {
            Some(g) => format!("aggregated by {g} (expected)"),
            None => "aggregated".to_owned(),
        },
    };
    format!(
        "{}\n{} of {} ({heading})",
        output::render_table(&rows),
        page.series.len(),
        page.total
    )
}

fn series_plain(page: &ReadingPage) -> String {
    page.series
        .points()
        .into_iter()
        .map(|p| {
            format!(
                "{}\t{}",
                p.recorded_at().to_rfc3339(),
                output::metric(p.temperature())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn summary_detail(s: &WeatherSummary) -> String {
    [
        format!("Device:      {} ({})", s.device_id, s.device_location),
        format!(
            "Period:      {} .. {}",
            output::timestamp(s.period_start),
            output::timestamp(s.period_end)
        ),
        format!("Readings:    {}", s.reading_count),
        format!("Temp avg:    {}", output::metric(s.avg_temperature)),
        format!("Temp min:    {}", output::metric(s.min_temperature)),
        format!("Temp max:    {}", output::metric(s.max_temperature)),
        format!("Humidity:    {}", output::metric(s.avg_humidity)),
        format!("Pressure:    {}", output::metric(s.avg_pressure)),
    ]
    .join("\n")
}

// ── Query building ──────────────────────────────────────────────────

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Minute => Self::Minute,
            GranularityArg::FiveMin => Self::FiveMin,
            GranularityArg::FifteenMin => Self::FifteenMin,
            GranularityArg::Hour => Self::Hour,
            GranularityArg::SixHour => Self::SixHour,
            GranularityArg::Day => Self::Day,
        }
    }
}

/// Lay the range flags over `query`'s defaults.
fn build_query(range: &RangeArgs, mut query: ReadingQuery) -> Result<ReadingQuery, CliError> {
    query.skip = range.skip;
    if let Some(limit) = range.limit {
        query.limit = limit;
    }

    if let Some(ref span) = range.last {
        let end = Utc::now();
        query.start_time = Some(end - util::parse_span(span)?);
        query.end_time = Some(end);
    } else {
        query.start_time = range
            .start
            .as_deref()
            .map(|s| util::parse_time("start", s))
            .transpose()?;
        query.end_time = match range.end.as_deref() {
            Some(e) => Some(util::parse_time("end", e)?),
            None => query.start_time.map(|_| Utc::now()),
        };
    }

    if range.raw {
        query.granularity = None;
        query.auto_granularity = false;
    } else if let Some(g) = range.granularity {
        query.granularity = Some(g.into());
        query.auto_granularity = false;
    } else if range.auto {
        query.auto_granularity = true;
    }
    Ok(query)
}

fn print_page(
    page: &ReadingPage,
    query: &ReadingQuery,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let requested = requested_granularity(query);
    let out = output::render_single(
        global.format(),
        page,
        |p| series_table(p, requested),
        series_plain,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: ReadingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ReadingsCommand::List(range) => {
            console.navigate("/readings")?;
            let query = build_query(&range, ReadingQuery::default())?;
            let page = console.weather().fetch_readings(&query).await?;
            print_page(&page, &query, global)
        }

        ReadingsCommand::History { id, range } => {
            console.navigate(&format!("/devices/{id}"))?;
            let query = build_query(&range, ReadingQuery::history())?;
            let page = console.weather().fetch_sensor_history(id, &query).await?;
            print_page(&page, &query, global)
        }

        ReadingsCommand::Latest { device: Some(id) } => {
            console.navigate("/")?;
            let reading = console.weather().fetch_sensor_latest(id).await?;
            let out = output::render_list(
                global.format(),
                std::slice::from_ref(&reading),
                |r| LatestRow::from(r),
                |r| r.reading.device_id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReadingsCommand::Latest { device: None } => {
            console.navigate("/")?;
            let latest = console.weather().fetch_latest().await?;
            let out = output::render_list(
                global.format(),
                &latest.readings,
                |r| LatestRow::from(r),
                |r| r.reading.device_id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            if !global.quiet && latest.readings.is_empty() {
                console.notifications().info("No sensor has reported yet", None);
            }
            Ok(())
        }

        ReadingsCommand::Summary { id, hours } => {
            console.navigate(&format!("/devices/{id}"))?;
            let summary = console.weather().fetch_sensor_summary(id, hours).await?;
            let out = output::render_single(global.format(), &summary, summary_detail, |s| {
                output::metric(s.avg_temperature)
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn range() -> RangeArgs {
        RangeArgs {
            limit: None,
            skip: 0,
            start: None,
            end: None,
            last: None,
            granularity: None,
            auto: false,
            raw: false,
        }
    }

    #[test]
    fn history_defaults_survive_empty_flags() {
        let q = build_query(&range(), ReadingQuery::history()).unwrap();
        assert_eq!(q, ReadingQuery::history());
    }

    #[test]
    fn last_sets_a_window_ending_now() {
        let args = RangeArgs {
            last: Some("6h".into()),
            ..range()
        };
        let q = build_query(&args, ReadingQuery::default()).unwrap();
        let (start, end) = (q.start_time.unwrap(), q.end_time.unwrap());
        assert_eq!(end - start, Duration::hours(6));
    }

    #[test]
    fn start_alone_ends_now() {
        let args = RangeArgs {
            start: Some("2026-01-01T00:00:00Z".into()),
            ..range()
        };
        let q = build_query(&args, ReadingQuery::default()).unwrap();
        assert!(q.end_time.unwrap() > q.start_time.unwrap());
    }

    #[test]
    fn raw_turns_off_history_bucketing() {
        let args = RangeArgs {
            raw: true,
            ..range()
        };
        let q = build_query(&args, ReadingQuery::history()).unwrap();
        assert!(!q.wants_aggregation());
    }

    #[test]
    fn explicit_granularity_replaces_auto() {
        let args = RangeArgs {
            granularity: Some(GranularityArg::Hour),
            ..range()
        };
        let q = build_query(&args, ReadingQuery::history()).unwrap();
        assert_eq!(q.granularity, Some(Granularity::Hour));
        assert!(!q.auto_granularity);
    }

    #[test]
    fn auto_history_without_reported_width_shows_expected_bucket() {
        let args = RangeArgs {
            last: Some("30d".into()),
            ..range()
        };
        let q = build_query(&args, ReadingQuery::history()).unwrap();
        assert_eq!(requested_granularity(&q), Some(Granularity::Hour));

        let page = ReadingPage {
            total: 0,
            series: ReadingSeries::Aggregated {
                granularity: None,
                points: Vec::new(),
            },
        };
        let text = series_table(&page, requested_granularity(&q));
        assert!(text.contains("aggregated by hour (expected)"), "{text}");
    }

    #[test]
    fn reported_width_wins_over_expected() {
        let page = ReadingPage {
            total: 0,
            series: ReadingSeries::Aggregated {
                granularity: Some(Granularity::Day),
                points: Vec::new(),
            },
        };
        let text = series_table(&page, Some(Granularity::Minute));
        assert!(text.contains("aggregated by day"), "{text}");
        assert!(!text.contains("expected"));
    }

    #[test]
    fn open_ended_auto_query_has_no_expected_width() {
        let q = build_query(&range(), ReadingQuery::history()).unwrap();
        assert_eq!(requested_granularity(&q), None);
    }
}
