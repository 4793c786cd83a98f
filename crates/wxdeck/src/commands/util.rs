//! Shared helpers for command handlers.

use std::io::IsTerminal;

use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Use `given` or prompt for a password without echo.
pub fn password_or_prompt(given: Option<String>, prompt: &str) -> Result<SecretString, CliError> {
    let raw = match given {
        Some(p) => p,
        None => rpassword::prompt_password(prompt).map_err(prompt_err)?,
    };
    if raw.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(raw))
}

/// Parse an RFC 3339 timestamp from a flag.
pub fn parse_time(field: &str, raw: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CliError::Validation {
            field: field.into(),
            reason: format!("expected an RFC 3339 timestamp ({e})"),
        })
}

/// Parse `90m`, `6h`, `7d` style spans.
pub fn parse_span(raw: &str) -> Result<Duration, CliError> {
    let invalid = || CliError::Validation {
        field: "last".into(),
        reason: format!("expected a number followed by m, h or d, got '{raw}'"),
    };
    let (split, _) = raw.char_indices().last().ok_or_else(invalid)?;
    let (num, unit) = raw.split_at(split);
    let n: i64 = num.parse().map_err(|_| invalid())?;
    if n <= 0 {
        return Err(invalid());
    }
    match unit {
        "m" => Duration::try_minutes(n),
        "h" => Duration::try_hours(n),
        "d" => Duration::try_days(n),
        _ => None,
    }
    .ok_or_else(invalid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn spans_parse_by_unit() {
        assert_eq!(parse_span("90m").unwrap(), Duration::minutes(90));
        assert_eq!(parse_span("6h").unwrap(), Duration::hours(6));
        assert_eq!(parse_span("7d").unwrap(), Duration::days(7));
    }

    #[test]
    fn bad_spans_are_rejected() {
        for raw in ["", "h", "6", "6w", "-1h", "0d", "1.5h"] {
            assert!(parse_span(raw).is_err(), "{raw} should fail");
        }
    }

    #[test]
    fn timestamps_are_normalized_to_utc() {
        let t = parse_time("start", "2026-03-01T12:00:00+02:00").unwrap();
        assert_eq!(t.to_rfc3339(), "2026-03-01T10:00:00+00:00");
        assert!(parse_time("start", "yesterday").is_err());
    }

    #[test]
    fn yes_flag_skips_the_prompt() {
        assert!(confirm("Delete?", true).unwrap());
    }
}
