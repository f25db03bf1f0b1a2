//! Human-readable formatting for check-in times and parked durations.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Display format for check-in times (`dd/MM/yyyy HH:mm`).
pub const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Time zone used when displaying check-in times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayZone {
    /// The local time zone of the machine.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

impl std::fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Utc => write!(f, "utc"),
        }
    }
}

/// Format a check-in instant as `dd/MM/yyyy HH:mm` in the given zone.
#[must_use]
pub fn format_date_time(time: DateTime<Utc>, zone: DisplayZone) -> String {
    match zone {
        DisplayZone::Local => time.with_timezone(&Local).format(DATE_TIME_FORMAT).to_string(),
        DisplayZone::Utc => time.format(DATE_TIME_FORMAT).to_string(),
    }
}

/// Milliseconds between `since` and `until`.
///
/// Clamped at zero so a check-in stamped slightly in the future (clock skew)
/// reads as no time parked.
#[must_use]
pub fn elapsed_millis(since: DateTime<Utc>, until: DateTime<Utc>) -> u64 {
    let millis = (until - since).num_milliseconds();
    u64::try_from(millis).unwrap_or(0)
}

/// Format a parked duration as `"{minutes}m e {seconds}s"`.
///
/// Minutes are not rolled over into hours: 90 minutes reads `90m e 0s`.
#[must_use]
pub fn format_period(millis: u64) -> String {
    let minutes = millis / 60_000;
    let seconds = (millis % 60_000) / 1_000;
    format!("{minutes}m e {seconds}s")
}
