//! Vehicle records and licence plate validation.
//!
//! A [`Vehicle`] is one parking session. It is created parked and is mutated
//! exactly once, when it is checked out. Check-out keeps the record around as
//! history instead of removing it.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

/// Plate pattern accepted at check-in: three uppercase letters, a hyphen and
/// four digits (`AAA-1234`).
pub const DEFAULT_LICENCE_PATTERN: &str = r"^[A-Z]{3}-\d{4}$";

/// Where a vehicle is in its parking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleState {
    /// Checked in and still in the lot.
    Parked,
    /// Checked out; kept for history.
    CheckedOut,
}

impl std::fmt::Display for VehicleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parked => write!(f, "parked"),
            Self::CheckedOut => write!(f, "checked_out"),
        }
    }
}

/// A single parking session.
///
/// The serialized shape is `{name, licence, owner, time, deleted?}`; `deleted`
/// is left out while the vehicle is parked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Free-text vehicle description.
    pub name: String,

    /// Licence plate. Used as the lookup key for check-out.
    pub licence: String,

    /// Owner name.
    pub owner: String,

    /// Check-in instant.
    #[serde(serialize_with = "serialize_iso_millis")]
    pub time: DateTime<Utc>,

    /// Set once the vehicle has been checked out.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
}

impl Vehicle {
    /// Create a parked vehicle checked in at `time`.
    ///
    /// The timestamp is truncated to millisecond precision so it survives a
    /// round trip through its ISO-8601 form unchanged.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        licence: impl Into<String>,
        owner: impl Into<String>,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            licence: licence.into(),
            owner: owner.into(),
            time: time.trunc_subsecs(3),
            deleted: false,
        }
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> VehicleState {
        if self.deleted {
            VehicleState::CheckedOut
        } else {
            VehicleState::Parked
        }
    }

    /// Whether the vehicle is still in the lot.
    #[must_use]
    pub fn is_parked(&self) -> bool {
        !self.deleted
    }

    /// Mark the vehicle as checked out.
    pub fn check_out(&mut self) {
        self.deleted = true;
    }
}

fn serialize_iso_millis<S>(time: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Compiled licence plate pattern.
#[derive(Debug, Clone)]
pub struct LicencePattern {
    regex: Regex,
}

impl LicencePattern {
    /// Compile a licence plate pattern.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the pattern is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::ConfigValidation {
            message: format!("invalid licence pattern {pattern}: {e}"),
        })?;
        Ok(Self { regex })
    }

    /// Check whether `licence` is an acceptable plate.
    #[must_use]
    pub fn is_valid(&self, licence: &str) -> bool {
        self.regex.is_match(licence)
    }

    /// The source text of the pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether this is the stock `AAA-1234` pattern.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.as_str() == DEFAULT_LICENCE_PATTERN
    }
}

impl Default for LicencePattern {
    /// # Panics
    ///
    /// Never in practice: [`DEFAULT_LICENCE_PATTERN`] is a valid regex.
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_LICENCE_PATTERN).expect("Invalid regex pattern"),
        }
    }
}
