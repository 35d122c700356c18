//! Interval and window types

use crate::error::{Error, Result};
use crate::types::{OptionStringExt, QueryParams};
use std::fmt;
use std::str::FromStr;
use tracing::error;

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Window size used when slicing a time range into API calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    /// 1 hour
    Hour,
    /// 24 hours
    Day,
    /// 168 hours
    Week,
    /// 744 hours (31 days)
    #[default]
    Month,
}

impl Interval {
    /// Every accepted interval
    pub const ALL: [Interval; 4] = [
        Interval::Hour,
        Interval::Day,
        Interval::Week,
        Interval::Month,
    ];

    /// Window length in hours
    pub const fn hours(self) -> i64 {
        match self {
            Interval::Hour => 1,
            Interval::Day => 24,
            Interval::Week => 24 * 7,
            Interval::Month => 24 * 31,
        }
    }

    /// Window length in milliseconds
    pub const fn millis(self) -> i64 {
        self.hours() * MILLIS_PER_HOUR
    }

    /// Upper-case name as accepted in config
    pub const fn name(self) -> &'static str {
        match self {
            Interval::Hour => "HOUR",
            Interval::Day => "DAY",
            Interval::Week => "WEEK",
            Interval::Month => "MONTH",
        }
    }

    /// Resolve the optional `interval` config value.
    ///
    /// Absent or blank values fall back to [`Interval::Month`]; anything
    /// outside the enumeration is a fatal configuration error.
    pub fn resolve(value: Option<&str>) -> Result<Self> {
        match value.map(str::to_string).none_if_empty() {
            None => Ok(Interval::default()),
            Some(raw) => raw.parse().inspect_err(|_| {
                let valid: Vec<&str> = Interval::ALL.iter().map(|i| i.name()).collect();
                error!(
                    interval = %raw,
                    valid = ?valid,
                    "provided interval is not in the interval set"
                );
            }),
        }
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        Interval::ALL
            .into_iter()
            .find(|i| i.name() == upper)
            .ok_or_else(|| Error::InvalidInterval {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A half-open `[start_ms, end_ms)` time range in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Inclusive lower bound
    pub start_ms: i64,
    /// Exclusive upper bound
    pub end_ms: i64,
}

impl Window {
    /// Create a new window
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Length in milliseconds
    pub fn len_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Query parameters naming the bounds, e.g. `updated_after`/`updated_before`
    pub fn params(&self, after_param: &str, before_param: &str) -> QueryParams {
        vec![
            (after_param.to_string(), self.start_ms.to_string()),
            (before_param.to_string(), self.end_ms.to_string()),
        ]
    }
}
