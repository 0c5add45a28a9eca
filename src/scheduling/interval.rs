use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` time-of-day range.
///
/// The half-open convention lets adjacent intervals compose without
/// double-counting boundary instants: a point exactly at `end` belongs to the
/// next interval, never this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    start: NaiveTime,
    end: NaiveTime,
}

/// Rejected interval whose end does not lie after its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("time interval must end after it starts ({start}..{end})")]
pub struct InvalidInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeInterval {
    /// Build a validated interval. Zero-length and inverted ranges are rejected.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, InvalidInterval> {
        if end <= start {
            return Err(InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Constructor for calculator-internal splits whose bounds are already
    /// known to be strictly ordered.
    pub(crate) fn unchecked(start: NaiveTime, end: NaiveTime) -> Self {
        debug_assert!(start < end);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// End-exclusive containment: `start <= point < end`.
    pub fn contains(&self, point: NaiveTime) -> bool {
        point >= self.start && point < self.end
    }

    /// Standard half-open overlap test; touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Parse an `HH:mm` time-of-day string as exchanged at the storage edge.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Render a time of day back into the `HH:mm` exchange form.
pub fn format_hhmm(value: NaiveTime) -> String {
    value.format("%H:%M").to_string()
}
