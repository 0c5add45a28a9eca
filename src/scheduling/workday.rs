use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use super::interval::{InvalidInterval, TimeInterval};

/// One day's working pattern: the staffed span plus an optional break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDay {
    work: TimeInterval,
    break_time: Option<TimeInterval>,
}

/// Construction failures for a work day, discriminated so callers can tell
/// a bad work span from a bad break from a misplaced break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WorkDayError {
    #[error("invalid work interval: {0}")]
    InvalidWorkInterval(#[source] InvalidInterval),
    #[error("invalid break interval: {0}")]
    InvalidBreakInterval(#[source] InvalidInterval),
    #[error("break {break_start}..{break_end} falls outside working hours {work_start}..{work_end}")]
    BreakOutsideWorkHours {
        work_start: NaiveTime,
        work_end: NaiveTime,
        break_start: NaiveTime,
        break_end: NaiveTime,
    },
}

impl WorkDay {
    /// A work day with no break.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, WorkDayError> {
        let work = TimeInterval::new(start, end).map_err(WorkDayError::InvalidWorkInterval)?;
        Ok(Self {
            work,
            break_time: None,
        })
    }

    /// A work day with a break, which must lie fully inside working hours.
    pub fn with_break(
        start: NaiveTime,
        end: NaiveTime,
        break_start: NaiveTime,
        break_end: NaiveTime,
    ) -> Result<Self, WorkDayError> {
        let work = TimeInterval::new(start, end).map_err(WorkDayError::InvalidWorkInterval)?;
        let break_time = TimeInterval::new(break_start, break_end)
            .map_err(WorkDayError::InvalidBreakInterval)?;
        if break_start < start || break_end > end {
            return Err(WorkDayError::BreakOutsideWorkHours {
                work_start: start,
                work_end: end,
                break_start,
                break_end,
            });
        }
        Ok(Self {
            work,
            break_time: Some(break_time),
        })
    }

    pub fn work_interval(&self) -> TimeInterval {
        self.work
    }

    pub fn break_interval(&self) -> Option<TimeInterval> {
        self.break_time
    }

    /// Whether the staff member is on the clock at `point`: inside working
    /// hours and not on break.
    pub fn is_working_time(&self, point: NaiveTime) -> bool {
        if !self.work.contains(point) {
            return false;
        }
        match self.break_time {
            Some(break_time) => !break_time.contains(point),
            None => true,
        }
    }

    /// Staffed duration: the work span minus the break span, if any.
    pub fn work_duration(&self) -> Duration {
        let break_duration = self
            .break_time
            .map(|interval| interval.duration())
            .unwrap_or_else(Duration::zero);
        self.work.duration() - break_duration
    }
}
