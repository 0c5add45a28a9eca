//! Pure availability calculation: weekly pattern minus approved leave minus
//! blocked periods.
//!
//! Everything here is stateless and side-effect free; the inputs are
//! immutable snapshots gathered for one staff member, so the functions are
//! safe to call concurrently from any number of tasks.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use super::blocked_time::BlockedTime;
use super::interval::TimeInterval;
use super::schedule::WeeklySchedule;
use super::time_off::{TimeOffRequest, TimeOffStatus};

/// Free intervals for one date.
///
/// A day off, or any approved leave covering the date, yields no availability
/// at all; otherwise the work span is carved down by the break and by every
/// blocked period in effect on the date. Output is chronological.
pub fn for_date(
    date: NaiveDate,
    schedule: &WeeklySchedule,
    time_off: &[TimeOffRequest],
    blocked: &[BlockedTime],
) -> Vec<TimeInterval> {
    let Some(work_day) = schedule.day(date.weekday()) else {
        return Vec::new();
    };

    // Approved leave takes total priority; partial-day time off is not modeled.
    let on_leave = time_off
        .iter()
        .any(|request| request.status() == TimeOffStatus::Approved && request.contains_date(date));
    if on_leave {
        return Vec::new();
    }

    let mut slots = vec![work_day.work_interval()];
    if let Some(break_time) = work_day.break_interval() {
        slots = subtract(slots, break_time);
    }
    for block in blocked.iter().filter(|block| block.applies_to(date)) {
        slots = subtract(slots, block.interval());
    }
    slots
}

/// Free intervals for every date in the inclusive range, keyed by date.
///
/// Callers normally pre-filter `time_off` and `blocked` to the range for
/// efficiency; correctness does not depend on it, since records outside the
/// range never match any date.
pub fn for_range(
    start_date: NaiveDate,
    end_date: NaiveDate,
    schedule: &WeeklySchedule,
    time_off: &[TimeOffRequest],
    blocked: &[BlockedTime],
) -> BTreeMap<NaiveDate, Vec<TimeInterval>> {
    let mut by_date = BTreeMap::new();
    let mut date = start_date;
    while date <= end_date {
        by_date.insert(date, for_date(date, schedule, time_off, blocked));
        date += Duration::days(1);
    }
    by_date
}

/// Whether some free interval on `date` fully contains `[start, end)`.
/// Partial containment does not count.
pub fn is_slot_available(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    schedule: &WeeklySchedule,
    time_off: &[TimeOffRequest],
    blocked: &[BlockedTime],
) -> bool {
    for_date(date, schedule, time_off, blocked)
        .iter()
        .any(|slot| slot.start() <= start && slot.end() >= end)
}

/// Remove `removal` from every slot, splitting slots it lands inside.
fn subtract(slots: Vec<TimeInterval>, removal: TimeInterval) -> Vec<TimeInterval> {
    let mut result = Vec::with_capacity(slots.len() + 1);
    for slot in slots {
        if removal.end() <= slot.start() || removal.start() >= slot.end() {
            // Disjoint.
            result.push(slot);
        } else if removal.start() <= slot.start() && removal.end() >= slot.end() {
            // Removal swallows the slot.
        } else if removal.start() <= slot.start() {
            // Truncate the front.
            result.push(TimeInterval::unchecked(removal.end(), slot.end()));
        } else if removal.end() >= slot.end() {
            // Truncate the back.
            result.push(TimeInterval::unchecked(slot.start(), removal.start()));
        } else {
            // Strictly interior: split.
            result.push(TimeInterval::unchecked(slot.start(), removal.start()));
            result.push(TimeInterval::unchecked(removal.end(), slot.end()));
        }
    }
    result
}
