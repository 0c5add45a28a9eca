use chrono::Weekday;
use serde_json::{json, Map, Value};

use super::interval::{format_hhmm, parse_hhmm};
use super::workday::WorkDay;

/// Monday-first ordering used everywhere a schedule is iterated or stored.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A staff member's recurring weekly pattern, normalized to all seven days.
///
/// A `None` entry means the day is off. The schedule is replaced wholesale on
/// update; there is no per-day mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeeklySchedule {
    days: [Option<WorkDay>; 7],
}

/// Strict-decode failure for a stored schedule payload.
///
/// The lenient decoder never raises this; it degrades bad entries to "day
/// off" instead. See [`WeeklySchedule::from_storage`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed schedule data: {detail}")]
pub struct MalformedScheduleData {
    pub detail: String,
}

impl WeeklySchedule {
    /// A schedule with every day off.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a schedule from `(weekday, work day)` pairs; unlisted days are off.
    pub fn from_days(days: impl IntoIterator<Item = (Weekday, WorkDay)>) -> Self {
        let mut schedule = Self::default();
        for (weekday, work_day) in days {
            schedule.days[day_index(weekday)] = Some(work_day);
        }
        schedule
    }

    pub fn day(&self, weekday: Weekday) -> Option<WorkDay> {
        self.days[day_index(weekday)]
    }

    /// Iterate the days that have working hours, Monday first.
    pub fn working_days(&self) -> impl Iterator<Item = (Weekday, WorkDay)> + '_ {
        WEEK.iter()
            .filter_map(|weekday| self.day(*weekday).map(|day| (*weekday, day)))
    }

    /// Encode to the day-keyed storage exchange form.
    ///
    /// Days off serialize as `null` so the stored object always carries all
    /// seven keys.
    pub fn to_storage(&self) -> Value {
        let mut object = Map::new();
        for weekday in WEEK {
            let entry = match self.day(weekday) {
                Some(day) => encode_day(&day),
                None => Value::Null,
            };
            object.insert(day_key(weekday).to_string(), entry);
        }
        Value::Object(object)
    }

    /// Lenient decode: malformed per-day entries become "day off", and a
    /// payload that is not an object decodes to the empty schedule.
    ///
    /// Lossy by design: a stored schedule should never make a staff member
    /// unloadable, so corruption costs availability for the affected day
    /// rather than failing the whole profile.
    pub fn from_storage(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::empty();
        };
        let mut schedule = Self::default();
        for weekday in WEEK {
            let entry = object.get(day_key(weekday)).unwrap_or(&Value::Null);
            schedule.days[day_index(weekday)] = decode_day(weekday, entry).unwrap_or_default();
        }
        schedule
    }

    /// Strict decode for callers that prefer failing the load over silently
    /// dropping days.
    pub fn from_storage_strict(value: &Value) -> Result<Self, MalformedScheduleData> {
        let object = value.as_object().ok_or_else(|| MalformedScheduleData {
            detail: "schedule payload is not an object".to_string(),
        })?;
        let mut schedule = Self::default();
        for weekday in WEEK {
            let entry = object.get(day_key(weekday)).unwrap_or(&Value::Null);
            schedule.days[day_index(weekday)] = decode_day(weekday, entry)?;
        }
        Ok(schedule)
    }
}

fn day_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

fn day_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

fn encode_day(day: &WorkDay) -> Value {
    let work = day.work_interval();
    let mut entry = json!({
        "start": format_hhmm(work.start()),
        "end": format_hhmm(work.end()),
    });
    if let Some(break_time) = day.break_interval() {
        entry["break_start"] = Value::String(format_hhmm(break_time.start()));
        entry["break_end"] = Value::String(format_hhmm(break_time.end()));
    }
    entry
}

fn decode_day(weekday: Weekday, entry: &Value) -> Result<Option<WorkDay>, MalformedScheduleData> {
    if entry.is_null() {
        return Ok(None);
    }
    let malformed = |detail: String| MalformedScheduleData {
        detail: format!("{}: {detail}", day_key(weekday)),
    };
    let object = entry
        .as_object()
        .ok_or_else(|| malformed("entry is not an object".to_string()))?;

    let time_field = |field: &str| -> Result<chrono::NaiveTime, MalformedScheduleData> {
        let raw = object
            .get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(format!("missing or non-string '{field}'")))?;
        parse_hhmm(raw).ok_or_else(|| malformed(format!("'{field}' is not an HH:mm time")))
    };

    let start = time_field("start")?;
    let end = time_field("end")?;

    let day = match (object.get("break_start"), object.get("break_end")) {
        (None, None) => {
            WorkDay::new(start, end).map_err(|err| malformed(err.to_string()))?
        }
        (Some(_), Some(_)) => {
            let break_start = time_field("break_start")?;
            let break_end = time_field("break_end")?;
            WorkDay::with_break(start, end, break_start, break_end)
                .map_err(|err| malformed(err.to_string()))?
        }
        _ => return Err(malformed("break_start and break_end must be set together".to_string())),
    };
    Ok(Some(day))
}
