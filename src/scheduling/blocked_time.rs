use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::ids::{BlockedTimeId, BusinessId, StaffProfileId};
use super::interval::{InvalidInterval, TimeInterval};

/// When a blocked period applies: every week on a weekday, or on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Weekly(Weekday),
    OneTime(NaiveDate),
}

/// An exclusion window distinct from time off: a standing meeting every
/// Tuesday, a one-off supplier visit, and so on.
///
/// Unlike leave requests there is no status machine; a blocked time exists
/// until it is explicitly deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedTime {
    id: BlockedTimeId,
    staff_profile_id: StaffProfileId,
    business_id: BusinessId,
    title: Option<String>,
    interval: TimeInterval,
    recurrence: Recurrence,
    created_at: DateTime<Utc>,
}

impl BlockedTime {
    /// A block applying every week on `weekday`.
    #[allow(clippy::too_many_arguments)]
    pub fn recurring(
        id: BlockedTimeId,
        staff_profile_id: StaffProfileId,
        business_id: BusinessId,
        title: Option<String>,
        start: NaiveTime,
        end: NaiveTime,
        weekday: Weekday,
        now: DateTime<Utc>,
    ) -> Result<Self, InvalidInterval> {
        let interval = TimeInterval::new(start, end)?;
        Ok(Self {
            id,
            staff_profile_id,
            business_id,
            title,
            interval,
            recurrence: Recurrence::Weekly(weekday),
            created_at: now,
        })
    }

    /// A block applying only on `date`.
    #[allow(clippy::too_many_arguments)]
    pub fn one_time(
        id: BlockedTimeId,
        staff_profile_id: StaffProfileId,
        business_id: BusinessId,
        title: Option<String>,
        start: NaiveTime,
        end: NaiveTime,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self, InvalidInterval> {
        let interval = TimeInterval::new(start, end)?;
        Ok(Self {
            id,
            staff_profile_id,
            business_id,
            title,
            interval,
            recurrence: Recurrence::OneTime(date),
            created_at: now,
        })
    }

    pub fn id(&self) -> &BlockedTimeId {
        &self.id
    }

    pub fn staff_profile_id(&self) -> &StaffProfileId {
        &self.staff_profile_id
    }

    pub fn business_id(&self) -> &BusinessId {
        &self.business_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn interval(&self) -> TimeInterval {
        self.interval
    }

    pub fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self.recurrence, Recurrence::Weekly(_))
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether this block is in effect on `date`.
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        match self.recurrence {
            Recurrence::Weekly(weekday) => date.weekday() == weekday,
            Recurrence::OneTime(specific) => date == specific,
        }
    }

    /// End-exclusive check that `time` on `date` falls inside the block.
    pub fn is_time_blocked(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.applies_to(date) && self.interval.contains(time)
    }

    /// Conflict policy for creating a new block, with `self` as the candidate.
    ///
    /// The check is deliberately asymmetric, mirroring the roster rules as
    /// deployed: a recurring candidate is only checked against recurring
    /// records on the same weekday, while a one-time candidate is checked
    /// against one-time records on the same date and against recurring
    /// records whose weekday matches that date. A new recurring block is
    /// therefore never rejected for colliding with an existing one-time
    /// block.
    pub fn conflicts_with(&self, existing: &BlockedTime) -> bool {
        if !self.interval.overlaps(&existing.interval) {
            return false;
        }
        match (self.recurrence, existing.recurrence) {
            (Recurrence::Weekly(candidate_day), Recurrence::Weekly(existing_day)) => {
                candidate_day == existing_day
            }
            (Recurrence::Weekly(_), Recurrence::OneTime(_)) => false,
            (Recurrence::OneTime(candidate_date), Recurrence::OneTime(existing_date)) => {
                candidate_date == existing_date
            }
            (Recurrence::OneTime(candidate_date), Recurrence::Weekly(existing_day)) => {
                candidate_date.weekday() == existing_day
            }
        }
    }
}

/// Scan `existing` for a record conflicting with `candidate`, skipping the
/// record named by `exclude` so update checks can ignore the block being
/// edited.
pub fn find_conflict<'a>(
    existing: &'a [BlockedTime],
    candidate: &BlockedTime,
    exclude: Option<&BlockedTimeId>,
) -> Option<&'a BlockedTime> {
    existing
        .iter()
        .filter(|record| Some(record.id()) != exclude)
        .find(|record| candidate.conflicts_with(record))
}
