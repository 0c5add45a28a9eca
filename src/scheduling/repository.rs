use chrono::{DateTime, NaiveDate, Utc};

use super::blocked_time::BlockedTime;
use super::ids::{BlockedTimeId, StaffProfileId, TimeOffRequestId};
use super::schedule::WeeklySchedule;
use super::time_off::TimeOffRequest;

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage seam for a staff member's weekly pattern.
///
/// `None` means the profile has no schedule on file, which the availability
/// service treats as every day off.
pub trait ScheduleRepository: Send + Sync {
    fn weekly_schedule(
        &self,
        staff_profile_id: &StaffProfileId,
    ) -> Result<Option<WeeklySchedule>, RepositoryError>;
}

/// Storage seam for leave requests.
///
/// The services run check-then-write sequences against this trait (overlap
/// check followed by `insert`/`update`); adapters must serialize those
/// sequences per staff profile, e.g. with a per-aggregate transaction or
/// advisory lock, or two racing approvals can both pass the check.
pub trait TimeOffRepository: Send + Sync {
    fn insert(&self, request: TimeOffRequest) -> Result<TimeOffRequest, RepositoryError>;
    fn update(&self, request: TimeOffRequest) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &TimeOffRequestId) -> Result<Option<TimeOffRequest>, RepositoryError>;
    /// All approved requests for the staff member. Adapters may narrow this
    /// by date range; the services only rely on every approved request
    /// overlapping the checked range being present.
    fn approved_for_staff(
        &self,
        staff_profile_id: &StaffProfileId,
    ) -> Result<Vec<TimeOffRequest>, RepositoryError>;
}

/// Storage seam for blocked periods. Same per-staff serialization obligation
/// as [`TimeOffRepository`].
pub trait BlockedTimeRepository: Send + Sync {
    fn insert(&self, block: BlockedTime) -> Result<BlockedTime, RepositoryError>;
    fn delete(&self, id: &BlockedTimeId) -> Result<(), RepositoryError>;
    /// All blocks for the staff member. Recurring records must always be
    /// included regardless of any date-range narrowing, since they can apply
    /// to any date.
    fn for_staff(
        &self,
        staff_profile_id: &StaffProfileId,
    ) -> Result<Vec<BlockedTime>, RepositoryError>;
}

/// Injected clock so commands never reach for ambient time.
///
/// `today` is the staff member's already-resolved local calendar date;
/// time-zone resolution happens outside this crate.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    fn today(&self) -> NaiveDate;
}

/// Wall-clock implementation for production wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}
