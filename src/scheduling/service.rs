use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Weekday};
use tracing::{info, warn};

use super::availability;
use super::blocked_time::{find_conflict, BlockedTime};
use super::ids::{BlockedTimeId, BusinessId, StaffProfileId, TimeOffRequestId};
use super::interval::{InvalidInterval, TimeInterval};
use super::repository::{
    BlockedTimeRepository, Clock, RepositoryError, ScheduleRepository, TimeOffRepository,
};
use super::schedule::WeeklySchedule;
use super::time_off::{TimeOffError, TimeOffRequest, TimeOffType};

static TIME_OFF_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static BLOCKED_TIME_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_time_off_id() -> TimeOffRequestId {
    let id = TIME_OFF_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TimeOffRequestId(format!("to-{id:06}"))
}

fn next_blocked_time_id() -> BlockedTimeId {
    let id = BLOCKED_TIME_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BlockedTimeId(format!("bt-{id:06}"))
}

/// Error raised by the time-off command service.
#[derive(Debug, thiserror::Error)]
pub enum TimeOffServiceError {
    #[error(transparent)]
    Validation(#[from] TimeOffError),
    #[error("period overlaps approved time off {other}")]
    OverlapConflict { other: TimeOffRequestId },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Command service for the leave workflow: request, approve, reject, cancel.
///
/// Before a request is accepted or approved, the candidate period is checked
/// against the staff member's *other* approved requests, so no staff member
/// ever carries two overlapping approved absences.
pub struct TimeOffService<R, C> {
    requests: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TimeOffService<R, C>
where
    R: TimeOffRepository + 'static,
    C: Clock + 'static,
{
    pub fn new(requests: Arc<R>, clock: Arc<C>) -> Self {
        Self { requests, clock }
    }

    /// Submit a new pending request.
    pub fn request(
        &self,
        staff_profile_id: StaffProfileId,
        business_id: BusinessId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        kind: TimeOffType,
        notes: Option<String>,
    ) -> Result<TimeOffRequest, TimeOffServiceError> {
        let request = TimeOffRequest::new(
            next_time_off_id(),
            staff_profile_id,
            business_id,
            start_date,
            end_date,
            kind,
            notes,
            self.clock.now(),
        )?;
        self.ensure_no_approved_overlap(
            request.staff_profile_id(),
            start_date,
            end_date,
            None,
        )?;

        let stored = self.requests.insert(request)?;
        info!(
            id = %stored.id(),
            staff = %stored.staff_profile_id(),
            "time-off request accepted"
        );
        Ok(stored)
    }

    /// Approve a pending request, re-checking the overlap invariant against
    /// every other approved request for the same staff member.
    pub fn approve(
        &self,
        id: &TimeOffRequestId,
        approver: StaffProfileId,
    ) -> Result<TimeOffRequest, TimeOffServiceError> {
        let mut request = self
            .requests
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        self.ensure_no_approved_overlap(
            request.staff_profile_id(),
            request.start_date(),
            request.end_date(),
            Some(id),
        )?;

        request.approve(approver, self.clock.now())?;
        self.requests.update(request.clone())?;
        info!(id = %request.id(), staff = %request.staff_profile_id(), "time-off approved");
        Ok(request)
    }

    /// Reject a pending request with an optional reason.
    pub fn reject(
        &self,
        id: &TimeOffRequestId,
        reason: Option<String>,
    ) -> Result<TimeOffRequest, TimeOffServiceError> {
        let mut request = self
            .requests
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        request.reject(reason)?;
        self.requests.update(request.clone())?;
        info!(id = %request.id(), staff = %request.staff_profile_id(), "time-off rejected");
        Ok(request)
    }

    /// Cancel a pending or approved request whose period has not started.
    pub fn cancel(&self, id: &TimeOffRequestId) -> Result<TimeOffRequest, TimeOffServiceError> {
        let mut request = self
            .requests
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        request.cancel(self.clock.today())?;
        self.requests.update(request.clone())?;
        info!(id = %request.id(), staff = %request.staff_profile_id(), "time-off cancelled");
        Ok(request)
    }

    fn ensure_no_approved_overlap(
        &self,
        staff_profile_id: &StaffProfileId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        exclude: Option<&TimeOffRequestId>,
    ) -> Result<(), TimeOffServiceError> {
        let approved = self.requests.approved_for_staff(staff_profile_id)?;
        if let Some(other) = approved
            .iter()
            .filter(|existing| Some(existing.id()) != exclude)
            .find(|existing| existing.overlaps_range(start_date, end_date))
        {
            warn!(
                staff = %staff_profile_id,
                other = %other.id(),
                "time-off period conflicts with approved request"
            );
            return Err(TimeOffServiceError::OverlapConflict {
                other: other.id().clone(),
            });
        }
        Ok(())
    }
}

/// Error raised by the blocked-time command service.
#[derive(Debug, thiserror::Error)]
pub enum BlockedTimeServiceError {
    #[error(transparent)]
    InvalidInterval(#[from] InvalidInterval),
    #[error("period conflicts with blocked time {other}")]
    OverlapConflict { other: BlockedTimeId },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Command service for blocked periods: create (recurring or one-time) with
/// the conflict policy applied, and hard delete.
pub struct BlockedTimeService<R, C> {
    blocks: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> BlockedTimeService<R, C>
where
    R: BlockedTimeRepository + 'static,
    C: Clock + 'static,
{
    pub fn new(blocks: Arc<R>, clock: Arc<C>) -> Self {
        Self { blocks, clock }
    }

    pub fn create_recurring(
        &self,
        staff_profile_id: StaffProfileId,
        business_id: BusinessId,
        title: Option<String>,
        start: NaiveTime,
        end: NaiveTime,
        weekday: Weekday,
    ) -> Result<BlockedTime, BlockedTimeServiceError> {
        let block = BlockedTime::recurring(
            next_blocked_time_id(),
            staff_profile_id,
            business_id,
            title,
            start,
            end,
            weekday,
            self.clock.now(),
        )?;
        self.insert_checked(block)
    }

    pub fn create_one_time(
        &self,
        staff_profile_id: StaffProfileId,
        business_id: BusinessId,
        title: Option<String>,
        start: NaiveTime,
        end: NaiveTime,
        date: NaiveDate,
    ) -> Result<BlockedTime, BlockedTimeServiceError> {
        let block = BlockedTime::one_time(
            next_blocked_time_id(),
            staff_profile_id,
            business_id,
            title,
            start,
            end,
            date,
            self.clock.now(),
        )?;
        self.insert_checked(block)
    }

    pub fn delete(&self, id: &BlockedTimeId) -> Result<(), BlockedTimeServiceError> {
        self.blocks.delete(id)?;
        info!(id = %id, "blocked time deleted");
        Ok(())
    }

    /// Conflict probe for a candidate block, skipping `exclude` so an edit
    /// can ignore the record being updated. Returns the id of the first
    /// conflicting record, if any.
    pub fn has_conflict(
        &self,
        candidate: &BlockedTime,
        exclude: Option<&BlockedTimeId>,
    ) -> Result<Option<BlockedTimeId>, BlockedTimeServiceError> {
        let existing = self.blocks.for_staff(candidate.staff_profile_id())?;
        Ok(find_conflict(&existing, candidate, exclude).map(|record| record.id().clone()))
    }

    fn insert_checked(
        &self,
        block: BlockedTime,
    ) -> Result<BlockedTime, BlockedTimeServiceError> {
        if let Some(other) = self.has_conflict(&block, None)? {
            warn!(
                staff = %block.staff_profile_id(),
                other = %other,
                "blocked time conflicts with existing record"
            );
            return Err(BlockedTimeServiceError::OverlapConflict { other });
        }
        let stored = self.blocks.insert(block)?;
        info!(id = %stored.id(), staff = %stored.staff_profile_id(), "blocked time created");
        Ok(stored)
    }
}

/// Error raised by the availability query service.
#[derive(Debug, thiserror::Error)]
pub enum AvailabilityServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Query service gathering a staff member's schedule, approved leave, and
/// blocked periods, then delegating to the pure calculator.
pub struct AvailabilityService<S, T, B> {
    schedules: Arc<S>,
    time_off: Arc<T>,
    blocked: Arc<B>,
}

impl<S, T, B> AvailabilityService<S, T, B>
where
    S: ScheduleRepository + 'static,
    T: TimeOffRepository + 'static,
    B: BlockedTimeRepository + 'static,
{
    pub fn new(schedules: Arc<S>, time_off: Arc<T>, blocked: Arc<B>) -> Self {
        Self {
            schedules,
            time_off,
            blocked,
        }
    }

    pub fn for_date(
        &self,
        staff_profile_id: &StaffProfileId,
        date: NaiveDate,
    ) -> Result<Vec<TimeInterval>, AvailabilityServiceError> {
        let (schedule, time_off, blocked) = self.inputs(staff_profile_id)?;
        Ok(availability::for_date(date, &schedule, &time_off, &blocked))
    }

    pub fn for_range(
        &self,
        staff_profile_id: &StaffProfileId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, Vec<TimeInterval>>, AvailabilityServiceError> {
        let (schedule, time_off, blocked) = self.inputs(staff_profile_id)?;
        Ok(availability::for_range(
            start_date, end_date, &schedule, &time_off, &blocked,
        ))
    }

    pub fn is_slot_available(
        &self,
        staff_profile_id: &StaffProfileId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<bool, AvailabilityServiceError> {
        let (schedule, time_off, blocked) = self.inputs(staff_profile_id)?;
        Ok(availability::is_slot_available(
            date, start, end, &schedule, &time_off, &blocked,
        ))
    }

    fn inputs(
        &self,
        staff_profile_id: &StaffProfileId,
    ) -> Result<(WeeklySchedule, Vec<TimeOffRequest>, Vec<BlockedTime>), AvailabilityServiceError>
    {
        // No schedule on file means every day is off, not an error.
        let schedule = self
            .schedules
            .weekly_schedule(staff_profile_id)?
            .unwrap_or_else(WeeklySchedule::empty);
        let time_off = self.time_off.approved_for_staff(staff_profile_id)?;
        let blocked = self.blocked.for_staff(staff_profile_id)?;
        Ok((schedule, time_off, blocked))
    }
}
