use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BusinessId, StaffProfileId, TimeOffRequestId};

/// Leave categories offered on the staff roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOffType {
    Vacation,
    SickLeave,
    Personal,
    Training,
    Other,
}

/// Approval state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOffStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl TimeOffStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TimeOffStatus::Pending => "pending",
            TimeOffStatus::Approved => "approved",
            TimeOffStatus::Rejected => "rejected",
            TimeOffStatus::Cancelled => "cancelled",
        }
    }
}

/// Validation and transition failures for leave requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeOffError {
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("request is already approved")]
    AlreadyApproved,
    #[error("request is already rejected")]
    AlreadyRejected,
    #[error("request is already cancelled")]
    AlreadyCancelled,
    #[error("cannot cancel a period that has already started ({start})")]
    CannotCancelStartedPeriod { start: NaiveDate },
}

/// A staff-initiated, manager-approved multi-day absence.
///
/// Requests are never deleted; they only move through the status machine
/// (`Pending` to `Approved`/`Rejected`/`Cancelled`), keeping the whole leave
/// history as an audit trail. All mutation goes through the transition
/// methods below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffRequest {
    id: TimeOffRequestId,
    staff_profile_id: StaffProfileId,
    business_id: BusinessId,
    start_date: NaiveDate,
    end_date: NaiveDate,
    kind: TimeOffType,
    notes: Option<String>,
    status: TimeOffStatus,
    requested_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    approved_by: Option<StaffProfileId>,
    rejection_reason: Option<String>,
}

impl TimeOffRequest {
    /// Create a pending request for the inclusive date range `[start, end]`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TimeOffRequestId,
        staff_profile_id: StaffProfileId,
        business_id: BusinessId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        kind: TimeOffType,
        notes: Option<String>,
        requested_at: DateTime<Utc>,
    ) -> Result<Self, TimeOffError> {
        if end_date < start_date {
            return Err(TimeOffError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            id,
            staff_profile_id,
            business_id,
            start_date,
            end_date,
            kind,
            notes,
            status: TimeOffStatus::Pending,
            requested_at,
            approved_at: None,
            approved_by: None,
            rejection_reason: None,
        })
    }

    pub fn id(&self) -> &TimeOffRequestId {
        &self.id
    }

    pub fn staff_profile_id(&self) -> &StaffProfileId {
        &self.staff_profile_id
    }

    pub fn business_id(&self) -> &BusinessId {
        &self.business_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn kind(&self) -> TimeOffType {
        self.kind
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn status(&self) -> TimeOffStatus {
        self.status
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    pub fn approved_by(&self) -> Option<&StaffProfileId> {
        self.approved_by.as_ref()
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Approve a pending request, recording who approved it and when.
    pub fn approve(
        &mut self,
        approver: StaffProfileId,
        now: DateTime<Utc>,
    ) -> Result<(), TimeOffError> {
        self.ensure_pending()?;
        self.status = TimeOffStatus::Approved;
        self.approved_at = Some(now);
        self.approved_by = Some(approver);
        Ok(())
    }

    /// Reject a pending request, storing the optional reason.
    pub fn reject(&mut self, reason: Option<String>) -> Result<(), TimeOffError> {
        self.ensure_pending()?;
        self.status = TimeOffStatus::Rejected;
        self.rejection_reason = reason;
        Ok(())
    }

    /// Cancel a pending or approved request whose period has not yet started.
    pub fn cancel(&mut self, today: NaiveDate) -> Result<(), TimeOffError> {
        if self.status == TimeOffStatus::Cancelled {
            return Err(TimeOffError::AlreadyCancelled);
        }
        if today >= self.start_date {
            return Err(TimeOffError::CannotCancelStartedPeriod {
                start: self.start_date,
            });
        }
        if self.status == TimeOffStatus::Rejected {
            return Err(TimeOffError::AlreadyRejected);
        }
        self.status = TimeOffStatus::Cancelled;
        Ok(())
    }

    /// Inclusive-date overlap against another period.
    pub fn overlaps_range(&self, other_start: NaiveDate, other_end: NaiveDate) -> bool {
        self.start_date <= other_end && self.end_date >= other_start
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    fn ensure_pending(&self) -> Result<(), TimeOffError> {
        match self.status {
            TimeOffStatus::Pending => Ok(()),
            TimeOffStatus::Approved => Err(TimeOffError::AlreadyApproved),
            TimeOffStatus::Rejected => Err(TimeOffError::AlreadyRejected),
            TimeOffStatus::Cancelled => Err(TimeOffError::AlreadyCancelled),
        }
    }
}
