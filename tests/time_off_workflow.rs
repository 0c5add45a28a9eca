use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use salon_scheduling::scheduling::{
    BusinessId, Clock, RepositoryError, StaffProfileId, TimeOffError, TimeOffRepository,
    TimeOffRequest, TimeOffRequestId, TimeOffService, TimeOffServiceError, TimeOffStatus,
    TimeOffType,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

struct FrozenClock {
    today: NaiveDate,
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.today
            .and_hms_opt(9, 0, 0)
            .expect("valid time")
            .and_utc()
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

/// Minimal adapter proving the repository seam is implementable outside the
/// crate.
#[derive(Default)]
struct InMemoryTimeOff {
    records: Mutex<HashMap<TimeOffRequestId, TimeOffRequest>>,
}

impl TimeOffRepository for InMemoryTimeOff {
    fn insert(&self, request: TimeOffRequest) -> Result<TimeOffRequest, RepositoryError> {
        let mut records = self.records.lock().expect("lock poisoned");
        if records.contains_key(request.id()) {
            return Err(RepositoryError::Conflict);
        }
        records.insert(request.id().clone(), request.clone());
        Ok(request)
    }

    fn update(&self, request: TimeOffRequest) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().expect("lock poisoned");
        if !records.contains_key(request.id()) {
            return Err(RepositoryError::NotFound);
        }
        records.insert(request.id().clone(), request);
        Ok(())
    }

    fn fetch(&self, id: &TimeOffRequestId) -> Result<Option<TimeOffRequest>, RepositoryError> {
        Ok(self.records.lock().expect("lock poisoned").get(id).cloned())
    }

    fn approved_for_staff(
        &self,
        staff_profile_id: &StaffProfileId,
    ) -> Result<Vec<TimeOffRequest>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("lock poisoned")
            .values()
            .filter(|request| {
                request.staff_profile_id() == staff_profile_id
                    && request.status() == TimeOffStatus::Approved
            })
            .cloned()
            .collect())
    }
}

fn workflow() -> TimeOffService<InMemoryTimeOff, FrozenClock> {
    TimeOffService::new(
        Arc::new(InMemoryTimeOff::default()),
        Arc::new(FrozenClock {
            today: date(2025, 6, 1),
        }),
    )
}

fn stylist() -> StaffProfileId {
    StaffProfileId("stylist-1".to_string())
}

fn salon() -> BusinessId {
    BusinessId("salon-1".to_string())
}

fn owner() -> StaffProfileId {
    StaffProfileId("owner-1".to_string())
}

#[test]
fn request_lifecycle_keeps_an_audit_trail() {
    let service = workflow();

    let request = service
        .request(
            stylist(),
            salon(),
            date(2025, 8, 4),
            date(2025, 8, 8),
            TimeOffType::Vacation,
            Some("cruise".to_string()),
        )
        .expect("request accepted");
    assert_eq!(request.status(), TimeOffStatus::Pending);
    assert_eq!(request.notes(), Some("cruise"));

    let approved = service.approve(request.id(), owner()).expect("approved");
    assert_eq!(approved.status(), TimeOffStatus::Approved);
    assert_eq!(approved.approved_by(), Some(&owner()));
    assert!(approved.approved_at().is_some());

    // Approved leave can still be cancelled ahead of its start date.
    let cancelled = service.cancel(request.id()).expect("cancelled");
    assert_eq!(cancelled.status(), TimeOffStatus::Cancelled);

    // Terminal: no further transitions.
    match service.approve(request.id(), owner()) {
        Err(TimeOffServiceError::Validation(TimeOffError::AlreadyCancelled)) => {}
        other => panic!("expected already cancelled, got {other:?}"),
    }
}

#[test]
fn overlapping_approvals_are_blocked_either_way() {
    let service = workflow();

    let july = service
        .request(
            stylist(),
            salon(),
            date(2025, 7, 14),
            date(2025, 7, 18),
            TimeOffType::Vacation,
            None,
        )
        .expect("july request accepted");
    let overlapping = service
        .request(
            stylist(),
            salon(),
            date(2025, 7, 18),
            date(2025, 7, 21),
            TimeOffType::Personal,
            None,
        )
        .expect("overlapping pending request accepted");

    service.approve(july.id(), owner()).expect("approved");

    match service.approve(overlapping.id(), owner()) {
        Err(TimeOffServiceError::OverlapConflict { other }) => assert_eq!(&other, july.id()),
        other => panic!("expected overlap conflict, got {other:?}"),
    }

    // And new requests over the approved period are refused outright.
    match service.request(
        stylist(),
        salon(),
        date(2025, 7, 16),
        date(2025, 7, 17),
        TimeOffType::SickLeave,
        None,
    ) {
        Err(TimeOffServiceError::OverlapConflict { .. }) => {}
        other => panic!("expected overlap conflict, got {other:?}"),
    }

    // Cancelling the approved leave frees the period again.
    service.cancel(july.id()).expect("cancelled");
    service
        .request(
            stylist(),
            salon(),
            date(2025, 7, 16),
            date(2025, 7, 17),
            TimeOffType::SickLeave,
            None,
        )
        .expect("period is free after cancellation");
}

#[test]
fn rejection_is_terminal_and_keeps_the_reason() {
    let service = workflow();

    let request = service
        .request(
            stylist(),
            salon(),
            date(2025, 9, 1),
            date(2025, 9, 3),
            TimeOffType::Training,
            None,
        )
        .expect("request accepted");
    let rejected = service
        .reject(request.id(), Some("certification already scheduled".to_string()))
        .expect("rejected");
    assert_eq!(rejected.status(), TimeOffStatus::Rejected);
    assert_eq!(
        rejected.rejection_reason(),
        Some("certification already scheduled")
    );

    match service.cancel(request.id()) {
        Err(TimeOffServiceError::Validation(TimeOffError::AlreadyRejected)) => {}
        other => panic!("expected already rejected, got {other:?}"),
    }
}
