use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};

use crate::scheduling::blocked_time::BlockedTime;
use crate::scheduling::ids::{BlockedTimeId, BusinessId, StaffProfileId, TimeOffRequestId};
use crate::scheduling::repository::{
    BlockedTimeRepository, Clock, RepositoryError, ScheduleRepository, TimeOffRepository,
};
use crate::scheduling::schedule::WeeklySchedule;
use crate::scheduling::time_off::{TimeOffRequest, TimeOffStatus};
use crate::scheduling::workday::WorkDay;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

pub(super) fn staff() -> StaffProfileId {
    StaffProfileId("staff-1".to_string())
}

pub(super) fn business() -> BusinessId {
    BusinessId("biz-1".to_string())
}

/// Monday through Friday 09:00-18:00 with a 13:00-14:00 break.
pub(super) fn weekday_schedule() -> WeeklySchedule {
    let day = WorkDay::with_break(time(9, 0), time(18, 0), time(13, 0), time(14, 0))
        .expect("valid work day");
    WeeklySchedule::from_days(
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
        .into_iter()
        .map(|weekday| (weekday, day)),
    )
}

/// Clock pinned to a fixed instant so cancellation-window checks are
/// deterministic.
pub(super) struct FixedClock {
    pub now: DateTime<Utc>,
}

impl FixedClock {
    pub(super) fn at(today: NaiveDate) -> Self {
        Self {
            now: today.and_hms_opt(8, 0, 0).expect("valid time").and_utc(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

#[derive(Default)]
pub(super) struct MemoryScheduleRepository {
    schedules: Mutex<HashMap<StaffProfileId, WeeklySchedule>>,
}

impl MemoryScheduleRepository {
    pub(super) fn with_schedule(staff: StaffProfileId, schedule: WeeklySchedule) -> Self {
        let repository = Self::default();
        repository
            .schedules
            .lock()
            .expect("schedule lock poisoned")
            .insert(staff, schedule);
        repository
    }
}

impl ScheduleRepository for MemoryScheduleRepository {
    fn weekly_schedule(
        &self,
        staff_profile_id: &StaffProfileId,
    ) -> Result<Option<WeeklySchedule>, RepositoryError> {
        Ok(self
            .schedules
            .lock()
            .expect("schedule lock poisoned")
            .get(staff_profile_id)
            .copied())
    }
}

#[derive(Default)]
pub(super) struct MemoryTimeOffRepository {
    requests: Mutex<HashMap<TimeOffRequestId, TimeOffRequest>>,
    unavailable: Mutex<bool>,
}

impl MemoryTimeOffRepository {
    pub(super) fn make_unavailable(&self) {
        *self.unavailable.lock().expect("flag lock poisoned") = true;
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if *self.unavailable.lock().expect("flag lock poisoned") {
            return Err(RepositoryError::Unavailable("store offline".to_string()));
        }
        Ok(())
    }
}

impl TimeOffRepository for MemoryTimeOffRepository {
    fn insert(&self, request: TimeOffRequest) -> Result<TimeOffRequest, RepositoryError> {
        self.check_available()?;
        let mut requests = self.requests.lock().expect("request lock poisoned");
        if requests.contains_key(request.id()) {
            return Err(RepositoryError::Conflict);
        }
        requests.insert(request.id().clone(), request.clone());
        Ok(request)
    }

    fn update(&self, request: TimeOffRequest) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut requests = self.requests.lock().expect("request lock poisoned");
        if !requests.contains_key(request.id()) {
            return Err(RepositoryError::NotFound);
        }
        requests.insert(request.id().clone(), request);
        Ok(())
    }

    fn fetch(&self, id: &TimeOffRequestId) -> Result<Option<TimeOffRequest>, RepositoryError> {
        self.check_available()?;
        Ok(self
            .requests
            .lock()
            .expect("request lock poisoned")
            .get(id)
            .cloned())
    }

    fn approved_for_staff(
        &self,
        staff_profile_id: &StaffProfileId,
    ) -> Result<Vec<TimeOffRequest>, RepositoryError> {
        self.check_available()?;
        Ok(self
            .requests
            .lock()
            .expect("request lock poisoned")
            .values()
            .filter(|request| {
                request.staff_profile_id() == staff_profile_id
                    && request.status() == TimeOffStatus::Approved
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryBlockedTimeRepository {
    blocks: Mutex<HashMap<BlockedTimeId, BlockedTime>>,
}

impl BlockedTimeRepository for MemoryBlockedTimeRepository {
    fn insert(&self, block: BlockedTime) -> Result<BlockedTime, RepositoryError> {
        let mut blocks = self.blocks.lock().expect("block lock poisoned");
        if blocks.contains_key(block.id()) {
            return Err(RepositoryError::Conflict);
        }
        blocks.insert(block.id().clone(), block.clone());
        Ok(block)
    }

    fn delete(&self, id: &BlockedTimeId) -> Result<(), RepositoryError> {
        let mut blocks = self.blocks.lock().expect("block lock poisoned");
        blocks.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn for_staff(
        &self,
        staff_profile_id: &StaffProfileId,
    ) -> Result<Vec<BlockedTime>, RepositoryError> {
        Ok(self
            .blocks
            .lock()
            .expect("block lock poisoned")
            .values()
            .filter(|block| block.staff_profile_id() == staff_profile_id)
            .cloned()
            .collect())
    }
}
