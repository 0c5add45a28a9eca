//! Staff scheduling and availability: the rules that turn a weekly working
//! pattern plus exception data (approved leave, blocked periods) into
//! bookable time windows, and the conflict checks that keep that exception
//! data consistent.

pub mod availability;
pub mod blocked_time;
pub mod ids;
pub mod interval;
pub mod repository;
pub mod schedule;
pub mod service;
pub mod time_off;
pub mod workday;

#[cfg(test)]
mod tests;

pub use blocked_time::{find_conflict, BlockedTime, Recurrence};
pub use ids::{BlockedTimeId, BusinessId, StaffProfileId, TimeOffRequestId};
pub use interval::{InvalidInterval, TimeInterval};
pub use repository::{
    BlockedTimeRepository, Clock, RepositoryError, ScheduleRepository, SystemClock,
    TimeOffRepository,
};
pub use schedule::{MalformedScheduleData, WeeklySchedule};
pub use service::{
    AvailabilityService, AvailabilityServiceError, BlockedTimeService, BlockedTimeServiceError,
    TimeOffService, TimeOffServiceError,
};
pub use time_off::{TimeOffError, TimeOffRequest, TimeOffStatus, TimeOffType};
pub use workday::{WorkDay, WorkDayError};
