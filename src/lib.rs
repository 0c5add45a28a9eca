//! Staff scheduling and availability engine for a multi-tenant salon
//! management backend.
//!
//! The crate owns the scheduling core only: weekly working patterns, leave
//! requests with their approval workflow, blocked periods with their conflict
//! policy, and the pure calculator that combines all three into bookable
//! time windows. Persistence, HTTP, and auth live behind the repository
//! traits in [`scheduling::repository`].

pub mod config;
pub mod scheduling;
pub mod telemetry;
