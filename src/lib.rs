//! Merit ranking and seat allocation engine for university admission
//! management.
//!
//! The surrounding system (web layer, persistence, authentication) hands
//! applicant snapshots in and persists the allocation decisions handed
//! back; this crate owns the deterministic ordering and seat assignment in
//! between.

pub mod config;
pub mod telemetry;
pub mod workflows;

pub use config::{AdmissionConfig, ConfigError};
pub use workflows::admission::{
    allocate, rank, AdmissionService, AllocationOutcome, Applicant, ApplicantId, Department,
    DepartmentId, MeritList,
};
