//! Admission workflow: application intake, merit ranking, and seat
//! allocation.
//!
//! The ranking and allocation engines are pure functions over immutable
//! snapshots; `AdmissionService` wires them to caller-supplied storage and
//! notification ports.

pub mod allocation;
pub mod domain;
pub mod intake;
pub mod merit;
pub mod report;
pub mod repository;
pub mod service;


pub use allocation::{allocate, AllocationError, AllocationOutcome, ConfigurationError};
pub use domain::{
    AcademicField, AcademicRecord, AllocationStatus, Applicant, ApplicantId, ApplicationForm,
    ConsistencyError, Department, DepartmentId, DocumentDescriptor, ValidationError,
    VerificationStatus,
};
pub use intake::{IntakeError, IntakeGuard};
pub use merit::{rank, ExcludedApplicant, MeritList};
pub use report::{merit_list_csv, ReportError};
pub use repository::{
    AdmissionNotice, ApplicantRepository, ApplicantStatusView, NotificationError,
    NotificationPublisher, RepositoryError,
};
pub use service::{AdmissionService, AdmissionServiceError, ReviewDecision};
