use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{AllocationStatus, Applicant, ApplicantId, DepartmentId, VerificationStatus};

/// Storage abstraction so the service facade can be exercised in isolation.
/// The surrounding system supplies the real persistence behind it.
pub trait ApplicantRepository: Send + Sync {
    fn insert(&self, applicant: Applicant) -> Result<Applicant, RepositoryError>;
    fn update(&self, applicant: Applicant) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError>;
    fn by_department(&self, department: &DepartmentId) -> Result<Vec<Applicant>, RepositoryError>;
    fn pending_review(&self) -> Result<Vec<Applicant>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("applicant record already exists")]
    Conflict,
    #[error("applicant record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook standing in for the mail relay that tells
/// students about verification results and admission offers.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notice: AdmissionNotice) -> Result<(), NotificationError>;
}

/// Notice payload handed to the notification adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionNotice {
    pub template: String,
    pub applicant: ApplicantId,
    pub recipient: String,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Student-facing status summary, worded the way the status page shows it.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicantStatusView {
    pub applicant: ApplicantId,
    pub name: String,
    pub document_status: &'static str,
    pub allocation_status: String,
}

impl From<&Applicant> for ApplicantStatusView {
    fn from(applicant: &Applicant) -> Self {
        let allocation_status = match (&applicant.verification, &applicant.allocation) {
            (VerificationStatus::Pending, _) => "document verification is pending".to_string(),
            (VerificationStatus::Rejected, _) => "documents not verified".to_string(),
            (VerificationStatus::Verified, AllocationStatus::Allocated(department)) => {
                format!("seat allocated in {department}")
            }
            (VerificationStatus::Verified, AllocationStatus::Waitlisted) => {
                "waitlisted for a seat".to_string()
            }
            (VerificationStatus::Verified, AllocationStatus::Unallocated) => {
                "awaiting seat allocation".to_string()
            }
        };

        Self {
            applicant: applicant.id,
            name: applicant.name.clone(),
            document_status: applicant.verification.label(),
            allocation_status,
        }
    }
}
