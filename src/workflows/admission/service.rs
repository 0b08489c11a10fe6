use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::AdmissionConfig;

use super::allocation::{self, AllocationError, AllocationOutcome};
use super::domain::{
    AllocationStatus, Applicant, ApplicantId, ApplicationForm, ConsistencyError, DepartmentId,
    VerificationStatus,
};
use super::intake::{IntakeError, IntakeGuard};
use super::merit::{self, MeritList};
use super::repository::{
    AdmissionNotice, ApplicantRepository, ApplicantStatusView, NotificationError,
    NotificationPublisher, RepositoryError,
};

/// Admin ruling on a pending application's documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

/// Facade composing the intake guard, ranking engine, and seat allocator
/// over caller-supplied storage and notification ports.
///
/// Concurrency contract: callers serialize allocation runs per department.
/// Two interleaved `run_allocation` calls for the same department could
/// over-commit seats; the engine assumes, not arbitrates, that exclusion.
pub struct AdmissionService<R, N> {
    guard: IntakeGuard,
    repository: Arc<R>,
    notifications: Arc<N>,
    seat_plan: BTreeMap<DepartmentId, u32>,
    reference_date: NaiveDate,
}

impl<R, N> AdmissionService<R, N>
where
    R: ApplicantRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifications: Arc<N>, config: AdmissionConfig) -> Self {
        let seat_plan: BTreeMap<DepartmentId, u32> = config
            .seat_plan
            .into_iter()
            .map(|department| (department.id, department.capacity))
            .collect();
        let guard = IntakeGuard::new(seat_plan.keys().cloned());

        Self {
            guard,
            repository,
            notifications,
            seat_plan,
            reference_date: config.reference_date,
        }
    }

    /// Accept a student's application, enforcing one application per
    /// applicant before the record ever reaches the ranker.
    pub fn submit(&self, form: ApplicationForm) -> Result<Applicant, AdmissionServiceError> {
        let applicant_id = form.applicant;
        let applicant = self.guard.applicant_from_form(form, self.reference_date)?;

        let stored = self.repository.insert(applicant).map_err(|err| match err {
            RepositoryError::Conflict => AdmissionServiceError::DuplicateApplication(applicant_id),
            other => AdmissionServiceError::Repository(other),
        })?;

        tracing::info!(applicant = %stored.id, department = %stored.department, "application submitted");
        Ok(stored)
    }

    /// Record the document review outcome and notify the student.
    ///
    /// Touches verification state only; allocation state stays with the
    /// allocator.
    pub fn review_documents(
        &self,
        applicant_id: &ApplicantId,
        decision: ReviewDecision,
    ) -> Result<Applicant, AdmissionServiceError> {
        let mut applicant = self
            .repository
            .fetch(applicant_id)?
            .ok_or(RepositoryError::NotFound)?;

        let (status, template) = match decision {
            ReviewDecision::Approve => (VerificationStatus::Verified, "documents_verified"),
            ReviewDecision::Reject => (VerificationStatus::Rejected, "documents_rejected"),
        };
        applicant.verification = status;
        self.repository.update(applicant.clone())?;

        self.notifications.publish(AdmissionNotice {
            template: template.to_string(),
            applicant: applicant.id,
            recipient: applicant.email.clone(),
            details: BTreeMap::new(),
        })?;

        tracing::info!(applicant = %applicant.id, status = status.label(), "documents reviewed");
        Ok(applicant)
    }

    /// Compute a fresh merit list for one department's current pool.
    pub fn merit_list(
        &self,
        department: &DepartmentId,
    ) -> Result<MeritList, AdmissionServiceError> {
        let pool = self.repository.by_department(department)?;
        let list = merit::rank(department, &pool, self.reference_date)?;

        for entry in &list.excluded {
            tracing::warn!(applicant = %entry.applicant, reason = %entry.reason, "applicant excluded from merit list");
        }

        Ok(list)
    }

    /// Pending applications across departments, best-qualified first, for
    /// the admin review screen.
    pub fn review_queue(&self) -> Result<Vec<Applicant>, AdmissionServiceError> {
        let mut pending = self.repository.pending_review()?;
        pending.sort_by(|a, b| merit::compare(a, b, self.reference_date));
        Ok(pending)
    }

    /// Rank the department's pool, allocate seats, persist the resulting
    /// state transitions, and notify newly seated students.
    ///
    /// Safe to re-run after every verification batch: unchanged inputs
    /// reproduce the same buckets and send no duplicate offers.
    pub fn run_allocation(
        &self,
        department: &DepartmentId,
    ) -> Result<AllocationOutcome, AdmissionServiceError> {
        let capacity = *self
            .seat_plan
            .get(department)
            .ok_or_else(|| AdmissionServiceError::UnknownDepartment(department.clone()))?;

        let pool = self.repository.by_department(department)?;
        let merit_list = merit::rank(department, &pool, self.reference_date)?;

        let mut snapshot: BTreeMap<ApplicantId, Applicant> = pool
            .into_iter()
            .map(|applicant| (applicant.id, applicant))
            .collect();
        let before: BTreeMap<ApplicantId, AllocationStatus> = snapshot
            .iter()
            .map(|(id, applicant)| (*id, applicant.allocation.clone()))
            .collect();

        let outcome = allocation::allocate(&merit_list, i64::from(capacity), &mut snapshot)?;

        for id in outcome.allocated.iter().chain(&outcome.waitlisted) {
            let applicant = snapshot
                .get(id)
                .ok_or(ConsistencyError::UnknownApplicant(*id))?;
            if before.get(id) != Some(&applicant.allocation) {
                self.repository.update(applicant.clone())?;
            }
        }

        for id in &outcome.allocated {
            let newly_seated = !matches!(before.get(id), Some(AllocationStatus::Allocated(held)) if held == department);
            if !newly_seated {
                continue;
            }
            let applicant = snapshot
                .get(id)
                .ok_or(ConsistencyError::UnknownApplicant(*id))?;
            let mut details = BTreeMap::new();
            details.insert("department".to_string(), department.to_string());
            self.notifications.publish(AdmissionNotice {
                template: "seat_allocated".to_string(),
                applicant: *id,
                recipient: applicant.email.clone(),
                details,
            })?;
        }

        tracing::info!(
            department = %department,
            allocated = outcome.allocated_count(),
            waitlisted = outcome.waitlisted_count(),
            "allocation run completed"
        );
        Ok(outcome)
    }

    /// Status summary for the student-facing status page.
    pub fn status(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<ApplicantStatusView, AdmissionServiceError> {
        let applicant = self
            .repository
            .fetch(applicant_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(ApplicantStatusView::from(&applicant))
    }
}

/// Error raised by the admission service facade.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error("{0} has already submitted an application")]
    DuplicateApplication(ApplicantId),
    #[error("no seat plan configured for department {0}")]
    UnknownDepartment(DepartmentId),
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
