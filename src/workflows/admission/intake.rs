use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::domain::{
    AcademicField, AcademicRecord, AllocationStatus, Applicant, ApplicationForm, DepartmentId,
    ValidationError, VerificationStatus,
};

/// Errors raised while admitting a raw form into the applicant pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("department {0} is not part of the configured seat plan")]
    UnknownDepartment(DepartmentId),
    #[error("no supporting documents were attached")]
    MissingDocuments,
}

/// Guard responsible for producing validated `Applicant` records.
///
/// Mirrors the submission form checks the web layer performs before an
/// application row is written: every academic field present and in range,
/// the chosen department actually offering seats, and at least one document
/// attached for the verification queue.
#[derive(Debug, Clone)]
pub struct IntakeGuard {
    departments: BTreeSet<DepartmentId>,
}

impl IntakeGuard {
    pub fn new(departments: impl IntoIterator<Item = DepartmentId>) -> Self {
        Self {
            departments: departments.into_iter().collect(),
        }
    }

    pub fn departments(&self) -> impl Iterator<Item = &DepartmentId> {
        self.departments.iter()
    }

    /// Convert an inbound form into a validated applicant record.
    ///
    /// New records always start `Pending`/`Unallocated`; only the review and
    /// allocation flows move them on from there.
    pub fn applicant_from_form(
        &self,
        form: ApplicationForm,
        reference_date: NaiveDate,
    ) -> Result<Applicant, IntakeError> {
        if !self.departments.contains(&form.department) {
            return Err(IntakeError::UnknownDepartment(form.department));
        }

        if form.documents.is_empty() {
            return Err(IntakeError::MissingDocuments);
        }

        let academics = AcademicRecord {
            entrance_score: require(form.entrance_score, AcademicField::EntranceScore)?,
            percentage_12th: require(form.percentage_12th, AcademicField::Percentage12th)?,
            percentage_10th: require(form.percentage_10th, AcademicField::Percentage10th)?,
            date_of_birth: require(form.date_of_birth, AcademicField::DateOfBirth)?,
        };
        academics.validate(reference_date)?;

        Ok(Applicant {
            id: form.applicant,
            name: form.name,
            email: form.email,
            department: form.department,
            academics,
            verification: VerificationStatus::Pending,
            allocation: AllocationStatus::Unallocated,
        })
    }
}

fn require<T>(value: Option<T>, field: AcademicField) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}
