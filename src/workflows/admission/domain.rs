use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifier for a student's single admission application.
///
/// Issued when the student account is created, immutable afterwards. The
/// ordering on ids is the tie-break of last resort during ranking, so the
/// wrapper derives `Ord`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ApplicantId(pub u64);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "applicant-{:06}", self.0)
    }
}

/// Identifier wrapper for departments offering seats.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DepartmentId(pub String);

impl DepartmentId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A department's seat plan, fixed for the duration of an allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub capacity: u32,
}

/// Academic attributes exactly as captured at intake.
///
/// Percentages and the entrance score live on a 0-100 scale; `validate`
/// rejects anything outside it rather than coercing, since a coerced zero
/// would silently corrupt the merit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicRecord {
    pub entrance_score: u16,
    pub percentage_12th: u16,
    pub percentage_10th: u16,
    pub date_of_birth: NaiveDate,
}

impl AcademicRecord {
    /// Check every academic field against the admissible range, naming the
    /// first offending field.
    pub fn validate(&self, reference_date: NaiveDate) -> Result<(), ValidationError> {
        Self::in_range(AcademicField::EntranceScore, self.entrance_score)?;
        Self::in_range(AcademicField::Percentage12th, self.percentage_12th)?;
        Self::in_range(AcademicField::Percentage10th, self.percentage_10th)?;

        if self.date_of_birth > reference_date {
            return Err(ValidationError::FutureDateOfBirth {
                date_of_birth: self.date_of_birth,
                reference: reference_date,
            });
        }

        Ok(())
    }

    /// Age in whole years on the given reference date.
    pub fn age_on(&self, reference_date: NaiveDate) -> i32 {
        let dob = self.date_of_birth;
        let mut years = reference_date.year() - dob.year();
        if (reference_date.month(), reference_date.day()) < (dob.month(), dob.day()) {
            years -= 1;
        }
        years
    }

    fn in_range(field: AcademicField, value: u16) -> Result<(), ValidationError> {
        if value > 100 {
            return Err(ValidationError::OutOfRange { field, value });
        }
        Ok(())
    }
}

/// Fields of the academic record, used to name validation offenders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcademicField {
    EntranceScore,
    Percentage12th,
    Percentage10th,
    DateOfBirth,
}

impl AcademicField {
    pub const fn label(self) -> &'static str {
        match self {
            AcademicField::EntranceScore => "entrance score",
            AcademicField::Percentage12th => "12th percentage",
            AcademicField::Percentage10th => "10th percentage",
            AcademicField::DateOfBirth => "date of birth",
        }
    }
}

impl fmt::Display for AcademicField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Malformed or out-of-range academic data, raised before any ordering
/// decision is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("{0} is missing")]
    MissingField(AcademicField),
    #[error("{field} value {value} is outside the 0-100 range")]
    OutOfRange { field: AcademicField, value: u16 },
    #[error("date of birth {date_of_birth} is after the ranking reference date {reference}")]
    FutureDateOfBirth {
        date_of_birth: NaiveDate,
        reference: NaiveDate,
    },
}

/// Caller-side desynchronization between a merit list and the applicant
/// snapshot it was computed from. Fails the whole run; never skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    #[error("merit list references {0}, which is absent from the applicant snapshot")]
    UnknownApplicant(ApplicantId),
    #[error("{applicant} targets department {found}, but the pool is for {expected}")]
    ForeignDepartment {
        applicant: ApplicantId,
        expected: DepartmentId,
        found: DepartmentId,
    },
    #[error("{0} appears more than once in the applicant pool")]
    DuplicateApplicant(ApplicantId),
}

/// Document verification state, mutated only by the admin review flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

/// Seat allocation state, mutated only by the allocator.
///
/// The department payload on `Allocated` carries the invariant that an
/// applicant holds a seat in at most one department at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationStatus {
    Unallocated,
    Allocated(DepartmentId),
    Waitlisted,
}

impl AllocationStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            AllocationStatus::Unallocated => "unallocated",
            AllocationStatus::Allocated(_) => "allocated",
            AllocationStatus::Waitlisted => "waitlisted",
        }
    }
}

/// A validated admission record for one student and one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub name: String,
    pub email: String,
    pub department: DepartmentId,
    pub academics: AcademicRecord,
    pub verification: VerificationStatus,
    pub allocation: AllocationStatus,
}

impl Applicant {
    /// Whether the allocator may consider this applicant for the given
    /// department: documents verified and no seat held elsewhere.
    pub fn eligible_for(&self, department: &DepartmentId) -> bool {
        if self.verification != VerificationStatus::Verified {
            return false;
        }
        match &self.allocation {
            AllocationStatus::Allocated(held) => held == department,
            AllocationStatus::Unallocated | AllocationStatus::Waitlisted => true,
        }
    }
}

/// Reference to an uploaded supporting document; the bytes themselves live
/// with the surrounding system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub name: String,
    pub storage_key: String,
}

/// Raw submission exactly as the student filled it in. Academic fields are
/// optional here so the intake guard can report what is missing instead of
/// inventing defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub applicant: ApplicantId,
    pub name: String,
    pub email: String,
    pub department: DepartmentId,
    pub entrance_score: Option<u16>,
    pub percentage_12th: Option<u16>,
    pub percentage_10th: Option<u16>,
    pub date_of_birth: Option<NaiveDate>,
    pub documents: Vec<DocumentDescriptor>,
}
