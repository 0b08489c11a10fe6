use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Applicant, ApplicantId, ConsistencyError, DepartmentId, ValidationError};

/// Strict merit ordering of one department's applicant pool.
///
/// Derived data: valid only for the snapshot it was computed from. Any
/// change in the pool (new applicants, verification updates) calls for a
/// fresh `rank` run; the list is never patched incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeritList {
    pub department: DepartmentId,
    pub reference_date: NaiveDate,
    /// Applicant ids, best-qualified first. A strict total order: no two
    /// entries compare equal.
    pub order: Vec<ApplicantId>,
    /// Applicants rejected from the ordering, each with the offending field.
    pub excluded: Vec<ExcludedApplicant>,
}

impl MeritList {
    pub fn position(&self, applicant: &ApplicantId) -> Option<usize> {
        self.order.iter().position(|id| id == applicant)
    }
}

/// An applicant reported out of the ranking instead of silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedApplicant {
    pub applicant: ApplicantId,
    pub reason: ValidationError,
}

/// Produce the merit list for one department.
///
/// The caller partitions the pool by department before calling; a foreign
/// or duplicate applicant id here is a caller bug and fails the whole run.
/// Ordering is a strict lexicographic comparison, descending on entrance
/// score, 12th percentage, 10th percentage, then age in whole years on the
/// reference date (older first), with ascending applicant id breaking any
/// remaining tie. Pure function of the snapshot: identical input yields an
/// identical sequence, regardless of the order applicants arrive in.
pub fn rank(
    department: &DepartmentId,
    applicants: &[Applicant],
    reference_date: NaiveDate,
) -> Result<MeritList, ConsistencyError> {
    let mut seen = BTreeSet::new();
    let mut ranked: Vec<(MeritKey, ApplicantId)> = Vec::with_capacity(applicants.len());
    let mut excluded = Vec::new();

    for applicant in applicants {
        if applicant.department != *department {
            return Err(ConsistencyError::ForeignDepartment {
                applicant: applicant.id,
                expected: department.clone(),
                found: applicant.department.clone(),
            });
        }
        if !seen.insert(applicant.id) {
            return Err(ConsistencyError::DuplicateApplicant(applicant.id));
        }

        match applicant.academics.validate(reference_date) {
            Ok(()) => ranked.push((MeritKey::of(applicant, reference_date), applicant.id)),
            Err(reason) => excluded.push(ExcludedApplicant {
                applicant: applicant.id,
                reason,
            }),
        }
    }

    // Descending on the key tuple, ascending on id; ids are unique, so the
    // comparison never returns Equal for distinct entries.
    ranked.sort_by(|(key_a, id_a), (key_b, id_b)| key_b.cmp(key_a).then_with(|| id_a.cmp(id_b)));
    excluded.sort_by_key(|entry| entry.applicant);

    Ok(MeritList {
        department: department.clone(),
        reference_date,
        order: ranked.into_iter().map(|(_, id)| id).collect(),
        excluded,
    })
}

/// Compare two applicants under the merit order, better rank first.
///
/// Exposed to callers that sort mixed pools (the admin review queue orders
/// pending applications across departments the same way).
pub fn compare(a: &Applicant, b: &Applicant, reference_date: NaiveDate) -> Ordering {
    MeritKey::of(b, reference_date)
        .cmp(&MeritKey::of(a, reference_date))
        .then_with(|| a.id.cmp(&b.id))
}

/// Lexicographic ranking key; tuple ordering gives the strict comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct MeritKey {
    entrance_score: u16,
    percentage_12th: u16,
    percentage_10th: u16,
    age_years: i32,
}

impl MeritKey {
    fn of(applicant: &Applicant, reference_date: NaiveDate) -> Self {
        Self {
            entrance_score: applicant.academics.entrance_score,
            percentage_12th: applicant.academics.percentage_12th,
            percentage_10th: applicant.academics.percentage_10th,
            age_years: applicant.academics.age_on(reference_date),
        }
    }
}
