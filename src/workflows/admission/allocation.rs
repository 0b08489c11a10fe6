use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{AllocationStatus, Applicant, ApplicantId, ConsistencyError, DepartmentId};
use super::merit::MeritList;

/// Invalid department seat capacity; fails the whole allocation run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("department {department} has invalid seat capacity {found}")]
pub struct ConfigurationError {
    pub department: DepartmentId,
    pub found: i64,
}

/// Errors fatal to a single allocation run. Raised before any allocation
/// state is touched, so a failed run leaves the snapshot exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}

/// Outcome of one allocation run, buckets in merit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub department: DepartmentId,
    pub allocated: Vec<ApplicantId>,
    pub waitlisted: Vec<ApplicantId>,
}

impl AllocationOutcome {
    pub fn allocated_count(&self) -> usize {
        self.allocated.len()
    }

    pub fn waitlisted_count(&self) -> usize {
        self.waitlisted.len()
    }
}

/// Walk the merit list once and assign seats greedily from the top.
///
/// Applicants whose documents are not `Verified`, or who already hold a
/// seat in a different department, are skipped with their state untouched.
/// Everyone else is granted a seat while seats remain and waitlisted after
/// capacity is exhausted.
///
/// Decisions are buffered over the immutable snapshot and applied only
/// after the full walk succeeds, so an error never leaves a partial
/// allocation behind. Re-running with unchanged inputs reproduces the same
/// bucket partition and is a no-op on the applicant states.
///
/// Callers must not interleave two runs for the same department; the engine
/// assumes that mutual exclusion rather than arbitrating it.
pub fn allocate(
    merit_list: &MeritList,
    capacity: i64,
    applicants: &mut BTreeMap<ApplicantId, Applicant>,
) -> Result<AllocationOutcome, AllocationError> {
    if capacity < 0 {
        return Err(ConfigurationError {
            department: merit_list.department.clone(),
            found: capacity,
        }
        .into());
    }

    let department = &merit_list.department;
    let mut allocated: Vec<ApplicantId> = Vec::new();
    let mut waitlisted: Vec<ApplicantId> = Vec::new();

    // Decision pass: reads only. A merit-list id missing from the snapshot
    // signals caller desynchronization and aborts before any mutation.
    for id in &merit_list.order {
        let applicant = applicants
            .get(id)
            .ok_or(ConsistencyError::UnknownApplicant(*id))?;

        if !applicant.eligible_for(department) {
            continue;
        }

        if (allocated.len() as i64) < capacity {
            allocated.push(*id);
        } else {
            waitlisted.push(*id);
        }
    }

    // Apply pass: only allocation state changes, never verification or
    // academics.
    for id in &allocated {
        if let Some(applicant) = applicants.get_mut(id) {
            applicant.allocation = AllocationStatus::Allocated(department.clone());
        }
    }
    for id in &waitlisted {
        if let Some(applicant) = applicants.get_mut(id) {
            applicant.allocation = AllocationStatus::Waitlisted;
        }
    }

    Ok(AllocationOutcome {
        department: department.clone(),
        allocated,
        waitlisted,
    })
}
