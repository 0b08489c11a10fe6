use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::config::AdmissionConfig;
use crate::workflows::admission::domain::{
    AcademicRecord, AllocationStatus, Applicant, ApplicantId, ApplicationForm, Department,
    DepartmentId, DocumentDescriptor, VerificationStatus,
};
use crate::workflows::admission::repository::{
    AdmissionNotice, ApplicantRepository, NotificationError, NotificationPublisher,
    RepositoryError,
};
use crate::workflows::admission::service::AdmissionService;

pub(super) fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid date")
}

pub(super) fn cs() -> DepartmentId {
    DepartmentId::new("CS")
}

pub(super) fn mechanical() -> DepartmentId {
    DepartmentId::new("Mechanical")
}

/// Date of birth producing the given whole-year age on the reference date.
pub(super) fn born_aged(age: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026 - age, 3, 14).expect("valid date")
}

/// Verified, unallocated applicant with the given merit keys.
pub(super) fn applicant(
    id: u64,
    department: &DepartmentId,
    entrance_score: u16,
    percentage_12th: u16,
    percentage_10th: u16,
    age: i32,
) -> Applicant {
    Applicant {
        id: ApplicantId(id),
        name: format!("Student {id}"),
        email: format!("student{id}@example.edu"),
        department: department.clone(),
        academics: AcademicRecord {
            entrance_score,
            percentage_12th,
            percentage_10th,
            date_of_birth: born_aged(age),
        },
        verification: VerificationStatus::Verified,
        allocation: AllocationStatus::Unallocated,
    }
}

pub(super) fn snapshot(applicants: &[Applicant]) -> BTreeMap<ApplicantId, Applicant> {
    applicants
        .iter()
        .cloned()
        .map(|applicant| (applicant.id, applicant))
        .collect()
}

/// Canonical three-applicant pool: identical keys for A and B except age,
/// C ahead on the entrance score.
pub(super) fn scenario_pool() -> (Applicant, Applicant, Applicant) {
    let a = applicant(1, &cs(), 90, 85, 80, 18);
    let b = applicant(2, &cs(), 90, 85, 80, 19);
    let c = applicant(3, &cs(), 95, 85, 80, 18);
    (a, b, c)
}

pub(super) fn form(id: u64, department: &DepartmentId) -> ApplicationForm {
    ApplicationForm {
        applicant: ApplicantId(id),
        name: format!("Student {id}"),
        email: format!("student{id}@example.edu"),
        department: department.clone(),
        entrance_score: Some(80),
        percentage_12th: Some(75),
        percentage_10th: Some(70),
        date_of_birth: Some(born_aged(18)),
        documents: vec![DocumentDescriptor {
            name: "ID proof".to_string(),
            storage_key: format!("docs/{id}/id.pdf"),
        }],
    }
}

pub(super) fn build_service(
    seat_plan: Vec<Department>,
) -> (
    AdmissionService<MemoryRepository, MemoryNotifications>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = AdmissionService::new(
        repository.clone(),
        notifications.clone(),
        AdmissionConfig::for_run(seat_plan, reference_date()),
    );
    (service, repository, notifications)
}

pub(super) fn seat(department: &DepartmentId, capacity: u32) -> Department {
    Department {
        id: department.clone(),
        capacity,
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<ApplicantId, Applicant>>,
}

impl MemoryRepository {
    pub(super) fn get(&self, id: &ApplicantId) -> Option<Applicant> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl ApplicantRepository for MemoryRepository {
    fn insert(&self, applicant: Applicant) -> Result<Applicant, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&applicant.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(applicant.id, applicant.clone());
        Ok(applicant)
    }

    fn update(&self, applicant: Applicant) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(applicant.id, applicant);
        Ok(())
    }

    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn by_department(&self, department: &DepartmentId) -> Result<Vec<Applicant>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut pool: Vec<Applicant> = guard
            .values()
            .filter(|applicant| applicant.department == *department)
            .cloned()
            .collect();
        pool.sort_by_key(|applicant| applicant.id);
        Ok(pool)
    }

    fn pending_review(&self) -> Result<Vec<Applicant>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut pool: Vec<Applicant> = guard
            .values()
            .filter(|applicant| applicant.verification == VerificationStatus::Pending)
            .cloned()
            .collect();
        pool.sort_by_key(|applicant| applicant.id);
        Ok(pool)
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifications {
    events: Mutex<Vec<AdmissionNotice>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<AdmissionNotice> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notice: AdmissionNotice) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notice);
        Ok(())
    }
}
