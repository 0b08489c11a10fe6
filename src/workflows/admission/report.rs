use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{Applicant, ApplicantId, ConsistencyError};
use super::merit::MeritList;

/// Errors raised while rendering a merit list export.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
    #[error("csv rendering failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv flush failed: {0}")]
    Flush(#[source] std::io::Error),
    #[error("csv buffer could not be recovered as utf-8 text")]
    Encoding,
}

#[derive(Debug, Serialize)]
struct MeritRow<'a> {
    rank: usize,
    applicant: u64,
    name: &'a str,
    department: &'a str,
    entrance_score: u16,
    percentage_12th: u16,
    percentage_10th: u16,
    age_years: i32,
    document_status: &'static str,
    allocation_status: &'static str,
}

/// Render a department merit list as CSV for the admissions office, one row
/// per ranked applicant, best rank first.
///
/// The applicant snapshot must be the one the list was computed from; a
/// missing id is caller desynchronization, same as during allocation.
pub fn merit_list_csv(
    merit_list: &MeritList,
    applicants: &BTreeMap<ApplicantId, Applicant>,
) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for (index, id) in merit_list.order.iter().enumerate() {
        let applicant = applicants
            .get(id)
            .ok_or(ConsistencyError::UnknownApplicant(*id))?;

        writer.serialize(MeritRow {
            rank: index + 1,
            applicant: id.0,
            name: &applicant.name,
            department: &applicant.department.0,
            entrance_score: applicant.academics.entrance_score,
            percentage_12th: applicant.academics.percentage_12th,
            percentage_10th: applicant.academics.percentage_10th,
            age_years: applicant.academics.age_on(merit_list.reference_date),
            document_status: applicant.verification.label(),
            allocation_status: applicant.allocation.label(),
        })?;
    }

    writer.flush().map_err(ReportError::Flush)?;
    let bytes = writer.into_inner().map_err(|_| ReportError::Encoding)?;
    String::from_utf8(bytes).map_err(|_| ReportError::Encoding)
}
