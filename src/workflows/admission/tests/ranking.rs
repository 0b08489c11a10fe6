use super::common::*;
use crate::workflows::admission::domain::{
    AcademicField, ApplicantId, ConsistencyError, ValidationError,
};
use crate::workflows::admission::merit::rank;

#[test]
fn older_applicant_wins_the_age_tie_break() {
    let (a, b, c) = scenario_pool();

    let list = rank(&cs(), &[a.clone(), b.clone(), c.clone()], reference_date())
        .expect("pool is consistent");

    assert_eq!(list.order, vec![c.id, b.id, a.id]);
    assert_eq!(list.position(&a.id), Some(2));
    assert!(list.excluded.is_empty());
}

#[test]
fn identical_keys_fall_back_to_lower_applicant_id() {
    let first = applicant(7, &cs(), 88, 82, 79, 18);
    let second = applicant(4, &cs(), 88, 82, 79, 18);

    let list = rank(&cs(), &[first, second], reference_date()).expect("pool is consistent");

    assert_eq!(list.order, vec![ApplicantId(4), ApplicantId(7)]);
}

#[test]
fn ranking_is_deterministic_and_input_order_insensitive() {
    let (a, b, c) = scenario_pool();
    let forward = [a.clone(), b.clone(), c.clone()];
    let backward = [c, b, a];

    let first = rank(&cs(), &forward, reference_date()).expect("pool is consistent");
    let second = rank(&cs(), &forward, reference_date()).expect("pool is consistent");
    let shuffled = rank(&cs(), &backward, reference_date()).expect("pool is consistent");

    assert_eq!(first, second);
    assert_eq!(first.order, shuffled.order);
}

#[test]
fn every_distinct_pair_is_strictly_ordered() {
    let pool = [
        applicant(1, &cs(), 90, 85, 80, 18),
        applicant(2, &cs(), 90, 85, 80, 18),
        applicant(3, &cs(), 90, 85, 70, 19),
        applicant(4, &cs(), 90, 80, 80, 18),
        applicant(5, &cs(), 60, 99, 99, 21),
    ];

    let list = rank(&cs(), &pool, reference_date()).expect("pool is consistent");

    assert_eq!(list.order.len(), pool.len());
    for (i, id) in list.order.iter().enumerate() {
        assert!(!list.order[i + 1..].contains(id), "duplicate entry for {id}");
    }
}

#[test]
fn out_of_range_score_is_reported_not_ranked() {
    let mut invalid = applicant(9, &cs(), 90, 85, 80, 18);
    invalid.academics.percentage_12th = 105;
    let valid = applicant(1, &cs(), 70, 70, 70, 18);

    let list = rank(&cs(), &[invalid, valid.clone()], reference_date())
        .expect("pool is consistent");

    assert_eq!(list.order, vec![valid.id]);
    assert_eq!(list.excluded.len(), 1);
    assert_eq!(list.excluded[0].applicant, ApplicantId(9));
    assert_eq!(
        list.excluded[0].reason,
        ValidationError::OutOfRange {
            field: AcademicField::Percentage12th,
            value: 105,
        }
    );
}

#[test]
fn future_date_of_birth_is_excluded() {
    let mut invalid = applicant(2, &cs(), 90, 85, 80, 18);
    invalid.academics.date_of_birth = reference_date().succ_opt().expect("valid date");

    let list = rank(&cs(), &[invalid], reference_date()).expect("pool is consistent");

    assert!(list.order.is_empty());
    assert!(matches!(
        list.excluded[0].reason,
        ValidationError::FutureDateOfBirth { .. }
    ));
}

#[test]
fn foreign_department_in_the_pool_is_a_caller_bug() {
    let stray = applicant(5, &mechanical(), 90, 85, 80, 18);

    let error = rank(&cs(), &[stray], reference_date()).expect_err("foreign pool rejected");

    assert_eq!(
        error,
        ConsistencyError::ForeignDepartment {
            applicant: ApplicantId(5),
            expected: cs(),
            found: mechanical(),
        }
    );
}

#[test]
fn duplicate_applicant_id_in_the_pool_is_a_caller_bug() {
    let twin = applicant(6, &cs(), 90, 85, 80, 18);

    let error =
        rank(&cs(), &[twin.clone(), twin], reference_date()).expect_err("duplicate rejected");

    assert_eq!(error, ConsistencyError::DuplicateApplicant(ApplicantId(6)));
}

#[test]
fn empty_pool_ranks_to_an_empty_list() {
    let list = rank(&cs(), &[], reference_date()).expect("empty pool is fine");

    assert!(list.order.is_empty());
    assert!(list.excluded.is_empty());
    assert_eq!(list.department, cs());
}

#[test]
fn age_counts_whole_years_only() {
    let before_birthday = applicant(1, &cs(), 90, 85, 80, 18);
    // Born later in the year than the reference date, so the birthday has
    // not come around yet.
    let mut after_birthday = before_birthday.clone();
    after_birthday.academics.date_of_birth =
        chrono::NaiveDate::from_ymd_opt(2008, 9, 14).expect("valid date");

    assert_eq!(before_birthday.academics.age_on(reference_date()), 18);
    assert_eq!(after_birthday.academics.age_on(reference_date()), 17);
}
