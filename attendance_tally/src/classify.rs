use log::debug;

use crate::config::{AttendanceStatus, ProcessedRecord, TallyErrors};

/// Assigns the final status of every record.
///
/// A participant is approved when the attendance percentage reaches the
/// minimum (the boundary itself is approved), and failed otherwise. The
/// input is left untouched so the same reconciliation can be classified
/// again with another minimum.
pub fn classify(
    records: &[ProcessedRecord],
    minimum_percent: f64,
) -> Result<Vec<ProcessedRecord>, TallyErrors> {
    if !minimum_percent.is_finite() || minimum_percent < 0.0 {
        return Err(TallyErrors::InvalidMinimumPercent(minimum_percent));
    }
    let res: Vec<ProcessedRecord> = records
        .iter()
        .map(|r| {
            let status = if r.attendance_percent >= minimum_percent {
                AttendanceStatus::Approved
            } else {
                AttendanceStatus::Failed
            };
            ProcessedRecord {
                status,
                ..r.clone()
            }
        })
        .collect();
    debug!(
        "classify: {} of {} approved with minimum {}",
        res.iter()
            .filter(|r| r.status == AttendanceStatus::Approved)
            .count(),
        res.len(),
        minimum_percent
    );
    Ok(res)
}

/// The approved participants, in roster order.
pub fn approved(records: &[ProcessedRecord]) -> Vec<&ProcessedRecord> {
    records
        .iter()
        .filter(|r| r.status == AttendanceStatus::Approved)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reconcile, EnrollmentRecord};

    fn processed(percents: &[f64]) -> Vec<ProcessedRecord> {
        let roster: Vec<EnrollmentRecord> = (0..percents.len())
            .map(|i| EnrollmentRecord::new(&format!("Student {}", i), &format!("s{}@x.com", i)))
            .collect();
        reconcile(&roster, &[], 0)
            .into_iter()
            .zip(percents.iter())
            .map(|(r, p)| ProcessedRecord {
                attendance_percent: *p,
                ..r
            })
            .collect()
    }

    #[test]
    fn minimum_is_inclusive() {
        let res = classify(&processed(&[75.0, 74.99, 100.0, 0.0]), 75.0).unwrap();
        let statuses: Vec<AttendanceStatus> = res.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                AttendanceStatus::Approved,
                AttendanceStatus::Failed,
                AttendanceStatus::Approved,
                AttendanceStatus::Failed,
            ]
        );
    }

    #[test]
    fn zero_minimum_approves_everyone() {
        let res = classify(&processed(&[0.0, 10.0]), 0.0).unwrap();
        assert_eq!(approved(&res).len(), 2);
    }

    #[test]
    fn reclassification_starts_from_the_percentages() {
        let first = classify(&processed(&[50.0, 80.0]), 75.0).unwrap();
        assert_eq!(approved(&first).len(), 1);
        let second = classify(&first, 40.0).unwrap();
        assert_eq!(approved(&second).len(), 2);
        assert_eq!(approved(&second)[0].full_name, "Student 0");
    }

    #[test]
    fn invalid_minimum_is_rejected() {
        for m in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                classify(&processed(&[50.0]), m),
                Err(TallyErrors::InvalidMinimumPercent(_))
            ));
        }
    }
}
