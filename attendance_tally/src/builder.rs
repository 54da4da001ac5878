pub use crate::config::*;

/// A builder for a reconciliation.
///
/// It is convenient when the attendance entries arrive one by one, for
/// example while reading several sign-in sheets.
///
/// ```
/// pub use attendance_tally::builder::Builder;
/// pub use attendance_tally::{EnrollmentRecord, MatchRules};
/// # use attendance_tally::TallyErrors;
///
/// let mut builder = Builder::new(&MatchRules::DEFAULT_RULES)?
///     .roster(&[
///         EnrollmentRecord::new("Ana Silva", "a@x.com"),
///         EnrollmentRecord::new("Bruno Costa", "b@x.com"),
///     ])
///     .total_classes(4);
///
/// builder.add_attendance("Ana Silva");
/// builder.add_attendance_list(&["bruno costa".to_string(), "ANA SILVA".to_string()]);
///
/// let res = builder.run()?;
/// assert_eq!(res.records[0].classes_attended, 2);
/// assert_eq!(res.records[1].attendance_percent, 25.0);
///
/// # Ok::<(), TallyErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: MatchRules,
    pub(crate) _roster: Vec<EnrollmentRecord>,
    pub(crate) _attendance: Vec<String>,
    pub(crate) _total_classes: i64,
}

impl Builder {
    pub fn new(rules: &MatchRules) -> Result<Builder, TallyErrors> {
        rules.validate()?;
        Ok(Builder {
            _rules: rules.clone(),
            _roster: Vec::new(),
            _attendance: Vec::new(),
            _total_classes: 0,
        })
    }

    /// Sets the roster. Attendance entries already added are kept.
    pub fn roster(self, roster: &[EnrollmentRecord]) -> Builder {
        Builder {
            _roster: roster.to_vec(),
            ..self
        }
    }

    pub fn total_classes(self, total_classes: i64) -> Builder {
        Builder {
            _total_classes: total_classes,
            ..self
        }
    }

    /// Adds one attendance entry, as typed in the sign-in sheet.
    pub fn add_attendance(&mut self, name: &str) {
        self._attendance.push(name.to_string());
    }

    pub fn add_attendance_list(&mut self, names: &[String]) {
        self._attendance.extend_from_slice(names);
    }

    pub fn run(&self) -> Result<Reconciliation, TallyErrors> {
        crate::run_attendance_stats(
            &self._roster,
            &self._attendance,
            self._total_classes,
            &self._rules,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_invalid_rules() {
        let rules = MatchRules {
            threshold: 2.0,
            ..MatchRules::DEFAULT_RULES
        };
        assert!(Builder::new(&rules).is_err());
    }

    #[test]
    fn builder_without_attendance() {
        let builder = Builder::new(&MatchRules::DEFAULT_RULES)
            .unwrap()
            .roster(&[EnrollmentRecord::new("Ana Silva", "a@x.com")]);
        let res = builder.run().unwrap();
        assert_eq!(res.records.len(), 1);
        assert_eq!(res.records[0].classes_attended, 0);
        assert_eq!(res.records[0].attendance_percent, 0.0);
        assert_eq!(res.stats.entries, 0);
    }
}
