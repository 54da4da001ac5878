/*!
Reconciles an enrollment roster with a hand-typed attendance log.

The roster is the authoritative list of participants. The attendance log
contains one name per attended session, typed by hand: case, accents,
punctuation, spacing and spelling vary from one entry to the next. Every
entry is normalized, then matched approximately against the normalized
roster names. The best match (if good enough) gets one more class.

```
use attendance_tally::*;

let roster = vec![
    EnrollmentRecord::new("Ana Silva", "a@x.com"),
    EnrollmentRecord::new("Bruno Costa", "b@x.com"),
];
let attendance: Vec<String> = ["ana silva", "Ana  Silva", "bruno costa", "xxx unrelated name"]
    .iter()
    .map(|s| s.to_string())
    .collect();

let res = reconcile(&roster, &attendance, 2);
assert_eq!(res[0].classes_attended, 2);
assert_eq!(res[0].attendance_percent, 100.0);
assert_eq!(res[1].classes_attended, 1);
assert_eq!(res[1].attendance_percent, 50.0);
```

See the [manual] for the input formats and the configuration of the
`rollcall` program.
*/
pub mod builder;
pub mod classify;
mod config;
pub mod fuzzy;
pub mod manual;
pub mod normalize;

use log::{debug, info, warn};

pub use crate::classify::{approved, classify};
pub use crate::config::*;
use crate::fuzzy::{ApproximateMatcher, FuzzyIndex, MatchCandidate};
use crate::normalize::normalize_name_with;

/// Computes the attendance of every roster member with the default rules.
///
/// Arguments:
/// * `roster` the enrollment list. It may be empty or contain duplicates.
/// * `attendance_names` one raw name per attended session.
/// * `total_classes` the denominator of the percentages. When it is zero or
///   negative, all the percentages are 0.
///
/// One record is returned per roster row, in roster order, with the status
/// [AttendanceStatus::Pending].
pub fn reconcile(
    roster: &[EnrollmentRecord],
    attendance_names: &[String],
    total_classes: i64,
) -> Vec<ProcessedRecord> {
    run_checked(
        roster,
        attendance_names,
        total_classes,
        &MatchRules::DEFAULT_RULES,
    )
    .records
}

/// Runs the reconciliation with the given rules.
///
/// Arguments:
/// * `roster` the enrollment list
/// * `attendance_names` one raw name per attended session
/// * `total_classes` the denominator of the percentages
/// * `rules` the matching rules. They are validated before anything else.
pub fn run_attendance_stats(
    roster: &[EnrollmentRecord],
    attendance_names: &[String],
    total_classes: i64,
    rules: &MatchRules,
) -> Result<Reconciliation, TallyErrors> {
    rules.validate()?;
    Ok(run_checked(roster, attendance_names, total_classes, rules))
}

/// Builds the canonical form of the roster: identifiers and comparison keys.
pub fn canonicalize_roster(
    roster: &[EnrollmentRecord],
    rules: &MatchRules,
) -> Vec<CanonicalEnrollment> {
    roster
        .iter()
        .enumerate()
        .map(|(idx, r)| CanonicalEnrollment {
            id: EnrollmentId::from_row(idx, &r.email),
            full_name: r.full_name.clone(),
            email: r.email.clone(),
            normalized_name: normalize_name_with(&r.full_name, rules.whitespace_mode),
        })
        .collect()
}

/// Computes the percentage of classes attended.
pub fn attendance_percent(classes_attended: u64, total_classes: i64) -> f64 {
    if total_classes <= 0 {
        0.0
    } else {
        (classes_attended as f64 / total_classes as f64) * 100.0
    }
}

// **** Private structures ****

// The outcome of matching one attendance entry.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum EntryOutcome {
    Blank,
    Unmatched,
    Matched(usize),
    Ambiguous(Option<usize>),
}

fn run_checked(
    roster: &[EnrollmentRecord],
    attendance_names: &[String],
    total_classes: i64,
    rules: &MatchRules,
) -> Reconciliation {
    info!(
        "Processing {:?} attendance entries against {:?} enrolled, total classes: {:?}",
        attendance_names.len(),
        roster.len(),
        total_classes
    );

    let enrollments = canonicalize_roster(roster, rules);
    let index = FuzzyIndex::new(
        enrollments
            .iter()
            .map(|e| e.normalized_name.clone())
            .collect(),
        rules,
    );

    // Every roster row starts at zero, including the ones nobody matches.
    let mut tally: Vec<u64> = vec![0; enrollments.len()];
    let mut stats = MatchStats::default();

    for name in attendance_names.iter() {
        stats.entries += 1;
        let outcome = match_entry(name, &index, &enrollments, rules);
        debug!("run_attendance_stats: {:?} -> {:?}", name, outcome);
        match outcome {
            EntryOutcome::Blank => stats.blank += 1,
            EntryOutcome::Unmatched => stats.unmatched += 1,
            EntryOutcome::Matched(idx) => {
                tally[idx] += 1;
                stats.matched += 1;
            }
            EntryOutcome::Ambiguous(Some(idx)) => {
                tally[idx] += 1;
                stats.matched += 1;
                stats.ambiguous += 1;
            }
            EntryOutcome::Ambiguous(None) => {
                stats.unmatched += 1;
                stats.ambiguous += 1;
            }
        }
    }

    info!(
        "Matched {} of {} entries ({} unmatched, {} blank, {} ambiguous)",
        stats.matched, stats.entries, stats.unmatched, stats.blank, stats.ambiguous
    );

    let records: Vec<ProcessedRecord> = enrollments
        .into_iter()
        .zip(tally)
        .map(|(e, count)| ProcessedRecord {
            id: e.id,
            full_name: e.full_name,
            email: e.email,
            normalized_name: e.normalized_name,
            classes_attended: count,
            attendance_percent: attendance_percent(count, total_classes),
            status: AttendanceStatus::Pending,
        })
        .collect();

    Reconciliation { records, stats }
}

fn match_entry(
    raw_name: &str,
    index: &impl ApproximateMatcher,
    enrollments: &[CanonicalEnrollment],
    rules: &MatchRules,
) -> EntryOutcome {
    let query = normalize_name_with(raw_name, rules.whitespace_mode);
    if query.is_empty() {
        return EntryOutcome::Blank;
    }
    let candidates = index.search(&query);
    let best: &MatchCandidate = match candidates.first() {
        Some(c) => c,
        None => return EntryOutcome::Unmatched,
    };

    // Other rows that are indistinguishable from the best one.
    let best_name = &enrollments[best.index].normalized_name;
    let rivals: Vec<&MatchCandidate> = candidates[1..]
        .iter()
        .filter(|c| c.score == best.score && enrollments[c.index].normalized_name == *best_name)
        .collect();
    if rivals.is_empty() {
        return EntryOutcome::Matched(best.index);
    }

    warn!(
        "Attendance entry {:?} matches {} enrolled participants with the same name: {}",
        raw_name,
        rivals.len() + 1,
        std::iter::once(best)
            .chain(rivals.iter().cloned())
            .map(|c| enrollments[c.index].id.to_string())
            .collect::<Vec<String>>()
            .join(", ")
    );
    match rules.duplicate_name_mode {
        DuplicateNameMode::FirstRanked => EntryOutcome::Ambiguous(Some(best.index)),
        DuplicateNameMode::Unassigned => EntryOutcome::Ambiguous(None),
    }
}
