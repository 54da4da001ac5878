// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One row of the enrollment roster.
///
/// Rows are kept in the order of the roster. Neither the name nor the email
/// is required to be unique.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct EnrollmentRecord {
    pub full_name: String,
    pub email: String,
}

impl EnrollmentRecord {
    pub fn new(full_name: &str, email: &str) -> EnrollmentRecord {
        EnrollmentRecord {
            full_name: full_name.to_string(),
            email: email.to_string(),
        }
    }
}

/// The identifier of a roster row for one reconciliation run.
///
/// It combines the position of the row with its email, so that two rows
/// with the same name (or even the same email) never collide.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct EnrollmentId(pub String);

impl EnrollmentId {
    pub fn from_row(row_index: usize, email: &str) -> EnrollmentId {
        EnrollmentId(format!("{}-{}", row_index, email))
    }
}

impl Display for EnrollmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A roster row with its identifier and comparison key.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CanonicalEnrollment {
    pub id: EnrollmentId,
    pub full_name: String,
    pub email: String,
    pub normalized_name: String,
}

// ******** Output data structures *********

/// The outcome for a participant.
///
/// The reconciler only produces `Pending` records. `Approved` and `Failed`
/// are assigned by [crate::classify::classify].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum AttendanceStatus {
    Pending,
    Approved,
    Failed,
}

impl AttendanceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Pending => "Pending",
            AttendanceStatus::Approved => "Approved",
            AttendanceStatus::Failed => "Failed",
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ProcessedRecord {
    pub id: EnrollmentId,
    pub full_name: String,
    pub email: String,
    pub normalized_name: String,
    pub classes_attended: u64,
    pub attendance_percent: f64,
    pub status: AttendanceStatus,
}

/// Accounting of the attendance entries processed during one run.
///
/// `matched + unmatched + blank == entries` always holds. Ambiguous entries
/// are also counted in `matched` or `unmatched`, depending on the
/// [DuplicateNameMode].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct MatchStats {
    pub entries: u64,
    pub matched: u64,
    pub unmatched: u64,
    pub blank: u64,
    pub ambiguous: u64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Reconciliation {
    pub records: Vec<ProcessedRecord>,
    pub stats: MatchStats,
}

/// Errors caused by invalid parameters.
///
/// Reconciling a roster never fails by itself: these errors are only
/// returned when the rules or the classification threshold make no sense.
#[derive(PartialEq, Debug, Clone)]
pub enum TallyErrors {
    /// The match threshold must be a finite number between 0 and 1.
    InvalidThreshold(f64),
    /// The minimum percentage must be a finite, non-negative number.
    InvalidMinimumPercent(f64),
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::InvalidThreshold(x) => {
                write!(f, "invalid match threshold {} (expected a value in [0, 1])", x)
            }
            TallyErrors::InvalidMinimumPercent(x) => {
                write!(f, "invalid minimum percentage {} (expected a value >= 0)", x)
            }
        }
    }
}

// ********* Configuration **********

/// How whitespace inside a name is treated by the normalizer.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum WhitespaceMode {
    /// Runs of whitespace are kept as typed. "Ana  Silva" and "Ana Silva"
    /// then differ by one character and rely on the fuzzy matcher.
    Preserve,
    /// Every run of whitespace becomes a single space.
    Collapse,
}

/// What to do with an attendance entry whose best match is shared by several
/// roster rows carrying the same normalized name.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DuplicateNameMode {
    /// Credit the row ranked first by the matcher (the earliest row in the
    /// roster).
    FirstRanked,
    /// Do not credit anyone: the entry is counted as unmatched.
    Unassigned,
}

#[derive(PartialEq, Debug, Clone)]
pub struct MatchRules {
    /// Maximum score accepted as a match. 0 requires a perfect match,
    /// 1 accepts anything.
    pub threshold: f64,
    /// Where in a roster name the attendance name is expected to start.
    pub location: usize,
    /// How far from `location` a match may start before its score is
    /// penalized up to 1. A distance of 0 only accepts matches at `location`.
    pub distance: usize,
    pub whitespace_mode: WhitespaceMode,
    pub duplicate_name_mode: DuplicateNameMode,
}

impl MatchRules {
    pub const DEFAULT_RULES: MatchRules = MatchRules {
        threshold: 0.4,
        location: 0,
        distance: 100,
        whitespace_mode: WhitespaceMode::Preserve,
        duplicate_name_mode: DuplicateNameMode::FirstRanked,
    };

    pub fn validate(&self) -> Result<(), TallyErrors> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(TallyErrors::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

impl Default for MatchRules {
    fn default() -> Self {
        MatchRules::DEFAULT_RULES
    }
}
