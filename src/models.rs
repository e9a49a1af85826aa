use chrono::Weekday;
use serde::{Serialize, Serializer};

/// One row of the normalized attendance table, produced by the upstream
/// parser. `percent` is the reported figure and is carried through as-is;
/// every computation here works from `attended` and `total`.
#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub code: String,
    pub total: u32,
    pub attended: u32,
    pub percent: f64,
}

/// One scheduled session per week: a weekday, a time label, a course code.
#[derive(Debug, Clone)]
pub struct TimetableSlot {
    pub day: Weekday,
    pub time: String,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriorityTier {
    NotStarted,
    Bunkable,
    AttendCarefully,
    MustAttend,
}

impl PriorityTier {
    pub fn label(&self) -> &'static str {
        match self {
            PriorityTier::NotStarted => "Not Started",
            PriorityTier::Bunkable => "Bunkable",
            PriorityTier::AttendCarefully => "Attend Carefully",
            PriorityTier::MustAttend => "Must Attend",
        }
    }
}

/// How many more sessions can still be skipped while staying at or above
/// the threshold. A subject with zero delivered sessions has no meaningful
/// bound yet, so that state is a distinct variant rather than a magic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BunkBudget {
    Unlimited,
    Bounded(u32),
}

impl BunkBudget {
    pub fn bounded(&self) -> Option<u32> {
        match self {
            BunkBudget::Unlimited => None,
            BunkBudget::Bounded(n) => Some(*n),
        }
    }
}

impl std::fmt::Display for BunkBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BunkBudget::Unlimited => write!(f, "∞"),
            BunkBudget::Bounded(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for BunkBudget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BunkBudget::Unlimited => serializer.serialize_str("unlimited"),
            BunkBudget::Bounded(n) => serializer.serialize_u32(*n),
        }
    }
}

/// Per-subject urgency facts derived from the current attendance counts.
#[derive(Debug, Clone, Serialize)]
pub struct PriorityEntry {
    pub percent: f64,
    pub needed: Option<u32>,
    pub budget: BunkBudget,
    pub tier: PriorityTier,
}

/// A subject paired with its classification, ready for display or JSON.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectPriority {
    pub code: String,
    pub name: String,
    pub is_lab: bool,
    #[serde(flatten)]
    pub entry: PriorityEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EligibilityTier {
    Safe,
    Risky,
    MustAttend,
}

impl EligibilityTier {
    pub fn label(&self) -> &'static str {
        match self {
            EligibilityTier::Safe => "SAFE BUNK",
            EligibilityTier::Risky => "RISKY",
            EligibilityTier::MustAttend => "MUST ATTEND",
        }
    }
}

/// Eligibility of one scheduled session today. Aggregation input only;
/// discarded once the daily verdict is produced.
#[derive(Debug, Clone, Serialize)]
pub struct SlotVerdict {
    pub time: String,
    pub code: String,
    pub subject: String,
    pub tier: EligibilityTier,
    /// Percentage if this one session is skipped: attended / (total + 1).
    pub percent_if_bunked: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayStatus {
    Safe,
    Risky,
    NotSafe,
}

impl DayStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DayStatus::Safe => "SAFE",
            DayStatus::Risky => "RISKY",
            DayStatus::NotSafe => "NOT SAFE",
        }
    }
}

/// Aggregate go/no-go recommendation for one day's scheduled sessions.
#[derive(Debug, Clone, Serialize)]
pub struct DailyVerdict {
    pub status: DayStatus,
    pub rationale: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WhatIfStatus {
    NotStarted,
    Safe,
    Danger,
}

/// Outcome of a hypothetical "attend m more, bunk n more" adjustment.
#[derive(Debug, Clone, Serialize)]
pub struct WhatIfOutcome {
    pub percent: f64,
    pub status: WhatIfStatus,
    pub needed: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetStatus {
    NotStarted,
    Safe,
    Warning,
    Critical,
}

/// Margin of attended sessions over the minimum required so far.
/// Negative margin means the subject is already under water.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetStanding {
    pub margin: Option<i64>,
    pub status: BudgetStatus,
}

/// Three projected trajectories over the same future sessions.
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub attend_all: Vec<f64>,
    pub strategic: Vec<f64>,
    pub bunk_all: Vec<f64>,
}
