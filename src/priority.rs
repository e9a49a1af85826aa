use crate::attendance::{self, round2};
use crate::models::{BunkBudget, PriorityEntry, PriorityTier};

/// Classifies one subject into an urgency tier from its raw counts.
///
/// Lab subjects face an 80% floor instead of the general 75% one, since
/// lab attendance policies are usually stricter.
pub fn classify(attended: u32, total: u32, is_lab: bool) -> PriorityEntry {
    if total == 0 {
        return PriorityEntry {
            percent: 0.0,
            needed: None,
            budget: BunkBudget::Unlimited,
            tier: PriorityTier::NotStarted,
        };
    }

    let percent = round2(attendance::percentage(attended, total));
    let needed = if percent >= 75.0 {
        0
    } else {
        attendance::recovery_needed(attended, total)
    };
    let budget = attendance::bunk_budget(attended, total);
    let bounded = budget.bounded().unwrap_or(0);

    let tier = if is_lab && percent < 80.0 {
        PriorityTier::MustAttend
    } else if percent < 65.0 || needed >= 6 {
        PriorityTier::MustAttend
    } else if bounded <= 1 {
        PriorityTier::AttendCarefully
    } else if percent >= 80.0 && bounded >= 3 {
        PriorityTier::Bunkable
    } else {
        PriorityTier::AttendCarefully
    };

    PriorityEntry {
        percent,
        needed: Some(needed),
        budget,
        tier,
    }
}

/// Single 0-100 health figure across all subjects. Starts from a perfect
/// score and applies three capped penalties: average attendance below the
/// threshold, count of must-attend subjects, and average outstanding
/// recovery need. An empty table scores 100.
pub fn health_score(entries: &[PriorityEntry]) -> u32 {
    if entries.is_empty() {
        return 100;
    }

    let mut score = 100.0;

    let avg_percent =
        entries.iter().map(|entry| entry.percent).sum::<f64>() / entries.len() as f64;
    if avg_percent < 75.0 {
        score -= ((75.0 - avg_percent) * 1.2).min(30.0);
    }

    let must_attend = entries
        .iter()
        .filter(|entry| entry.tier == PriorityTier::MustAttend)
        .count();
    score -= (must_attend as f64 * 10.0).min(30.0);

    let recovery: Vec<u32> = entries
        .iter()
        .filter_map(|entry| entry.needed)
        .filter(|needed| *needed > 0)
        .collect();
    if !recovery.is_empty() {
        let avg_recovery = recovery.iter().sum::<u32>() as f64 / recovery.len() as f64;
        score -= (avg_recovery * 3.0).min(25.0);
    }

    score.max(0.0).round() as u32
}
