use crate::models::{BudgetStanding, BudgetStatus, BunkBudget, WhatIfOutcome, WhatIfStatus};

/// Attendance threshold every subject must clear.
pub const TARGET: f64 = 0.75;

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Current percentage. A subject with no delivered sessions is "not
/// started" and reads as 0, never NaN.
pub fn percentage(attended: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    attended as f64 / total as f64 * 100.0
}

/// Percentage after attending one more session.
pub fn future_percentage_if_attend(attended: u32, total: u32) -> f64 {
    (attended + 1) as f64 / (total + 1) as f64 * 100.0
}

/// Percentage after skipping the next session: current attended count
/// over the incremented total. Distinct from
/// `future_percentage_if_attend`, which moves both counters.
pub fn percentage_if_bunk_next(attended: u32, total: u32) -> f64 {
    attended as f64 / (total + 1) as f64 * 100.0
}

/// Whether the next session can be skipped without dropping under the
/// threshold.
pub fn can_bunk_next(attended: u32, total: u32) -> bool {
    percentage_if_bunk_next(attended, total) >= TARGET * 100.0
}

/// Integer recovery need at the fixed 75% threshold: ceil(3*total - 4*attended),
/// floored at 0. Specialization of `classes_needed_for_target`; the two are
/// checked against each other in the tests below.
pub fn recovery_needed(attended: u32, total: u32) -> u32 {
    (3 * total as i64 - 4 * attended as i64).max(0) as u32
}

/// Smallest k with (attended + k) / (total + k) >= target. May exceed the
/// sessions left in the semester; that judgment belongs to the caller.
pub fn classes_needed_for_target(attended: u32, total: u32, target: f64) -> u32 {
    let required = (target * total as f64 - attended as f64) / (1.0 - target);
    required.ceil().max(0.0) as u32
}

/// How many future sessions can be skipped while staying at or above the
/// threshold: floor(attended/0.75 - total), computed in exact integer
/// form. A not-started subject has no bound yet.
pub fn bunk_budget(attended: u32, total: u32) -> BunkBudget {
    if total == 0 {
        return BunkBudget::Unlimited;
    }
    let budget = (4 * attended as i64 - 3 * total as i64).div_euclid(3);
    BunkBudget::Bounded(budget.max(0) as u32)
}

/// Applies a hypothetical "attend m more, bunk n more" adjustment and
/// reports where the subject would land.
pub fn what_if(attended: u32, total: u32, attend_more: u32, bunk_more: u32) -> WhatIfOutcome {
    let new_attended = attended + attend_more;
    let new_total = total + attend_more + bunk_more;

    if new_total == 0 {
        return WhatIfOutcome {
            percent: 0.0,
            status: WhatIfStatus::NotStarted,
            needed: None,
        };
    }

    let percent = round2(percentage(new_attended, new_total));
    if percent >= TARGET * 100.0 {
        WhatIfOutcome {
            percent,
            status: WhatIfStatus::Safe,
            needed: Some(0),
        }
    } else {
        WhatIfOutcome {
            percent,
            status: WhatIfStatus::Danger,
            needed: Some(recovery_needed(new_attended, new_total)),
        }
    }
}

/// Margin of attended sessions over the minimum required so far
/// (ceil(0.75*total)). Positive margin is slack already banked; zero is
/// the knife edge; negative means the subject is under water today.
pub fn budget_standing(attended: u32, total: u32) -> BudgetStanding {
    if total == 0 {
        return BudgetStanding {
            margin: None,
            status: BudgetStatus::NotStarted,
        };
    }

    let required = (3 * total as i64 + 3) / 4; // ceil(0.75 * total)
    let margin = attended as i64 - required;
    let status = if margin > 0 {
        BudgetStatus::Safe
    } else if margin == 0 {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Critical
    };
    BudgetStanding {
        margin: Some(margin),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_is_bounded_and_zero_only_when_not_started() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(0, 10), 0.0);
        assert_eq!(percentage(10, 10), 100.0);
        for total in 1u32..=60 {
            for attended in 0..=total {
                let p = percentage(attended, total);
                assert!((0.0..=100.0).contains(&p));
            }
        }
    }

    #[test]
    fn attend_projection_moves_both_counters() {
        // 3/4 = 75%; attending one more gives 4/5 = 80%.
        assert_eq!(future_percentage_if_attend(3, 4), 80.0);
        // The skip projection keeps attended fixed: 3/5 = 60%.
        assert_eq!(percentage_if_bunk_next(3, 4), 60.0);
    }

    #[test]
    fn can_bunk_checks_the_skip_projection() {
        // 30/40 is exactly 75%, but skipping makes it 30/41 < 75%.
        assert!(!can_bunk_next(30, 40));
        // 33/43 after a skip is 33/44 = 75% exactly.
        assert!(can_bunk_next(33, 43));
        assert!(can_bunk_next(40, 40));
        assert!(!can_bunk_next(0, 0));
    }

    #[test]
    fn scenario_at_exact_threshold() {
        assert_eq!(percentage(30, 40), 75.0);
        assert_eq!(classes_needed_for_target(30, 40, TARGET), 0);
        assert_eq!(bunk_budget(30, 40), BunkBudget::Bounded(0));
    }

    #[test]
    fn scenario_at_fifty_percent() {
        assert_eq!(percentage(20, 40), 50.0);
        assert_eq!(recovery_needed(20, 40), 40);
        assert_eq!(classes_needed_for_target(20, 40, TARGET), 40);
        assert_eq!(bunk_budget(20, 40), BunkBudget::Bounded(0));
    }

    #[test]
    fn recovery_forms_agree_at_default_target() {
        for total in 0u32..=80 {
            for attended in 0..=total {
                assert_eq!(
                    recovery_needed(attended, total),
                    classes_needed_for_target(attended, total, TARGET),
                    "diverged at attended={attended} total={total}"
                );
            }
        }
    }

    #[test]
    fn classes_needed_is_monotone() {
        // Non-increasing in attended.
        for attended in 0u32..40 {
            assert!(
                classes_needed_for_target(attended + 1, 40, TARGET)
                    <= classes_needed_for_target(attended, 40, TARGET)
            );
        }
        // Non-decreasing in total.
        for total in 20u32..60 {
            assert!(
                classes_needed_for_target(20, total + 1, TARGET)
                    >= classes_needed_for_target(20, total, TARGET)
            );
        }
    }

    #[test]
    fn budget_is_unlimited_only_when_not_started() {
        assert_eq!(bunk_budget(0, 0), BunkBudget::Unlimited);
        for total in 1u32..=60 {
            for attended in 0..=total {
                match bunk_budget(attended, total) {
                    BunkBudget::Unlimited => panic!("unexpected unlimited budget"),
                    BunkBudget::Bounded(_) => {}
                }
            }
        }
        // 36/40 = 90%: can slide to 36/48 = 75%.
        assert_eq!(bunk_budget(36, 40), BunkBudget::Bounded(8));
    }

    #[test]
    fn what_if_applies_both_deltas() {
        let outcome = what_if(20, 40, 10, 0);
        assert_eq!(outcome.percent, 60.0);
        assert_eq!(outcome.status, WhatIfStatus::Danger);
        assert_eq!(outcome.needed, Some(30));

        let outcome = what_if(30, 40, 0, 2);
        assert_eq!(outcome.status, WhatIfStatus::Danger);

        let outcome = what_if(30, 40, 0, 0);
        assert_eq!(outcome.status, WhatIfStatus::Safe);
        assert_eq!(outcome.needed, Some(0));

        let outcome = what_if(0, 0, 0, 0);
        assert_eq!(outcome.status, WhatIfStatus::NotStarted);
        assert_eq!(outcome.needed, None);
    }

    #[test]
    fn budget_standing_tiers() {
        assert_eq!(budget_standing(0, 0).status, BudgetStatus::NotStarted);
        assert_eq!(budget_standing(0, 0).margin, None);

        let standing = budget_standing(35, 40);
        assert_eq!(standing.status, BudgetStatus::Safe);
        assert_eq!(standing.margin, Some(5));

        assert_eq!(budget_standing(30, 40).status, BudgetStatus::Warning);
        assert_eq!(budget_standing(25, 40).status, BudgetStatus::Critical);
    }
}
