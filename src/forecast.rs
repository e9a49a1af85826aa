use crate::attendance::{percentage, round2, TARGET};
use crate::models::Forecast;

/// Projects the percentage trajectory over the next `steps` sessions
/// under three strategies at once: attend everything, attend only while
/// under the threshold, and bunk everything. Each element is the running
/// percentage after that session, rounded to two decimals.
pub fn simulate(attended: u32, total: u32, steps: u32) -> Forecast {
    let mut forecast = Forecast {
        attend_all: Vec::with_capacity(steps as usize),
        strategic: Vec::with_capacity(steps as usize),
        bunk_all: Vec::with_capacity(steps as usize),
    };

    let (mut a1, mut t1) = (attended, total);
    let (mut a2, mut t2) = (attended, total);
    let (mut a3, mut t3) = (attended, total);

    for _ in 0..steps {
        a1 += 1;
        t1 += 1;
        forecast.attend_all.push(round2(percentage(a1, t1)));

        // Attend only when still under the threshold going into the session.
        if percentage(a2, t2) < TARGET * 100.0 {
            a2 += 1;
        }
        t2 += 1;
        forecast.strategic.push(round2(percentage(a2, t2)));

        t3 += 1;
        forecast.bunk_all.push(round2(percentage(a3, t3)));
    }

    forecast
}

/// Worst-case drift over the coming weeks: the running total keeps
/// growing while the attended count stays frozen.
pub fn project_weeks(attended: u32, total: u32, weeks: u32, classes_per_week: u32) -> f64 {
    let future_total = total + weeks * classes_per_week;
    round2(percentage(attended, future_total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_share_the_requested_length() {
        let forecast = simulate(20, 40, 15);
        assert_eq!(forecast.attend_all.len(), 15);
        assert_eq!(forecast.strategic.len(), 15);
        assert_eq!(forecast.bunk_all.len(), 15);
    }

    #[test]
    fn attend_all_dominates_strategic_dominates_bunk_all() {
        for (attended, total) in [(0, 0), (20, 40), (30, 40), (36, 40), (5, 30)] {
            let forecast = simulate(attended, total, 25);
            for i in 0..25 {
                assert!(
                    forecast.attend_all[i] >= forecast.strategic[i],
                    "attend_all under strategic at step {i} for {attended}/{total}"
                );
                assert!(
                    forecast.strategic[i] >= forecast.bunk_all[i],
                    "strategic under bunk_all at step {i} for {attended}/{total}"
                );
            }
        }
    }

    #[test]
    fn strategic_coasts_once_over_threshold() {
        // 36/40 = 90%: the strategic track bunks until it decays to 75%.
        let forecast = simulate(36, 40, 8);
        assert_eq!(forecast.strategic[0], round2(36.0 / 41.0 * 100.0));
        // Budget is 8, so the attended count holds at 36 throughout.
        assert_eq!(forecast.strategic[7], 75.0);
    }

    #[test]
    fn strategic_recovers_when_under_threshold() {
        // 20/40 = 50%: every projected session is attended.
        let forecast = simulate(20, 40, 5);
        assert_eq!(forecast.strategic, forecast.attend_all);
    }

    #[test]
    fn not_started_subject_projects_cleanly() {
        let forecast = simulate(0, 0, 3);
        assert_eq!(forecast.attend_all, vec![100.0, 100.0, 100.0]);
        assert_eq!(forecast.bunk_all, vec![0.0, 0.0, 0.0]);
        // Strategic attends from a standing start.
        assert_eq!(forecast.strategic, vec![100.0, 100.0, 100.0]);
    }

    #[test]
    fn weekly_projection_freezes_the_attended_count() {
        // 30/40 with 4 weeks of 5 classes all missed: 30/60 = 50%.
        assert_eq!(project_weeks(30, 40, 4, 5), 50.0);
        assert_eq!(project_weeks(30, 40, 0, 5), 75.0);
        assert_eq!(project_weeks(0, 0, 0, 0), 0.0);
    }
}
