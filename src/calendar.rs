use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::{SaturdayPlan, SemesterConfig};

/// Resolves which calendar dates hold classes for one semester.
///
/// The rules are checked in a fixed order and the first match wins:
/// outside the semester window, Sundays, holidays and mid-sem test days
/// never teach; Monday through Friday always does; a Saturday teaches
/// only when it is whitelisted with a substitute weekday.
pub struct SemesterCalendar {
    config: SemesterConfig,
}

impl SemesterCalendar {
    pub fn new(config: SemesterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SemesterConfig {
        &self.config
    }

    pub fn is_teaching_day(&self, date: NaiveDate) -> bool {
        if date < self.config.semester_start || date > self.config.semester_end {
            return false;
        }
        if date.weekday() == Weekday::Sun {
            return false;
        }
        if self.config.holidays.contains(&date) {
            return false;
        }
        // Mid-sem tests override everything, including the Saturday whitelist.
        if self.config.mid_sem_days.contains(&date) {
            return false;
        }
        match date.weekday() {
            Weekday::Sat => matches!(
                self.config.working_saturdays.get(&date),
                Some(SaturdayPlan::Follows(_))
            ),
            _ => true,
        }
    }

    /// Every teaching day in the semester, in calendar order. Derived on
    /// each call from the fixed config, so it is safe to re-run and cache.
    pub fn teaching_days(&self) -> Vec<NaiveDate> {
        self.config
            .semester_start
            .iter_days()
            .take_while(|day| *day <= self.config.semester_end)
            .filter(|day| self.is_teaching_day(*day))
            .collect()
    }

    /// Which weekday's timetable a date runs. A working Saturday follows
    /// its mapped substitute weekday; a test-only Saturday runs nothing;
    /// every other date simply runs its own weekday.
    pub fn effective_timetable_day(&self, date: NaiveDate) -> Option<Weekday> {
        if let Some(plan) = self.config.working_saturdays.get(&date) {
            return match plan {
                SaturdayPlan::TestOnly => None,
                SaturdayPlan::Follows(day) => Some(*day),
            };
        }
        Some(date.weekday())
    }
}
