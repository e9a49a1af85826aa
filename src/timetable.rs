use std::collections::{BTreeMap, HashMap};

use chrono::Weekday;

use crate::calendar::SemesterCalendar;
use crate::config::SubjectCatalog;
use crate::models::TimetableSlot;

/// How many times each timetable weekday occurs across the semester's
/// teaching days, with working Saturdays counted under their substitute
/// weekday.
fn weekday_occurrences(calendar: &SemesterCalendar) -> HashMap<Weekday, u32> {
    let mut tally: HashMap<Weekday, u32> = HashMap::new();
    for day in calendar.teaching_days() {
        if let Some(effective) = calendar.effective_timetable_day(day) {
            *tally.entry(effective).or_insert(0) += 1;
        }
    }
    tally
}

/// Total sessions scheduled for one subject across the whole semester.
/// Accepts a course code or a display name. A subject that never appears
/// in the timetable totals 0; that is a valid "not scheduled" answer,
/// not an error.
pub fn total_sessions(
    subject: &str,
    slots: &[TimetableSlot],
    calendar: &SemesterCalendar,
    catalog: &SubjectCatalog,
) -> u32 {
    let code = catalog.resolve_code(subject);
    let occurrences = weekday_occurrences(calendar);
    slots
        .iter()
        .filter(|slot| slot.code == code)
        .map(|slot| occurrences.get(&slot.day).copied().unwrap_or(0))
        .sum()
}

/// Whole-semester session totals for every subject in the timetable.
pub fn totals_for_all_subjects(
    slots: &[TimetableSlot],
    calendar: &SemesterCalendar,
) -> BTreeMap<String, u32> {
    let occurrences = weekday_occurrences(calendar);
    let mut totals: BTreeMap<String, u32> = BTreeMap::new();
    for slot in slots {
        let count = occurrences.get(&slot.day).copied().unwrap_or(0);
        *totals.entry(slot.code.clone()).or_insert(0) += count;
    }
    totals
}
