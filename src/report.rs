use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::calendar::SemesterCalendar;
use crate::config::SubjectCatalog;
use crate::forecast;
use crate::models::{AttendanceRecord, PriorityTier, SubjectPriority, TimetableSlot};
use crate::priority;
use crate::timetable;
use crate::verdict;

/// Classifies every subject and orders the table most-urgent-first:
/// lowest percentage at the top, not-yet-started subjects at the bottom.
pub fn prioritize(records: &[AttendanceRecord], catalog: &SubjectCatalog) -> Vec<SubjectPriority> {
    let mut rows: Vec<SubjectPriority> = records
        .iter()
        .map(|record| {
            let is_lab = catalog.is_lab(&record.code);
            SubjectPriority {
                code: record.code.clone(),
                name: catalog.name_of(&record.code).to_string(),
                is_lab,
                entry: priority::classify(record.attended, record.total, is_lab),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        let a_started = a.entry.tier != PriorityTier::NotStarted;
        let b_started = b.entry.tier != PriorityTier::NotStarted;
        b_started
            .cmp(&a_started)
            .then(a.entry.percent.total_cmp(&b.entry.percent))
    });
    rows
}

pub fn build_report(
    date: NaiveDate,
    calendar: &SemesterCalendar,
    catalog: &SubjectCatalog,
    records: &[AttendanceRecord],
    slots: &[TimetableSlot],
) -> String {
    let rows = prioritize(records, catalog);
    let entries: Vec<_> = rows.iter().map(|row| row.entry.clone()).collect();
    let health = priority::health_score(&entries);
    let totals = timetable::totals_for_all_subjects(slots, calendar);

    let mut output = String::new();
    let config = calendar.config();

    let _ = writeln!(output, "# Attendance Report");
    let _ = writeln!(
        output,
        "Semester {} to {}, generated for {}",
        config.semester_start, config.semester_end, date
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Subject Priorities");

    if rows.is_empty() {
        let _ = writeln!(output, "No attendance records loaded.");
    } else {
        for row in rows.iter() {
            let needed = match row.entry.needed {
                Some(n) => n.to_string(),
                None => "-".to_string(),
            };
            let _ = writeln!(
                output,
                "- {} ({}): {:.2}% | {} | needed {} | budget {}",
                row.name,
                row.code,
                row.entry.percent,
                row.entry.tier.label(),
                needed,
                row.entry.budget
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Overall Health");
    let _ = writeln!(output, "Attendance health score: {health} / 100");

    let _ = writeln!(output);
    let _ = writeln!(output, "## Semester Class Totals");

    if totals.is_empty() {
        let _ = writeln!(output, "No timetable loaded.");
    } else {
        for (code, total) in totals.iter() {
            let _ = writeln!(
                output,
                "- {} ({}): {} sessions",
                catalog.name_of(code),
                code,
                total
            );
        }
    }

    let recovering: Vec<_> = rows
        .iter()
        .filter(|row| row.entry.needed.is_some_and(|needed| needed > 0))
        .collect();
    if !recovering.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Recovery Outlook");
        for row in recovering.iter() {
            let record = records.iter().find(|record| record.code == row.code);
            if let Some(record) = record {
                let projected = forecast::simulate(record.attended, record.total, 10);
                let _ = writeln!(
                    output,
                    "- {}: {:.2}% now, {:.2}% after attending the next 10 straight",
                    row.name,
                    row.entry.percent,
                    projected.attend_all[9]
                );
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Plan for {date}");

    let today = verdict::slot_verdicts_for_day(date, calendar, slots, records, catalog);
    match verdict::aggregate(&today) {
        None => {
            let _ = writeln!(output, "No classes scheduled.");
        }
        Some(daily) => {
            for slot in today.iter() {
                let _ = writeln!(
                    output,
                    "- {} | {} → {} ({:.2}% if bunked)",
                    slot.time,
                    slot.subject,
                    slot.tier.label(),
                    slot.percent_if_bunked
                );
            }
            let _ = writeln!(output);
            let _ = writeln!(
                output,
                "Verdict: {} - {}",
                daily.status.label(),
                daily.rationale
            );
        }
    }

    output
}

/// Formats the semester totals for terminal output.
pub fn totals_lines(totals: &BTreeMap<String, u32>, catalog: &SubjectCatalog) -> Vec<String> {
    totals
        .iter()
        .map(|(code, total)| format!("{} ({}): {} sessions", catalog.name_of(code), code, total))
        .collect()
}
