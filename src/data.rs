use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use regex::Regex;

use crate::config::{parse_weekday, SaturdayPlan, SemesterConfig, SubjectCatalog, SubjectInfo};
use crate::models::{AttendanceRecord, TimetableSlot};

/// Course codes follow a fixed institutional pattern: two digits, three
/// uppercase letters, a dash, a numeric suffix.
static COURSE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}[A-Z]{3}-\d+").unwrap());

/// Pulls the course code out of a timetable cell that may carry extra
/// text such as a room number.
pub fn extract_course_code(cell: &str) -> Option<&str> {
    COURSE_CODE.find(cell).map(|m| m.as_str())
}

/// Loads the normalized attendance table. The upstream parser promises
/// `attended <= total`; a row that breaks that is a corrupt export and is
/// rejected with its position.
pub fn load_attendance(path: &Path) -> anyhow::Result<Vec<AttendanceRecord>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        code: String,
        total: u32,
        attended: u32,
        percent: f64,
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open attendance table {}", path.display()))?;
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("bad attendance row {}", index + 1))?;
        if row.attended > row.total {
            bail!(
                "attendance row {}: attended {} exceeds delivered {}",
                index + 1,
                row.attended,
                row.total
            );
        }
        records.push(AttendanceRecord {
            code: row.code,
            total: row.total,
            attended: row.attended,
            percent: row.percent,
        });
    }

    Ok(records)
}

/// Loads the normalized weekly timetable. Rows whose subject cell holds
/// no recognizable course code (free periods, lunch rows) are skipped.
pub fn load_timetable(path: &Path) -> anyhow::Result<Vec<TimetableSlot>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        day: String,
        time: String,
        subject: String,
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open timetable {}", path.display()))?;
    let mut slots = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("bad timetable row {}", index + 1))?;
        let Some(code) = extract_course_code(&row.subject) else {
            continue;
        };
        let day = parse_weekday(&row.day)
            .with_context(|| format!("timetable row {}: unrecognized weekday '{}'", index + 1, row.day))?;
        slots.push(TimetableSlot {
            day,
            time: row.time,
            code: code.to_string(),
        });
    }

    Ok(slots)
}

/// Loads the semester configuration and subject catalog from one JSON
/// file, turning the raw working-Saturday strings into their parsed plan
/// ("Test" marks an exam-only Saturday that teaches nothing).
pub fn load_config(path: &Path) -> anyhow::Result<(SemesterConfig, SubjectCatalog)> {
    #[derive(serde::Deserialize)]
    struct RawSubject {
        name: String,
        #[serde(default)]
        lab: bool,
    }

    #[derive(serde::Deserialize)]
    struct RawConfig {
        semester_start: NaiveDate,
        semester_end: NaiveDate,
        #[serde(default)]
        holidays: BTreeSet<NaiveDate>,
        #[serde(default)]
        mid_sem_days: BTreeSet<NaiveDate>,
        #[serde(default)]
        working_saturdays: BTreeMap<NaiveDate, String>,
        #[serde(default)]
        subjects: BTreeMap<String, RawSubject>,
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read semester config {}", path.display()))?;
    let raw: RawConfig = serde_json::from_str(&text)
        .with_context(|| format!("invalid semester config {}", path.display()))?;

    let mut working_saturdays = BTreeMap::new();
    for (date, value) in raw.working_saturdays {
        let plan = if value == "Test" {
            SaturdayPlan::TestOnly
        } else {
            let day = parse_weekday(&value).with_context(|| {
                format!("working Saturday {date}: unrecognized substitute day '{value}'")
            })?;
            SaturdayPlan::Follows(day)
        };
        working_saturdays.insert(date, plan);
    }

    let config = SemesterConfig {
        semester_start: raw.semester_start,
        semester_end: raw.semester_end,
        holidays: raw.holidays,
        mid_sem_days: raw.mid_sem_days,
        working_saturdays,
    };

    let subjects = raw
        .subjects
        .into_iter()
        .map(|(code, subject)| {
            (
                code,
                SubjectInfo {
                    name: subject.name,
                    is_lab: subject.lab,
                },
            )
        })
        .collect();

    Ok((config, SubjectCatalog::new(subjects)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_codes_with_trailing_text() {
        assert_eq!(extract_course_code("26MAT-101"), Some("26MAT-101"));
        assert_eq!(extract_course_code("26MAT-101 (Room 204)"), Some("26MAT-101"));
        assert_eq!(extract_course_code("Lunch Break"), None);
        assert_eq!(extract_course_code(""), None);
    }

    #[test]
    fn code_pattern_is_strict() {
        assert_eq!(extract_course_code("MAT-101"), None);
        assert_eq!(extract_course_code("26mat-101"), None);
        assert_eq!(extract_course_code("26MATH"), None);
    }
}
