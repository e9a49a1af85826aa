use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{NaiveDate, Weekday};

/// What a whitelisted Saturday is used for: either it runs another
/// weekday's timetable, or it is reserved for tests and teaches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaturdayPlan {
    TestOnly,
    Follows(Weekday),
}

/// Immutable calendar facts for one semester. Built once from the config
/// file and passed by reference; nothing in here changes at runtime, so a
/// second cohort or semester is just a second value.
#[derive(Debug, Clone)]
pub struct SemesterConfig {
    pub semester_start: NaiveDate,
    pub semester_end: NaiveDate,
    pub holidays: BTreeSet<NaiveDate>,
    pub mid_sem_days: BTreeSet<NaiveDate>,
    pub working_saturdays: BTreeMap<NaiveDate, SaturdayPlan>,
}

#[derive(Debug, Clone)]
pub struct SubjectInfo {
    pub name: String,
    pub is_lab: bool,
}

/// Code → display-name lookup with a precomputed inverse, so resolving a
/// display name back to its code is a hash lookup instead of a scan.
#[derive(Debug, Clone)]
pub struct SubjectCatalog {
    subjects: BTreeMap<String, SubjectInfo>,
    by_name: HashMap<String, String>,
}

impl SubjectCatalog {
    pub fn new(subjects: BTreeMap<String, SubjectInfo>) -> Self {
        let by_name = subjects
            .iter()
            .map(|(code, info)| (info.name.to_lowercase(), code.clone()))
            .collect();
        Self { subjects, by_name }
    }

    /// Accepts a course code or a display name (case-insensitive) and
    /// resolves it to the code. Unknown inputs resolve to the input
    /// itself so downstream lookups fall through to their empty results.
    pub fn resolve_code<'a>(&'a self, query: &'a str) -> &'a str {
        if self.subjects.contains_key(query) {
            return query;
        }
        match self.by_name.get(&query.to_lowercase()) {
            Some(code) => code,
            None => query,
        }
    }

    /// Display name for a code; falls back to the code itself.
    pub fn name_of<'a>(&'a self, code: &'a str) -> &'a str {
        match self.subjects.get(code) {
            Some(info) => &info.name,
            None => code,
        }
    }

    pub fn is_lab(&self, code: &str) -> bool {
        self.subjects.get(code).is_some_and(|info| info.is_lab)
    }
}

/// Parses a weekday from the names the config and timetable use
/// ("Monday", "Mon", "mon").
pub fn parse_weekday(value: &str) -> Option<Weekday> {
    value.parse::<Weekday>().ok()
}
