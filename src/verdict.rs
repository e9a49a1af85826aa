use chrono::NaiveDate;

use crate::attendance::{percentage_if_bunk_next, round2};
use crate::calendar::SemesterCalendar;
use crate::config::SubjectCatalog;
use crate::models::{
    AttendanceRecord, DailyVerdict, DayStatus, EligibilityTier, SlotVerdict, TimetableSlot,
};

/// Rates one session by the skip projection attended / (total + 1):
/// comfortable headroom is a safe bunk, the 75-80% band is risky,
/// anything lower must be attended.
pub fn rate_slot(attended: u32, total: u32) -> (EligibilityTier, f64) {
    let projected = round2(percentage_if_bunk_next(attended, total));
    let tier = if projected >= 80.0 {
        EligibilityTier::Safe
    } else if projected >= 75.0 {
        EligibilityTier::Risky
    } else {
        EligibilityTier::MustAttend
    };
    (tier, projected)
}

/// Builds the per-session verdicts for one date. A non-teaching day has
/// no sessions; a working Saturday draws its sessions from the substitute
/// weekday's timetable. Subjects with no attendance record yet carry no
/// signal and are skipped.
pub fn slot_verdicts_for_day(
    date: NaiveDate,
    calendar: &SemesterCalendar,
    slots: &[TimetableSlot],
    records: &[AttendanceRecord],
    catalog: &SubjectCatalog,
) -> Vec<SlotVerdict> {
    if !calendar.is_teaching_day(date) {
        return Vec::new();
    }
    let Some(effective) = calendar.effective_timetable_day(date) else {
        return Vec::new();
    };

    let mut verdicts = Vec::new();
    for slot in slots.iter().filter(|slot| slot.day == effective) {
        let Some(record) = records.iter().find(|record| record.code == slot.code) else {
            continue;
        };
        if record.total == 0 {
            continue;
        }
        let (tier, projected) = rate_slot(record.attended, record.total);
        verdicts.push(SlotVerdict {
            time: slot.time.clone(),
            code: slot.code.clone(),
            subject: catalog.name_of(&slot.code).to_string(),
            tier,
            percent_if_bunked: projected,
        });
    }
    verdicts
}

/// Majority vote over the day's sessions with every tie breaking toward
/// the more dangerous outcome. No sessions means no verdict; the caller
/// renders that as a free day.
pub fn aggregate(verdicts: &[SlotVerdict]) -> Option<DailyVerdict> {
    if verdicts.is_empty() {
        return None;
    }

    let mut safe = 0usize;
    let mut risky = 0usize;
    let mut must_attend = 0usize;
    for verdict in verdicts {
        match verdict.tier {
            EligibilityTier::Safe => safe += 1,
            EligibilityTier::Risky => risky += 1,
            EligibilityTier::MustAttend => must_attend += 1,
        }
    }

    if must_attend >= risky.max(safe) {
        return Some(DailyVerdict {
            status: DayStatus::NotSafe,
            rationale: format!("{must_attend} class(es) voted NOT SAFE."),
        });
    }
    if risky >= safe {
        return Some(DailyVerdict {
            status: DayStatus::Risky,
            rationale: format!("{risky} class(es) voted RISKY."),
        });
    }
    Some(DailyVerdict {
        status: DayStatus::Safe,
        rationale: format!("{safe} class(es) voted SAFE."),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SaturdayPlan, SemesterConfig, SubjectInfo};
    use chrono::Weekday;
    use std::collections::{BTreeMap, BTreeSet};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn verdict(tier: EligibilityTier) -> SlotVerdict {
        SlotVerdict {
            time: "09:00".to_string(),
            code: "26MAT-101".to_string(),
            subject: "Engineering Mathematics".to_string(),
            tier,
            percent_if_bunked: 0.0,
        }
    }

    #[test]
    fn empty_day_has_no_verdict() {
        assert!(aggregate(&[]).is_none());
    }

    #[test]
    fn must_attend_wins_ties() {
        let verdicts = vec![
            verdict(EligibilityTier::MustAttend),
            verdict(EligibilityTier::Safe),
        ];
        let daily = aggregate(&verdicts).unwrap();
        assert_eq!(daily.status, DayStatus::NotSafe);
        assert_eq!(daily.rationale, "1 class(es) voted NOT SAFE.");
    }

    #[test]
    fn safe_majority_wins() {
        let verdicts = vec![
            verdict(EligibilityTier::Safe),
            verdict(EligibilityTier::Safe),
            verdict(EligibilityTier::Risky),
        ];
        let daily = aggregate(&verdicts).unwrap();
        assert_eq!(daily.status, DayStatus::Safe);
    }

    #[test]
    fn risky_beats_safe_on_tie() {
        let verdicts = vec![
            verdict(EligibilityTier::Risky),
            verdict(EligibilityTier::Safe),
        ];
        let daily = aggregate(&verdicts).unwrap();
        assert_eq!(daily.status, DayStatus::Risky);
    }

    #[test]
    fn slot_rating_bands() {
        // 40/49 skipped once: 40/50 = 80%.
        assert_eq!(rate_slot(40, 49).0, EligibilityTier::Safe);
        // 36/46 skipped once: 36/47 ≈ 76.6%.
        assert_eq!(rate_slot(36, 46).0, EligibilityTier::Risky);
        // 30/40 skipped once: 30/41 ≈ 73.2%.
        assert_eq!(rate_slot(30, 40).0, EligibilityTier::MustAttend);
    }

    fn fixture() -> (SemesterCalendar, Vec<TimetableSlot>, Vec<AttendanceRecord>, SubjectCatalog)
    {
        let calendar = SemesterCalendar::new(SemesterConfig {
            semester_start: date(2026, 1, 5),
            semester_end: date(2026, 1, 10),
            holidays: BTreeSet::new(),
            mid_sem_days: BTreeSet::new(),
            working_saturdays: BTreeMap::from([(
                date(2026, 1, 10),
                SaturdayPlan::Follows(Weekday::Mon),
            )]),
        });
        let slots = vec![
            TimetableSlot {
                day: Weekday::Mon,
                time: "09:00".to_string(),
                code: "26MAT-101".to_string(),
            },
            TimetableSlot {
                day: Weekday::Mon,
                time: "11:00".to_string(),
                code: "26CHE-110".to_string(),
            },
            TimetableSlot {
                day: Weekday::Tue,
                time: "10:00".to_string(),
                code: "26MAT-101".to_string(),
            },
        ];
        let records = vec![AttendanceRecord {
            code: "26MAT-101".to_string(),
            total: 49,
            attended: 40,
            percent: 81.63,
        }];
        let catalog = SubjectCatalog::new(BTreeMap::from([(
            "26MAT-101".to_string(),
            SubjectInfo {
                name: "Engineering Mathematics".to_string(),
                is_lab: false,
            },
        )]));
        (calendar, slots, records, catalog)
    }

    #[test]
    fn working_saturday_uses_substitute_slots() {
        let (calendar, slots, records, catalog) = fixture();
        let verdicts =
            slot_verdicts_for_day(date(2026, 1, 10), &calendar, &slots, &records, &catalog);
        // Monday's timetable, but only the subject with a record votes.
        assert_eq!(verdicts.len(), 1);
        assert_eq!(verdicts[0].code, "26MAT-101");
        assert_eq!(verdicts[0].subject, "Engineering Mathematics");
        assert_eq!(verdicts[0].tier, EligibilityTier::Safe);
    }

    #[test]
    fn non_teaching_day_yields_no_slots() {
        let (calendar, slots, records, catalog) = fixture();
        // The Sunday right after the window closes.
        let verdicts =
            slot_verdicts_for_day(date(2026, 1, 11), &calendar, &slots, &records, &catalog);
        assert!(verdicts.is_empty());
    }
}
