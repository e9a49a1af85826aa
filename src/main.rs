use std::path::PathBuf;

use anyhow::bail;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

mod attendance;
mod calendar;
mod config;
mod data;
mod forecast;
mod models;
mod priority;
mod report;
mod timetable;
mod verdict;

use calendar::SemesterCalendar;
use config::SubjectCatalog;
use models::AttendanceRecord;

#[derive(Parser)]
#[command(name = "bunkwise")]
#[command(about = "Calendar-aware attendance projection and bunk planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Total sessions scheduled per subject across the semester
    Totals {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        timetable: PathBuf,
        /// Restrict to one subject (code or display name)
        #[arg(long)]
        subject: Option<String>,
    },
    /// Classify every subject into an urgency tier
    Priorities {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        attendance: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Project one subject under attend-all, strategic and bunk-all plans
    Forecast {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        attendance: PathBuf,
        #[arg(long)]
        subject: String,
        #[arg(long, default_value_t = 15)]
        steps: u32,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Rate today's scheduled sessions and give one aggregate verdict
    Today {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        attendance: PathBuf,
        #[arg(long)]
        timetable: PathBuf,
        /// Defaults to the current date
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Detailed standing and outlook for one subject
    Status {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        attendance: PathBuf,
        #[arg(long)]
        subject: String,
        /// Horizon for the worst-case drift projection
        #[arg(long, default_value_t = 4)]
        weeks: u32,
        #[arg(long, default_value_t = 5)]
        classes_per_week: u32,
    },
    /// Play out "attend m more, bunk n more" for one subject
    WhatIf {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        attendance: PathBuf,
        #[arg(long)]
        subject: String,
        #[arg(long, default_value_t = 0)]
        attend: u32,
        #[arg(long, default_value_t = 0)]
        bunk: u32,
    },
    /// Generate the full markdown report
    Report {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        attendance: PathBuf,
        #[arg(long)]
        timetable: PathBuf,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn find_record<'a>(
    records: &'a [AttendanceRecord],
    catalog: &SubjectCatalog,
    subject: &str,
) -> anyhow::Result<&'a AttendanceRecord> {
    let code = catalog.resolve_code(subject);
    match records.iter().find(|record| record.code == code) {
        Some(record) => Ok(record),
        None => bail!("no attendance record for '{subject}'"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Totals {
            config,
            timetable,
            subject,
        } => {
            let (semester, catalog) = data::load_config(&config)?;
            let slots = data::load_timetable(&timetable)?;
            let calendar = SemesterCalendar::new(semester);

            match subject {
                Some(subject) => {
                    let total = timetable::total_sessions(&subject, &slots, &calendar, &catalog);
                    println!("{subject}: {total} sessions this semester");
                }
                None => {
                    let totals = timetable::totals_for_all_subjects(&slots, &calendar);
                    if totals.is_empty() {
                        println!("No subjects found in the timetable.");
                        return Ok(());
                    }
                    for line in report::totals_lines(&totals, &catalog) {
                        println!("- {line}");
                    }
                }
            }
        }
        Commands::Priorities {
            config,
            attendance,
            json,
        } => {
            let (_, catalog) = data::load_config(&config)?;
            let records = data::load_attendance(&attendance)?;
            let rows = report::prioritize(&records, &catalog);
            let entries: Vec<_> = rows.iter().map(|row| row.entry.clone()).collect();
            let health = priority::health_score(&entries);

            if json {
                let payload = serde_json::json!({
                    "subjects": rows,
                    "health_score": health,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
                return Ok(());
            }

            if rows.is_empty() {
                println!("No attendance records loaded.");
                return Ok(());
            }
            for row in rows.iter() {
                let needed = match row.entry.needed {
                    Some(n) => n.to_string(),
                    None => "-".to_string(),
                };
                println!(
                    "- {} ({}): {:.2}% | {} | needed {} | budget {}",
                    row.name,
                    row.code,
                    row.entry.percent,
                    row.entry.tier.label(),
                    needed,
                    row.entry.budget
                );
            }
            println!();
            println!("Attendance health score: {health} / 100");
        }
        Commands::Forecast {
            config,
            attendance,
            subject,
            steps,
            json,
        } => {
            if steps == 0 {
                bail!("--steps must be at least 1");
            }
            let (_, catalog) = data::load_config(&config)?;
            let records = data::load_attendance(&attendance)?;
            let record = find_record(&records, &catalog, &subject)?;
            let projected = forecast::simulate(record.attended, record.total, steps);

            if json {
                println!("{}", serde_json::to_string_pretty(&projected)?);
                return Ok(());
            }

            println!(
                "{}: {}/{} attended ({:.2}% reported), next {steps} sessions:",
                catalog.name_of(&record.code),
                record.attended,
                record.total,
                record.percent
            );
            println!("attend all: {:?}", projected.attend_all);
            println!("strategic:  {:?}", projected.strategic);
            println!("bunk all:   {:?}", projected.bunk_all);
        }
        Commands::Today {
            config,
            attendance,
            timetable,
            date,
            json,
        } => {
            let (semester, catalog) = data::load_config(&config)?;
            let records = data::load_attendance(&attendance)?;
            let slots = data::load_timetable(&timetable)?;
            let calendar = SemesterCalendar::new(semester);
            let date = date.unwrap_or_else(|| Local::now().date_naive());

            let verdicts =
                verdict::slot_verdicts_for_day(date, &calendar, &slots, &records, &catalog);
            let daily = verdict::aggregate(&verdicts);

            if json {
                let payload = serde_json::json!({
                    "date": date,
                    "slots": verdicts,
                    "verdict": daily,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
                return Ok(());
            }

            match daily {
                None => println!("No classes scheduled for {date}."),
                Some(daily) => {
                    println!("Plan for {date}:");
                    for slot in verdicts.iter() {
                        println!(
                            "- {} | {} → {} ({:.2}% if bunked)",
                            slot.time,
                            slot.subject,
                            slot.tier.label(),
                            slot.percent_if_bunked
                        );
                    }
                    println!();
                    println!("Verdict: {} - {}", daily.status.label(), daily.rationale);
                }
            }
        }
        Commands::Status {
            config,
            attendance,
            subject,
            weeks,
            classes_per_week,
        } => {
            let (_, catalog) = data::load_config(&config)?;
            let records = data::load_attendance(&attendance)?;
            let record = find_record(&records, &catalog, &subject)?;
            let (a, t) = (record.attended, record.total);

            println!(
                "{} ({}): {}/{} attended, {:.2}%",
                catalog.name_of(&record.code),
                record.code,
                a,
                t,
                attendance::percentage(a, t)
            );

            let standing = attendance::budget_standing(a, t);
            match standing.status {
                models::BudgetStatus::NotStarted => {
                    println!("Not started yet: no sessions delivered.");
                    return Ok(());
                }
                models::BudgetStatus::Safe => println!(
                    "Standing: SAFE, {} session(s) of slack banked.",
                    standing.margin.unwrap_or(0)
                ),
                models::BudgetStatus::Warning => {
                    println!("Standing: WARNING, no slack left.")
                }
                models::BudgetStatus::Critical => println!(
                    "Standing: CRITICAL, {} session(s) under the minimum.",
                    -standing.margin.unwrap_or(0)
                ),
            }

            if attendance::can_bunk_next(a, t) {
                println!(
                    "Next session is bunkable: {:.2}% if skipped.",
                    attendance::percentage_if_bunk_next(a, t)
                );
            } else {
                println!(
                    "Attend the next session: {:.2}% if attended, {:.2}% if skipped.",
                    attendance::future_percentage_if_attend(a, t),
                    attendance::percentage_if_bunk_next(a, t)
                );
            }

            let needed = attendance::classes_needed_for_target(a, t, attendance::TARGET);
            if needed == 0 {
                println!("Already at or above 75%.");
            } else {
                println!("Attend the next {needed} session(s) straight to reach 75%.");
            }

            println!(
                "Skipping everything for {weeks} week(s) ({classes_per_week}/week) lands at {:.2}%.",
                forecast::project_weeks(a, t, weeks, classes_per_week)
            );
        }
        Commands::WhatIf {
            config,
            attendance,
            subject,
            attend,
            bunk,
        } => {
            let (_, catalog) = data::load_config(&config)?;
            let records = data::load_attendance(&attendance)?;
            let record = find_record(&records, &catalog, &subject)?;
            let outcome = attendance::what_if(record.attended, record.total, attend, bunk);

            println!(
                "{}: attend {attend} more, bunk {bunk} more:",
                catalog.name_of(&record.code)
            );
            match outcome.status {
                models::WhatIfStatus::NotStarted => println!("Not started yet."),
                models::WhatIfStatus::Safe => {
                    println!("{:.2}%: safe, nothing to recover.", outcome.percent)
                }
                models::WhatIfStatus::Danger => println!(
                    "{:.2}%: in danger, attend the next {} straight to recover.",
                    outcome.percent,
                    outcome.needed.unwrap_or(0)
                ),
            }
        }
        Commands::Report {
            config,
            attendance,
            timetable,
            date,
            out,
        } => {
            let (semester, catalog) = data::load_config(&config)?;
            let records = data::load_attendance(&attendance)?;
            let slots = data::load_timetable(&timetable)?;
            let calendar = SemesterCalendar::new(semester);
            let date = date.unwrap_or_else(|| Local::now().date_naive());

            let report = report::build_report(date, &calendar, &catalog, &records, &slots);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
