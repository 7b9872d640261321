use anyhow::Result;
use chrono::NaiveDateTime;
use lessonplan_core::time::iso_week_of;
use lessonplan_core::{ProgressDto, ProgressRecord, TimeSlotSchedule};
use serde_json::json;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

const BAR_WIDTH: usize = 20;

#[derive(Tabled)]
struct ProgressRow {
    #[tabled(rename = "Topic")]
    topic: String,
    #[tabled(rename = "Done")]
    done: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Left")]
    remaining: u32,
    #[tabled(rename = "Exam")]
    exam: String,
}

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
}

pub fn print_records(records: &[ProgressRecord], now: NaiveDateTime, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No topics with planned lessons found.");
        return Ok(());
    }

    let (year, week) = iso_week_of(now);
    println!(
        "\n\x1b[1;36mWeek {}, {}\x1b[0m (as of {})",
        week,
        year,
        now.format("%a %Y-%m-%d %H:%M")
    );

    let rows: Vec<ProgressRow> = records
        .iter()
        .map(ProgressDto::from_record)
        .map(|dto| ProgressRow {
            done: format!("{}/{}", dto.completed, dto.planned),
            progress: format!("{} {:>3.0}%", progress_bar(dto.percent, BAR_WIDTH), dto.percent),
            remaining: dto.remaining,
            exam: if dto.exam_this_week {
                format!("\x1b[1;31m{}\x1b[0m", dto.exam)
            } else {
                dto.exam
            },
            topic: dto.title,
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
    Ok(())
}

pub fn print_slots(schedule: &TimeSlotSchedule, as_json: bool) -> Result<()> {
    if as_json {
        let days: Vec<_> = schedule
            .days()
            .map(|(day, slots)| json!({ "day": day.to_string(), "slots": slots }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&days)?);
        return Ok(());
    }

    let mut rows = Vec::new();
    for (day, slots) in schedule.days() {
        for (i, slot) in slots.iter().enumerate() {
            rows.push(SlotRow {
                // Only the first slot of a day carries the day name
                day: if i == 0 { day.to_string() } else { String::new() },
                slot: slot.id.clone(),
                start: slot.start.format("%H:%M").to_string(),
                end: slot.end.format("%H:%M").to_string(),
            });
        }
    }
    if rows.is_empty() {
        println!("The schedule has no time slots.");
        return Ok(());
    }

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
    Ok(())
}

fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "░░░░");
        assert_eq!(progress_bar(50.0, 4), "██░░");
        assert_eq!(progress_bar(100.0, 4), "████");
        assert_eq!(progress_bar(250.0, 4), "████");
    }
}
