use std::cmp::Ordering;

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::model::calendar_lesson::CalendarLesson;
use crate::model::schedule::TimeSlotSchedule;

/// ISO week-year and week number of `now`.
pub fn iso_week_of(now: NaiveDateTime) -> (i32, u32) {
    let iso = now.date().iso_week();
    (iso.year(), iso.week())
}

/// Monday of the given ISO week, if that week exists.
pub fn week_start(year: i32, week: i64) -> Option<NaiveDate> {
    let week = u32::try_from(week).ok()?;
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}

/// Wall-clock instant at which a calendar lesson is over.
///
/// A missing `week_year` is taken as `default_year`. Returns `None` when the
/// week does not exist (week 0, week 53 in a 52-week year, ...).
pub fn lesson_end(
    lesson: &CalendarLesson,
    schedule: &TimeSlotSchedule,
    default_year: i32,
) -> Option<NaiveDateTime> {
    let (year, week) = lesson.week_key(default_year);
    let monday = week_start(year, week)?;
    let date = monday + Duration::days(lesson.day.num_days_from_monday() as i64);
    let end = schedule
        .slot_end(lesson.day, &lesson.time_slot, lesson.is_double_lesson)
        .unwrap_or_else(last_second);
    Some(date.and_time(end))
}

/// A lesson has ended when its week lies before `now`'s ISO week, or it lies
/// in the same week and its slot is over.
pub fn has_ended(lesson: &CalendarLesson, schedule: &TimeSlotSchedule, now: NaiveDateTime) -> bool {
    let (now_year, now_week) = iso_week_of(now);
    match lesson.week_key(now.year()).cmp(&(now_year, now_week as i64)) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => lesson_end(lesson, schedule, now.year())
            .map(|end| end <= now)
            .unwrap_or(false),
    }
}

pub fn is_in_week_of(lesson: &CalendarLesson, now: NaiveDateTime) -> bool {
    let (now_year, now_week) = iso_week_of(now);
    lesson.week_key(now.year()) == (now_year, now_week as i64)
}

pub fn parse_time_of_day(input: &str) -> Result<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .map_err(|_| anyhow!("Invalid time of day: '{}'", input))
}

/// Resolves a user supplied reference time relative to `now`.
pub fn parse_reference_time(input: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty reference time"));
    }
    let today = now.date();

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "now" | "today" => return Ok(now),
        "eow" => {
            let days_to_sunday = 6 - today.weekday().num_days_from_monday() as i64;
            return Ok(end_of_day(today + Duration::days(days_to_sunday)));
        }
        _ => {}
    }

    // 2. Relative format (+Nd, -Nw)
    if let Some(sign) = input.chars().next().filter(|c| *c == '+' || *c == '-') {
        let body = &input[sign.len_utf8()..];
        if let Some((unit_at, _)) = body.char_indices().last().filter(|(at, _)| *at > 0) {
            let (num_str, unit) = body.split_at(unit_at);
            if let Ok(count) = num_str.parse::<i64>() {
                let count = if sign == '-' { -count } else { count };
                let offset = match unit {
                    "d" => Duration::days(count),
                    "w" => Duration::weeks(count),
                    _ => return Err(anyhow!("Unknown unit in relative time: {}", unit)),
                };
                return Ok(now + offset);
            }
        }
        return Err(anyhow!("Invalid relative format: {}", input));
    }

    // 3. ISO week (2025-W11), resolved to the end of that school week
    if let Some((year, week)) = input.split_once("-W").or_else(|| input.split_once("-w")) {
        let year: i32 = year.parse().map_err(|_| anyhow!("Invalid year in '{}'", input))?;
        let week: u32 = week.parse().map_err(|_| anyhow!("Invalid week in '{}'", input))?;
        let friday = NaiveDate::from_isoywd_opt(year, week, Weekday::Fri)
            .ok_or_else(|| anyhow!("Week {} does not exist in {}", week, year))?;
        return Ok(end_of_day(friday));
    }

    // 4. Fallback to standard formats
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(end_of_day(d));
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn last_second() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(last_second())
}

pub fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" | "mo" | "montag" => Ok(Weekday::Mon),
        "tue" | "tuesday" | "di" | "dienstag" => Ok(Weekday::Tue),
        "wed" | "wednesday" | "mi" | "mittwoch" => Ok(Weekday::Wed),
        "thu" | "thursday" | "do" | "donnerstag" => Ok(Weekday::Thu),
        "fri" | "friday" | "fr" | "freitag" => Ok(Weekday::Fri),
        "sat" | "saturday" | "sa" | "samstag" => Ok(Weekday::Sat),
        "sun" | "sunday" | "so" | "sonntag" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday: '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Wednesday of ISO week 11, 2025
    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 12)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn lesson(week: i64, day: Weekday, slot: &str) -> CalendarLesson {
        CalendarLesson::new("c", "y", 2025, week, day, slot)
    }

    #[test]
    fn test_iso_week_of() {
        assert_eq!(iso_week_of(now()), (2025, 11));
        // Dec 30 2024 already belongs to 2025-W01
        let boundary = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap().and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(iso_week_of(boundary), (2025, 1));
    }

    #[test]
    fn test_week_start() {
        assert_eq!(week_start(2025, 11), NaiveDate::from_ymd_opt(2025, 3, 10));
        assert_eq!(week_start(2025, 0), None);
        assert_eq!(week_start(2025, -3), None);
        assert_eq!(week_start(2025, 53), None);
        assert!(week_start(2026, 53).is_some());
    }

    #[test]
    fn test_has_ended_by_week() {
        let schedule = TimeSlotSchedule::default();
        assert!(has_ended(&lesson(10, Weekday::Fri, "8"), &schedule, now()));
        assert!(!has_ended(&lesson(12, Weekday::Mon, "1"), &schedule, now()));

        let mut last_year = lesson(52, Weekday::Mon, "1");
        last_year.week_year = Some(2024);
        assert!(has_ended(&last_year, &schedule, now()));
    }

    #[test]
    fn test_has_ended_within_current_week() {
        let schedule = TimeSlotSchedule::default();
        // Slot 2 ends 09:30, slot 3 ends 10:35
        assert!(has_ended(&lesson(11, Weekday::Wed, "2"), &schedule, now()));
        assert!(!has_ended(&lesson(11, Weekday::Wed, "3"), &schedule, now()));
        assert!(has_ended(&lesson(11, Weekday::Tue, "8"), &schedule, now()));
        assert!(!has_ended(&lesson(11, Weekday::Thu, "1"), &schedule, now()));

        // Ending exactly at now counts as ended
        let at_end = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap().and_hms_opt(10, 35, 0).unwrap();
        assert!(has_ended(&lesson(11, Weekday::Wed, "3"), &schedule, at_end));
    }

    #[test]
    fn test_double_lesson_ends_after_following_slot() {
        let schedule = TimeSlotSchedule::default();
        let mut double = lesson(11, Weekday::Wed, "2");
        double.is_double_lesson = true;
        // Slot 2 ends 09:30 but slot 3 only at 10:35
        assert!(!has_ended(&double, &schedule, now()));
    }

    #[test]
    fn test_missing_week_year_uses_calendar_year_of_now() {
        let schedule = TimeSlotSchedule::default();
        let mut l = lesson(10, Weekday::Mon, "1");
        l.week_year = None;
        assert!(has_ended(&l, &schedule, now()));
        assert!(is_in_week_of(&lesson(11, Weekday::Fri, "1"), now()));
    }

    #[test]
    fn test_parse_reference_time() {
        let base = now();
        assert_eq!(parse_reference_time("now", base).unwrap(), base);
        assert_eq!(parse_reference_time("+1w", base).unwrap(), base + Duration::weeks(1));
        assert_eq!(parse_reference_time("-2d", base).unwrap(), base - Duration::days(2));
        assert_eq!(
            parse_reference_time("eow", base).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 16).unwrap().and_hms_opt(23, 59, 59).unwrap()
        );
        assert_eq!(
            parse_reference_time("2025-W02", base).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap().and_hms_opt(23, 59, 59).unwrap()
        );
        assert_eq!(
            parse_reference_time("2025-04-01 07:30", base).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap().and_hms_opt(7, 30, 0).unwrap()
        );
        assert_eq!(
            parse_reference_time("2025-04-01", base).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap().and_hms_opt(23, 59, 59).unwrap()
        );
        assert!(parse_reference_time("+3y", base).is_err());
        assert!(parse_reference_time("someday", base).is_err());
        assert!(parse_reference_time("2025-W60", base).is_err());
        assert!(parse_reference_time("+1é", base).is_err());
        assert!(parse_reference_time("-é", base).is_err());
        assert!(parse_reference_time("+é1", base).is_err());
    }

    #[test]
    fn test_parse_weekday_str() {
        assert_eq!(parse_weekday_str("Mon").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday_str("donnerstag").unwrap(), Weekday::Thu);
        assert!(parse_weekday_str("funday").is_err());
    }
}
