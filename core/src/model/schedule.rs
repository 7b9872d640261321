use anyhow::Result;
use chrono::{Duration, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::time::parse_time_of_day;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BreakConfig {
    pub after_slot: u32,
    pub minutes: u32,
}

/// Weekly bell schedule as stored in `schedule.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    pub start_time: String,
    pub lesson_minutes: u32,
    pub slots_per_day: u32,
    pub breaks: Vec<BreakConfig>,
    pub school_days: Vec<Weekday>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            start_time: "08:00".to_string(),
            lesson_minutes: 45,
            slots_per_day: 8,
            breaks: vec![
                BreakConfig { after_slot: 2, minutes: 20 },
                BreakConfig { after_slot: 4, minutes: 15 },
                BreakConfig { after_slot: 6, minutes: 45 },
            ],
            school_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub id: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Ordered time slots per school day, derived from a [`ScheduleConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlotSchedule {
    // Sorted Monday first.
    days: Vec<(Weekday, Vec<TimeSlot>)>,
}

impl TimeSlotSchedule {
    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        let start = parse_time_of_day(&config.start_time)?;
        Ok(Self::build(start, config))
    }

    fn build(start: NaiveTime, config: &ScheduleConfig) -> Self {
        let lesson = Duration::minutes(config.lesson_minutes as i64);
        let mut slots = Vec::new();
        let mut cursor = start;

        for number in 1..=config.slots_per_day {
            let (end, wrapped) = cursor.overflowing_add_signed(lesson);
            if wrapped != 0 {
                // Slots never run past midnight.
                break;
            }
            slots.push(TimeSlot {
                id: number.to_string(),
                start: cursor,
                end,
            });

            let pause: i64 = config
                .breaks
                .iter()
                .filter(|b| b.after_slot == number)
                .map(|b| b.minutes as i64)
                .sum();
            let (next, wrapped) = end.overflowing_add_signed(Duration::minutes(pause));
            if wrapped != 0 {
                break;
            }
            cursor = next;
        }

        let mut days: Vec<(Weekday, Vec<TimeSlot>)> = Vec::new();
        for day in &config.school_days {
            if !days.iter().any(|(d, _)| d == day) {
                days.push((*day, slots.clone()));
            }
        }
        days.sort_by_key(|(d, _)| d.num_days_from_monday());
        Self { days }
    }

    pub fn slots_for(&self, day: Weekday) -> &[TimeSlot] {
        self.days
            .iter()
            .find(|(d, _)| *d == day)
            .map(|(_, slots)| slots.as_slice())
            .unwrap_or(&[])
    }

    pub fn days(&self) -> impl Iterator<Item = (Weekday, &[TimeSlot])> + '_ {
        self.days.iter().map(|(day, slots)| (*day, slots.as_slice()))
    }

    /// End time of a lesson placed at `slot_id` on `day`.
    ///
    /// A double lesson runs to the end of the following slot when there is one.
    /// Unknown slot ids resolve to the last slot of the day; days without slots
    /// resolve to `None`.
    pub fn slot_end(&self, day: Weekday, slot_id: &str, double: bool) -> Option<NaiveTime> {
        let slots = self.slots_for(day);
        match slots.iter().position(|s| s.id == slot_id) {
            Some(idx) => {
                let last = if double { (idx + 1).min(slots.len() - 1) } else { idx };
                Some(slots[last].end)
            }
            None => slots.last().map(|s| s.end),
        }
    }
}

impl Default for TimeSlotSchedule {
    fn default() -> Self {
        let config = ScheduleConfig::default();
        let start = NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN);
        Self::build(start, &config)
    }
}
