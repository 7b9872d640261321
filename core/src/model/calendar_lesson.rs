use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::model::lenient;

/// A timetable placement of a yearly lesson in a specific week, day and slot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CalendarLesson {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub yearly_lesson_id: Option<String>,
    // Set on the second half of a double lesson.
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub second_yearly_lesson_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub week_number: i64,
    #[serde(default, deserialize_with = "lenient::optional_year")]
    pub week_year: Option<i32>,
    #[serde(default = "default_day", deserialize_with = "lenient::weekday")]
    pub day: Weekday,
    #[serde(default, deserialize_with = "lenient::slot_id")]
    pub time_slot: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_double_lesson: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_allerlei: bool,
    #[serde(default, deserialize_with = "lenient::id_list")]
    pub allerlei_topic_ids: Vec<String>,
}

fn default_day() -> Weekday {
    Weekday::Mon
}

impl CalendarLesson {
    pub fn new(
        id: impl Into<String>,
        yearly_lesson_id: impl Into<String>,
        week_year: i32,
        week_number: i64,
        day: Weekday,
        time_slot: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            yearly_lesson_id: Some(yearly_lesson_id.into()),
            second_yearly_lesson_id: None,
            week_number,
            week_year: Some(week_year),
            day,
            time_slot: time_slot.into(),
            is_double_lesson: false,
            is_allerlei: false,
            allerlei_topic_ids: Vec::new(),
        }
    }

    /// The yearly lesson whose progress this placement counts towards.
    pub fn governing_id(&self) -> Option<&str> {
        self.yearly_lesson_id
            .as_deref()
            .or(self.second_yearly_lesson_id.as_deref())
    }

    /// `(week_year, week_number)`, with a missing year replaced by `default_year`.
    pub fn week_key(&self, default_year: i32) -> (i32, i64) {
        (self.week_year.unwrap_or(default_year), self.week_number)
    }
}
