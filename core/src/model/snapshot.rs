use serde::{Deserialize, Serialize};

use crate::model::calendar_lesson::CalendarLesson;
use crate::model::topic::Topic;
use crate::model::yearly_lesson::YearlyLesson;

/// Everything the progress calculation reads, captured at one point in time.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LessonSnapshot {
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub yearly_lessons: Vec<YearlyLesson>,
    #[serde(default)]
    pub calendar_lessons: Vec<CalendarLesson>,
}

impl LessonSnapshot {
    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn calendar_lesson(&self, id: &str) -> Option<&CalendarLesson> {
        self.calendar_lessons.iter().find(|l| l.id == id)
    }
}
