use crate::model::calendar_lesson::CalendarLesson;
use crate::model::schedule::ScheduleConfig;
use crate::model::snapshot::LessonSnapshot;
use crate::model::topic::Topic;
use crate::model::yearly_lesson::YearlyLesson;
use anyhow::Result;

pub trait LessonRepository {
    fn topics(&self) -> Result<Vec<Topic>>;
    fn yearly_lessons(&self) -> Result<Vec<YearlyLesson>>;
    fn calendar_lessons(&self) -> Result<Vec<CalendarLesson>>;

    fn snapshot(&self) -> Result<LessonSnapshot> {
        Ok(LessonSnapshot {
            topics: self.topics()?,
            yearly_lessons: self.yearly_lessons()?,
            calendar_lessons: self.calendar_lessons()?,
        })
    }
}

pub trait ScheduleRepository {
    fn load(&self) -> Result<ScheduleConfig>;
}
