use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use tracing::debug;

use crate::input::resolve_topic;
use crate::model::progress::ProgressRecord;
use crate::model::schedule::TimeSlotSchedule;
use crate::model::snapshot::LessonSnapshot;
use crate::model::topic::Topic;
use crate::repository::{LessonRepository, ScheduleRepository};
use crate::usecase::topic_progress::ProgressCalculator;

/// Loads a fresh snapshot for every call and hands it to the calculator.
pub struct ProgressService<R: LessonRepository, S: ScheduleRepository> {
    lessons: R,
    schedules: S,
}

impl<R: LessonRepository, S: ScheduleRepository> ProgressService<R, S> {
    pub fn new(lessons: R, schedules: S) -> Self {
        Self { lessons, schedules }
    }

    pub fn snapshot(&self) -> Result<LessonSnapshot> {
        let snapshot = self.lessons.snapshot()?;
        debug!(
            topics = snapshot.topics.len(),
            yearly_lessons = snapshot.yearly_lessons.len(),
            calendar_lessons = snapshot.calendar_lessons.len(),
            "loaded lesson snapshot"
        );
        Ok(snapshot)
    }

    pub fn schedule(&self) -> Result<TimeSlotSchedule> {
        TimeSlotSchedule::from_config(&self.schedules.load()?)
    }

    pub fn all_active(&self, now: NaiveDateTime) -> Result<Vec<ProgressRecord>> {
        let snapshot = self.snapshot()?;
        let schedule = self.schedule()?;
        Ok(ProgressCalculator::new(&schedule, now).for_all_active_topics(&snapshot))
    }

    pub fn for_topic(&self, topic_id: &str, now: NaiveDateTime) -> Result<ProgressRecord> {
        let snapshot = self.snapshot()?;
        let schedule = self.schedule()?;
        Ok(ProgressCalculator::new(&schedule, now).for_topic(topic_id, &snapshot))
    }

    /// Progress of every topic an Allerlei calendar lesson covers.
    pub fn for_allerlei_lesson(
        &self,
        calendar_lesson_id: &str,
        now: NaiveDateTime,
    ) -> Result<Vec<ProgressRecord>> {
        let snapshot = self.snapshot()?;
        let lesson = snapshot
            .calendar_lesson(calendar_lesson_id)
            .ok_or_else(|| anyhow!("Calendar lesson {} not found", calendar_lesson_id))?;
        if lesson.allerlei_topic_ids.is_empty() {
            return Err(anyhow!("Calendar lesson {} has no Allerlei topics", calendar_lesson_id));
        }

        let schedule = self.schedule()?;
        let calculator = ProgressCalculator::new(&schedule, now);
        Ok(calculator.for_topic_set(lesson.allerlei_topic_ids.as_slice(), &snapshot))
    }

    pub fn resolve_topic(&self, query: &str) -> Result<Topic> {
        let topics = self.lessons.topics()?;
        resolve_topic(query, &topics).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar_lesson::CalendarLesson;
    use crate::model::schedule::ScheduleConfig;
    use crate::model::yearly_lesson::YearlyLesson;
    use chrono::{NaiveDate, Weekday};

    struct MockLessonRepo {
        snapshot: LessonSnapshot,
    }

    impl LessonRepository for MockLessonRepo {
        fn topics(&self) -> Result<Vec<Topic>> { Ok(self.snapshot.topics.clone()) }
        fn yearly_lessons(&self) -> Result<Vec<YearlyLesson>> { Ok(self.snapshot.yearly_lessons.clone()) }
        fn calendar_lessons(&self) -> Result<Vec<CalendarLesson>> { Ok(self.snapshot.calendar_lessons.clone()) }
    }

    struct MockScheduleRepo {
        config: ScheduleConfig,
    }

    impl ScheduleRepository for MockScheduleRepo {
        fn load(&self) -> Result<ScheduleConfig> { Ok(self.config.clone()) }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    fn service(config: ScheduleConfig) -> ProgressService<MockLessonRepo, MockScheduleRepo> {
        let mut allerlei = CalendarLesson::new("mix", "a1", 2025, 10, Weekday::Mon, "1");
        allerlei.is_allerlei = true;
        allerlei.allerlei_topic_ids = vec!["t2".to_string(), "gone".to_string(), "t1".to_string()];

        let snapshot = LessonSnapshot {
            topics: vec![Topic::new("t1", "Algebra"), Topic::new("t2", "Biology")],
            yearly_lessons: vec![
                YearlyLesson::new("a1", "t1", 1),
                YearlyLesson::new("a2", "t1", 2),
                YearlyLesson::new("b1", "t2", 1),
            ],
            calendar_lessons: vec![
                allerlei,
                CalendarLesson::new("plain", "b1", 2025, 11, Weekday::Wed, "2"),
            ],
        };
        ProgressService::new(MockLessonRepo { snapshot }, MockScheduleRepo { config })
    }

    #[test]
    fn test_all_active() {
        let records = service(ScheduleConfig::default()).all_active(now()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].completed, 1);
        assert_eq!(records[1].completed, 1);
    }

    #[test]
    fn test_schedule_config_changes_end_times() {
        // Slot 2 ends 09:30 by default; starting the day at 09:30 moves it to 11:00.
        let late = ScheduleConfig {
            start_time: "09:30".to_string(),
            ..ScheduleConfig::default()
        };
        let record = service(late).for_topic("t2", now()).unwrap();
        assert_eq!(record.completed, 0);
    }

    #[test]
    fn test_for_allerlei_lesson() {
        let svc = service(ScheduleConfig::default());
        let records = svc.for_allerlei_lesson("mix", now()).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.topic_id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t1"]);

        assert!(svc.for_allerlei_lesson("nope", now()).is_err());
        assert!(svc.for_allerlei_lesson("plain", now()).is_err());
    }

    #[test]
    fn test_resolve_topic() {
        let svc = service(ScheduleConfig::default());
        assert_eq!(svc.resolve_topic("bio").unwrap().id, "t2");
        assert!(svc.resolve_topic("chem").is_err());
    }

    #[test]
    fn test_invalid_schedule_is_reported() {
        let broken = ScheduleConfig {
            start_time: "25:99".to_string(),
            ..ScheduleConfig::default()
        };
        assert!(service(broken).all_active(now()).is_err());
    }
}
