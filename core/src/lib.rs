pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use input::resolve_topic;
pub use model::calendar_lesson::CalendarLesson;
pub use model::progress::ProgressRecord;
pub use model::schedule::{ScheduleConfig, TimeSlot, TimeSlotSchedule};
pub use model::snapshot::LessonSnapshot;
pub use model::topic::Topic;
pub use model::yearly_lesson::YearlyLesson;
pub use repository::{FileLessonRepository, FileScheduleRepository, LessonRepository, ScheduleRepository};
pub use service::dto::ProgressDto;
pub use service::progress_service::ProgressService;
pub use time::parse_reference_time;
pub use usecase::topic_progress::{
    compute_for_all_active_topics, compute_for_topic, compute_for_topic_set, ProgressCalculator,
};
