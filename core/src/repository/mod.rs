pub mod file;
pub mod schedule;
pub mod traits;

// Re-export
pub use file::FileLessonRepository;
pub use schedule::FileScheduleRepository;
pub use traits::{LessonRepository, ScheduleRepository};
