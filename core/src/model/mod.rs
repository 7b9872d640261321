pub mod calendar_lesson;
pub mod lenient;
pub mod progress;
pub mod schedule;
pub mod snapshot;
pub mod topic;
pub mod yearly_lesson;
