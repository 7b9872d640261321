use serde::{Deserialize, Serialize};

use crate::model::progress::ProgressRecord;

/// Display form of a [`ProgressRecord`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProgressDto {
    pub topic_id: String,
    pub title: String,
    pub color: Option<String>,
    pub planned: u32,
    pub completed: u32,
    pub remaining: u32,
    pub percent: f64, // 0..=100
    pub exam: String, // empty when the topic has no exam
    pub exam_this_week: bool,
}

impl ProgressDto {
    pub fn from_record(record: &ProgressRecord) -> Self {
        // Double lessons can push completed past planned.
        let percent = if record.planned > 0 {
            (record.completed as f64 / record.planned as f64 * 100.0).min(100.0)
        } else {
            0.0
        };

        Self {
            topic_id: record.topic_id.clone(),
            title: record.title().to_string(),
            color: record.topic.as_ref().and_then(|t| t.color.clone()),
            planned: record.planned,
            completed: record.completed,
            remaining: record.planned.saturating_sub(record.completed),
            percent,
            exam: exam_label(record),
            exam_this_week: record.exam_this_week,
        }
    }
}

fn exam_label(record: &ProgressRecord) -> String {
    if record.exam_this_week {
        return "exam this week".to_string();
    }
    match record.lessons_until_exam {
        None => String::new(),
        Some(0) => "exam due".to_string(),
        Some(1) => "exam in 1 lesson".to_string(),
        Some(n) => format!("exam in {} lessons", n),
    }
}
