use serde::{Deserialize, Serialize};

use crate::model::topic::Topic;

/// Completion and exam statistics for one topic at a given instant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub topic_id: String,
    pub topic: Option<Topic>,
    pub planned: u32,
    pub completed: u32,
    pub has_exam: bool,
    pub lessons_until_exam: Option<u32>,
    pub exam_this_week: bool,
}

impl ProgressRecord {
    pub fn empty(topic_id: impl Into<String>, topic: Option<Topic>) -> Self {
        Self {
            topic_id: topic_id.into(),
            topic,
            planned: 0,
            completed: 0,
            has_exam: false,
            lessons_until_exam: None,
            exam_this_week: false,
        }
    }

    pub fn title(&self) -> &str {
        self.topic
            .as_ref()
            .map(|t| t.title.as_str())
            .unwrap_or(self.topic_id.as_str())
    }
}
