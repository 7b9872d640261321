use serde::{Deserialize, Serialize};

use crate::model::lenient;

/// One slot of a topic's curriculum sequence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct YearlyLesson {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::id")]
    pub topic_id: String,
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub lesson_number: i64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_exam: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_half_class: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl YearlyLesson {
    pub fn new(id: impl Into<String>, topic_id: impl Into<String>, lesson_number: i64) -> Self {
        Self {
            id: id.into(),
            topic_id: topic_id.into(),
            lesson_number,
            is_exam: false,
            is_half_class: false,
            title: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_fields_fall_back_to_defaults() {
        let raw = r#"[
            {"id": "a", "topic_id": "t1", "lesson_number": "abc", "is_exam": null},
            {"id": "b", "topic_id": "t1", "lesson_number": "4", "is_half_class": true},
            {"id": "c", "topic_id": "t1"},
            {"topic_id": null, "lesson_number": 2}
        ]"#;
        let lessons: Vec<YearlyLesson> = serde_json::from_str(raw).unwrap();

        assert_eq!(lessons[0].lesson_number, 0);
        assert!(!lessons[0].is_exam);
        assert_eq!(lessons[1].lesson_number, 4);
        assert!(lessons[1].is_half_class);
        assert_eq!(lessons[2].lesson_number, 0);
        assert!(!lessons[2].is_half_class);
        assert_eq!(lessons[3].id, "");
        assert_eq!(lessons[3].topic_id, "");
    }
}
