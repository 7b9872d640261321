use serde::{Deserialize, Serialize};

use crate::model::lenient;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, alias = "name", deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub subject_id: Option<String>,
}

impl Topic {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            color: None,
            subject_id: None,
        }
    }
}
