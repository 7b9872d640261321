use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::model::schedule::ScheduleConfig;
use crate::repository::file::{data_dir, ensure_file, read_json};
use crate::repository::traits::ScheduleRepository;

const SCHEDULE_FILE_NAME: &str = "schedule.json";

/// Bell schedule stored next to the lesson collections. Written with the
/// default configuration on first use.
#[derive(Clone)]
pub struct FileScheduleRepository {
    file_path: PathBuf,
}

impl FileScheduleRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let file_path = data_dir(base_dir)?.join(SCHEDULE_FILE_NAME);
        ensure_file(&file_path, &ScheduleConfig::default())?;
        Ok(Self { file_path })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl ScheduleRepository for FileScheduleRepository {
    fn load(&self) -> Result<ScheduleConfig> {
        read_json(&self.file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_written_on_first_use() {
        let dir = TempDir::new().unwrap();
        let repo = FileScheduleRepository::new(Some(dir.path().to_path_buf())).unwrap();

        assert!(repo.file_path().exists());
        assert_eq!(repo.load().unwrap(), ScheduleConfig::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(SCHEDULE_FILE_NAME),
            r#"{"start_time": "07:45", "school_days": ["Mon", "Sat"]}"#,
        )
        .unwrap();

        let repo = FileScheduleRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let config = repo.load().unwrap();
        assert_eq!(config.start_time, "07:45");
        assert_eq!(config.lesson_minutes, 45);
        assert_eq!(config.school_days.len(), 2);
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let repo = FileScheduleRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::write(repo.file_path(), r#"{"slots_per_day": 10}"#).unwrap();

        let reopened = FileScheduleRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(reopened.load().unwrap().slots_per_day, 10);
    }
}
