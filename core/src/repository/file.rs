use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::model::calendar_lesson::CalendarLesson;
use crate::model::topic::Topic;
use crate::model::yearly_lesson::YearlyLesson;
use crate::repository::traits::LessonRepository;

const TOPICS_FILE_NAME: &str = "topics.json";
const YEARLY_LESSONS_FILE_NAME: &str = "yearly_lessons.json";
const CALENDAR_LESSONS_FILE_NAME: &str = "calendar_lessons.json";

/// Directory holding the exported collections, `~/.lessonplan` unless given.
pub fn data_dir(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    let path = match base_dir {
        Some(dir) => dir,
        None => {
            let home_dir = dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?;
            home_dir.join(".lessonplan")
        }
    };
    fs::create_dir_all(&path)?;
    Ok(path)
}

pub(crate) fn ensure_file<T: Serialize>(path: &Path, initial: &T) -> Result<()> {
    if !path.exists() {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, initial)?;
        writer.flush()?;
    }
    Ok(())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader)
        .with_context(|| format!("Could not parse {}", path.display()))?;
    Ok(value)
}

/// Reads the collections exported from the backend as JSON arrays.
#[derive(Clone)]
pub struct FileLessonRepository {
    base_dir: PathBuf,
}

impl FileLessonRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let base_dir = data_dir(base_dir)?;
        for name in [TOPICS_FILE_NAME, YEARLY_LESSONS_FILE_NAME, CALENDAR_LESSONS_FILE_NAME] {
            ensure_file(&base_dir.join(name), &Vec::<()>::new())?;
        }
        Ok(FileLessonRepository { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn read_collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let items: Vec<T> = read_json(&self.base_dir.join(name))?;
        debug!(file = name, count = items.len(), "loaded collection");
        Ok(items)
    }
}

impl LessonRepository for FileLessonRepository {
    fn topics(&self) -> Result<Vec<Topic>> {
        self.read_collection(TOPICS_FILE_NAME)
    }

    fn yearly_lessons(&self) -> Result<Vec<YearlyLesson>> {
        self.read_collection(YEARLY_LESSONS_FILE_NAME)
    }

    fn calendar_lessons(&self) -> Result<Vec<CalendarLesson>> {
        self.read_collection(CALENDAR_LESSONS_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_empty_collections() {
        let dir = TempDir::new().unwrap();
        let repo = FileLessonRepository::new(Some(dir.path().join("data"))).unwrap();

        let snapshot = repo.snapshot().unwrap();
        assert!(snapshot.topics.is_empty());
        assert!(snapshot.yearly_lessons.is_empty());
        assert!(snapshot.calendar_lessons.is_empty());
        assert!(repo.base_dir().join(CALENDAR_LESSONS_FILE_NAME).exists());
    }

    #[test]
    fn test_reads_exported_records() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(TOPICS_FILE_NAME),
            r##"[{"id": "t1", "name": "Algebra", "color": "#ff0000"}]"##,
        )
        .unwrap();
        fs::write(
            dir.path().join(YEARLY_LESSONS_FILE_NAME),
            r#"[{"id": "y1", "topic_id": "t1", "lesson_number": "2", "is_exam": true}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(CALENDAR_LESSONS_FILE_NAME),
            r#"[{"id": "c1", "yearly_lesson_id": "y1", "week_number": 5, "week_year": 2025, "day": "Tue", "time_slot": "3"}]"#,
        )
        .unwrap();

        let repo = FileLessonRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let snapshot = repo.snapshot().unwrap();

        assert_eq!(snapshot.topics[0].title, "Algebra");
        assert_eq!(snapshot.yearly_lessons[0].lesson_number, 2);
        assert!(snapshot.yearly_lessons[0].is_exam);
        assert_eq!(snapshot.calendar_lessons[0].week_year, Some(2025));
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(TOPICS_FILE_NAME), "{not json").unwrap();

        let repo = FileLessonRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert!(repo.topics().is_err());
    }
}
