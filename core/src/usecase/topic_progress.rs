//! Topic progress: how many planned lessons of a topic have actually been
//! taught by a given instant, and how far away the topic's next exam is.
//!
//! The three entry points (one topic, a set of topics for Allerlei lessons,
//! every topic with planned lessons) all go through [`accumulate`], so their
//! results agree per topic.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use tracing::trace;

use crate::model::progress::ProgressRecord;
use crate::model::schedule::TimeSlotSchedule;
use crate::model::snapshot::LessonSnapshot;
use crate::model::yearly_lesson::YearlyLesson;
use crate::time::{has_ended, is_in_week_of};

pub struct ProgressCalculator<'a> {
    schedule: &'a TimeSlotSchedule,
    now: NaiveDateTime,
}

impl<'a> ProgressCalculator<'a> {
    pub fn new(schedule: &'a TimeSlotSchedule, now: NaiveDateTime) -> Self {
        Self { schedule, now }
    }

    pub fn for_topic(&self, topic_id: &str, snapshot: &LessonSnapshot) -> ProgressRecord {
        compute_for_topic(topic_id, snapshot, self.schedule, self.now)
    }

    pub fn for_topic_set<S: AsRef<str>>(
        &self,
        topic_ids: &[S],
        snapshot: &LessonSnapshot,
    ) -> Vec<ProgressRecord> {
        compute_for_topic_set(topic_ids, snapshot, self.schedule, self.now)
    }

    pub fn for_all_active_topics(&self, snapshot: &LessonSnapshot) -> Vec<ProgressRecord> {
        compute_for_all_active_topics(snapshot, self.schedule, self.now)
    }
}

/// Progress of a single topic. Unknown topics yield an all-zero record.
pub fn compute_for_topic(
    topic_id: &str,
    snapshot: &LessonSnapshot,
    schedule: &TimeSlotSchedule,
    now: NaiveDateTime,
) -> ProgressRecord {
    let mut records = accumulate(snapshot, schedule, now, |id| id == topic_id);
    records
        .remove(topic_id)
        .unwrap_or_else(|| ProgressRecord::empty(topic_id, snapshot.topic(topic_id).cloned()))
}

/// Progress of every listed topic, in input order. Ids without a matching
/// topic are left out.
pub fn compute_for_topic_set<S: AsRef<str>>(
    topic_ids: &[S],
    snapshot: &LessonSnapshot,
    schedule: &TimeSlotSchedule,
    now: NaiveDateTime,
) -> Vec<ProgressRecord> {
    let mut seen = HashSet::new();
    let wanted: Vec<&str> = topic_ids
        .iter()
        .map(|id| id.as_ref())
        .filter(|id| snapshot.topic(id).is_some())
        .filter(|id| seen.insert(*id))
        .collect();

    let mut records = accumulate(snapshot, schedule, now, |id| wanted.iter().any(|w| *w == id));
    wanted
        .iter()
        .map(|id| {
            records
                .remove(*id)
                .unwrap_or_else(|| ProgressRecord::empty(*id, snapshot.topic(id).cloned()))
        })
        .collect()
}

/// Progress of every topic that has at least one planned lesson, ordered by
/// topic title.
pub fn compute_for_all_active_topics(
    snapshot: &LessonSnapshot,
    schedule: &TimeSlotSchedule,
    now: NaiveDateTime,
) -> Vec<ProgressRecord> {
    let mut records: Vec<ProgressRecord> = accumulate(snapshot, schedule, now, |_| true)
        .into_values()
        .collect();
    records.sort_by(|a, b| {
        a.title()
            .cmp(b.title())
            .then_with(|| a.topic_id.cmp(&b.topic_id))
    });
    records
}

fn accumulate<'s, F>(
    snapshot: &'s LessonSnapshot,
    schedule: &TimeSlotSchedule,
    now: NaiveDateTime,
    include: F,
) -> HashMap<&'s str, ProgressRecord>
where
    F: Fn(&str) -> bool,
{
    // 1. Group the catalogue by topic and order each group by lesson number.
    //    The sort is stable, so equal numbers keep catalogue order.
    let mut groups: HashMap<&str, Vec<&YearlyLesson>> = HashMap::new();
    let mut by_id: HashMap<&str, &YearlyLesson> = HashMap::new();
    // References resolve against the whole catalogue so that every selection
    // credits an occurrence to the same topic.
    for item in &snapshot.yearly_lessons {
        by_id.entry(item.id.as_str()).or_insert(item);
        if include(item.topic_id.as_str()) {
            groups.entry(item.topic_id.as_str()).or_default().push(item);
        }
    }
    for items in groups.values_mut() {
        items.sort_by_key(|item| item.lesson_number);
    }

    // 2. Walk the calendar once, crediting ended lessons to their topic.
    let mut completed: HashMap<&str, u32> = HashMap::new();
    let mut half_class_seen: HashMap<&str, u32> = HashMap::new();
    let mut exam_this_week: HashSet<&str> = HashSet::new();

    for lesson in &snapshot.calendar_lessons {
        let Some(item_id) = lesson.governing_id() else {
            trace!(lesson = %lesson.id, "calendar lesson without yearly lesson");
            continue;
        };
        let Some(&item) = by_id.get(item_id) else {
            trace!(lesson = %lesson.id, yearly_lesson = item_id, "unknown yearly lesson");
            continue;
        };
        let topic = item.topic_id.as_str();
        if !include(topic) {
            continue;
        }

        if item.is_exam && is_in_week_of(lesson, now) {
            exam_this_week.insert(topic);
        }
        if !has_ended(lesson, schedule, now) {
            continue;
        }

        let credit = if item.is_half_class {
            // Both halves of the class must have had the lesson.
            let seen = half_class_seen.entry(item.id.as_str()).or_insert(0);
            *seen += 1;
            if *seen == 2 {
                1
            } else {
                0
            }
        } else if lesson.is_double_lesson {
            2
        } else {
            1
        };
        *completed.entry(topic).or_insert(0) += credit;
    }

    // 3. Derive the exam countdown per topic.
    groups
        .into_iter()
        .map(|(topic_id, items)| {
            let done = completed.get(topic_id).copied().unwrap_or(0);
            // Position of the first exam within the whole ordered topic.
            let exam_index = items
                .iter()
                .position(|item| item.is_exam)
                .map(|idx| (idx + 1) as u32);

            let record = ProgressRecord {
                topic_id: topic_id.to_string(),
                topic: snapshot.topic(topic_id).cloned(),
                planned: items.len() as u32,
                completed: done,
                has_exam: exam_index.is_some(),
                lessons_until_exam: exam_index.map(|idx| idx.saturating_sub(done)),
                exam_this_week: exam_this_week.contains(topic_id),
            };
            (topic_id, record)
        })
        .collect()
}
