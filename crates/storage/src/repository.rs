use async_trait::async_trait;
use learnflow_core::model::{CompletionRecord, Course, CourseId, Lesson, LessonId};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),
}

/// Course catalog contract: courses and their lessons.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist or update a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Fetch a course by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_course(&self, id: CourseId) -> Result<Course, StorageError>;

    /// Persist or update a lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the lesson's course does not exist.
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError>;

    /// All lessons of a course, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the course does not exist.
    async fn list_lessons(&self, course_id: CourseId) -> Result<Vec<Lesson>, StorageError>;
}

/// Receives completion notifications from the lesson viewer.
#[async_trait]
pub trait CompletionRepository: Send + Sync {
    /// Record that a lesson was completed. Recording the same lesson twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn record_completion(&self, record: &CompletionRecord) -> Result<(), StorageError>;

    /// Lessons of a course with a recorded completion.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn completed_lessons(&self, course_id: CourseId) -> Result<Vec<LessonId>, StorageError>;
}

/// Simple in-memory repository implementation standing in for the remote API.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<HashMap<CourseId, Course>>>,
    lessons: Arc<Mutex<HashMap<(CourseId, LessonId), Lesson>>>,
    completions: Arc<Mutex<BTreeMap<LessonId, CompletionRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut guard = self.courses.lock().map_err(poisoned)?;
        guard.insert(course.id(), course.clone());
        Ok(())
    }

    async fn get_course(&self, id: CourseId) -> Result<Course, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        {
            let courses = self.courses.lock().map_err(poisoned)?;
            if !courses.contains_key(&lesson.course_id()) {
                return Err(StorageError::NotFound);
            }
        }
        let mut guard = self.lessons.lock().map_err(poisoned)?;
        guard.insert((lesson.course_id(), lesson.id()), lesson.clone());
        Ok(())
    }

    async fn list_lessons(&self, course_id: CourseId) -> Result<Vec<Lesson>, StorageError> {
        {
            let courses = self.courses.lock().map_err(poisoned)?;
            if !courses.contains_key(&course_id) {
                return Err(StorageError::NotFound);
            }
        }
        let guard = self.lessons.lock().map_err(poisoned)?;
        Ok(guard
            .iter()
            .filter(|((course, _), _)| *course == course_id)
            .map(|(_, lesson)| lesson.clone())
            .collect())
    }
}

#[async_trait]
impl CompletionRepository for InMemoryRepository {
    async fn record_completion(&self, record: &CompletionRecord) -> Result<(), StorageError> {
        let mut guard = self.completions.lock().map_err(poisoned)?;
        if let Some(existing) = guard.get(&record.lesson_id) {
            if existing.course_id != record.course_id {
                return Err(StorageError::Conflict);
            }
            return Ok(());
        }
        guard.insert(record.lesson_id, *record);
        Ok(())
    }

    async fn completed_lessons(&self, course_id: CourseId) -> Result<Vec<LessonId>, StorageError> {
        let guard = self.completions.lock().map_err(poisoned)?;
        Ok(guard
            .values()
            .filter(|r| r.course_id == course_id)
            .map(|r| r.lesson_id)
            .collect())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
    pub completions: Arc<dyn CompletionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let completions: Arc<dyn CompletionRepository> = Arc::new(repo);
        Self {
            courses,
            completions,
        }
    }
}
