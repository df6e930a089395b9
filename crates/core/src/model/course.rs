use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::{
    ids::{CourseId, LessonId},
    lesson::Lesson,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SequenceError {
    #[error("course {0} has no lessons")]
    Empty(CourseId),

    #[error("lesson order {order} appears more than once in course {course_id}")]
    DuplicateOrder { course_id: CourseId, order: u32 },

    #[error("lesson {lesson_id} belongs to course {actual}, not {expected}")]
    ForeignLesson {
        lesson_id: LessonId,
        expected: CourseId,
        actual: CourseId,
    },
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: String,
    subject: String,
    author: String,
    description: Option<String>,
}

impl Course {
    /// Creates a course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if the title is blank.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        subject: impl Into<String>,
        author: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, CourseError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(CourseError::EmptyTitle);
        }

        Ok(Self {
            id,
            title,
            subject: subject.into().trim().to_owned(),
            author: author.into().trim().to_owned(),
            description: description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
        })
    }

    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

//
// ─── LESSON SEQUENCE ───────────────────────────────────────────────────────────
//

/// Lessons of a single course, sorted by ascending `order`.
///
/// Orders are unique but need not be contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseLessonSequence {
    course_id: CourseId,
    lessons: Vec<Lesson>,
}

impl CourseLessonSequence {
    /// Builds the sequence, sorting lessons by `order`.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError` when there are no lessons, when two lessons
    /// share an order, or when a lesson belongs to another course.
    pub fn new(course_id: CourseId, mut lessons: Vec<Lesson>) -> Result<Self, SequenceError> {
        if lessons.is_empty() {
            return Err(SequenceError::Empty(course_id));
        }

        let mut seen = HashSet::with_capacity(lessons.len());
        for lesson in &lessons {
            if lesson.course_id() != course_id {
                return Err(SequenceError::ForeignLesson {
                    lesson_id: lesson.id(),
                    expected: course_id,
                    actual: lesson.course_id(),
                });
            }
            if !seen.insert(lesson.order()) {
                return Err(SequenceError::DuplicateOrder {
                    course_id,
                    order: lesson.order().get(),
                });
            }
        }

        lessons.sort_by_key(Lesson::order);
        Ok(Self { course_id, lessons })
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    /// Never true for a constructed sequence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Lesson> {
        self.lessons.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Lesson> {
        self.lessons.get_mut(index)
    }

    #[must_use]
    pub fn position_of(&self, lesson_id: LessonId) -> Option<usize> {
        self.lessons.iter().position(|l| l.id() == lesson_id)
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lesson> {
        self.lessons.iter()
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.lessons.iter().filter(|l| l.is_completed()).count()
    }

    /// Share of completed lessons, rounded to a whole percent.
    #[must_use]
    pub fn completion_percent(&self) -> u8 {
        let total = self.lessons.len();
        if total == 0 {
            return 0;
        }
        let pct = (self.completed_count() * 100 + total / 2) / total;
        u8::try_from(pct.min(100)).unwrap_or(100)
    }
}

//
// ─── COMPLETION RECORD ─────────────────────────────────────────────────────────
//

/// Notification handed to the data provider when a learner completes a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub lesson_id: LessonId,
    pub course_id: CourseId,
    pub completed_at: DateTime<Utc>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
