use std::collections::HashSet;
use std::sync::Arc;

use learnflow_core::model::{CompletionRecord, CourseId, CourseLessonSequence, LessonId, Role};
use storage::repository::{CompletionRepository, CourseRepository};

use super::viewer::LessonViewer;
use crate::Clock;
use crate::error::ViewerError;

/// Orchestrates opening lesson pages and notifying the data provider of completions.
#[derive(Clone)]
pub struct LessonViewerService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
    completions: Arc<dyn CompletionRepository>,
}

impl LessonViewerService {
    #[must_use]
    pub fn new(
        clock: Clock,
        courses: Arc<dyn CourseRepository>,
        completions: Arc<dyn CompletionRepository>,
    ) -> Self {
        Self {
            clock,
            courses,
            completions,
        }
    }

    /// Load a course and open the viewer at `lesson_id` (first lesson when `None`).
    ///
    /// Completions already recorded for the course are applied to the lessons.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError` for storage failures, an invalid lesson sequence,
    /// or a lesson that does not belong to the course.
    pub async fn open_lesson(
        &self,
        course_id: CourseId,
        lesson_id: Option<LessonId>,
        role: Role,
    ) -> Result<LessonViewer, ViewerError> {
        let course = self.courses.get_course(course_id).await?;
        let mut lessons = self.courses.list_lessons(course_id).await?;
        let done: HashSet<LessonId> = self
            .completions
            .completed_lessons(course_id)
            .await?
            .into_iter()
            .collect();
        for lesson in &mut lessons {
            if done.contains(&lesson.id()) {
                lesson.mark_completed();
            }
        }

        let sequence = CourseLessonSequence::new(course_id, lessons)?;
        let viewer = LessonViewer::open(course, sequence, lesson_id, role, self.clock)?;
        log::info!(
            "opened course {course_id} at lesson {} as {role}",
            viewer.current_lesson().id()
        );
        Ok(viewer)
    }

    /// Complete the current lesson and notify storage.
    ///
    /// Returns `Ok(None)` when completion is not currently allowed. If the
    /// notification fails the lesson stays completed in the viewer, the record
    /// stays pending, and the storage error is returned. Retrying is up to
    /// the caller via [`Self::flush_pending`].
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::Storage` if the completion cannot be recorded.
    pub async fn mark_complete(
        &self,
        viewer: &mut LessonViewer,
    ) -> Result<Option<CompletionRecord>, ViewerError> {
        let Some(record) = viewer.mark_complete() else {
            return Ok(None);
        };
        self.flush_pending(viewer).await?;
        Ok(Some(record))
    }

    /// Send every pending completion to storage, oldest first.
    ///
    /// Returns how many were acknowledged. Stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::Storage` if a record cannot be stored.
    pub async fn flush_pending(&self, viewer: &mut LessonViewer) -> Result<usize, ViewerError> {
        let pending = viewer.pending_completions().to_vec();
        let mut acknowledged = 0;
        for record in pending {
            if let Err(err) = self.completions.record_completion(&record).await {
                log::warn!(
                    "failed to record completion of lesson {}: {err}",
                    record.lesson_id
                );
                return Err(err.into());
            }
            viewer.acknowledge(record.lesson_id);
            acknowledged += 1;
        }
        Ok(acknowledged)
    }

    /// Advance to the next lesson, returning the routing target.
    pub fn advance(&self, viewer: &mut LessonViewer) -> Option<LessonId> {
        let from = viewer.current_lesson().id();
        let target = viewer.advance();
        match target {
            Some(to) => log::info!("navigating from lesson {from} to lesson {to}"),
            None => log::debug!("advance from lesson {from} not allowed"),
        }
        target
    }
}
