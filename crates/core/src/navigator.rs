//! Forward navigation through a course's lessons.

use thiserror::Error;

use crate::gate::{CompletionGate, GateState};
use crate::model::{CourseLessonSequence, Lesson, LessonId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavigatorError {
    #[error("lesson {0} is not part of this course")]
    UnknownLesson(LessonId),
}

/// Owns a lesson sequence and a pointer to the lesson being viewed.
///
/// Advancing is only allowed one step at a time, and only once the current
/// lesson's gate is `Completed`.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceNavigator {
    sequence: CourseLessonSequence,
    current: usize,
}

impl SequenceNavigator {
    /// Starts at the first lesson.
    #[must_use]
    pub fn new(sequence: CourseLessonSequence) -> Self {
        Self {
            sequence,
            current: 0,
        }
    }

    /// Starts at the given lesson.
    ///
    /// # Errors
    ///
    /// Returns `NavigatorError::UnknownLesson` if the lesson is not in the sequence.
    pub fn starting_at(
        sequence: CourseLessonSequence,
        lesson_id: LessonId,
    ) -> Result<Self, NavigatorError> {
        let current = sequence
            .position_of(lesson_id)
            .ok_or(NavigatorError::UnknownLesson(lesson_id))?;
        Ok(Self { sequence, current })
    }

    #[must_use]
    pub fn sequence(&self) -> &CourseLessonSequence {
        &self.sequence
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current(&self) -> &Lesson {
        // `current` is always a valid index: sequences are non-empty and
        // the pointer only moves when `has_next` holds.
        &self.sequence.lessons()[self.current]
    }

    #[must_use]
    pub fn next(&self) -> Option<&Lesson> {
        self.sequence.get(self.current + 1)
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current + 1 < self.sequence.len()
    }

    #[must_use]
    pub fn can_advance(&self, gate: GateState) -> bool {
        self.has_next() && gate == GateState::Completed
    }

    /// Moves to the next lesson and returns its id, or does nothing and
    /// returns `None` when `can_advance` is false.
    pub fn advance(&mut self, gate: GateState) -> Option<LessonId> {
        if !self.can_advance(gate) {
            return None;
        }
        self.current += 1;
        Some(self.current().id())
    }

    /// Copies a committed completion onto the current lesson.
    ///
    /// Returns `false` if the gate has not reached `Completed`.
    pub fn mark_current_completed(&mut self, gate: &CompletionGate) -> bool {
        if !gate.is_completed() {
            return false;
        }
        match self.sequence.get_mut(self.current) {
            Some(lesson) => {
                lesson.mark_completed();
                true
            }
            None => false,
        }
    }
}
