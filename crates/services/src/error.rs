//! Shared error types for the services crate.

use thiserror::Error;

use learnflow_core::model::{CourseId, SequenceError};
use learnflow_core::navigator::NavigatorError;
use storage::repository::StorageError;

/// Errors emitted by the lesson viewer and its service.
///
/// Blocked actions (completing too early, advancing past the last lesson,
/// stale media events) are not errors; they surface as `None`/`Stale`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ViewerError {
    #[error("lesson sequence belongs to course {sequence}, not {course}")]
    CourseMismatch { course: CourseId, sequence: CourseId },
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error(transparent)]
    Navigator(#[from] NavigatorError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
