use thiserror::Error;

use crate::model::{
    CourseError, LessonError, MediaValidationError, RoleParseError, SequenceError,
};
use crate::navigator::NavigatorError;

/// Umbrella error for the domain crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Media(#[from] MediaValidationError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error(transparent)]
    Navigator(#[from] NavigatorError),
    #[error(transparent)]
    Role(#[from] RoleParseError),
}
