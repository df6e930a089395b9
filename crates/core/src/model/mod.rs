mod course;
mod ids;
mod lesson;
mod media;
mod role;

pub use ids::{CourseId, LessonId, ParseIdError};
pub use media::{MediaUri, MediaValidationError};
pub use role::{Role, RoleParseError};

pub use course::{CompletionRecord, Course, CourseError, CourseLessonSequence, SequenceError};
pub use lesson::{Lesson, LessonDraft, LessonError, ValidatedLesson};
