#![forbid(unsafe_code)]

pub mod error;
pub mod lessons;

pub use learnflow_core::Clock;

pub use error::ViewerError;
pub use lessons::{
    LessonActions, LessonViewer, LessonViewerService, LessonViewerSnapshot, OutlineItem,
    OutlineStatus, ProgressDisplay,
};
