mod view;
mod viewer;
mod workflow;

// Public API of the lesson subsystem.
pub use crate::error::ViewerError;
pub use view::{LessonActions, LessonViewerSnapshot, OutlineItem, OutlineStatus, ProgressDisplay};
pub use viewer::LessonViewer;
pub use workflow::LessonViewerService;
