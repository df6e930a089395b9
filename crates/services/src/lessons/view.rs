use learnflow_core::gate::{COMPLETION_THRESHOLD_PERCENT, GateState};
use learnflow_core::model::{CourseId, LessonId, Role};
use serde::Serialize;

/// Affordances the lesson page should offer right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LessonActions {
    pub mark_complete: bool,
    pub next_lesson: bool,
}

/// Watch-progress bar shown to learners.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressDisplay {
    /// Rounded to a whole percent for the label.
    pub percent: u8,
    /// Bar fill, capped at 100.
    pub bar_width_percent: f64,
    /// Shown while the lesson cannot be completed yet.
    pub hint: Option<String>,
}

impl ProgressDisplay {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn new(progress_percent: f64, gate: GateState) -> Self {
        let bar_width_percent = progress_percent.clamp(0.0, 100.0);
        let hint = (gate == GateState::NotEligible).then(|| {
            format!(
                "Watch at least {COMPLETION_THRESHOLD_PERCENT:.0}% of the video to mark this lesson as complete"
            )
        });
        Self {
            percent: bar_width_percent.round() as u8,
            bar_width_percent,
            hint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineStatus {
    Current,
    Completed,
    Pending,
}

/// One row of the course sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineItem {
    pub lesson_id: LessonId,
    /// 1-based position in the sequence.
    pub position: usize,
    pub title: String,
    pub subject: String,
    pub status: OutlineStatus,
}

/// Serializable picture of the viewer, handy for logging and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonViewerSnapshot {
    pub course_id: CourseId,
    pub course_title: String,
    pub lesson_id: LessonId,
    pub lesson_title: String,
    pub video: String,
    pub role: Role,
    pub gate: GateState,
    pub progress_percent: f64,
    pub progress: Option<ProgressDisplay>,
    pub actions: LessonActions,
    pub course_progress_percent: u8,
    pub pending_completions: usize,
    pub outline: Vec<OutlineItem>,
}
