//! Progress-gated lesson completion.

use serde::{Deserialize, Serialize};

use crate::model::Lesson;

/// Minimum watch progress, in percent, before a lesson may be completed.
pub const COMPLETION_THRESHOLD_PERCENT: f64 = 80.0;

/// Completion eligibility of the open lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Not enough of the video has been watched.
    NotEligible,
    /// The learner may mark the lesson as complete.
    Eligible,
    /// Completion has been committed. Terminal.
    Completed,
}

/// State machine deciding whether "mark complete" is currently allowed.
///
/// `NotEligible` and `Eligible` follow the latest progress in both
/// directions, so seeking back below the threshold closes the gate again.
/// Once `Completed`, progress updates are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionGate {
    state: GateState,
}

impl CompletionGate {
    #[must_use]
    pub fn new(already_completed: bool) -> Self {
        let state = if already_completed {
            GateState::Completed
        } else {
            GateState::NotEligible
        };
        Self { state }
    }

    /// Gate for a freshly opened lesson, honoring a completion from an earlier session.
    #[must_use]
    pub fn for_lesson(lesson: &Lesson) -> Self {
        Self::new(lesson.is_completed())
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    #[must_use]
    pub fn can_mark_complete(&self) -> bool {
        self.state == GateState::Eligible
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == GateState::Completed
    }

    /// Re-evaluates eligibility against the latest progress.
    pub fn observe_progress(&mut self, progress_percent: f64) -> GateState {
        if self.state != GateState::Completed {
            self.state = if progress_percent >= COMPLETION_THRESHOLD_PERCENT {
                GateState::Eligible
            } else {
                GateState::NotEligible
            };
        }
        self.state
    }

    /// Commits completion. Returns `false`, changing nothing, unless the gate is `Eligible`.
    pub fn mark_complete(&mut self) -> bool {
        if self.state != GateState::Eligible {
            return false;
        }
        self.state = GateState::Completed;
        true
    }
}
