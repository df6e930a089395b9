use std::fmt;

use learnflow_core::Clock;
use learnflow_core::gate::{CompletionGate, GateState};
use learnflow_core::model::{
    CompletionRecord, Course, CourseLessonSequence, Lesson, LessonId, Role,
};
use learnflow_core::navigator::SequenceNavigator;
use learnflow_core::playback::{MediaEvent, PlaybackTracker, TrackerUpdate};

use super::view::{
    LessonActions, LessonViewerSnapshot, OutlineItem, OutlineStatus, ProgressDisplay,
};
use crate::error::ViewerError;

//
// ─── VIEWER ────────────────────────────────────────────────────────────────────
//

/// State of one open lesson page.
///
/// Wires the playback tracker into the completion gate and the gate into the
/// sequence navigator. Everything runs synchronously on the caller's event
/// loop; the tracker and gate are rebuilt whenever the current lesson changes.
pub struct LessonViewer {
    course: Course,
    role: Role,
    clock: Clock,
    navigator: SequenceNavigator,
    tracker: PlaybackTracker,
    gate: CompletionGate,
    pending: Vec<CompletionRecord>,
}

impl LessonViewer {
    /// Open the lesson page at `lesson_id`, or at the first lesson when `None`.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::CourseMismatch` if the sequence belongs to another
    /// course, or `ViewerError::Navigator` if the lesson is not in the sequence.
    pub fn open(
        course: Course,
        sequence: CourseLessonSequence,
        lesson_id: Option<LessonId>,
        role: Role,
        clock: Clock,
    ) -> Result<Self, ViewerError> {
        if sequence.course_id() != course.id() {
            return Err(ViewerError::CourseMismatch {
                course: course.id(),
                sequence: sequence.course_id(),
            });
        }

        let navigator = match lesson_id {
            Some(id) => SequenceNavigator::starting_at(sequence, id)?,
            None => SequenceNavigator::new(sequence),
        };
        let tracker = PlaybackTracker::for_lesson(navigator.current());
        let gate = CompletionGate::for_lesson(navigator.current());

        Ok(Self {
            course,
            role,
            clock,
            navigator,
            tracker,
            gate,
            pending: Vec::new(),
        })
    }

    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn current_lesson(&self) -> &Lesson {
        self.navigator.current()
    }

    #[must_use]
    pub fn sequence(&self) -> &CourseLessonSequence {
        self.navigator.sequence()
    }

    #[must_use]
    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.tracker.progress_percent()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.navigator.has_next()
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.navigator.can_advance(self.gate.state())
    }

    /// Completions committed in memory but not yet acknowledged by storage.
    #[must_use]
    pub fn pending_completions(&self) -> &[CompletionRecord] {
        &self.pending
    }

    /// Feed one event from the media host.
    ///
    /// Events for a lesson other than the current one are dropped.
    pub fn apply_media_event(&mut self, event: &MediaEvent) -> TrackerUpdate {
        let update = self.tracker.apply(event);
        match update {
            TrackerUpdate::Applied(percent) => {
                let before = self.gate.state();
                let after = self.gate.observe_progress(percent);
                if before != after {
                    log::debug!(
                        "lesson {}: gate {before:?} -> {after:?} at {percent:.1}%",
                        self.tracker.lesson_id()
                    );
                }
            }
            TrackerUpdate::Stale => {
                log::debug!(
                    "dropping stale media event for lesson {} (current {})",
                    event.lesson_id(),
                    self.tracker.lesson_id()
                );
            }
        }
        update
    }

    /// What the page should offer. Instructors get nothing.
    #[must_use]
    pub fn actions(&self) -> LessonActions {
        if !self.role.can_complete_lessons() {
            return LessonActions::default();
        }
        LessonActions {
            mark_complete: self.gate.can_mark_complete(),
            next_lesson: self.can_advance(),
        }
    }

    /// Commit completion of the current lesson.
    ///
    /// Only a learner whose gate is `Eligible` can complete; anything else is a
    /// no-op returning `None`. The returned record is also queued as pending
    /// until the data provider acknowledges it.
    pub fn mark_complete(&mut self) -> Option<CompletionRecord> {
        if !self.role.can_complete_lessons() {
            log::debug!("mark complete ignored for role {}", self.role);
            return None;
        }
        if !self.gate.mark_complete() {
            log::debug!(
                "mark complete ignored in state {:?} at {:.1}%",
                self.gate.state(),
                self.progress_percent()
            );
            return None;
        }
        self.navigator.mark_current_completed(&self.gate);

        let lesson = self.navigator.current();
        let record = CompletionRecord {
            lesson_id: lesson.id(),
            course_id: lesson.course_id(),
            completed_at: self.clock.now(),
        };
        self.pending.push(record);
        log::info!("lesson {} completed", record.lesson_id);
        Some(record)
    }

    /// Move to the next lesson.
    ///
    /// Returns the new lesson id for the routing layer, or `None` (changing
    /// nothing) unless a learner has completed a lesson that has a successor.
    pub fn advance(&mut self) -> Option<LessonId> {
        if !self.role.can_complete_lessons() {
            return None;
        }
        let next = self.navigator.advance(self.gate.state())?;
        let lesson = self.navigator.current();
        self.tracker = PlaybackTracker::for_lesson(lesson);
        self.gate = CompletionGate::for_lesson(lesson);
        Some(next)
    }

    pub(crate) fn acknowledge(&mut self, lesson_id: LessonId) {
        self.pending.retain(|r| r.lesson_id != lesson_id);
    }

    /// Progress bar for learners; `None` for instructors.
    #[must_use]
    pub fn progress_display(&self) -> Option<ProgressDisplay> {
        self.role
            .sees_progress()
            .then(|| ProgressDisplay::new(self.progress_percent(), self.gate.state()))
    }

    /// Sidebar listing of the course's lessons.
    #[must_use]
    pub fn outline(&self) -> Vec<OutlineItem> {
        let current = self.navigator.current_index();
        self.sequence()
            .iter()
            .enumerate()
            .map(|(index, lesson)| {
                let status = if index == current {
                    OutlineStatus::Current
                } else if lesson.is_completed() {
                    OutlineStatus::Completed
                } else {
                    OutlineStatus::Pending
                };
                OutlineItem {
                    lesson_id: lesson.id(),
                    position: index + 1,
                    title: lesson.title().to_owned(),
                    subject: lesson.subject().to_owned(),
                    status,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn course_progress_percent(&self) -> u8 {
        self.sequence().completion_percent()
    }

    #[must_use]
    pub fn snapshot(&self) -> LessonViewerSnapshot {
        let lesson = self.current_lesson();
        LessonViewerSnapshot {
            course_id: self.course.id(),
            course_title: self.course.title().to_owned(),
            lesson_id: lesson.id(),
            lesson_title: lesson.title().to_owned(),
            video: lesson.video().to_string(),
            role: self.role,
            gate: self.gate.state(),
            progress_percent: self.progress_percent(),
            progress: self.progress_display(),
            actions: self.actions(),
            course_progress_percent: self.course_progress_percent(),
            pending_completions: self.pending.len(),
            outline: self.outline(),
        }
    }
}

impl fmt::Debug for LessonViewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonViewer")
            .field("course_id", &self.course.id())
            .field("lesson_id", &self.navigator.current().id())
            .field("role", &self.role)
            .field("gate", &self.gate.state())
            .field("progress", &self.tracker.progress_percent())
            .field("pending_len", &self.pending.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use learnflow_core::model::{CourseId, LessonDraft};
    use learnflow_core::time::{fixed_clock, fixed_now};

    fn build_course() -> Course {
        Course::new(CourseId::new(1), "React", "Programação Web", "prof", None).unwrap()
    }

    fn build_lesson(id: u64, completed: bool) -> Lesson {
        LessonDraft {
            course_id: CourseId::new(1),
            order: u32::try_from(id).unwrap(),
            title: format!("Aula {id}"),
            subject: "Programação Web".into(),
            description: String::new(),
            author: "prof".into(),
            published_on: NaiveDate::from_ymd_opt(2025, 6, 17).unwrap(),
            video: "sample-video.mp4".into(),
            media_duration_secs: Some(100.0),
            completed,
        }
        .validate()
        .unwrap()
        .assign_id(LessonId::new(id))
    }

    fn open(lessons: Vec<Lesson>, role: Role) -> LessonViewer {
        let sequence = CourseLessonSequence::new(CourseId::new(1), lessons).unwrap();
        LessonViewer::open(build_course(), sequence, None, role, fixed_clock()).unwrap()
    }

    fn watch(viewer: &mut LessonViewer, position_secs: f64) -> TrackerUpdate {
        let lesson_id = viewer.current_lesson().id();
        viewer.apply_media_event(&MediaEvent::TimeUpdate {
            lesson_id,
            position_secs,
            duration_secs: Some(100.0),
        })
    }

    #[test]
    fn walkthrough_scenario() {
        let mut viewer = open(vec![build_lesson(1, false), build_lesson(2, false)], Role::Learner);

        watch(&mut viewer, 0.0);
        assert_eq!(viewer.progress_percent(), 0.0);
        assert_eq!(viewer.gate_state(), GateState::NotEligible);
        assert!(!viewer.actions().mark_complete);

        watch(&mut viewer, 85.0);
        assert_eq!(viewer.gate_state(), GateState::Eligible);
        assert!(viewer.actions().mark_complete);
        assert!(!viewer.actions().next_lesson);

        let record = viewer.mark_complete().unwrap();
        assert_eq!(record.lesson_id, LessonId::new(1));
        assert_eq!(record.completed_at, fixed_now());
        assert_eq!(viewer.gate_state(), GateState::Completed);
        assert!(viewer.current_lesson().is_completed());
        assert!(viewer.can_advance());
        assert!(viewer.actions().next_lesson);
        assert!(!viewer.actions().mark_complete);

        viewer.apply_media_event(&MediaEvent::Seeked {
            lesson_id: LessonId::new(1),
            position_secs: 10.0,
        });
        assert_eq!(viewer.progress_percent(), 10.0);
        assert_eq!(viewer.gate_state(), GateState::Completed);

        assert_eq!(viewer.advance(), Some(LessonId::new(2)));
        assert_eq!(viewer.current_lesson().id(), LessonId::new(2));
        assert_eq!(viewer.progress_percent(), 0.0);
        assert_eq!(viewer.gate_state(), GateState::NotEligible);
    }

    #[test]
    fn mark_complete_below_threshold_is_noop() {
        let mut viewer = open(vec![build_lesson(1, false)], Role::Learner);
        watch(&mut viewer, 79.0);
        assert!(viewer.mark_complete().is_none());
        assert_eq!(viewer.gate_state(), GateState::NotEligible);
        assert!(viewer.pending_completions().is_empty());
    }

    #[test]
    fn seeking_back_closes_gate_before_commit() {
        let mut viewer = open(vec![build_lesson(1, false)], Role::Learner);
        watch(&mut viewer, 95.0);
        assert_eq!(viewer.gate_state(), GateState::Eligible);
        viewer.apply_media_event(&MediaEvent::Seeked {
            lesson_id: LessonId::new(1),
            position_secs: 5.0,
        });
        assert_eq!(viewer.gate_state(), GateState::NotEligible);
        assert!(viewer.mark_complete().is_none());
    }

    #[test]
    fn advance_without_completion_keeps_current_lesson() {
        let mut viewer = open(vec![build_lesson(1, false), build_lesson(2, false)], Role::Learner);
        watch(&mut viewer, 90.0);
        assert_eq!(viewer.advance(), None);
        assert_eq!(viewer.current_lesson().id(), LessonId::new(1));
    }

    #[test]
    fn last_lesson_never_offers_next() {
        let mut viewer = open(vec![build_lesson(1, false)], Role::Learner);
        watch(&mut viewer, 100.0);
        viewer.mark_complete().unwrap();
        assert!(!viewer.has_next());
        assert!(!viewer.actions().next_lesson);
        assert_eq!(viewer.advance(), None);
    }

    #[test]
    fn stale_events_after_advance_are_ignored() {
        let mut viewer = open(vec![build_lesson(1, false), build_lesson(2, false)], Role::Learner);
        watch(&mut viewer, 90.0);
        viewer.mark_complete().unwrap();
        viewer.advance().unwrap();

        let update = viewer.apply_media_event(&MediaEvent::TimeUpdate {
            lesson_id: LessonId::new(1),
            position_secs: 99.0,
            duration_secs: Some(100.0),
        });
        assert_eq!(update, TrackerUpdate::Stale);
        assert_eq!(viewer.progress_percent(), 0.0);
        assert_eq!(viewer.gate_state(), GateState::NotEligible);
    }

    #[test]
    fn instructor_never_sees_completion_controls() {
        let mut viewer = open(vec![build_lesson(1, false), build_lesson(2, false)], Role::Instructor);
        watch(&mut viewer, 100.0);
        assert_eq!(viewer.actions(), LessonActions::default());
        assert!(viewer.mark_complete().is_none());
        assert!(!viewer.current_lesson().is_completed());
        assert!(viewer.progress_display().is_none());
    }

    #[test]
    fn instructor_cannot_advance_even_past_completed_lesson() {
        let mut viewer = open(vec![build_lesson(1, true), build_lesson(2, false)], Role::Instructor);
        assert_eq!(viewer.gate_state(), GateState::Completed);
        assert_eq!(viewer.advance(), None);
    }

    #[test]
    fn previously_completed_lesson_opens_completed() {
        let mut viewer = open(vec![build_lesson(1, true), build_lesson(2, false)], Role::Learner);
        assert_eq!(viewer.gate_state(), GateState::Completed);
        assert!(viewer.actions().next_lesson);
        assert_eq!(viewer.advance(), Some(LessonId::new(2)));
    }

    #[test]
    fn advancing_onto_previously_completed_lesson_lands_completed() {
        let mut viewer = open(
            vec![build_lesson(1, true), build_lesson(2, true), build_lesson(3, false)],
            Role::Learner,
        );
        assert_eq!(viewer.advance(), Some(LessonId::new(2)));
        assert_eq!(viewer.current_lesson().id(), LessonId::new(2));
        assert_eq!(viewer.progress_percent(), 0.0);
        assert_eq!(viewer.gate_state(), GateState::Completed);
        assert!(!viewer.actions().mark_complete);
        assert!(viewer.actions().next_lesson);
        assert!(viewer.pending_completions().is_empty());
    }

    #[test]
    fn outline_marks_current_and_completed() {
        let sequence = CourseLessonSequence::new(
            CourseId::new(1),
            vec![build_lesson(1, true), build_lesson(2, false), build_lesson(3, false)],
        )
        .unwrap();
        let viewer = LessonViewer::open(
            build_course(),
            sequence,
            Some(LessonId::new(2)),
            Role::Learner,
            fixed_clock(),
        )
        .unwrap();

        let statuses: Vec<_> = viewer.outline().iter().map(|i| i.status).collect();
        assert_eq!(
            statuses,
            vec![
                OutlineStatus::Completed,
                OutlineStatus::Current,
                OutlineStatus::Pending
            ]
        );
        assert_eq!(viewer.outline()[2].position, 3);
        assert_eq!(viewer.course_progress_percent(), 33);
    }

    #[test]
    fn open_rejects_other_course_sequence() {
        let other = Course::new(CourseId::new(9), "Vue", "web", "prof", None).unwrap();
        let sequence =
            CourseLessonSequence::new(CourseId::new(1), vec![build_lesson(1, false)]).unwrap();
        let err = LessonViewer::open(other, sequence, None, Role::Learner, fixed_clock())
            .unwrap_err();
        assert!(matches!(err, ViewerError::CourseMismatch { .. }));
    }

    #[test]
    fn open_rejects_unknown_lesson() {
        let sequence =
            CourseLessonSequence::new(CourseId::new(1), vec![build_lesson(1, false)]).unwrap();
        let err = LessonViewer::open(
            build_course(),
            sequence,
            Some(LessonId::new(4)),
            Role::Learner,
            fixed_clock(),
        )
        .unwrap_err();
        assert!(matches!(err, ViewerError::Navigator(_)));
    }
}
