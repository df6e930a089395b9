//! Playback progress tracking for a single open lesson.
//!
//! The media host reports raw positions; this module turns them into a
//! clamped completion percentage. The percentage is always derived from the
//! latest position and duration and is never stored on its own.

use crate::model::{Lesson, LessonId};

/// Normalized watch progress in `[0, 100]`.
///
/// Unknown, zero, negative, NaN or infinite durations yield `0`, as does a
/// NaN position.
#[must_use]
pub fn progress_percent(position_secs: f64, duration_secs: Option<f64>) -> f64 {
    let Some(duration) = duration_secs else {
        return 0.0;
    };
    if !duration.is_finite() || duration <= 0.0 || position_secs.is_nan() {
        return 0.0;
    }
    (position_secs / duration * 100.0).clamp(0.0, 100.0)
}

//
// ─── MEDIA EVENTS ──────────────────────────────────────────────────────────────
//

/// Events emitted by the media playback host, tagged with the lesson they
/// were produced for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Media metadata finished loading and the total length is now known.
    MetadataLoaded { lesson_id: LessonId, duration_secs: f64 },
    /// Regular position update while playing.
    TimeUpdate {
        lesson_id: LessonId,
        position_secs: f64,
        duration_secs: Option<f64>,
    },
    /// The user jumped to a new position.
    Seeked { lesson_id: LessonId, position_secs: f64 },
}

impl MediaEvent {
    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        match *self {
            MediaEvent::MetadataLoaded { lesson_id, .. }
            | MediaEvent::TimeUpdate { lesson_id, .. }
            | MediaEvent::Seeked { lesson_id, .. } => lesson_id,
        }
    }
}

/// Outcome of feeding an event to a tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerUpdate {
    /// The event was applied; carries the recomputed percentage.
    Applied(f64),
    /// The event belongs to another lesson and was ignored.
    Stale,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Ephemeral playback state of the open lesson.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    position_secs: f64,
    duration_secs: Option<f64>,
}

impl PlaybackState {
    #[must_use]
    pub fn new(duration_secs: Option<f64>) -> Self {
        Self {
            position_secs: 0.0,
            duration_secs: duration_secs.filter(|d| d.is_finite() && *d > 0.0),
        }
    }

    #[must_use]
    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    #[must_use]
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
    }

    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.position_secs, self.duration_secs)
    }

    /// An explicit zero, negative, NaN or infinite report forgets the
    /// previous duration, so progress reads 0 until a valid one arrives.
    fn set_duration(&mut self, duration_secs: f64) {
        self.duration_secs = Some(duration_secs).filter(|d| d.is_finite() && *d > 0.0);
    }
}

//
// ─── TRACKER ───────────────────────────────────────────────────────────────────
//

/// Tracks playback for exactly one lesson.
///
/// Events tagged with a different lesson id are discarded so that late
/// updates from a lesson the viewer already left cannot leak into the next.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackTracker {
    lesson_id: LessonId,
    state: PlaybackState,
}

impl PlaybackTracker {
    #[must_use]
    pub fn new(lesson_id: LessonId, duration_secs: Option<f64>) -> Self {
        Self {
            lesson_id,
            state: PlaybackState::new(duration_secs),
        }
    }

    /// Fresh tracker seeded with the lesson's known duration.
    #[must_use]
    pub fn for_lesson(lesson: &Lesson) -> Self {
        Self::new(lesson.id(), lesson.media_duration_secs())
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.state.progress_percent()
    }

    /// Applies one media event in O(1).
    pub fn apply(&mut self, event: &MediaEvent) -> TrackerUpdate {
        if event.lesson_id() != self.lesson_id {
            return TrackerUpdate::Stale;
        }

        match *event {
            MediaEvent::MetadataLoaded { duration_secs, .. } => {
                self.state.set_duration(duration_secs);
            }
            MediaEvent::TimeUpdate {
                position_secs,
                duration_secs,
                ..
            } => {
                if let Some(d) = duration_secs {
                    self.state.set_duration(d);
                }
                self.state.position_secs = position_secs;
            }
            MediaEvent::Seeked { position_secs, .. } => {
                self.state.position_secs = position_secs;
            }
        }

        TrackerUpdate::Applied(self.state.progress_percent())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    const A: LessonId = LessonId::new(1);

    fn time_update(lesson_id: LessonId, position_secs: f64, duration: f64) -> MediaEvent {
        MediaEvent::TimeUpdate {
            lesson_id,
            position_secs,
            duration_secs: Some(duration),
        }
    }

    #[test]
    fn percent_matches_ratio_for_valid_inputs() {
        for (pos, dur) in [(0.0, 100.0), (85.0, 100.0), (30.0, 120.0), (596.0, 596.0)] {
            let pct = progress_percent(pos, Some(dur));
            assert!((pct - pos / dur * 100.0).abs() < 1e-9);
            assert!((0.0..=100.0).contains(&pct));
        }
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(progress_percent(150.0, Some(100.0)), 100.0);
        assert_eq!(progress_percent(-5.0, Some(100.0)), 0.0);
    }

    #[test]
    fn unknown_or_invalid_duration_yields_zero() {
        assert_eq!(progress_percent(50.0, None), 0.0);
        assert_eq!(progress_percent(50.0, Some(0.0)), 0.0);
        assert_eq!(progress_percent(50.0, Some(-10.0)), 0.0);
        assert_eq!(progress_percent(50.0, Some(f64::NAN)), 0.0);
        assert_eq!(progress_percent(50.0, Some(f64::INFINITY)), 0.0);
        assert_eq!(progress_percent(f64::NAN, Some(100.0)), 0.0);
    }

    #[test]
    fn new_tracker_starts_at_zero() {
        let tracker = PlaybackTracker::new(A, Some(100.0));
        assert_eq!(tracker.progress_percent(), 0.0);
    }

    #[test]
    fn time_updates_and_seeks_are_applied_in_order() {
        let mut tracker = PlaybackTracker::new(A, None);
        assert_eq!(
            tracker.apply(&time_update(A, 85.0, 100.0)),
            TrackerUpdate::Applied(85.0)
        );
        assert_eq!(
            tracker.apply(&MediaEvent::Seeked {
                lesson_id: A,
                position_secs: 10.0
            }),
            TrackerUpdate::Applied(10.0)
        );
        assert_eq!(tracker.state().position_secs(), 10.0);
    }

    #[test]
    fn metadata_makes_progress_computable() {
        let mut tracker = PlaybackTracker::new(A, None);
        let update = tracker.apply(&MediaEvent::TimeUpdate {
            lesson_id: A,
            position_secs: 40.0,
            duration_secs: None,
        });
        assert_eq!(update, TrackerUpdate::Applied(0.0));

        let update = tracker.apply(&MediaEvent::MetadataLoaded {
            lesson_id: A,
            duration_secs: 80.0,
        });
        assert_eq!(update, TrackerUpdate::Applied(50.0));
    }

    #[test]
    fn invalid_duration_report_drops_progress_to_zero() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut tracker = PlaybackTracker::new(A, Some(100.0));
            assert_eq!(
                tracker.apply(&time_update(A, 90.0, bad)),
                TrackerUpdate::Applied(0.0)
            );
            assert_eq!(tracker.state().duration_secs(), None);
        }
    }

    #[test]
    fn zero_duration_report_keeps_gate_closed() {
        use crate::gate::{CompletionGate, GateState};

        let mut tracker = PlaybackTracker::new(A, Some(100.0));
        let mut gate = CompletionGate::new(false);
        let TrackerUpdate::Applied(pct) = tracker.apply(&time_update(A, 90.0, 0.0)) else {
            panic!("event for the tracked lesson must apply");
        };
        assert_eq!(gate.observe_progress(pct), GateState::NotEligible);

        // A later valid report makes progress computable again.
        assert_eq!(
            tracker.apply(&time_update(A, 90.0, 100.0)),
            TrackerUpdate::Applied(90.0)
        );
    }

    #[test]
    fn unreported_duration_keeps_last_known_duration() {
        let mut tracker = PlaybackTracker::new(A, Some(100.0));
        let update = tracker.apply(&MediaEvent::TimeUpdate {
            lesson_id: A,
            position_secs: 20.0,
            duration_secs: None,
        });
        assert_eq!(update, TrackerUpdate::Applied(20.0));
    }

    #[test]
    fn events_for_other_lessons_are_stale() {
        let mut tracker = PlaybackTracker::new(A, Some(100.0));
        tracker.apply(&time_update(A, 30.0, 100.0));

        let other = LessonId::new(2);
        assert_eq!(
            tracker.apply(&time_update(other, 99.0, 100.0)),
            TrackerUpdate::Stale
        );
        assert_eq!(tracker.progress_percent(), 30.0);
    }
}
