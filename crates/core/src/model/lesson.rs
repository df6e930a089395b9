use chrono::NaiveDate;
use std::num::NonZeroU32;
use thiserror::Error;

use crate::model::{
    ids::{CourseId, LessonId},
    media::{MediaUri, MediaValidationError},
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson order must be >= 1")]
    InvalidOrder,

    #[error("media duration must be a positive number of seconds")]
    InvalidDuration,

    #[error("invalid lesson video: {0}")]
    Video(#[source] MediaValidationError),
}

//
// ─── LESSON TYPES ──────────────────────────────────────────────────────────────
//

/// Unvalidated lesson input as handed over by the course data provider.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonDraft {
    pub course_id: CourseId,
    pub order: u32,
    pub title: String,
    pub subject: String,
    pub description: String,
    pub author: String,
    pub published_on: NaiveDate,
    pub video: String,
    pub media_duration_secs: Option<f64>,
    pub completed: bool,
}

impl LessonDraft {
    /// Validate the draft.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if the title is blank, the order is zero, a known
    /// duration is not a positive finite number, or the video URI is invalid.
    pub fn validate(self) -> Result<ValidatedLesson, LessonError> {
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(LessonError::EmptyTitle);
        }

        let order = NonZeroU32::new(self.order).ok_or(LessonError::InvalidOrder)?;

        if let Some(secs) = self.media_duration_secs {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(LessonError::InvalidDuration);
            }
        }

        let video = MediaUri::parse(&self.video).map_err(LessonError::Video)?;

        Ok(ValidatedLesson {
            course_id: self.course_id,
            order,
            title,
            subject: self.subject.trim().to_owned(),
            description: self.description.trim().to_owned(),
            author: self.author.trim().to_owned(),
            published_on: self.published_on,
            video,
            media_duration_secs: self.media_duration_secs,
            completed: self.completed,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLesson {
    course_id: CourseId,
    order: NonZeroU32,
    title: String,
    subject: String,
    description: String,
    author: String,
    published_on: NaiveDate,
    video: MediaUri,
    media_duration_secs: Option<f64>,
    completed: bool,
}

impl ValidatedLesson {
    #[must_use]
    pub fn assign_id(self, id: LessonId) -> Lesson {
        Lesson {
            id,
            course_id: self.course_id,
            order: self.order,
            title: self.title,
            subject: self.subject,
            description: self.description,
            author: self.author,
            published_on: self.published_on,
            video: self.video,
            media_duration_secs: self.media_duration_secs,
            completed: self.completed,
        }
    }
}

/// A single video lesson, positioned within its course by `order`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    id: LessonId,
    course_id: CourseId,
    order: NonZeroU32,
    title: String,
    subject: String,
    description: String,
    author: String,
    published_on: NaiveDate,
    video: MediaUri,
    media_duration_secs: Option<f64>,
    completed: bool,
}

impl Lesson {
    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn order(&self) -> NonZeroU32 {
        self.order
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn published_on(&self) -> NaiveDate {
        self.published_on
    }

    #[must_use]
    pub fn video(&self) -> &MediaUri {
        &self.video
    }

    /// Known media length in seconds, `None` until metadata has loaded.
    #[must_use]
    pub fn media_duration_secs(&self) -> Option<f64> {
        self.media_duration_secs
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Sets the completed flag. There is no inverse operation.
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> LessonDraft {
        LessonDraft {
            course_id: CourseId::new(1),
            order: 1,
            title: " Introdução ao React ".into(),
            subject: "Programação Web".into(),
            description: "Componentes e JSX".into(),
            author: "Prof. João Silva".into(),
            published_on: NaiveDate::from_ymd_opt(2025, 6, 17).unwrap(),
            video: "https://example.com/intro.mp4".into(),
            media_duration_secs: Some(596.0),
            completed: false,
        }
    }

    #[test]
    fn valid_draft_validates_and_assigns_id() {
        let lesson = draft().validate().unwrap().assign_id(LessonId::new(10));
        assert_eq!(lesson.id(), LessonId::new(10));
        assert_eq!(lesson.title(), "Introdução ao React");
        assert_eq!(lesson.order().get(), 1);
        assert_eq!(lesson.media_duration_secs(), Some(596.0));
        assert!(!lesson.is_completed());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut d = draft();
        d.title = "   ".into();
        assert_eq!(d.validate().unwrap_err(), LessonError::EmptyTitle);
    }

    #[test]
    fn zero_order_is_rejected() {
        let mut d = draft();
        d.order = 0;
        assert_eq!(d.validate().unwrap_err(), LessonError::InvalidOrder);
    }

    #[test]
    fn non_positive_or_nan_duration_is_rejected() {
        for bad in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let mut d = draft();
            d.media_duration_secs = Some(bad);
            assert_eq!(d.validate().unwrap_err(), LessonError::InvalidDuration);
        }
    }

    #[test]
    fn unknown_duration_is_allowed() {
        let mut d = draft();
        d.media_duration_secs = None;
        let lesson = d.validate().unwrap().assign_id(LessonId::new(1));
        assert_eq!(lesson.media_duration_secs(), None);
    }

    #[test]
    fn mark_completed_is_sticky() {
        let mut lesson = draft().validate().unwrap().assign_id(LessonId::new(1));
        lesson.mark_completed();
        lesson.mark_completed();
        assert!(lesson.is_completed());
    }
}
