//! Sample catalog used by the binary and by tests in place of a real backend.

use chrono::NaiveDate;
use learnflow_core::model::{
    Course, CourseError, CourseId, LessonDraft, LessonError, LessonId,
};
use thiserror::Error;

use crate::repository::{CourseRepository, StorageError};

pub const REACT_COURSE_ID: CourseId = CourseId::new(1);
pub const CINEMA_COURSE_ID: CourseId = CourseId::new(2);

const SAMPLE_VIDEO: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid publication date {0}-{1}-{2}")]
    InvalidDate(i32, u32, u32),
}

struct SampleLesson {
    id: u64,
    order: u32,
    title: &'static str,
    description: &'static str,
    video: &'static str,
    duration_secs: Option<f64>,
    published: (i32, u32, u32),
}

const REACT_LESSONS: [SampleLesson; 5] = [
    SampleLesson {
        id: 1,
        order: 1,
        title: "Introdução ao React",
        description: "Conceitos fundamentais do React: componentes, JSX e a primeira aplicação.",
        video: SAMPLE_VIDEO,
        duration_secs: Some(596.0),
        published: (2025, 6, 17),
    },
    SampleLesson {
        id: 2,
        order: 2,
        title: "Componentes e Props",
        description: "Como compor interfaces e passar dados entre componentes.",
        video: SAMPLE_VIDEO,
        duration_secs: Some(480.0),
        published: (2025, 6, 18),
    },
    SampleLesson {
        id: 3,
        order: 3,
        title: "Estado e Ciclo de Vida",
        description: "Estado local e o ciclo de vida de um componente.",
        video: SAMPLE_VIDEO,
        duration_secs: Some(720.0),
        published: (2025, 6, 19),
    },
    SampleLesson {
        id: 4,
        order: 4,
        title: "Eventos e Formulários",
        description: "Tratamento de eventos e formulários controlados.",
        video: SAMPLE_VIDEO,
        duration_secs: None,
        published: (2025, 6, 20),
    },
    SampleLesson {
        id: 5,
        order: 5,
        title: "Hooks - useState e useEffect",
        description: "Os hooks mais usados no dia a dia.",
        video: SAMPLE_VIDEO,
        duration_secs: None,
        published: (2025, 6, 21),
    },
];

const CINEMA_LESSONS: [SampleLesson; 3] = [
    SampleLesson {
        id: 11,
        order: 1,
        title: "aula 01",
        description: "Abertura do curso.",
        video: "sample-video.mp4",
        duration_secs: Some(300.0),
        published: (2025, 6, 14),
    },
    SampleLesson {
        id: 12,
        order: 2,
        title: "aula 02",
        description: "Enquadramento e composição.",
        video: "sample-video-2.mp4",
        duration_secs: Some(300.0),
        published: (2025, 6, 17),
    },
    SampleLesson {
        id: 13,
        order: 3,
        title: "aula 03",
        description: "Montagem.",
        video: "sample-video-3.mp4",
        duration_secs: Some(300.0),
        published: (2025, 6, 17),
    },
];

/// Loads the sample courses into `repo`. Safe to call repeatedly.
///
/// # Errors
///
/// Returns `SeedError` if sample data fails validation or cannot be stored.
pub async fn seed_sample_catalog(repo: &dyn CourseRepository) -> Result<(), SeedError> {
    let react = Course::new(
        REACT_COURSE_ID,
        "Curso Completo de React",
        "Programação Web",
        "Prof. João Silva",
        Some("Do zero aos hooks.".into()),
    )?;
    seed_course(repo, &react, &REACT_LESSONS).await?;

    let cinema = Course::new(
        CINEMA_COURSE_ID,
        "absolute cinema",
        "hollywood",
        "prof",
        Some("Curso completo sobre cinema absoluto e suas técnicas avançadas".into()),
    )?;
    seed_course(repo, &cinema, &CINEMA_LESSONS).await?;

    Ok(())
}

async fn seed_course(
    repo: &dyn CourseRepository,
    course: &Course,
    lessons: &[SampleLesson],
) -> Result<(), SeedError> {
    repo.upsert_course(course).await?;

    for sample in lessons {
        let (y, m, d) = sample.published;
        let published_on =
            NaiveDate::from_ymd_opt(y, m, d).ok_or(SeedError::InvalidDate(y, m, d))?;
        let lesson = LessonDraft {
            course_id: course.id(),
            order: sample.order,
            title: sample.title.to_owned(),
            subject: course.subject().to_owned(),
            description: sample.description.to_owned(),
            author: course.author().to_owned(),
            published_on,
            video: sample.video.to_owned(),
            media_duration_secs: sample.duration_secs,
            completed: false,
        }
        .validate()?
        .assign_id(LessonId::new(sample.id));
        repo.upsert_lesson(&lesson).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    #[tokio::test]
    async fn seeds_both_courses() {
        let repo = InMemoryRepository::new();
        seed_sample_catalog(&repo).await.unwrap();

        let react = repo.get_course(REACT_COURSE_ID).await.unwrap();
        assert_eq!(react.title(), "Curso Completo de React");
        assert_eq!(repo.list_lessons(REACT_COURSE_ID).await.unwrap().len(), 5);
        assert_eq!(repo.list_lessons(CINEMA_COURSE_ID).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn seeding_twice_does_not_duplicate() {
        let repo = InMemoryRepository::new();
        seed_sample_catalog(&repo).await.unwrap();
        seed_sample_catalog(&repo).await.unwrap();
        assert_eq!(repo.list_lessons(REACT_COURSE_ID).await.unwrap().len(), 5);
    }
}
