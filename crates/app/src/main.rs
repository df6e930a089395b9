use std::fmt;
use std::sync::Arc;

use learnflow_core::model::{CourseId, LessonId, Role};
use learnflow_core::playback::MediaEvent;
use services::{Clock, LessonViewer, LessonViewerService, OutlineStatus};
use storage::repository::Storage;
use storage::seed::{REACT_COURSE_ID, seed_sample_catalog};

/// Fallback media length used when a sample lesson has no known duration.
const SIMULATED_DURATION_SECS: f64 = 600.0;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidCourseId { raw: String },
    InvalidLessonId { raw: String },
    InvalidRole { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidCourseId { raw } => write!(f, "invalid --course-id value: {raw}"),
            ArgsError::InvalidLessonId { raw } => write!(f, "invalid --lesson-id value: {raw}"),
            ArgsError::InvalidRole { raw } => write!(f, "invalid --role value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- walkthrough [--course-id <id>] [--lesson-id <id>] [--role <role>] [--json]");
    eprintln!("  cargo run -p app -- outline     [--course-id <id>] [--lesson-id <id>] [--role <role>] [--json]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --course-id 1, first lesson of the course, --role learner");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEARNFLOW_COURSE_ID, LEARNFLOW_LESSON_ID, LEARNFLOW_ROLE, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Walkthrough,
    Outline,
}

impl Command {
    fn from_arg(arg: &str) -> Result<Self, ArgsError> {
        match arg {
            "walkthrough" => Ok(Self::Walkthrough),
            "outline" => Ok(Self::Outline),
            other => Err(ArgsError::UnknownCommand(other.to_owned())),
        }
    }
}

#[derive(Debug)]
struct Args {
    course_id: CourseId,
    lesson_id: Option<LessonId>,
    role: Role,
    json: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut course_id = std::env::var("LEARNFLOW_COURSE_ID")
            .ok()
            .and_then(|value| value.parse::<CourseId>().ok())
            .unwrap_or(REACT_COURSE_ID);
        let mut lesson_id = std::env::var("LEARNFLOW_LESSON_ID")
            .ok()
            .and_then(|value| value.parse::<LessonId>().ok());
        let mut role = std::env::var("LEARNFLOW_ROLE")
            .ok()
            .and_then(|value| value.parse::<Role>().ok())
            .unwrap_or_default();
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--course-id" => {
                    let value = require_value(args, "--course-id")?;
                    course_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCourseId { raw: value.clone() })?;
                }
                "--lesson-id" => {
                    let value = require_value(args, "--lesson-id")?;
                    lesson_id = Some(
                        value
                            .parse()
                            .map_err(|_| ArgsError::InvalidLessonId { raw: value.clone() })?,
                    );
                }
                "--role" => {
                    let value = require_value(args, "--role")?;
                    role = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidRole { raw: value.clone() })?;
                }
                "--json" => json = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            course_id,
            lesson_id,
            role,
            json,
        })
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

fn print_state(step: &str, viewer: &LessonViewer, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(&viewer.snapshot())?);
        return Ok(());
    }

    let lesson = viewer.current_lesson();
    let actions = viewer.actions();
    println!(
        "[{step}] lesson {} \"{}\" | progress {:.0}% | gate {:?} | complete: {} | next: {}",
        lesson.id(),
        lesson.title(),
        viewer.progress_percent(),
        viewer.gate_state(),
        if actions.mark_complete { "offered" } else { "-" },
        if actions.next_lesson { "offered" } else { "-" },
    );
    if let Some(hint) = viewer.progress_display().and_then(|d| d.hint) {
        println!("        {hint}");
    }
    Ok(())
}

fn print_outline(viewer: &LessonViewer, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(&viewer.outline())?);
        return Ok(());
    }

    let course = viewer.course();
    println!("{} ({}) - {}% complete", course.title(), course.subject(), viewer.course_progress_percent());
    for item in viewer.outline() {
        let marker = match item.status {
            OutlineStatus::Current => ">",
            OutlineStatus::Completed => "x",
            OutlineStatus::Pending => " ",
        };
        println!("  [{marker}] {}. {} ({})", item.position, item.title, item.subject);
    }
    Ok(())
}

/// Replays the media events a learner would generate on one lesson.
fn watch_to(viewer: &mut LessonViewer, percent: f64) {
    let lesson = viewer.current_lesson();
    let lesson_id = lesson.id();
    let duration = lesson.media_duration_secs();
    if duration.is_none() {
        viewer.apply_media_event(&MediaEvent::MetadataLoaded {
            lesson_id,
            duration_secs: SIMULATED_DURATION_SECS,
        });
    }
    let duration = duration.unwrap_or(SIMULATED_DURATION_SECS);
    viewer.apply_media_event(&MediaEvent::TimeUpdate {
        lesson_id,
        position_secs: duration * percent / 100.0,
        duration_secs: Some(duration),
    });
}

async fn walkthrough(
    svc: &LessonViewerService,
    viewer: &mut LessonViewer,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    print_state("open", viewer, json)?;

    watch_to(viewer, 50.0);
    print_state("watch 50%", viewer, json)?;

    if svc.mark_complete(viewer).await?.is_none() {
        print_state("complete blocked", viewer, json)?;
    }

    watch_to(viewer, 85.0);
    print_state("watch 85%", viewer, json)?;

    if let Some(record) = svc.mark_complete(viewer).await? {
        log::info!("recorded completion at {}", record.completed_at);
    }
    print_state("mark complete", viewer, json)?;

    let lesson_id = viewer.current_lesson().id();
    viewer.apply_media_event(&MediaEvent::Seeked {
        lesson_id,
        position_secs: 10.0,
    });
    print_state("seek back", viewer, json)?;

    match svc.advance(viewer) {
        Some(next) => {
            println!("navigate -> {}", next.route());
            // A late event from the lesson we just left must not count.
            viewer.apply_media_event(&MediaEvent::TimeUpdate {
                lesson_id,
                position_secs: 1_000.0,
                duration_secs: None,
            });
            print_state("advance", viewer, json)?;
        }
        None => println!("no next lesson available"),
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Walkthrough,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Walkthrough,
        Some(first) => Command::from_arg(first).map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_logging();
    log::debug!("starting with {parsed:?}");

    // The in-memory store stands in for the remote course API.
    let storage = Storage::in_memory();
    seed_sample_catalog(storage.courses.as_ref()).await?;

    let svc = LessonViewerService::new(
        Clock::system(),
        Arc::clone(&storage.courses),
        Arc::clone(&storage.completions),
    );
    let mut viewer = svc
        .open_lesson(parsed.course_id, parsed.lesson_id, parsed.role)
        .await?;

    match cmd {
        Command::Walkthrough => {
            walkthrough(&svc, &mut viewer, parsed.json).await?;
            print_outline(&viewer, parsed.json)?;
        }
        Command::Outline => print_outline(&viewer, parsed.json)?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
