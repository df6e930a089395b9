use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role: {raw}")]
pub struct RoleParseError {
    raw: String,
}

/// Capability of whoever is viewing a lesson.
///
/// Learners consume content and track their completion; instructors author it
/// and never see completion controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Learner,
    Instructor,
}

impl Role {
    /// Whether this role may mark lessons as completed.
    #[must_use]
    pub fn can_complete_lessons(self) -> bool {
        matches!(self, Role::Learner)
    }

    /// Whether the watch-progress bar is shown to this role.
    #[must_use]
    pub fn sees_progress(self) -> bool {
        matches!(self, Role::Learner)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Learner => "learner",
            Role::Instructor => "instructor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "learner" | "student" | "aluno" => Ok(Role::Learner),
            "instructor" | "teacher" | "professor" => Ok(Role::Instructor),
            _ => Err(RoleParseError { raw: s.to_owned() }),
        }
    }
}
