use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failure to read an id from a bare number or a page route.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {raw:?}")]
pub struct ParseIdError {
    kind: &'static str,
    raw: String,
}

/// Defines a numeric id newtype that also names a page route,
/// e.g. `/aula/7` for lesson 7.
macro_rules! route_id {
    ($(#[$meta:meta])* $name:ident, $route:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Route prefix of the page showing this entity.
            pub const ROUTE: &'static str = $route;

            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> u64 {
                self.0
            }

            /// Page path for this id.
            #[must_use]
            pub fn route(&self) -> String {
                format!("{}/{}", Self::ROUTE, self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        /// Accepts `"7"` as well as the page route `"/aula/7"`.
        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                let digits = trimmed
                    .strip_prefix(Self::ROUTE)
                    .and_then(|rest| rest.strip_prefix('/'))
                    .unwrap_or(trimmed);
                digits.parse::<u64>().map(Self).map_err(|_| ParseIdError {
                    kind: stringify!($name),
                    raw: s.to_owned(),
                })
            }
        }
    };
}

route_id!(
    /// Identifies a lesson page.
    LessonId,
    "/aula"
);

route_id!(
    /// Identifies a course page.
    CourseId,
    "/curso"
);
