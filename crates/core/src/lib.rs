#![forbid(unsafe_code)]

pub mod error;
pub mod gate;
pub mod model;
pub mod navigator;
pub mod playback;
pub mod time;

pub use error::Error;
pub use time::Clock;
