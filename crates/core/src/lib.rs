#![forbid(unsafe_code)]

pub mod config;
pub mod model;
pub mod scoring;
pub mod time;

pub use config::{ConfigError, PlayConfig};
pub use scoring::{QuestionReview, ReviewStatus, Score};
pub use time::Clock;
