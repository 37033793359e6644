mod annotation;

pub use annotation::{parse_score, UserAnnotation, WatchStatus, MAX_SCORE};
