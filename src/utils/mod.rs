pub mod constants;
pub mod coordinates;
pub mod progress;

pub use constants::*;
pub use coordinates::{normalize_longitude, BoundingBox};
pub use progress::ProgressReporter;
