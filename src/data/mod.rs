//! Point sets: the fixed seed, user edits, and synthetic samples.

pub mod points;
pub mod sample;
pub mod seed;

pub use points::*;
pub use sample::*;
pub use seed::*;
