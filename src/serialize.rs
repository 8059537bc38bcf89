mod error;
mod high_level;
mod low_level;

pub use error::*;
