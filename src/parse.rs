#![allow(clippy::result_large_err)]
// ProblemAt is large because of the variants of `Problem` with many fields.
// Results carrying it only live on the cold path of a load.

pub(crate) mod parse_xml;

pub mod low_level;

mod error;
mod high_level;
mod problems;

pub use self::{error::*, high_level::*, problems::*};
