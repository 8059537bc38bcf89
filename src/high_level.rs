mod capability;
mod capability_set;
mod channel;
mod error;
mod fixture;
mod mode;
pub(crate) mod name;
mod physical;
mod rgb;
pub mod wizard;

pub use capability::*;
pub use capability_set::*;
pub use channel::*;
pub use error::*;
pub use fixture::*;
pub use mode::*;
pub use name::*;
pub use physical::*;
pub use rgb::*;
