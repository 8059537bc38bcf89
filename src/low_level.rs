//! Direct representation of the XML in a fixture definition file.
//!
//! These types carry no invariants beyond what the XML schema demands. Use
//! [`Fixture`](crate::Fixture) for editing.

mod fixture;

pub use fixture::*;
