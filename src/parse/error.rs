use std::io;

use roxmltree::TextPos;

use crate::{FixtureError, Name, OverlapError, ProblemAt};

/// An unrecoverable problem with a fixture definition. No fixture is
/// returned alongside it.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("invalid XML: {0}")]
    InvalidXml(#[from] roxmltree::Error),
    #[error("root node 'FixtureDefinition' not found")]
    NoRootNode,
    #[error("fixture definition could not be read: {0}")]
    Io(#[from] io::Error),
    /// mandatory node or attribute missing, unparseable or empty, or a name
    /// used twice
    #[error("schema error: {0}")]
    Schema(#[from] ProblemAt),
    #[error("range error: {0}")]
    Range(#[from] RangeError),
    #[error("reference error: {0}")]
    Reference(#[from] ReferenceError),
    #[error("unexpected condition occured. This is a fault in openqxf. Caused by: {0}")]
    Unexpected(String),
}

#[derive(thiserror::Error, Debug)]
pub enum RangeError {
    #[error("{attr}=\"{value}\" of a capability of channel '{channel}' is outside 0..=255 (line {at})")]
    OutOfBounds {
        channel: Name,
        attr: &'static str,
        value: i64,
        at: TextPos,
    },
    #[error("capability '{label}' of channel '{channel}' has min {min} above max {max}")]
    Inverted {
        channel: Name,
        label: String,
        min: u8,
        max: u8,
    },
    #[error("channel '{channel}': {source}")]
    Overlap {
        channel: Name,
        source: OverlapError,
    },
    #[error("{field} of mode '{mode}' is negative ({value})")]
    Negative {
        mode: Name,
        field: &'static str,
        value: f64,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum ReferenceError {
    #[error("{} of mode '{mode}' references unknown channel '{channel}'", .head.as_ref().map_or("channel list".to_owned(), |h| format!("head '{h}'")))]
    UnknownChannel {
        mode: Name,
        head: Option<Name>,
        channel: Name,
    },
    #[error("channel '{channel}' names unknown fine channel '{fine}'")]
    UnknownFineChannel { channel: Name, fine: Name },
    #[error("fine channel of '{channel}': {source}")]
    InvalidPairing { channel: Name, source: FixtureError },
    #[error("mode '{mode}': {source}")]
    InvalidMode { mode: Name, source: FixtureError },
}
