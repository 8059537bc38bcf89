use crate::{Name, OverlapError};

/// Errors of editing operations on a fixture.
///
/// An operation returning one of these has not changed anything.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FixtureError {
    #[error("{kind} name '{name}' already exists but must be unique")]
    DuplicateName { kind: EntityKind, name: Name },
    #[error("channel '{channel}' is already part of mode '{mode}'")]
    DuplicateChannel { mode: Name, channel: Name },
    #[error("channel '{channel}' is not part of mode '{mode}'")]
    UnknownChannel { mode: Name, channel: Name },
    #[error("channel '{channel}' is still used by mode '{mode}'")]
    InUse { channel: Name, mode: Name },
    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: Name },
    #[error("channel '{0}' can't be its own fine channel")]
    SelfPair(Name),
    #[error("channel '{channel}' is already paired with '{partner}'")]
    AlreadyPaired { channel: Name, partner: Name },
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Overlap(#[from] OverlapError),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone, Copy)]
#[error("index {index} is out of bounds for length {len}")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

impl IndexError {
    /// Ok if `index` is a valid position in a sequence of length `len`
    pub(crate) fn check(index: usize, len: usize) -> Result<(), IndexError> {
        if index < len {
            Ok(())
        } else {
            Err(IndexError { index, len })
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, strum::Display)]
pub enum EntityKind {
    #[strum(to_string = "channel")]
    Channel,
    #[strum(to_string = "mode")]
    Mode,
    #[strum(to_string = "head")]
    Head,
}

/// Reasons a fixture can't be saved yet.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("manufacturer is empty")]
    EmptyManufacturer,
    #[error("model is empty")]
    EmptyModel,
    #[error("fixture has no channels")]
    NoChannels,
    #[error("{kind} number {position} has no name")]
    EmptyName { kind: EntityKind, position: usize },
    #[error("mode '{mode}' references unknown channel '{channel}'")]
    OrphanedReference {
        mode: Name,
        head: Option<Name>,
        channel: Name,
    },
    #[error("channel '{channel}': {source}")]
    Overlap {
        channel: Name,
        source: OverlapError,
    },
    #[error("{field} of mode '{mode}' is negative ({value})")]
    NegativePhysical {
        mode: Name,
        field: &'static str,
        value: f64,
    },
}
