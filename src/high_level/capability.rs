use getset::{CopyGetters, Getters, Setters};

use crate::Rgb;

/// A named sub-range `[min, max]` of a channel's DMX values.
#[derive(Debug, PartialEq, Clone, Getters, CopyGetters, Setters)]
pub struct Capability {
    #[getset(get_copy = "pub")]
    min: u8,
    #[getset(get_copy = "pub")]
    max: u8,
    #[getset(get = "pub", set = "pub")]
    label: String,
    #[getset(get = "pub", set = "pub")]
    kind: CapabilityKind,
}

/// What a capability does, as far as an editor needs to know.
///
/// Colour and gobo capabilities carry the data needed to draw them.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum CapabilityKind {
    #[default]
    Generic,
    Color {
        primary: Rgb,
        /// second half of a split colour wheel slot
        secondary: Option<Rgb>,
    },
    Gobo {
        /// path of the gobo picture, relative to the gobo directory
        resource: String,
    },
    Effect,
    Pan,
    Tilt,
    Strobe,
    Prism,
    Speed,
    Intensity,
    Maintenance,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("capability min {min} is above max {max}")]
pub struct InvertedRangeError {
    pub min: u8,
    pub max: u8,
}

impl Capability {
    pub fn new<T: Into<String>>(min: u8, max: u8, label: T) -> Result<Self, InvertedRangeError> {
        if min > max {
            Err(InvertedRangeError { min, max })?
        }
        Ok(Capability {
            min,
            max,
            label: label.into(),
            kind: CapabilityKind::Generic,
        })
    }

    pub fn with_kind(mut self, kind: CapabilityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn overlaps(&self, other: &Capability) -> bool {
        !(self.max < other.min || other.max < self.min)
    }

    /// Number of DMX values covered, between 1 and 256.
    pub fn width(&self) -> u16 {
        u16::from(self.max) - u16::from(self.min) + 1
    }
}
