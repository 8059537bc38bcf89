use getset::{CopyGetters, Getters, MutGetters, Setters};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{CapabilitySet, Name};

/// A DMX channel of a fixture and the meaning of its values.
///
/// Name and coarse/fine partner are managed by the [`Fixture`](crate::Fixture)
/// owning the channel, because both must stay consistent with the other
/// channels and modes.
#[derive(Debug, PartialEq, Clone, Default, Getters, CopyGetters, MutGetters, Setters)]
pub struct Channel {
    #[getset(get = "pub")]
    pub(crate) name: Name,
    #[getset(get_copy = "pub", set = "pub")]
    group: ChannelGroup,
    /// changed by pairing, see [`Fixture::pair_fine`](crate::Fixture::pair_fine)
    #[getset(get_copy = "pub", set = "pub(crate)")]
    control_byte: ControlByte,
    #[getset(get_copy = "pub", set = "pub")]
    colour: Option<PrimaryColour>,
    #[getset(get = "pub", get_mut = "pub")]
    capabilities: CapabilitySet,
    /// coarse/fine partner, resolved by name against the owning fixture
    #[getset(get = "pub")]
    pub(crate) partner: Option<Partner>,
}

/// The other half of a 16 bit channel pair.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Partner {
    /// this channel is the coarse byte, the named channel the fine byte
    Fine(Name),
    /// this channel is the fine byte of the named channel
    Coarse(Name),
}

impl Partner {
    pub fn name(&self) -> &Name {
        match self {
            Partner::Fine(name) | Partner::Coarse(name) => name,
        }
    }

    pub(crate) fn rename(&mut self, old: &Name, new: &Name) {
        let (Partner::Fine(name) | Partner::Coarse(name)) = self;
        if name == old {
            *name = new.clone();
        }
    }
}

impl Channel {
    pub fn new(name: Name, group: ChannelGroup) -> Self {
        Channel {
            name,
            group,
            ..Default::default()
        }
    }

    /// Replaces all capabilities.
    ///
    /// The set is taken as is. Run [`CapabilitySet::validate`] before if it
    /// was built in bulk.
    pub fn set_capabilities(&mut self, capabilities: CapabilitySet) {
        self.capabilities = capabilities;
    }
}

/// The kind of feature a channel controls.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub enum ChannelGroup {
    #[default]
    Intensity,
    Colour,
    Gobo,
    Prism,
    Shutter,
    Beam,
    Speed,
    Effect,
    Pan,
    Tilt,
    Maintenance,
    Nothing,
}

/// Which byte of a 16 bit value a channel carries.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum ControlByte {
    /// most significant byte, also used by plain 8 bit channels
    #[default]
    Coarse,
    /// least significant byte
    Fine,
}

impl ControlByte {
    pub fn index(self) -> u8 {
        match self {
            ControlByte::Coarse => 0,
            ControlByte::Fine => 1,
        }
    }
}

impl TryFrom<u8> for ControlByte {
    type Error = ControlByteError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ControlByte::Coarse),
            1 => Ok(ControlByte::Fine),
            v => Err(ControlByteError(v)),
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("control byte must be 0 (coarse) or 1 (fine), got {0}")]
pub struct ControlByteError(pub u8);

/// Primary colour whose level an intensity channel controls.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub enum PrimaryColour {
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
    Yellow,
    Amber,
    White,
    #[strum(to_string = "UV")]
    Uv,
    Lime,
    Indigo,
}
