use serde::Serialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{ChannelGroup, FixtureType, Name, Physical, PrimaryColour, Rgb};

pub const NAMESPACE: &str = "http://www.qlcplus.org/FixtureDefinition";

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename = "FixtureDefinition")]
pub struct FixtureDefinition {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "Creator")]
    pub creator: Creator,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Type")]
    pub fixture_type: FixtureType,
    #[serde(rename = "Channel")]
    pub channels: Vec<Channel>,
    #[serde(rename = "Mode")]
    pub modes: Vec<Mode>,
}

impl Default for FixtureDefinition {
    fn default() -> Self {
        FixtureDefinition {
            xmlns: NAMESPACE.into(),
            creator: Creator::default(),
            manufacturer: String::new(),
            model: String::new(),
            fixture_type: FixtureType::default(),
            channels: Vec::new(),
            modes: Vec::new(),
        }
    }
}

#[derive(Serialize, Debug, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Creator {
    pub name: String,
    pub version: String,
    pub author: String,
}

#[derive(Serialize, Debug, Default, PartialEq)]
pub struct Channel {
    #[serde(rename = "@Name")]
    pub name: Name,
    /// name of the channel carrying the fine byte, if this one is the coarse byte
    #[serde(rename = "@Fine", skip_serializing_if = "Option::is_none")]
    pub fine: Option<Name>,
    #[serde(rename = "Group")]
    pub group: Group,
    #[serde(rename = "Colour", skip_serializing_if = "Option::is_none")]
    pub colour: Option<PrimaryColour>,
    #[serde(rename = "Capability")]
    pub capabilities: Vec<Capability>,
}

#[derive(Serialize, Debug, Default, PartialEq)]
pub struct Group {
    /// 0 for coarse, 1 for fine
    #[serde(rename = "@Byte")]
    pub byte: u8,
    #[serde(rename = "$text")]
    pub group: ChannelGroup,
}

#[derive(Serialize, Debug, Default, PartialEq)]
pub struct Capability {
    #[serde(rename = "@Min")]
    pub min: u8,
    #[serde(rename = "@Max")]
    pub max: u8,
    #[serde(rename = "@Kind")]
    pub kind: KindTag,
    #[serde(rename = "@Color", skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(rename = "@Color2", skip_serializing_if = "Option::is_none")]
    pub color2: Option<Rgb>,
    /// gobo picture
    #[serde(rename = "@Res", skip_serializing_if = "Option::is_none")]
    pub res: Option<String>,
    #[serde(rename = "$text")]
    pub label: String,
}

/// Value of the `Kind` attribute of a capability.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Default,
    strum::Display,
    strum::EnumString,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub enum KindTag {
    #[default]
    Generic,
    Color,
    Gobo,
    Effect,
    Pan,
    Tilt,
    Strobe,
    Prism,
    Speed,
    Intensity,
    Maintenance,
}

#[derive(Serialize, Debug, Default, PartialEq)]
pub struct Mode {
    #[serde(rename = "@Name")]
    pub name: Name,
    #[serde(rename = "Physical")]
    pub physical: Physical,
    #[serde(rename = "Channel")]
    pub channels: Vec<ModeChannel>,
    #[serde(rename = "Head")]
    pub heads: Vec<Head>,
}

#[derive(Serialize, Debug, Default, PartialEq)]
pub struct ModeChannel {
    /// DMX offset of the channel in the mode, starting at 0
    #[serde(rename = "@Number")]
    pub number: usize,
    #[serde(rename = "$text")]
    pub name: Name,
}

#[derive(Serialize, Debug, Default, PartialEq)]
pub struct Head {
    #[serde(rename = "@Name")]
    pub name: Name,
    #[serde(rename = "Channel")]
    pub channels: Vec<Name>,
}
