use std::{io::Write, path::Path};

use tempfile::NamedTempFile;

use crate::{
    low_level::{self, FixtureDefinition, Group, KindTag, ModeChannel},
    Capability, CapabilityKind, Channel, Fixture, Mode, Partner, SerializationError,
};

impl Fixture {
    /// The definition file content for this fixture.
    ///
    /// Fixtures failing [`Fixture::validate_for_save`] are refused.
    pub fn serialize(&self) -> Result<Vec<u8>, SerializationError> {
        let errors = self.validate_for_save();
        if !errors.is_empty() {
            Err(SerializationError::Invalid(errors))?
        }
        Ok(FixtureDefinition::from(self)
            .serialize_description()?
            .into_bytes())
    }

    /// Writes the definition to `path`.
    ///
    /// The content goes to a temporary file next to `path` first, which then
    /// replaces `path`. An existing file is left untouched if anything fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SerializationError> {
        let path = path.as_ref();
        let bytes = self.serialize()?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(path)?;
        tracing::info!(path = %path.display(), "saved fixture definition");
        Ok(())
    }
}

impl From<&Fixture> for FixtureDefinition {
    fn from(fixture: &Fixture) -> Self {
        FixtureDefinition {
            creator: low_level::Creator {
                name: fixture.creator.name.clone(),
                version: fixture.creator.version.clone(),
                author: fixture.author.clone(),
            },
            manufacturer: fixture.manufacturer.clone(),
            model: fixture.model.clone(),
            fixture_type: fixture.fixture_type,
            channels: fixture.channels().iter().map(translate_channel).collect(),
            modes: fixture.modes().iter().map(translate_mode).collect(),
            ..Default::default()
        }
    }
}

fn translate_channel(channel: &Channel) -> low_level::Channel {
    low_level::Channel {
        name: channel.name().clone(),
        fine: match channel.partner() {
            Some(Partner::Fine(fine)) => Some(fine.clone()),
            _ => None,
        },
        group: Group {
            byte: channel.control_byte().index(),
            group: channel.group(),
        },
        colour: channel.colour(),
        capabilities: channel
            .capabilities()
            .iter()
            .map(translate_capability)
            .collect(),
    }
}

fn translate_capability(capability: &Capability) -> low_level::Capability {
    let mut out = low_level::Capability {
        min: capability.min(),
        max: capability.max(),
        kind: capability.kind().into(),
        label: capability.label().clone(),
        ..Default::default()
    };
    match capability.kind() {
        CapabilityKind::Color { primary, secondary } => {
            out.color = Some(*primary);
            out.color2 = *secondary;
        }
        CapabilityKind::Gobo { resource } => out.res = Some(resource.clone()),
        _ => {}
    }
    out
}

impl From<&CapabilityKind> for KindTag {
    fn from(kind: &CapabilityKind) -> Self {
        match kind {
            CapabilityKind::Generic => KindTag::Generic,
            CapabilityKind::Color { .. } => KindTag::Color,
            CapabilityKind::Gobo { .. } => KindTag::Gobo,
            CapabilityKind::Effect => KindTag::Effect,
            CapabilityKind::Pan => KindTag::Pan,
            CapabilityKind::Tilt => KindTag::Tilt,
            CapabilityKind::Strobe => KindTag::Strobe,
            CapabilityKind::Prism => KindTag::Prism,
            CapabilityKind::Speed => KindTag::Speed,
            CapabilityKind::Intensity => KindTag::Intensity,
            CapabilityKind::Maintenance => KindTag::Maintenance,
        }
    }
}

fn translate_mode(mode: &Mode) -> low_level::Mode {
    low_level::Mode {
        name: mode.name().clone(),
        physical: mode.physical.clone(),
        channels: mode
            .channels()
            .iter()
            .enumerate()
            .map(|(number, c)| ModeChannel {
                number,
                name: c.name().clone(),
            })
            .collect(),
        heads: mode
            .heads()
            .iter()
            .map(|h| low_level::Head {
                name: h.name.clone(),
                channels: h.channels().iter().map(|c| c.name().clone()).collect(),
            })
            .collect(),
    }
}
