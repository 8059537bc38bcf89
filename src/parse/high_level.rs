use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use getset::Getters;

use crate::{
    low_level::{self, KindTag},
    Capability, CapabilityKind, CapabilitySet, Channel, ControlByte, Creator, Fixture,
    FixtureError, Mode, Name, ParseError, Problems, RangeError, ReferenceError,
};

use super::low_level::ParsedFixture;

/// A fixture loaded from a definition, with the problems that were handled
/// while reading it.
#[derive(Debug, Getters)]
#[getset(get = "pub")]
pub struct ValidatedFixture {
    fixture: Fixture,
    problems: Problems,
}

impl ValidatedFixture {
    pub fn from_reader<T: Read>(reader: T) -> Result<Self, ParseError> {
        ParsedFixture::from_reader(reader)?.try_into()
    }

    pub fn from_description(description: &str) -> Result<Self, ParseError> {
        ParsedFixture::from_description(description)?.try_into()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let validated = Self::from_reader(BufReader::new(File::open(path)?))?;
        tracing::info!(
            path = %path.display(),
            problems = validated.problems.len(),
            "loaded fixture definition"
        );
        Ok(validated)
    }

    pub fn into_parts(self) -> (Fixture, Problems) {
        (self.fixture, self.problems)
    }
}

impl TryFrom<ParsedFixture> for ValidatedFixture {
    type Error = ParseError;

    fn try_from(parsed: ParsedFixture) -> Result<Self, Self::Error> {
        let ParsedFixture {
            fixture: definition,
            problems,
        } = parsed;

        let mut fixture = Fixture::new(definition.manufacturer, definition.model);
        fixture.fixture_type = definition.fixture_type;
        fixture.author = definition.creator.author;
        fixture.creator = Creator {
            name: definition.creator.name,
            version: definition.creator.version,
        };

        let mut pairs = Vec::new();
        for c in definition.channels {
            let (channel, fine) = translate_channel(c)?;
            if let Some(fine) = fine {
                pairs.push((channel.name().clone(), fine, channel.control_byte()));
            }
            fixture.add_channel(channel).map_err(unexpected)?;
        }
        for (coarse, fine, coarse_byte) in pairs {
            restore_pairing(&mut fixture, coarse, fine, coarse_byte)?;
        }

        for m in definition.modes {
            let mode = translate_mode(&fixture, m)?;
            fixture.add_mode(mode).map_err(unexpected)?;
        }

        Ok(ValidatedFixture { fixture, problems })
    }
}

fn translate_channel(c: low_level::Channel) -> Result<(Channel, Option<Name>), ParseError> {
    let capabilities = c
        .capabilities
        .into_iter()
        .map(|cap| translate_capability(&c.name, cap))
        .collect::<Result<Vec<_>, _>>()?;
    let capabilities = CapabilitySet::from_unchecked(capabilities);
    if let Some(source) = capabilities.validate().into_iter().next() {
        Err(RangeError::Overlap {
            channel: c.name.clone(),
            source,
        })?
    }

    let mut channel = Channel::new(c.name, c.group.group);
    channel.set_control_byte(control_byte(c.group.byte));
    channel.set_colour(c.colour);
    channel.set_capabilities(capabilities);
    Ok((channel, c.fine))
}

fn control_byte(byte: u8) -> ControlByte {
    // values other than 0 and 1 were already handled while parsing
    ControlByte::try_from(byte).unwrap_or_default()
}

fn translate_capability(channel: &Name, cap: low_level::Capability) -> Result<Capability, ParseError> {
    let kind = match cap.kind {
        KindTag::Generic => CapabilityKind::Generic,
        KindTag::Color => CapabilityKind::Color {
            primary: cap.color.unwrap_or_default(),
            secondary: cap.color2,
        },
        KindTag::Gobo => CapabilityKind::Gobo {
            resource: cap.res.unwrap_or_default(),
        },
        KindTag::Effect => CapabilityKind::Effect,
        KindTag::Pan => CapabilityKind::Pan,
        KindTag::Tilt => CapabilityKind::Tilt,
        KindTag::Strobe => CapabilityKind::Strobe,
        KindTag::Prism => CapabilityKind::Prism,
        KindTag::Speed => CapabilityKind::Speed,
        KindTag::Intensity => CapabilityKind::Intensity,
        KindTag::Maintenance => CapabilityKind::Maintenance,
    };
    let capability = Capability::new(cap.min, cap.max, cap.label.as_str()).map_err(|e| {
        RangeError::Inverted {
            channel: channel.clone(),
            label: cap.label.clone(),
            min: e.min,
            max: e.max,
        }
    })?;
    Ok(capability.with_kind(kind))
}

/// Pairs the channels again while keeping the control bytes as written in
/// the file.
fn restore_pairing(
    fixture: &mut Fixture,
    coarse: Name,
    fine: Name,
    coarse_byte: ControlByte,
) -> Result<(), ParseError> {
    let fine_byte = fixture
        .channel(&fine)
        .ok_or_else(|| ReferenceError::UnknownFineChannel {
            channel: coarse.clone(),
            fine: fine.clone(),
        })?
        .control_byte();
    fixture
        .pair_fine(&coarse, &fine)
        .map_err(|source| ReferenceError::InvalidPairing {
            channel: coarse.clone(),
            source,
        })?;
    for (name, byte) in [(&coarse, coarse_byte), (&fine, fine_byte)] {
        if let Some(channel) = fixture.channel_mut(name) {
            channel.set_control_byte(byte);
        }
    }
    Ok(())
}

fn translate_mode(fixture: &Fixture, m: low_level::Mode) -> Result<Mode, ParseError> {
    if let Some((field, value)) = m.physical.first_negative() {
        Err(RangeError::Negative {
            mode: m.name.clone(),
            field,
            value,
        })?
    }

    let name = m.name.clone();
    let mut mode = Mode::new(m.name);
    mode.physical = m.physical;
    let resolve = |head: Option<&Name>, channel: Name| {
        fixture
            .channel_ref(&channel)
            .ok_or_else(|| ReferenceError::UnknownChannel {
                mode: mode.name().clone(),
                head: head.cloned(),
                channel,
            })
    };

    let channels = m
        .channels
        .into_iter()
        .map(|c| resolve(None, c.name))
        .collect::<Result<Vec<_>, _>>()?;
    let heads = m
        .heads
        .into_iter()
        .map(|h| {
            let channels = h
                .channels
                .into_iter()
                .map(|c| resolve(Some(&h.name), c))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((h.name, channels))
        })
        .collect::<Result<Vec<_>, ReferenceError>>()?;

    let invalid = |source: FixtureError| ReferenceError::InvalidMode {
        mode: name.clone(),
        source,
    };
    for channel in channels {
        mode.add_channel(channel).map_err(invalid)?;
    }
    for (name, channels) in heads {
        mode.create_head(name, channels).map_err(invalid)?;
    }
    Ok(mode)
}

fn unexpected(e: FixtureError) -> ParseError {
    ParseError::Unexpected(e.to_string())
}
