use std::{collections::HashSet, io::Read};

use roxmltree::{Node, ParsingOptions};

use crate::{
    low_level::{Capability, Channel, FixtureDefinition, Group, Head, KindTag, Mode, ModeChannel},
    parse_xml::{GetXmlAttribute, GetXmlNode},
    ChannelGroup, ControlByteError, EntityKind, FixtureType, HandleProblem, KeepDefault, Name,
    ParseError,
    Physical, PrimaryColour, Problem, ProblemAt, Problems, ProblemsMut, RangeError, Rgb,
};

use super::problems::position;

/// A fixture definition read into its [`low_level`](crate::low_level)
/// representation, with the problems that were handled on the way.
#[derive(Debug, Default)]
pub struct ParsedFixture {
    pub fixture: FixtureDefinition,
    pub problems: Problems,
}

impl ParsedFixture {
    pub fn from_reader<T: Read>(mut reader: T) -> Result<Self, ParseError> {
        let mut description = String::new();
        reader.read_to_string(&mut description)?;
        Self::from_description(&description)
    }

    pub fn from_description(description: &str) -> Result<Self, ParseError> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(description, options)?;
        let root = doc
            .descendants()
            .find(|n| n.has_tag_name("FixtureDefinition"))
            .ok_or(ParseError::NoRootNode)?;

        let mut parsed = ParsedFixture::default();
        parsed.parse_root(root)?;

        Ok(parsed)
    }

    fn parse_root(&mut self, root: Node) -> Result<(), ParseError> {
        self.parse_creator(root);
        self.fixture.manufacturer = root.find_required_child("Manufacturer")?.required_text()?;
        self.fixture.model = root.find_required_child("Model")?.required_text()?;
        if let Some(fixture_type) = root
            .find_required_child("Type")
            .ok_or_handled_by("using type Other", self)
        {
            fixture_type
                .parse_text::<FixtureType>()
                .assign_or_keep(&mut self.fixture.fixture_type, &mut self.problems);
        }

        let mut channel_names = HashSet::new();
        let mut mode_names = HashSet::new();
        for node in root.children().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "Creator" | "Manufacturer" | "Model" | "Type" => {}
                "Channel" => {
                    let channel = self.parse_channel(node)?;
                    check_unique(&mut channel_names, &channel.name, EntityKind::Channel, &node)?;
                    self.fixture.channels.push(channel);
                }
                "Mode" => {
                    let mode = self.parse_mode(node)?;
                    check_unique(&mut mode_names, &mode.name, EntityKind::Mode, &node)?;
                    self.fixture.modes.push(mode);
                }
                other => Problem::UnexpectedXmlNode(other.into())
                    .at(&node)
                    .handled_by("ignoring node", self),
            }
        }
        Ok(())
    }

    fn parse_creator(&mut self, root: Node) {
        let Some(node) = root
            .find_required_child("Creator")
            .ok_or_handled_by("leaving creator empty", self)
        else {
            return;
        };
        let creator = &mut self.fixture.creator;
        for (tag, field) in [
            ("Name", &mut creator.name),
            ("Version", &mut creator.version),
            ("Author", &mut creator.author),
        ] {
            match node.find_required_child(tag) {
                Ok(n) => *field = n.text_content(),
                Err(p) => p.handled_by("leaving it empty", &mut self.problems),
            }
        }
    }

    fn parse_channel(&mut self, node: Node) -> Result<Channel, ParseError> {
        let mut channel = Channel {
            name: node.required_name(self)?,
            fine: node.optional_name("Fine", self),
            ..Default::default()
        };

        if let Some(group) = node
            .find_required_child("Group")
            .ok_or_handled_by("using group Intensity on byte 0", self)
        {
            channel.group = self.parse_group(group);
        }

        for child in node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "Group" => {}
                "Colour" => {
                    channel.colour = child
                        .parse_text::<PrimaryColour>()
                        .ok_or_handled_by("ignoring colour", self)
                }
                "Capability" => {
                    let capability = self.parse_capability(child, &channel.name)?;
                    channel.capabilities.push(capability);
                }
                other => Problem::UnexpectedXmlNode(other.into())
                    .at(&child)
                    .handled_by("ignoring node", self),
            }
        }
        Ok(channel)
    }

    fn parse_group(&mut self, node: Node) -> Group {
        let mut group = Group::default();
        match node.parse_attribute::<u8>("Byte") {
            Some(Ok(byte)) if byte <= 1 => group.byte = byte,
            Some(Ok(byte)) => Problem::InvalidAttribute {
                attr: "Byte".into(),
                tag: "Group".into(),
                content: byte.to_string(),
                source: Box::new(ControlByteError(byte)),
                expected_type: "control byte".into(),
            }
            .at(&node)
            .handled_by("using byte 0", self),
            Some(Err(p)) => p.handled_by("using byte 0", self),
            None => {}
        }
        node.parse_text::<ChannelGroup>()
            .assign_or_keep(&mut group.group, &mut self.problems);
        group
    }

    fn parse_capability(&mut self, node: Node, channel: &Name) -> Result<Capability, ParseError> {
        let min = dmx_value(node, "Min", channel)?;
        let max = dmx_value(node, "Max", channel)?;
        let color = node.parse_attribute::<Rgb>("Color").transpose()?;
        let color2 = node.parse_attribute::<Rgb>("Color2").transpose()?;
        let res = node.attribute("Res").map(str::to_owned);

        // definitions without Kind still get colours and gobos drawn
        let kind = match node.parse_attribute::<KindTag>("Kind") {
            Some(kind) => kind
                .ok_or_handled_by("using kind Generic", self)
                .unwrap_or_default(),
            None if color.is_some() => KindTag::Color,
            None if res.is_some() => KindTag::Gobo,
            None => KindTag::Generic,
        };
        let missing = match kind {
            KindTag::Color if color.is_none() => Some("Color"),
            KindTag::Gobo if res.is_none() => Some("Res"),
            _ => None,
        };
        if let Some(attr) = missing {
            Err(Problem::XmlAttributeMissing {
                attr: attr.into(),
                tag: "Capability".into(),
            }
            .at(&node))?
        }

        Ok(Capability {
            min,
            max,
            kind,
            color,
            color2,
            res,
            label: node.text_content(),
        })
    }

    fn parse_mode(&mut self, node: Node) -> Result<Mode, ParseError> {
        let mut mode = Mode {
            name: node.required_name(self)?,
            ..Default::default()
        };

        if let Some(physical) = node
            .find_required_child("Physical")
            .ok_or_handled_by("using default physical properties", self)
        {
            self.parse_physical(physical, &mut mode.physical);
        }

        let mut numbered: Vec<(usize, Name)> = Vec::new();
        for child in node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "Physical" => {}
                "Channel" => {
                    let number = child
                        .parse_attribute::<usize>("Number")
                        .and_then(|r| r.ok_or_handled_by("keeping document order", self))
                        .unwrap_or(numbered.len());
                    numbered.push((number, child.text_name(self)?));
                }
                "Head" => {
                    let head = self.parse_head(child, mode.heads.len())?;
                    mode.heads.push(head);
                }
                other => Problem::UnexpectedXmlNode(other.into())
                    .at(&child)
                    .handled_by("ignoring node", self),
            }
        }

        numbered.sort_by_key(|(number, _)| *number);
        mode.channels = numbered
            .into_iter()
            .enumerate()
            .map(|(number, (_, name))| ModeChannel { number, name })
            .collect();
        Ok(mode)
    }

    fn parse_head(&mut self, node: Node, index: usize) -> Result<Head, ParseError> {
        let mut head = Head {
            name: node.name(index, self),
            channels: Vec::new(),
        };
        for child in node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "Channel" => head.channels.push(child.text_name(self)?),
                other => Problem::UnexpectedXmlNode(other.into())
                    .at(&child)
                    .handled_by("ignoring node", self),
            }
        }
        Ok(head)
    }

    /// Missing attributes keep their defaults without a problem, older
    /// definitions lack some of them.
    fn parse_physical(&mut self, node: Node, physical: &mut Physical) {
        let p = &mut self.problems;
        for child in node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "Bulb" => {
                    let bulb = &mut physical.bulb;
                    child.parse_attribute_into("Type", &mut bulb.kind, p);
                    child.parse_attribute_into("Lumens", &mut bulb.lumens, p);
                    child.parse_attribute_into("ColourTemperature", &mut bulb.colour_temperature, p);
                }
                "Dimensions" => {
                    let dimensions = &mut physical.dimensions;
                    child.parse_attribute_into("Weight", &mut dimensions.weight, p);
                    child.parse_attribute_into("Width", &mut dimensions.width, p);
                    child.parse_attribute_into("Height", &mut dimensions.height, p);
                    child.parse_attribute_into("Depth", &mut dimensions.depth, p);
                }
                "Lens" => {
                    let lens = &mut physical.lens;
                    child.parse_attribute_into("Name", &mut lens.name, p);
                    child.parse_attribute_into("DegreesMin", &mut lens.degrees_min, p);
                    child.parse_attribute_into("DegreesMax", &mut lens.degrees_max, p);
                }
                "Focus" => {
                    let focus = &mut physical.focus;
                    child.parse_attribute_into("Type", &mut focus.kind, p);
                    child.parse_attribute_into("PanMax", &mut focus.pan_max, p);
                    child.parse_attribute_into("TiltMax", &mut focus.tilt_max, p);
                }
                "Technical" => {
                    let technical = &mut physical.technical;
                    child.parse_attribute_into(
                        "PowerConsumption",
                        &mut technical.power_consumption,
                        p,
                    );
                    child.parse_attribute_into("DmxConnector", &mut technical.dmx_connector, p);
                }
                other => Problem::UnexpectedXmlNode(other.into())
                    .at(&child)
                    .handled_by("ignoring node", p),
            }
        }
    }
}

impl ProblemsMut for ParsedFixture {
    fn problems_mut(&mut self) -> &mut Problems {
        &mut self.problems
    }
}

/// Min or Max of a capability. Integers outside a byte are a range error,
/// everything else that is not an integer a schema error.
fn dmx_value(node: Node, attr: &'static str, channel: &Name) -> Result<u8, ParseError> {
    let value: i64 = node.parse_required_attribute(attr)?;
    u8::try_from(value).map_err(|_| {
        RangeError::OutOfBounds {
            channel: channel.clone(),
            attr,
            value,
            at: position(&node),
        }
        .into()
    })
}

fn check_unique(
    seen: &mut HashSet<Name>,
    name: &Name,
    kind: EntityKind,
    node: &Node,
) -> Result<(), ProblemAt> {
    if seen.insert(name.clone()) {
        Ok(())
    } else {
        Err(Problem::DuplicateName {
            kind,
            name: name.clone(),
        }
        .at(node))
    }
}
