use crate::{low_level::FixtureDefinition, SerializationError};

impl FixtureDefinition {
    pub fn serialize_description(&self) -> Result<String, SerializationError> {
        let mut description: String = concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            "\n",
            "<!DOCTYPE FixtureDefinition>",
            "\n"
        )
        .into();
        quick_xml::se::to_writer(&mut description, self)?;
        Ok(description)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        low_level::{Capability, Channel, Group, KindTag, Mode, ModeChannel},
        name::IntoValidName,
        ChannelGroup, Rgb,
    };

    use super::*;

    #[test]
    fn serialize_description() {
        let definition = FixtureDefinition {
            manufacturer: "Generic".into(),
            model: "Scanner & Co".into(),
            channels: vec![Channel {
                name: "Pan".into_valid(),
                fine: Some("Pan fine".into_valid()),
                group: Group {
                    byte: 0,
                    group: ChannelGroup::Pan,
                },
                colour: None,
                capabilities: vec![Capability {
                    min: 0,
                    max: 9,
                    kind: KindTag::Color,
                    color: Some(Rgb::new(255, 0, 0)),
                    label: "Red".into(),
                    ..Default::default()
                }],
            }],
            modes: vec![Mode {
                name: "Std".into_valid(),
                channels: vec![ModeChannel {
                    number: 0,
                    name: "Pan".into_valid(),
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let description = definition.serialize_description().unwrap();

        assert!(description.starts_with(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE FixtureDefinition>\n\
            <FixtureDefinition xmlns=\"http://www.qlcplus.org/FixtureDefinition\">"
        ));
        for fragment in [
            "<Model>Scanner &amp; Co</Model>",
            "<Type>Other</Type>",
            r#"<Channel Name="Pan" Fine="Pan fine"><Group Byte="0">Pan</Group>"#,
            r##"<Capability Min="0" Max="9" Kind="Color" Color="#ff0000">Red</Capability>"##,
            r#"<Mode Name="Std"><Physical><Bulb Type="Other""#,
            r#"<Channel Number="0">Pan</Channel></Mode>"#,
        ] {
            assert!(description.contains(fragment), "{fragment} in {description}");
        }
        assert!(!description.contains("<Colour>"));
        assert!(!description.contains("<Head"));
    }
}
