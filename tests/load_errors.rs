use openqxf::{
    CapabilityKind, ChannelGroup, Name, ParseError, Problem, RangeError, ReferenceError, Rgb,
    ValidatedFixture,
};

fn n(name: &str) -> Name {
    Name::try_from(name).unwrap()
}

#[test]
fn inverted_range_yields_no_fixture() {
    let result = ValidatedFixture::from_path("tests/resources/inverted_range.qxf");
    assert!(matches!(
        result,
        Err(ParseError::Range(RangeError::Inverted { channel, min: 50, max: 10, .. })) if channel == "Dimmer"
    ));
}

#[test]
fn missing_file() {
    assert!(matches!(
        ValidatedFixture::from_path("tests/resources/does_not_exist.qxf"),
        Err(ParseError::Io(_))
    ));
}

#[test]
fn legacy_file_loads_with_problems() -> anyhow::Result<()> {
    let (fixture, problems) =
        ValidatedFixture::from_path("tests/resources/legacy.qxf")?.into_parts();

    let actions: Vec<_> = problems.iter().map(|p| p.action.as_str()).collect();
    assert_eq!(
        actions,
        [
            "using default Intensity",
            "using default physical properties",
            "using default name 'Head 1'",
            "using default name 'Head 2'",
            "ignoring node",
        ]
    );
    assert!(matches!(
        problems.last().map(|p| p.problem()),
        Some(Problem::UnexpectedXmlNode(tag)) if tag == "FlashMode"
    ));

    let head_names: Vec<_> = fixture.modes()[0]
        .heads()
        .iter()
        .map(|h| h.name.to_string())
        .collect();
    assert_eq!(head_names, ["Head 1", "Head 2"]);

    let macro_channel = fixture.channel(&n("Macro")).unwrap();
    assert_eq!(macro_channel.group(), ChannelGroup::Intensity);
    assert_eq!(
        macro_channel.capabilities().find_by_value(64).unwrap().kind(),
        &CapabilityKind::Color {
            primary: Rgb::new(255, 128, 0),
            secondary: None
        }
    );
    assert!(fixture.validate_for_save().is_empty());
    Ok(())
}

#[test]
fn unknown_channel_in_mode() {
    let xml = r#"<FixtureDefinition>
 <Creator><Name>x</Name><Version>1</Version><Author>y</Author></Creator>
 <Manufacturer>Generic</Manufacturer><Model>Par</Model><Type>Dimmer</Type>
 <Channel Name="Dimmer"><Group Byte="0">Intensity</Group></Channel>
 <Mode Name="1ch"><Channel Number="0">Dimmer</Channel><Channel Number="1">Strobe</Channel></Mode>
</FixtureDefinition>"#;
    assert!(matches!(
        ValidatedFixture::from_description(xml),
        Err(ParseError::Reference(ReferenceError::UnknownChannel { mode, channel, .. }))
            if mode == "1ch" && channel == "Strobe"
    ));
}
