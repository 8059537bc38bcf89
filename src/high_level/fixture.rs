use derivative::Derivative;
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    Channel, ChannelRef, ControlByte, EntityKind, FixtureError, Mode, ModeMut, Name, Partner,
    ValidationError,
};

/// A fixture definition: identity, channels and modes.
///
/// The fixture owns its channels and modes. Modes reference channels by name
/// through [`ChannelRef`]; the operations on the fixture keep those
/// references resolvable.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Fixture {
    pub manufacturer: String,
    pub model: String,
    pub fixture_type: FixtureType,
    /// author of the definition
    pub author: String,
    pub creator: Creator,

    channels: Vec<Channel>,
    modes: Vec<Mode>,
}

/// Program that wrote a definition file.
#[derive(Debug, PartialEq, Clone, Derivative)]
#[derivative(Default)]
pub struct Creator {
    #[derivative(Default(value = "env!(\"CARGO_PKG_NAME\").into()"))]
    pub name: String,
    #[derivative(Default(value = "env!(\"CARGO_PKG_VERSION\").into()"))]
    pub version: String,
}

/// General type of a fixture.
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
pub enum FixtureType {
    #[strum(to_string = "Color Changer")]
    ColorChanger,
    Dimmer,
    Effect,
    Fan,
    Flower,
    Hazer,
    Laser,
    #[strum(to_string = "LED Bar (Beams)")]
    LedBarBeams,
    #[strum(to_string = "LED Bar (Pixels)")]
    LedBarPixels,
    #[strum(to_string = "Moving Head")]
    MovingHead,
    Scanner,
    Smoke,
    Strobe,
    #[default]
    Other,
}

impl Fixture {
    pub fn new<S: Into<String>, T: Into<String>>(manufacturer: S, model: T) -> Self {
        Fixture {
            manufacturer: manufacturer.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    pub fn channel(&self, name: &Name) -> Option<&Channel> {
        self.channels.iter().find(|c| &c.name == name)
    }

    /// Mutable access to a channel's group, colour and capabilities.
    pub fn channel_mut(&mut self, name: &Name) -> Option<&mut Channel> {
        self.channels.iter_mut().find(|c| &c.name == name)
    }

    pub fn channel_ref(&self, name: &Name) -> Option<ChannelRef> {
        self.channel(name).map(|c| ChannelRef::new(c.name.clone()))
    }

    pub fn mode(&self, name: &Name) -> Option<&Mode> {
        self.modes.iter().find(|m| &m.name == name)
    }

    /// Mutable access to a mode's channels, heads and physical properties.
    pub fn mode_mut(&mut self, name: &Name) -> Option<ModeMut<'_>> {
        let mode = self.modes.iter_mut().find(|m| &m.name == name)?;
        Some(ModeMut::new(mode, &self.channels))
    }

    /// Modes using `channel` directly or in a head.
    pub fn modes_using<'a>(&'a self, channel: &'a Name) -> impl Iterator<Item = &'a Mode> {
        self.modes.iter().filter(move |m| m.references(channel))
    }

    /// Adds a channel. A partner the channel had in another fixture is
    /// dropped.
    pub fn add_channel(&mut self, mut channel: Channel) -> Result<ChannelRef, FixtureError> {
        self.check_unique_channel_name(&channel.name)?;
        channel.partner = None;
        let channel_ref = ChannelRef::new(channel.name.clone());
        self.channels.push(channel);
        Ok(channel_ref)
    }

    /// Adds a copy of a channel, e.g. from the clipboard.
    ///
    /// If the name is taken, the copy is called `Copy of <name>`, with
    /// `Copy of ` repeated until the name is free. The copy is unpaired and
    /// carries the coarse byte.
    pub fn paste_channel(&mut self, mut channel: Channel) -> ChannelRef {
        while self.channel(&channel.name).is_some() {
            channel.name = channel.name.copy_of();
        }
        channel.partner = None;
        channel.set_control_byte(ControlByte::Coarse);
        let channel_ref = ChannelRef::new(channel.name.clone());
        self.channels.push(channel);
        channel_ref
    }

    /// Removes a channel that no mode uses anymore.
    ///
    /// Modes referencing the channel must drop it first, see
    /// [`Mode::remove_channel`]. A coarse/fine pairing is dissolved.
    pub fn remove_channel(&mut self, name: &Name) -> Result<Channel, FixtureError> {
        let index = self
            .channels
            .iter()
            .position(|c| &c.name == name)
            .ok_or_else(|| not_found(EntityKind::Channel, name))?;
        if let Some(mode) = self.modes_using(name).next() {
            Err(FixtureError::InUse {
                channel: name.clone(),
                mode: mode.name.clone(),
            })?
        }
        let channel = self.channels.remove(index);
        if let Some(partner) = channel
            .partner
            .as_ref()
            .and_then(|p| self.channel_mut(p.name()))
        {
            partner.partner = None;
        }
        tracing::debug!(channel = %name, "removed channel");
        Ok(channel)
    }

    /// Renames a channel and every reference to it.
    pub fn rename_channel(&mut self, old: &Name, new: Name) -> Result<(), FixtureError> {
        if self.channel(old).is_none() {
            Err(not_found(EntityKind::Channel, old))?
        }
        if old == &new {
            return Ok(());
        }
        self.check_unique_channel_name(&new)?;

        for mode in self.modes.iter_mut() {
            mode.rename_channel(old, &new);
        }
        for channel in self.channels.iter_mut() {
            if let Some(partner) = channel.partner.as_mut() {
                partner.rename(old, &new);
            }
            if &channel.name == old {
                channel.name = new.clone();
            }
        }
        Ok(())
    }

    /// Pairs a coarse channel with the channel carrying its fine byte.
    pub fn pair_fine(&mut self, coarse: &Name, fine: &Name) -> Result<(), FixtureError> {
        for name in [coarse, fine] {
            let channel = self
                .channel(name)
                .ok_or_else(|| not_found(EntityKind::Channel, name))?;
            if let Some(partner) = &channel.partner {
                Err(FixtureError::AlreadyPaired {
                    channel: name.clone(),
                    partner: partner.name().clone(),
                })?
            }
        }
        if coarse == fine {
            Err(FixtureError::SelfPair(coarse.clone()))?
        }

        for (name, partner, byte) in [
            (coarse, Partner::Fine(fine.clone()), ControlByte::Coarse),
            (fine, Partner::Coarse(coarse.clone()), ControlByte::Fine),
        ] {
            if let Some(channel) = self.channel_mut(name) {
                channel.partner = Some(partner);
                channel.set_control_byte(byte);
            }
        }
        Ok(())
    }

    /// Dissolves the pairing of `name`, returning the former partner.
    pub fn unpair(&mut self, name: &Name) -> Result<Option<Name>, FixtureError> {
        let partner = self
            .channel_mut(name)
            .ok_or_else(|| not_found(EntityKind::Channel, name))?
            .partner
            .take()
            .map(|p| p.name().clone());
        if let Some(p) = partner.as_ref().and_then(|p| self.channel_mut(p)) {
            p.partner = None;
        }
        Ok(partner)
    }

    /// Adds a mode whose channels and heads all reference channels of this
    /// fixture.
    pub fn add_mode(&mut self, mode: Mode) -> Result<(), FixtureError> {
        self.check_unique_mode_name(&mode.name)?;
        if let Some((_, unknown)) = mode
            .all_references()
            .find(|(_, r)| self.channel(r.name()).is_none())
        {
            Err(FixtureError::UnknownChannel {
                mode: mode.name.clone(),
                channel: unknown.name().clone(),
            })?
        }
        self.modes.push(mode);
        Ok(())
    }

    pub fn remove_mode(&mut self, name: &Name) -> Result<Mode, FixtureError> {
        let index = self
            .modes
            .iter()
            .position(|m| &m.name == name)
            .ok_or_else(|| not_found(EntityKind::Mode, name))?;
        Ok(self.modes.remove(index))
    }

    pub fn rename_mode(&mut self, old: &Name, new: Name) -> Result<(), FixtureError> {
        if self.mode(old).is_none() {
            Err(not_found(EntityKind::Mode, old))?
        }
        if old == &new {
            return Ok(());
        }
        self.check_unique_mode_name(&new)?;
        if let Some(mode) = self.modes.iter_mut().find(|m| &m.name == old) {
            mode.name = new;
        }
        Ok(())
    }

    /// Adds a copy of a mode and returns the name of the copy.
    ///
    /// Without `new_name` the copy is called `Copy of <name>`, repeated until
    /// unique.
    pub fn clone_mode(
        &mut self,
        source: &Name,
        new_name: Option<Name>,
    ) -> Result<Name, FixtureError> {
        let mut copy = self
            .mode(source)
            .ok_or_else(|| not_found(EntityKind::Mode, source))?
            .clone();
        match new_name {
            Some(name) => {
                self.check_unique_mode_name(&name)?;
                copy.name = name;
            }
            None => {
                copy.name = copy.name.copy_of();
                while self.mode(&copy.name).is_some() {
                    copy.name = copy.name.copy_of();
                }
            }
        }
        let name = copy.name.clone();
        self.modes.push(copy);
        Ok(name)
    }

    /// Everything that has to be fixed before the fixture can be saved.
    pub fn validate_for_save(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.manufacturer.trim().is_empty() {
            errors.push(ValidationError::EmptyManufacturer);
        }
        if self.model.trim().is_empty() {
            errors.push(ValidationError::EmptyModel);
        }
        if self.channels.is_empty() {
            errors.push(ValidationError::NoChannels);
        }

        for (i, channel) in self.channels.iter().enumerate() {
            if channel.name.is_empty() {
                errors.push(ValidationError::EmptyName {
                    kind: EntityKind::Channel,
                    position: i + 1,
                });
            }
            errors.extend(channel.capabilities().validate().into_iter().map(|source| {
                ValidationError::Overlap {
                    channel: channel.name.clone(),
                    source,
                }
            }));
        }

        for (i, mode) in self.modes.iter().enumerate() {
            if mode.name.is_empty() {
                errors.push(ValidationError::EmptyName {
                    kind: EntityKind::Mode,
                    position: i + 1,
                });
            }
            for (j, head) in mode.heads().iter().enumerate() {
                if head.name.is_empty() {
                    errors.push(ValidationError::EmptyName {
                        kind: EntityKind::Head,
                        position: j + 1,
                    });
                }
            }
            if let Some((field, value)) = mode.physical.first_negative() {
                errors.push(ValidationError::NegativePhysical {
                    mode: mode.name.clone(),
                    field,
                    value,
                });
            }
            for (head, r) in mode.all_references() {
                if self.channel(r.name()).is_none() {
                    errors.push(ValidationError::OrphanedReference {
                        mode: mode.name.clone(),
                        head: head.map(|h| h.name.clone()),
                        channel: r.name().clone(),
                    });
                }
            }
        }

        errors
    }

    fn check_unique_channel_name(&self, name: &Name) -> Result<(), FixtureError> {
        if self.channel(name).is_some() {
            Err(FixtureError::DuplicateName {
                kind: EntityKind::Channel,
                name: name.clone(),
            })?
        }
        Ok(())
    }

    fn check_unique_mode_name(&self, name: &Name) -> Result<(), FixtureError> {
        if self.mode(name).is_some() {
            Err(FixtureError::DuplicateName {
                kind: EntityKind::Mode,
                name: name.clone(),
            })?
        }
        Ok(())
    }
}

fn not_found(kind: EntityKind, name: &Name) -> FixtureError {
    FixtureError::NotFound {
        kind,
        name: name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use crate::{name::IntoValidName, ChannelGroup};

    use super::*;

    fn n(s: &str) -> Name {
        s.into_valid()
    }

    fn fixture_with(channels: &[&str]) -> Fixture {
        let mut f = Fixture::new("Generic", "RGB Par");
        for c in channels {
            f.add_channel(Channel::new(n(c), ChannelGroup::Intensity))
                .unwrap();
        }
        f
    }

    #[test]
    fn fixture_type_spelling() {
        assert_eq!(FixtureType::MovingHead.to_string(), "Moving Head");
        for t in FixtureType::iter() {
            assert_eq!(FixtureType::from_str(&t.to_string()).unwrap(), t);
        }
    }

    #[test]
    fn creator_defaults_to_this_crate() {
        let f = Fixture::default();
        assert_eq!(f.creator.name, "openqxf");
        assert!(!f.creator.version.is_empty());
    }

    #[test]
    fn duplicate_channel_leaves_fixture_unchanged() {
        let mut f = fixture_with(&["Red"]);
        let before = f.clone();
        assert_eq!(
            f.add_channel(Channel::new(n("Red"), ChannelGroup::Colour)),
            Err(FixtureError::DuplicateName {
                kind: EntityKind::Channel,
                name: n("Red")
            })
        );
        assert_eq!(f, before);
    }

    #[test]
    fn rename_rewrites_references() {
        let mut f = fixture_with(&["Pan", "Pan fine"]);
        f.pair_fine(&n("Pan"), &n("Pan fine")).unwrap();
        let mut mode = Mode::new(n("16 bit"));
        mode.add_channel(f.channel_ref(&n("Pan")).unwrap()).unwrap();
        mode.create_head(n("Head"), vec![f.channel_ref(&n("Pan")).unwrap()])
            .unwrap();
        f.add_mode(mode).unwrap();

        f.rename_channel(&n("Pan"), n("Pan coarse")).unwrap();
        let mode = f.mode(&n("16 bit")).unwrap();
        assert_eq!(mode.channels()[0], n("Pan coarse"));
        assert_eq!(mode.heads()[0].channels()[0], n("Pan coarse"));
        assert_eq!(
            f.channel(&n("Pan fine")).unwrap().partner(),
            &Some(Partner::Coarse(n("Pan coarse")))
        );
        assert_eq!(
            f.channel(&n("Pan coarse")).unwrap().partner(),
            &Some(Partner::Fine(n("Pan fine")))
        );
        assert!(f.validate_for_save().is_empty());

        assert!(matches!(
            f.rename_channel(&n("Pan coarse"), n("Pan fine")),
            Err(FixtureError::DuplicateName { .. })
        ));
        assert!(matches!(
            f.rename_channel(&n("Tilt"), n("Tilt 2")),
            Err(FixtureError::NotFound { .. })
        ));
        f.rename_channel(&n("Pan fine"), n("Pan fine")).unwrap();
    }

    #[test]
    fn pairing_rules() {
        let mut f = fixture_with(&["Tilt", "Tilt fine", "Dimmer"]);
        assert_eq!(
            f.pair_fine(&n("Tilt"), &n("Tilt")),
            Err(FixtureError::SelfPair(n("Tilt")))
        );
        assert!(matches!(
            f.pair_fine(&n("Tilt"), &n("Nope")),
            Err(FixtureError::NotFound { .. })
        ));
        f.pair_fine(&n("Tilt"), &n("Tilt fine")).unwrap();
        assert_eq!(
            f.channel(&n("Tilt fine")).unwrap().control_byte(),
            ControlByte::Fine
        );
        assert_eq!(
            f.pair_fine(&n("Dimmer"), &n("Tilt fine")),
            Err(FixtureError::AlreadyPaired {
                channel: n("Tilt fine"),
                partner: n("Tilt")
            })
        );

        assert_eq!(f.unpair(&n("Tilt fine")).unwrap(), Some(n("Tilt")));
        assert_eq!(f.channel(&n("Tilt")).unwrap().partner(), &None);
        f.pair_fine(&n("Dimmer"), &n("Tilt fine")).unwrap();
    }

    #[test]
    fn removing_a_paired_channel_unpairs_the_partner() {
        let mut f = fixture_with(&["Zoom", "Zoom fine"]);
        f.pair_fine(&n("Zoom"), &n("Zoom fine")).unwrap();
        f.remove_channel(&n("Zoom fine")).unwrap();
        assert_eq!(f.channel(&n("Zoom")).unwrap().partner(), &None);
    }

    #[test]
    fn paste_picks_a_free_name() {
        let mut f = fixture_with(&["Strobe"]);
        let copied = f.channel(&n("Strobe")).unwrap().clone();
        assert_eq!(f.paste_channel(copied.clone()).name(), &n("Copy of Strobe"));
        assert_eq!(
            f.paste_channel(copied).name(),
            &n("Copy of Copy of Strobe")
        );
        assert_eq!(f.channels().len(), 3);
    }

    #[test]
    fn pasted_fine_channel_becomes_plain() {
        let mut f = fixture_with(&["Zoom", "Zoom fine"]);
        f.pair_fine(&n("Zoom"), &n("Zoom fine")).unwrap();
        let copied = f.channel(&n("Zoom fine")).unwrap().clone();
        assert_eq!(copied.control_byte(), ControlByte::Fine);

        let pasted = f.paste_channel(copied);
        let pasted = f.channel(pasted.name()).unwrap();
        assert_eq!(pasted.partner(), &None);
        assert_eq!(pasted.control_byte(), ControlByte::Coarse);
        assert_eq!(
            f.channel(&n("Zoom")).unwrap().partner(),
            &Some(Partner::Fine(n("Zoom fine")))
        );
    }

    #[test]
    fn modes_must_reference_known_channels() {
        let mut f = fixture_with(&["Red"]);
        let other = fixture_with(&["Red", "Green"]);
        let mut mode = Mode::new(n("2 channel"));
        mode.add_channel(other.channel_ref(&n("Red")).unwrap())
            .unwrap();
        mode.add_channel(other.channel_ref(&n("Green")).unwrap())
            .unwrap();
        assert_eq!(
            f.add_mode(mode),
            Err(FixtureError::UnknownChannel {
                mode: n("2 channel"),
                channel: n("Green")
            })
        );
        assert!(f.modes().is_empty());
    }

    #[test]
    fn mode_edits_only_take_own_channels() {
        let mut f = fixture_with(&["Red", "Strobe"]);
        f.add_mode(Mode::new(n("2ch"))).unwrap();
        let stale = f.channel_ref(&n("Strobe")).unwrap();
        f.remove_channel(&n("Strobe")).unwrap();
        let foreign = fixture_with(&["Green"]).channel_ref(&n("Green")).unwrap();
        let red = f.channel_ref(&n("Red")).unwrap();

        let mut mode = f.mode_mut(&n("2ch")).unwrap();
        assert_eq!(
            mode.add_channel(stale),
            Err(FixtureError::NotFound {
                kind: EntityKind::Channel,
                name: n("Strobe")
            })
        );
        assert!(mode.add_channel(foreign).is_err());
        mode.add_channel(red).unwrap();
        assert_eq!(mode.channels().len(), 1);
        assert!(f.validate_for_save().is_empty());
    }

    #[test]
    fn mode_names_are_unique() {
        let mut f = fixture_with(&["Red"]);
        f.add_mode(Mode::new(n("A"))).unwrap();
        f.add_mode(Mode::new(n("B"))).unwrap();
        assert!(matches!(
            f.add_mode(Mode::new(n("A"))),
            Err(FixtureError::DuplicateName {
                kind: EntityKind::Mode,
                ..
            })
        ));
        assert!(f.rename_mode(&n("A"), n("B")).is_err());
        f.rename_mode(&n("A"), n("C")).unwrap();
        assert_eq!(f.clone_mode(&n("C"), None).unwrap(), n("Copy of C"));
        assert!(f.clone_mode(&n("C"), Some(n("B"))).is_err());
        assert_eq!(f.clone_mode(&n("B"), Some(n("D"))).unwrap(), n("D"));
        assert_eq!(f.clone_mode(&n("C"), None).unwrap(), n("Copy of Copy of C"));
        assert_eq!(f.remove_mode(&n("B")).unwrap().name(), &n("B"));
        assert_eq!(f.modes().len(), 4);
    }

    #[test]
    fn validation() {
        let mut f = Fixture::new(" ", "");
        assert_eq!(
            f.validate_for_save(),
            [
                ValidationError::EmptyManufacturer,
                ValidationError::EmptyModel,
                ValidationError::NoChannels
            ]
        );

        f.manufacturer = "Generic".into();
        f.model = "Dimmer".into();
        let dimmer = f.add_channel(Channel::new(n("Dimmer"), ChannelGroup::Intensity))
            .unwrap();
        f.add_channel(Channel::default()).unwrap();
        let mut mode = Mode::new(n("1 channel"));
        mode.add_channel(dimmer.clone()).unwrap();
        mode.create_head(n("Head 1"), vec![dimmer.clone()]).unwrap();
        mode.create_head(n(""), vec![dimmer]).unwrap();
        mode.physical.dimensions.weight = -1.0;
        f.add_mode(mode).unwrap();

        assert_eq!(
            f.validate_for_save(),
            [
                ValidationError::EmptyName {
                    kind: EntityKind::Channel,
                    position: 2
                },
                ValidationError::EmptyName {
                    kind: EntityKind::Head,
                    position: 2
                },
                ValidationError::NegativePhysical {
                    mode: n("1 channel"),
                    field: "Weight",
                    value: -1.0
                }
            ]
        );
    }
}
