use std::ops::Deref;

use getset::Getters;

use crate::{Channel, EntityKind, FixtureError, IndexError, Name, Physical};

/// Reference to a channel of a [`Fixture`](crate::Fixture), by name.
///
/// Obtained from [`Fixture::channel_ref`](crate::Fixture::channel_ref) or
/// [`Fixture::add_channel`](crate::Fixture::add_channel). The fixture keeps
/// references valid when channels are renamed and refuses to remove channels
/// that are still referenced.
#[derive(Debug, PartialEq, Eq, Clone, Hash, derive_more::Display)]
pub struct ChannelRef(Name);

impl ChannelRef {
    pub(crate) fn new(name: Name) -> Self {
        ChannelRef(name)
    }

    pub fn name(&self) -> &Name {
        &self.0
    }
}

impl PartialEq<Name> for ChannelRef {
    fn eq(&self, other: &Name) -> bool {
        &self.0 == other
    }
}

/// One way of addressing a fixture: an ordered list of channels, optionally
/// grouped into heads.
#[derive(Debug, PartialEq, Clone, Getters)]
pub struct Mode {
    #[getset(get = "pub")]
    pub(crate) name: Name,
    /// channels in DMX address order
    #[getset(get = "pub")]
    channels: Vec<ChannelRef>,
    #[getset(get = "pub")]
    heads: Vec<Head>,
    pub physical: Physical,
}

/// A group of a mode's channels controlling one light emitter, e.g. one
/// pixel of an LED bar.
#[derive(Debug, PartialEq, Clone, Getters)]
pub struct Head {
    pub name: Name,
    #[getset(get = "pub")]
    channels: Vec<ChannelRef>,
}

impl Mode {
    pub fn new(name: Name) -> Self {
        Mode {
            name,
            channels: Vec::new(),
            heads: Vec::new(),
            physical: Physical::default(),
        }
    }

    pub fn channel_index(&self, channel: &Name) -> Option<usize> {
        self.channels.iter().position(|c| c == channel)
    }

    pub fn contains(&self, channel: &Name) -> bool {
        self.channel_index(channel).is_some()
    }

    /// Whether the mode or one of its heads references `channel`.
    pub fn references(&self, channel: &Name) -> bool {
        self.contains(channel)
            || self
                .heads
                .iter()
                .any(|h| h.channels.iter().any(|c| c == channel))
    }

    /// Appends a channel.
    pub fn add_channel(&mut self, channel: ChannelRef) -> Result<(), FixtureError> {
        if self.contains(channel.name()) {
            return Err(FixtureError::DuplicateChannel {
                mode: self.name.clone(),
                channel: channel.0,
            });
        }
        self.channels.push(channel);
        Ok(())
    }

    /// Moves the channel at `from` to position `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), IndexError> {
        move_item(&mut self.channels, from, to)
    }

    /// Removes a channel from the mode and from all of its heads.
    pub fn remove_channel(&mut self, channel: &Name) -> Result<ChannelRef, FixtureError> {
        let index = self
            .channel_index(channel)
            .ok_or_else(|| self.unknown_channel(channel))?;
        for head in self.heads.iter_mut() {
            head.channels.retain(|c| c != channel);
        }
        Ok(self.channels.remove(index))
    }

    /// Adds a head made of channels already in the mode.
    pub fn create_head(
        &mut self,
        name: Name,
        channels: Vec<ChannelRef>,
    ) -> Result<(), FixtureError> {
        self.check_head_channels(&channels)?;
        self.heads.push(Head { name, channels });
        Ok(())
    }

    /// Replaces the channels of the head at `index`.
    pub fn set_head_channels(
        &mut self,
        index: usize,
        channels: Vec<ChannelRef>,
    ) -> Result<(), FixtureError> {
        IndexError::check(index, self.heads.len())?;
        self.check_head_channels(&channels)?;
        if let Some(head) = self.heads.get_mut(index) {
            head.channels = channels;
        }
        Ok(())
    }

    pub fn head_mut(&mut self, index: usize) -> Option<&mut Head> {
        self.heads.get_mut(index)
    }

    pub fn remove_head(&mut self, index: usize) -> Result<Head, IndexError> {
        IndexError::check(index, self.heads.len())?;
        Ok(self.heads.remove(index))
    }

    pub fn reorder_heads(&mut self, from: usize, to: usize) -> Result<(), IndexError> {
        move_item(&mut self.heads, from, to)
    }

    fn check_head_channels(&self, channels: &[ChannelRef]) -> Result<(), FixtureError> {
        for (i, c) in channels.iter().enumerate() {
            if !self.contains(c.name()) {
                Err(self.unknown_channel(c.name()))?
            }
            if channels.iter().take(i).any(|earlier| earlier == c) {
                Err(FixtureError::DuplicateChannel {
                    mode: self.name.clone(),
                    channel: c.name().clone(),
                })?
            }
        }
        Ok(())
    }

    fn unknown_channel(&self, channel: &Name) -> FixtureError {
        FixtureError::UnknownChannel {
            mode: self.name.clone(),
            channel: channel.clone(),
        }
    }

    /// Follows a channel rename in the mode and its heads.
    pub(crate) fn rename_channel(&mut self, old: &Name, new: &Name) {
        let refs = self
            .channels
            .iter_mut()
            .chain(self.heads.iter_mut().flat_map(|h| h.channels.iter_mut()));
        for r in refs.filter(|r| r.0 == *old) {
            r.0 = new.clone();
        }
    }

    /// All references in the mode and its heads, with the head they are in.
    pub(crate) fn all_references(&self) -> impl Iterator<Item = (Option<&Head>, &ChannelRef)> {
        self.channels.iter().map(|c| (None, c)).chain(
            self.heads
                .iter()
                .flat_map(|h| h.channels.iter().map(move |c| (Some(h), c))),
        )
    }
}

/// A mode borrowed mutably from its [`Fixture`](crate::Fixture).
///
/// Channels added through it must exist in the fixture, so a stale
/// [`ChannelRef`] or one from another fixture is refused.
#[derive(Debug)]
pub struct ModeMut<'a> {
    mode: &'a mut Mode,
    channels: &'a [Channel],
}

impl<'a> ModeMut<'a> {
    pub(crate) fn new(mode: &'a mut Mode, channels: &'a [Channel]) -> Self {
        ModeMut { mode, channels }
    }

    /// Appends a channel of the owning fixture.
    pub fn add_channel(&mut self, channel: ChannelRef) -> Result<(), FixtureError> {
        if !self.channels.iter().any(|c| c.name() == channel.name()) {
            return Err(FixtureError::NotFound {
                kind: EntityKind::Channel,
                name: channel.0,
            });
        }
        self.mode.add_channel(channel)
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), IndexError> {
        self.mode.reorder(from, to)
    }

    pub fn remove_channel(&mut self, channel: &Name) -> Result<ChannelRef, FixtureError> {
        self.mode.remove_channel(channel)
    }

    pub fn create_head(
        &mut self,
        name: Name,
        channels: Vec<ChannelRef>,
    ) -> Result<(), FixtureError> {
        self.mode.create_head(name, channels)
    }

    pub fn set_head_channels(
        &mut self,
        index: usize,
        channels: Vec<ChannelRef>,
    ) -> Result<(), FixtureError> {
        self.mode.set_head_channels(index, channels)
    }

    pub fn head_mut(&mut self, index: usize) -> Option<&mut Head> {
        self.mode.head_mut(index)
    }

    pub fn remove_head(&mut self, index: usize) -> Result<Head, IndexError> {
        self.mode.remove_head(index)
    }

    pub fn reorder_heads(&mut self, from: usize, to: usize) -> Result<(), IndexError> {
        self.mode.reorder_heads(from, to)
    }

    pub fn physical_mut(&mut self) -> &mut Physical {
        &mut self.mode.physical
    }
}

impl Deref for ModeMut<'_> {
    type Target = Mode;

    fn deref(&self) -> &Mode {
        &*self.mode
    }
}

fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), IndexError> {
    IndexError::check(from, items.len())?;
    IndexError::check(to, items.len())?;
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::name::IntoValidName;

    use super::*;

    fn r(name: &str) -> ChannelRef {
        ChannelRef::new(name.into_valid())
    }

    fn names(refs: &[ChannelRef]) -> Vec<&str> {
        refs.iter().map(|c| c.name().as_str()).collect()
    }

    fn rgb_mode() -> Mode {
        let mut mode = Mode::new("RGB".into_valid());
        for c in ["Red", "Green", "Blue"] {
            mode.add_channel(r(c)).unwrap();
        }
        mode
    }

    #[test]
    fn duplicate_channels_are_rejected() {
        let mut mode = rgb_mode();
        assert!(matches!(
            mode.add_channel(r("Red")),
            Err(FixtureError::DuplicateChannel { channel, .. }) if channel == "Red"
        ));
        assert_eq!(mode.channels().len(), 3);
    }

    #[test]
    fn reorder() {
        let mut mode = rgb_mode();
        mode.reorder(2, 0).unwrap();
        assert_eq!(names(mode.channels()), ["Blue", "Red", "Green"]);
        mode.reorder(0, 2).unwrap();
        assert_eq!(names(mode.channels()), ["Red", "Green", "Blue"]);
        assert_eq!(mode.reorder(3, 0), Err(IndexError { index: 3, len: 3 }));
        assert_eq!(mode.reorder(0, 3), Err(IndexError { index: 3, len: 3 }));
    }

    #[test]
    fn heads_only_take_mode_channels() {
        let mut mode = rgb_mode();
        assert!(matches!(
            mode.create_head("Head 1".into_valid(), vec![r("Red"), r("White")]),
            Err(FixtureError::UnknownChannel { channel, .. }) if channel == "White"
        ));
        assert!(matches!(
            mode.create_head("Head 1".into_valid(), vec![r("Red"), r("Red")]),
            Err(FixtureError::DuplicateChannel { .. })
        ));
        assert!(mode.heads().is_empty());

        mode.create_head("Head 1".into_valid(), vec![r("Blue"), r("Red")])
            .unwrap();
        assert_eq!(names(mode.heads()[0].channels()), ["Blue", "Red"]);
    }

    #[test]
    fn removing_a_channel_removes_it_from_heads() {
        let mut mode = rgb_mode();
        mode.create_head("A".into_valid(), vec![r("Red"), r("Green")])
            .unwrap();
        mode.create_head("B".into_valid(), vec![r("Green"), r("Blue")])
            .unwrap();
        mode.remove_channel(&"Green".into_valid()).unwrap();
        assert!(!mode.references(&"Green".into_valid()));
        assert_eq!(names(mode.heads()[0].channels()), ["Red"]);
        assert_eq!(names(mode.heads()[1].channels()), ["Blue"]);
        assert!(matches!(
            mode.remove_channel(&"Green".into_valid()),
            Err(FixtureError::UnknownChannel { .. })
        ));
    }

    #[test]
    fn edit_and_move_heads() {
        let mut mode = rgb_mode();
        mode.create_head("A".into_valid(), vec![r("Red")]).unwrap();
        mode.create_head("B".into_valid(), vec![r("Blue")]).unwrap();
        mode.set_head_channels(0, vec![r("Red"), r("Green")]).unwrap();
        assert!(matches!(
            mode.set_head_channels(5, vec![]),
            Err(FixtureError::Index(..))
        ));
        mode.reorder_heads(1, 0).unwrap();
        assert_eq!(mode.heads()[0].name, "B");
        assert_eq!(mode.remove_head(1).unwrap().name, "A");
        assert!(mode.remove_head(1).is_err());
    }

    #[test]
    fn rename_follows_into_heads() {
        let mut mode = rgb_mode();
        mode.create_head("A".into_valid(), vec![r("Red")]).unwrap();
        mode.rename_channel(&"Red".into_valid(), &"Rot".into_valid());
        assert_eq!(names(mode.channels()), ["Rot", "Green", "Blue"]);
        assert_eq!(names(mode.heads()[0].channels()), ["Rot"]);
    }
}
