use crate::{Capability, FixtureError, IndexError};

/// The capabilities of one channel, ordered by ascending `min`.
///
/// Capabilities added with [`CapabilitySet::insert`] never overlap. Bulk
/// construction with [`CapabilitySet::from_unchecked`] skips that check, run
/// [`CapabilitySet::validate`] afterwards. Gaps between capabilities are fine,
/// they are DMX values without a defined function.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct CapabilitySet(Vec<Capability>);

#[derive(thiserror::Error, Debug, PartialEq, Clone)]
#[error(
    "capability '{}' ({}..={}) overlaps '{}' ({}..={})",
    .rejected.label(), .rejected.min(), .rejected.max(),
    .with.label(), .with.min(), .with.max()
)]
pub struct OverlapError {
    /// the capability that could not be added
    pub rejected: Capability,
    /// the capability already present that it collides with
    pub with: Capability,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts the capabilities by `min` without checking them for overlaps.
    pub fn from_unchecked(mut capabilities: Vec<Capability>) -> Self {
        capabilities.sort_by_key(|c| c.min());
        Self(capabilities)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Capability> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Capability> {
        self.0.iter()
    }

    /// Checks whether `capability` could be inserted.
    pub fn check(&self, capability: &Capability) -> Result<(), OverlapError> {
        match self.0.iter().find(|c| c.overlaps(capability)) {
            Some(existing) => Err(OverlapError {
                rejected: capability.clone(),
                with: existing.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn insert(&mut self, capability: Capability) -> Result<(), OverlapError> {
        self.check(&capability)?;
        let pos = self.0.partition_point(|c| c.min() <= capability.min());
        self.0.insert(pos, capability);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Capability, IndexError> {
        IndexError::check(index, self.0.len())?;
        Ok(self.0.remove(index))
    }

    /// Replaces the capability at `index`, e.g. after its range was edited.
    ///
    /// The new capability only has to be free of overlaps with the other
    /// capabilities. Returns the replaced capability.
    pub fn replace(
        &mut self,
        index: usize,
        capability: Capability,
    ) -> Result<Capability, FixtureError> {
        IndexError::check(index, self.0.len())?;
        if let Some(existing) = self
            .0
            .iter()
            .enumerate()
            .find(|(i, c)| *i != index && c.overlaps(&capability))
            .map(|(_, c)| c)
        {
            return Err(OverlapError {
                rejected: capability,
                with: existing.clone(),
            }
            .into());
        }
        let old = self.0.remove(index);
        let pos = self.0.partition_point(|c| c.min() <= capability.min());
        self.0.insert(pos, capability);
        Ok(old)
    }

    /// Finds the capability containing `value`.
    pub fn find_by_value(&self, value: u8) -> Option<&Capability> {
        let after = self.0.partition_point(|c| c.min() <= value);
        after
            .checked_sub(1)
            .and_then(|i| self.0.get(i))
            .filter(|c| c.contains(value))
    }

    /// Checks all pairs of capabilities for overlaps.
    ///
    /// Of each overlapping pair, the one further back is reported as
    /// rejected.
    pub fn validate(&self) -> Vec<OverlapError> {
        let mut errors = Vec::new();
        for (i, a) in self.0.iter().enumerate() {
            for b in self.0.iter().skip(i + 1) {
                if a.overlaps(b) {
                    errors.push(OverlapError {
                        rejected: b.clone(),
                        with: a.clone(),
                    });
                }
            }
        }
        errors
    }

    /// Inserts all capabilities of `other` that fit and returns the errors of
    /// those that did not.
    pub fn merge(&mut self, other: CapabilitySet) -> Vec<OverlapError> {
        other
            .0
            .into_iter()
            .filter_map(|c| self.insert(c).err())
            .collect()
    }

    /// Number of DMX values covered by at least one capability.
    pub fn coverage(&self) -> u16 {
        let mut covered = 0;
        let mut next: u16 = 0; // first value not counted yet
        for c in self.0.iter() {
            let from = next.max(u16::from(c.min()));
            let to = u16::from(c.max());
            if to >= from {
                covered += to - from + 1;
                next = to + 1;
            }
        }
        covered
    }

    /// Whether every DMX value from 0 to 255 has a capability.
    pub fn is_complete(&self) -> bool {
        self.coverage() == 256
    }

    /// Ranges of DMX values without capability, as inclusive `(from, to)`.
    pub fn gaps(&self) -> Vec<(u8, u8)> {
        let mut gaps = Vec::new();
        let mut next: u16 = 0;
        for c in self.0.iter() {
            let min = u16::from(c.min());
            if min > next {
                gaps.push((next as u8, (min - 1) as u8));
            }
            next = next.max(u16::from(c.max()) + 1);
        }
        if next <= 255 {
            gaps.push((next as u8, 255));
        }
        gaps
    }
}

impl<'a> IntoIterator for &'a CapabilitySet {
    type Item = &'a Capability;
    type IntoIter = std::slice::Iter<'a, Capability>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
