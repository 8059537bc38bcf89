use xxhash_rust::xxh3::xxh3_128;

use std::io::{self, Read};

use crate::{low_level::FixtureDefinition, Fixture, SerializationError};

/// Hash the content of a fixture definition file.
pub fn hash_definition(definition: &[u8]) -> u128 {
    xxh3_128(definition)
}

/// Hash a fixture definition file. Returns a hex string representation of
/// the hash.
pub fn hash_definition_to_string<T: Read>(mut file: T) -> Result<String, io::Error> {
    let mut definition = Vec::new();
    file.read_to_end(&mut definition)?;
    Ok(format!("{:x}", hash_definition(&definition)))
}

impl Fixture {
    /// Hash of the definition this fixture would be saved as.
    ///
    /// Also works for fixtures that can't be saved yet, so an editor can
    /// compare it with the fingerprint taken after loading to detect unsaved
    /// modifications.
    pub fn fingerprint(&self) -> Result<u128, SerializationError> {
        let description = FixtureDefinition::from(self).serialize_description()?;
        Ok(hash_definition(description.as_bytes()))
    }
}
