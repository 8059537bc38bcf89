use std::str::FromStr;

use derive_more::{DebugCustom, Display};
use serde::Serialize;
use thiserror::Error;

/// Name of a channel, mode or head.
///
/// A Name is a UTF-8 String that can be written into an XML attribute and
/// shown on a single line. Disallowed are:
/// - U+0000..=U+001F (<control>)
/// - U+007F (<control>)
/// - U+FFFE, U+FFFF (noncharacters)
///
/// The empty Name is allowed, it is what a freshly created channel is called
/// until the user names it. Saving reports it, see
/// [`Fixture::validate_for_save`](crate::Fixture::validate_for_save).
#[derive(
    PartialOrd, PartialEq, Eq, Ord, Clone, Hash, Display, DebugCustom, Default, Serialize,
)]
pub struct Name(String);

impl TryFrom<&str> for Name {
    type Error = NameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut invalid_chars = String::new();

        let name = Self(
            value
                .chars()
                .map(|c| match c {
                    '\x00'..='\x1f' | '\x7f' | '\u{fffe}' | '\u{ffff}' => {
                        invalid_chars.push(c);
                        '□'
                    }
                    _ => c,
                })
                .collect::<String>(),
        );

        if invalid_chars.is_empty() {
            Ok(name)
        } else {
            Err(NameError {
                fixed: name,
                invalid_chars,
            })
        }
    }
}

impl TryFrom<String> for Name {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().try_into()
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.try_into()
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

pub(crate) trait IntoValidName {
    fn into_valid(self) -> Name;
}

impl IntoValidName for &str {
    /// Creates a Name from self, with invalid chars replaced by '□'
    fn into_valid(self) -> Name {
        self.try_into().unwrap_or_else(|e: NameError| e.fixed)
    }
}

impl IntoValidName for String {
    fn into_valid(self) -> Name {
        self.as_str().into_valid()
    }
}

impl Name {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Name given to an unnamed node, e.g. `Head 2` for the second `<Head>`
    ///
    /// `index` is 0-based.
    pub(crate) fn valid_default(tag: &str, index: usize) -> Name {
        format!("{tag} {}", index + 1).into_valid()
    }

    /// Name of a copy, e.g. `Copy of Pan` for `Pan`.
    pub(crate) fn copy_of(&self) -> Name {
        // prefixing can't introduce invalid chars
        Name(format!("Copy of {}", self.0))
    }
}

#[derive(Error, Debug)]
#[error("invalid name due to chars {invalid_chars:?}; replaced with '□'")]
pub struct NameError {
    /// Name where all invalid chars were replaced with '□'
    pub fixed: Name,
    pub invalid_chars: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        Name::from_str("Hello World").unwrap();
        Name::try_from("Pan/Tilt (fine) #1, 16-bit!").unwrap();
        Name::try_from("Hello World".to_string()).unwrap();

        assert!(matches!(
            Name::try_from("a\nb"),
            Err(NameError {
                fixed,
                invalid_chars,
            }) if fixed == "a□b" && invalid_chars == "\n"
        ));
        assert_eq!("a\tb".into_valid(), "a□b");

        assert_eq!("yay", format!("{}", Name::try_from("yay").unwrap()));
        assert_eq!("\"yay\"", format!("{:?}", Name::try_from("yay").unwrap()));
    }

    #[test]
    fn blank_names_are_empty() {
        assert!(Name::default().is_empty());
        assert!("   ".into_valid().is_empty());
        assert!(!"Dimmer".into_valid().is_empty());
    }

    #[test]
    fn default_names_count_from_one() {
        assert_eq!(Name::valid_default("Head", 0), "Head 1");
    }

    #[test]
    fn copy_of() {
        assert_eq!("Pan".into_valid().copy_of(), "Copy of Pan");
    }
}
