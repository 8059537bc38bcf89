use std::{num::ParseIntError, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};

/// sRGB colour of a colour wheel slot or a colour mixing preset.
///
/// Written as `#rrggbb` in lowercase. Reading is case-insensitive and
/// requires the leading `#` and exactly six hex digits.
#[derive(
    Debug,
    SerializeDisplay,
    DeserializeFromStr,
    Default,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Hash,
    derive_more::Display,
)]
#[display(fmt = "#{:02x}{:02x}{:02x}", r, g, b)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = RgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').ok_or(RgbError::MissingHash)?;
        if hex.len() != 6 || !hex.is_ascii() {
            Err(RgbError::InvalidLength(hex.chars().count()))?
        }
        let channel = |i: usize| -> Result<u8, RgbError> {
            let digits = hex.get(i..i + 2).ok_or(RgbError::InvalidLength(hex.len()))?;
            Ok(u8::from_str_radix(digits, 16)?)
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RgbError {
    #[error("colour must start with '#'")]
    MissingHash,
    #[error("expected 6 hex digits after '#', got {0}")]
    InvalidLength(usize),
    #[error("invalid hex digit: {0}")]
    ParseIntError(#[from] ParseIntError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsing() -> Result<(), RgbError> {
        assert_eq!("#ff0000".parse::<Rgb>()?, Rgb::new(255, 0, 0));
        assert_eq!("#00FF7f".parse::<Rgb>()?, Rgb::new(0, 255, 127));
        assert_eq!("#000000".parse::<Rgb>()?, Rgb::default());

        assert!(matches!("ff0000".parse::<Rgb>(), Err(RgbError::MissingHash)));
        assert!(matches!(
            "#fff".parse::<Rgb>(),
            Err(RgbError::InvalidLength(3))
        ));
        assert!(matches!(
            "#gg0000".parse::<Rgb>(),
            Err(RgbError::ParseIntError(..))
        ));
        assert!("#ffäff".parse::<Rgb>().is_err());
        Ok(())
    }

    #[test]
    fn display_is_lowercase_hex() {
        assert_eq!(Rgb::new(255, 16, 1).to_string(), "#ff1001");
        assert_eq!(Rgb::from([0, 0, 0xab]).to_string(), "#0000ab");
    }
}
