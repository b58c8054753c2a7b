//! Tag color type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`HexColor`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The input does not start with `#`.
    #[error("color must start with '#'")]
    MissingHash,
    /// The input is not `#` followed by six hex digits.
    #[error("color must be '#' followed by 6 hexadecimal digits")]
    InvalidFormat,
}

/// A `#RRGGBB` color code used to label tags.
///
/// Stored upper-cased so that `#ff0000` and `#FF0000` collide on the
/// unique constraint.
///
/// ```
/// use foodgram_core::HexColor;
///
/// assert_eq!(HexColor::parse("#e26c2d").unwrap().as_str(), "#E26C2D");
/// assert!(HexColor::parse("red").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse a color code.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError`] if the input is not `#` plus six hex digits.
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        let digits = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidFormat);
        }
        Ok(Self(format!("#{}", digits.to_ascii_uppercase())))
    }

    /// Returns the color code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self("#FF0000".to_owned())
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for HexColor {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for HexColor {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for HexColor {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalises_case() {
        assert_eq!(HexColor::parse("#49b64e").map(String::from), Ok("#49B64E".to_owned()));
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(HexColor::parse("49B64E"), Err(ColorError::MissingHash));
        assert_eq!(HexColor::parse("#49B64"), Err(ColorError::InvalidFormat));
        assert_eq!(HexColor::parse("#49B64G"), Err(ColorError::InvalidFormat));
    }

    #[test]
    fn test_default_is_red() {
        assert_eq!(HexColor::default().as_str(), "#FF0000");
    }
}
