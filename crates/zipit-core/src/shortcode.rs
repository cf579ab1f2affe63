use crate::base62;
use crate::error::{DecodeError, ShortCodeError};
use crate::repository::RecordId;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// A validated short code identifying a shortened URL.
///
/// Short codes are 1-12 characters long and contain only characters of the
/// base62 alphabet `[0-9a-zA-Z]`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ShortCode(SmolStr);

/// Upper bound on accepted input; `u64` identifiers need at most 11 digits.
pub const MAX_LENGTH: usize = 12;

impl ShortCode {
    /// Creates the short code for a record identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipit_core::{RecordId, ShortCode};
    ///
    /// let code = ShortCode::from_id(RecordId::new(12345));
    /// assert_eq!(code.as_str(), "3d7");
    /// ```
    pub fn from_id(id: RecordId) -> Self {
        Self(SmolStr::new(base62::encode(id.get())))
    }

    /// Parses and validates a short code received from outside the process.
    ///
    /// Only the alphabet and the length are checked. A code that passes may
    /// still name no record, or decode past `u64::MAX`; both simply resolve
    /// to nothing.
    pub fn parse(code: impl AsRef<str>) -> Result<Self, ShortCodeError> {
        let code = code.as_ref();
        Self::validate(code)?;
        Ok(Self(SmolStr::new(code)))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes read back from trusted storage.
    pub fn new_unchecked(code: impl AsRef<str>) -> Self {
        Self(SmolStr::new(code.as_ref()))
    }

    /// Returns the identifier this code was derived from.
    ///
    /// Fails with [`DecodeError::Overflow`] for well-formed codes that no
    /// identifier encodes to.
    pub fn decode(&self) -> Result<RecordId, ShortCodeError> {
        Ok(RecordId::new(base62::decode(&self.0)?))
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), ShortCodeError> {
        if code.is_empty() {
            return Err(ShortCodeError::Empty);
        }

        if code.len() > MAX_LENGTH {
            return Err(ShortCodeError::TooLong {
                len: code.len(),
                max: MAX_LENGTH,
            });
        }

        match code.chars().enumerate().find(|(_, c)| !base62::is_digit(*c)) {
            Some((position, character)) => Err(DecodeError::InvalidCharacter {
                character,
                position,
            }
            .into()),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCode").field(&self.0).finish()
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for ShortCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ShortCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = SmolStr::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        assert!(ShortCode::parse("0").is_ok());
        assert!(ShortCode::parse("abcXYZ019").is_ok());
        assert!(ShortCode::parse("doesnotexist").is_ok());
    }

    #[test]
    fn empty() {
        assert_eq!(ShortCode::parse(""), Err(ShortCodeError::Empty));
    }

    #[test]
    fn too_long() {
        assert_eq!(
            ShortCode::parse("a".repeat(13)),
            Err(ShortCodeError::TooLong { len: 13, max: 12 })
        );
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortCode::parse("abc def").is_err());
        assert!(ShortCode::parse("abc/def").is_err());
        assert!(ShortCode::parse("abc-def").is_err());
        assert!(ShortCode::parse("abc_def").is_err());
    }

    #[test]
    fn invalid_character_position() {
        assert_eq!(
            ShortCode::parse("ab.c"),
            Err(ShortCodeError::Decode(DecodeError::InvalidCharacter {
                character: '.',
                position: 2,
            }))
        );
    }

    #[test]
    fn well_formed_code_past_u64_parses_but_does_not_decode() {
        let code = ShortCode::parse("ZZZZZZZZZZZZ").unwrap();
        assert_eq!(code.decode(), Err(ShortCodeError::Decode(DecodeError::Overflow)));
        // Zero padding keeps a 12-character code in range.
        assert_eq!(
            ShortCode::parse("00000000000a").unwrap().decode(),
            Ok(RecordId::new(10))
        );
    }

    #[test]
    fn from_id_round_trips() {
        for id in [0, 1, 61, 62, 999_999, u64::MAX] {
            let code = ShortCode::from_id(RecordId::new(id));
            assert_eq!(code.decode().unwrap(), RecordId::new(id));
            assert_eq!(ShortCode::parse(code.as_str()).unwrap(), code);
        }
    }

    #[test]
    fn display() {
        let code = ShortCode::parse("my0code").unwrap();
        assert_eq!(code.to_string(), "my0code");
    }

    #[test]
    fn to_url() {
        let code = ShortCode::parse("abc123").unwrap();
        assert_eq!(code.to_url("https://zip.it"), "https://zip.it/abc123");
        assert_eq!(code.to_url("https://zip.it/"), "https://zip.it/abc123");
    }

    #[test]
    fn deserialize_validates() {
        let code = from_str("abc").unwrap();
        assert_eq!(code.as_str(), "abc");
        assert!(from_str("a-b").is_err());
    }

    fn from_str(raw: &str) -> Result<ShortCode, serde::de::value::Error> {
        use serde::de::IntoDeserializer;
        ShortCode::deserialize(raw.to_string().into_deserializer())
    }
}
