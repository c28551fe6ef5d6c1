//! Custom (de-)serialization implementations for [`serde`].

/// Decode Base32 the lenient way users tend to paste it: surrounding whitespace, lowercase letters
/// and trailing `=` padding are accepted.
pub(crate) fn decode_base32(value: &str) -> Result<Vec<u8>, data_encoding::DecodeError> {
    let normalized = value.trim().to_ascii_uppercase();
    data_encoding::BASE32_NOPAD.decode(normalized.trim_end_matches('=').as_bytes())
}

pub mod base32_string {
    //! (De-)serialization support for raw byte data as Base32 string.

    use std::fmt;

    use serde::{
        de::{self, Deserializer, Visitor},
        ser::Serializer,
    };

    /// Serialize a byte slice as Base32 string.
    pub fn serialize<S>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&data_encoding::BASE32_NOPAD.encode(value))
    }

    /// Deserialize a Base32 string back into a byte slice.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(Base32StringVisitor)
    }

    struct Base32StringVisitor;

    impl<'de> Visitor<'de> for Base32StringVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("bytes encoded as Base32 string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            super::decode_base32(v).map_err(|e| de::Error::custom(format!("invalid Base32: {e}")))
        }
    }
}

pub mod lenient_name {
    //! Deserialization of enums like [`Algorithm`](crate::Algorithm) from the loose spellings that
    //! show up in stored records (`sha1`, `SHA-1`, `Sha1`, ...), backed by their [`FromStr`]
    //! implementation.
    //!
    //! [`FromStr`]: std::str::FromStr

    use std::{fmt::Display, str::FromStr};

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
