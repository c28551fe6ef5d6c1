use std::fmt;

use secrecy::{ExposeSecret, Zeroize};
use serde::{Deserialize, Serialize};

use crate::ParseError;

/// Raw shared key of a credential, the `K` of RFC 4226.
///
/// The content is wiped from memory when dropped and never shows up in debug output. Access to the
/// bytes goes through [`ExposeSecret`] so every read of the key is explicit at the call site.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedSecret(#[serde(with = "crate::de::base32_string")] Vec<u8>);

impl SharedSecret {
    #[must_use]
    pub fn new(content: Vec<u8>) -> Self {
        Self(content)
    }

    /// Decode a secret from its unpadded Base32 form, the way authenticator apps and `otpauth`
    /// URLs exchange them. Surrounding whitespace and lowercase letters are tolerated.
    pub fn from_base32(value: &str) -> Result<Self, ParseError> {
        crate::de::decode_base32(value)
            .map(Self)
            .map_err(ParseError::InvalidBase32)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&[u8]> for SharedSecret {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl From<Vec<u8>> for SharedSecret {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret([REDACTED; {}])", self.0.len())
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Zeroize for SharedSecret {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl ExposeSecret<Vec<u8>> for SharedSecret {
    fn expose_secret(&self) -> &Vec<u8> {
        &self.0
    }
}
