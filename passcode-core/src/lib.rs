//! # Passcode Core
//!
//! Core component of **Passcode** that is shared between all other components and serves as
//! building block. It describes the values a one-time passcode is derived from: the
//! [`Credential`] with its [`SharedSecret`], hash [`Algorithm`], amount of [`Digits`] and the
//! method specific parameters in [`Otp`]. Nothing in here is persisted; storage layers hand these
//! values in per call, optionally in the loose [`CredentialRecord`] form.

#![deny(rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::{
    fmt::{self, Display},
    str::FromStr,
};

pub use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

pub use self::{
    config::{Config, ConfigError},
    secret::SharedSecret,
};

mod config;
pub mod de;
mod secret;

/// Errors that can occur when turning loosely typed input into the typed values of this crate.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The name doesn't match any of the supported HMAC hash functions.
    #[error("algorithm `{0}` is not supported, only `sha1`, `sha256` or `sha512`")]
    UnsupportedAlgorithm(String),
    /// The name doesn't match any of the supported OTP methods.
    #[error("method `{0}` is not supported, only `hotp` or `totp`")]
    UnsupportedMethod(String),
    /// A secret given in text form wasn't valid Base32.
    #[error("secret is not valid Base32")]
    InvalidBase32(#[source] data_encoding::DecodeError),
}

/// Hash function used in the HMAC step of the OTP generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// SHA-1 algorithm, most common and the only one RFC 4226 describes.
    #[default]
    Sha1,
    /// SHA(2)-256 algorithm.
    Sha256,
    /// SHA(2)-512 algorithm.
    Sha512,
}

impl Algorithm {
    /// Length in bytes of the HMAC produced with this hash function.
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();

        Ok(if name.eq_ignore_ascii_case("sha1") || name.eq_ignore_ascii_case("sha-1") {
            Self::Sha1
        } else if name.eq_ignore_ascii_case("sha256") || name.eq_ignore_ascii_case("sha-256") {
            Self::Sha256
        } else if name.eq_ignore_ascii_case("sha512") || name.eq_ignore_ascii_case("sha-512") {
            Self::Sha512
        } else {
            return Err(ParseError::UnsupportedAlgorithm(s.to_owned()));
        })
    }
}

/// The two OTP flavors, deciding how the moving factor (counter) is found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Counter based, RFC 4226.
    Hotp,
    /// Time based, RFC 6238.
    Totp,
}

impl Method {
    /// Amount of digits used when none or an out-of-range count was configured.
    #[must_use]
    pub const fn default_digits(self) -> Digits {
        match self {
            Self::Hotp => Digits::EIGHT,
            Self::Totp => Digits::SIX,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hotp => "hotp",
            Self::Totp => "totp",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();

        Ok(if name.eq_ignore_ascii_case("hotp") {
            Self::Hotp
        } else if name.eq_ignore_ascii_case("totp") {
            Self::Totp
        } else {
            return Err(ParseError::UnsupportedMethod(s.to_owned()));
        })
    }
}

/// Amount of decimal digits of a generated code, always within `6..=8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digits(u8);

impl Digits {
    /// Smallest allowed digit count. RFC 4226 demands at least 6.
    pub const MIN: u8 = 6;
    /// Largest allowed digit count.
    pub const MAX: u8 = 8;

    pub const SIX: Self = Self(6);
    pub const SEVEN: Self = Self(7);
    pub const EIGHT: Self = Self(8);

    /// Create a digit count, or `None` if the value is outside of [`Self::MIN`]..=[`Self::MAX`].
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN && value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Pick the requested digit count if it's in range, or fall back to the default of the
    /// `method` otherwise. Returns whether the fallback was taken alongside the result.
    #[must_use]
    pub fn for_method(method: Method, requested: Option<u8>) -> (Self, bool) {
        match requested.and_then(Self::new) {
            Some(digits) => (digits, false),
            None => (method.default_digits(), requested.is_some()),
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The `10^digits` that the truncated HMAC value is reduced by.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn modulus(self) -> u32 {
        10_u32.pow(self.0 as u32)
    }
}

impl Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Method specific parameters that decide the moving factor of an OTP.
///
/// All fields are optional as they come from external storage that may lack them. Missing values
/// are reported as errors by the generator instead of being defaulted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Otp {
    /// Counter based, using a counter as base of the OTP generation.
    ///
    /// The counter must be kept in sync between client and server. Advancing it after a
    /// successful validation is up to the owner of the stored credential.
    Hotp {
        /// The current counter value. Zero is rejected.
        counter: Option<u64>,
    },
    /// Time based, deriving the counter from the elapsed time steps since `initial`.
    Totp {
        /// Length of a single time step in seconds.
        period: Option<u64>,
        /// Unix timestamp in seconds that time steps are counted from (the `T0`).
        initial: Option<u64>,
    },
}

impl Otp {
    #[must_use]
    pub const fn method(&self) -> Method {
        match self {
            Self::Hotp { .. } => Method::Hotp,
            Self::Totp { .. } => Method::Totp,
        }
    }
}

/// Everything needed to derive or validate a one-time passcode for a single identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Credential {
    /// The shared key, serialized as Base32.
    pub secret: SharedSecret,
    /// Hash function used for the HMAC.
    #[serde(default, with = "de::lenient_name")]
    pub algorithm: Algorithm,
    /// Requested amount of digits. Out-of-range or missing values fall back to the method default,
    /// see [`Digits::for_method`].
    #[serde(default)]
    pub digits: Option<u8>,
    /// Method and its parameters.
    #[serde(flatten)]
    pub otp: Otp,
}

impl Credential {
    /// Counter based credential with SHA-1 and the default digit count.
    #[must_use]
    pub fn hotp(secret: impl Into<SharedSecret>, counter: u64) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::default(),
            digits: None,
            otp: Otp::Hotp {
                counter: Some(counter),
            },
        }
    }

    /// Time based credential with SHA-1 and the default digit count.
    #[must_use]
    pub fn totp(secret: impl Into<SharedSecret>, period: u64, initial: u64) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::default(),
            digits: None,
            otp: Otp::Totp {
                period: Some(period),
                initial: Some(initial),
            },
        }
    }

    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn with_digits(mut self, digits: u8) -> Self {
        self.digits = Some(digits);
        self
    }

    #[must_use]
    pub const fn method(&self) -> Method {
        self.otp.method()
    }
}

/// A credential the way a storage layer reads it back: every field loosely typed and possibly
/// missing. The generator's `check` turns it into a [`Credential`], reporting the first problem in
/// a fixed order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialRecord {
    pub secret: Option<SharedSecret>,
    pub method: String,
    /// Hash function name, SHA-1 if absent.
    pub algorithm: Option<String>,
    pub digits: Option<u8>,
    pub counter: Option<u64>,
    pub period: Option<u64>,
    pub initial: Option<u64>,
}
