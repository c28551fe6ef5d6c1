//! # Passcode Gen(erator)
//!
//! Generator component of **Passcode**. It turns a [`Credential`] from [`passcode_core`] into the
//! current one-time passcode and validates submitted codes, following RFC 4226 (HOTP) and RFC 6238
//! (TOTP).
//!
//! The pipeline is the same for both methods:
//!
//! 1. [`counter()`] resolves the moving factor and checks it against the configured [`Bounds`].
//! 2. [`digest`] computes the HMAC over the 8-byte counter through an injected [`Hasher`].
//! 3. [`extract_code`] reduces the digest to a [`Code`] of 6 to 8 decimal digits.
//!
//! Every function is pure apart from reading the system clock for TOTP when no explicit `now` is
//! given. Secrets are never logged.

#![deny(rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

use std::time::SystemTimeError;

use hmac::digest::InvalidLength;
use passcode_core::{ExposeSecret, ParseError};
pub use passcode_core::{
    Algorithm, Config, Credential, CredentialRecord, Digits, Method, Otp, SharedSecret,
};
use tracing::{debug, warn};

pub use self::{
    check::check,
    counter::{counter, resolve_counter, seconds_remaining, validate_counter, Bounds},
    mac::{digest, Hasher, HmacSha},
    truncate::{extract_code, Code},
    verify::{validate, Verdict},
};

mod check;
mod counter;
mod mac;
mod truncate;
mod verify;

/// Errors that can occur when generating or validating an OTP.
///
/// Each variant is a deterministic input problem, retrying with the same input fails the same way.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The secret is missing or empty.
    #[error("a secret is required")]
    MissingSecret,
    /// The named hash function is not supported.
    #[error("algorithm `{0}` is not supported")]
    UnsupportedAlgorithm(String),
    /// The named OTP method is not supported.
    #[error("method `{0}` is not supported")]
    UnsupportedMethod(String),
    /// A parameter that the method needs to resolve its counter is missing.
    #[error("the parameter `{0}` is required")]
    MissingRequiredParameter(&'static str),
    /// The counter resolved to zero, which is never accepted.
    #[error("the counter is invalid")]
    InvalidCounter,
    /// The counter resolved to a negative value, for example a TOTP clock before its `initial`.
    #[error("the counter must be positive, but is {0}")]
    CounterMustBePositive(i128),
    /// The counter is higher than the configured maximum.
    #[error("the counter must be at most {limit}, but is {actual}")]
    CounterOutOfBounds {
        /// Configured maximum.
        limit: u64,
        /// Resolved counter.
        actual: u64,
    },
    /// Failed to get a timestamp from the system.
    #[error("failed to get time since unix epoch")]
    Time(#[from] SystemTimeError),
    /// The HMAC implementation rejected the key.
    #[error("the given key has an invalid length")]
    KeyLength(#[from] InvalidLength),
    /// A digest didn't have the length its algorithm or the truncation needs.
    #[error("expected a digest of {expected} bytes, but got {actual}")]
    DigestLength {
        /// Needed length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },
    /// A secret given in text form couldn't be decoded.
    #[error("the secret is malformed")]
    InvalidSecret(#[source] ParseError),
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::UnsupportedAlgorithm(name) => Self::UnsupportedAlgorithm(name),
            ParseError::UnsupportedMethod(name) => Self::UnsupportedMethod(name),
            e @ ParseError::InvalidBase32(_) => Self::InvalidSecret(e),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Create the code for `credential`, with `now` as current unix time in seconds for TOTP or the
/// system clock if `None`.
///
/// Checks run in a fixed order and the first failing one is returned: secret present, method
/// parameters present, counter not zero, counter not negative, counter within `bounds`. Nothing is
/// hashed before all checks passed.
pub fn generate<H: Hasher + ?Sized>(
    hasher: &H,
    credential: &Credential,
    bounds: Bounds,
    now: Option<u64>,
) -> Result<Code> {
    check_secret(credential)?;

    let counter = counter::counter(&credential.otp, bounds, now)?;
    let digits = resolve_digits(credential);

    hotp(
        hasher,
        credential.secret.expose_secret(),
        counter,
        credential.algorithm,
        digits,
    )
}

/// Plain RFC 4226 HOTP value for `counter`, without any of the counter checks of [`generate`].
pub fn hotp<H: Hasher + ?Sized>(
    hasher: &H,
    secret: &[u8],
    counter: u64,
    algorithm: Algorithm,
    digits: Digits,
) -> Result<Code> {
    let digest = digest(hasher, secret, counter, algorithm)?;
    extract_code(&digest, digits)
}

fn check_secret(credential: &Credential) -> Result<()> {
    if credential.secret.is_empty() {
        debug!(method = %credential.method(), "rejected credential without secret");
        return Err(Error::MissingSecret);
    }

    Ok(())
}

fn resolve_digits(credential: &Credential) -> Digits {
    let (digits, fallback) = Digits::for_method(credential.method(), credential.digits);

    if fallback {
        warn!(
            method = %credential.method(),
            requested = ?credential.digits,
            used = digits.get(),
            "digit count out of range, using the method default"
        );
    }

    digits
}

#[cfg(test)]
mod tests {
    use passcode_core::{Algorithm, Credential, Digits};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::{generate, hotp, Bounds, Error, HmacSha};

    const SECRET: &[u8] = b"12345678901234567890";
    const SECRET_SHA256: &[u8] = b"12345678901234567890123456789012";
    const SECRET_SHA512: &[u8] =
        b"1234567890123456789012345678901234567890123456789012345678901234";

    // Reference values from RFC 4226, appendix D.
    #[test]
    fn rfc4226() {
        let expected = [
            755_224, 287_082, 359_152, 969_429, 338_314, 254_676, 287_922, 162_583, 399_871,
            520_489,
        ];

        for (counter, expected) in (0..).zip(expected) {
            let code = hotp(&HmacSha, SECRET, counter, Algorithm::Sha1, Digits::SIX).unwrap();
            assert_eq!(expected, code.value(), "counter {counter}");
        }
    }

    // Reference values from RFC 6238, appendix B.
    #[test]
    fn rfc6238() {
        let cases = [
            (59, "94287082", "46119246", "90693936"),
            (1_111_111_109, "07081804", "68084774", "25091201"),
            (1_111_111_111, "14050471", "67062674", "99943326"),
            (1_234_567_890, "89005924", "91819424", "93441116"),
            (2_000_000_000, "69279037", "90698825", "38618901"),
            (20_000_000_000, "65353130", "77737706", "47863826"),
        ];

        for (time, sha1, sha256, sha512) in cases {
            for (secret, algorithm, expected) in [
                (SECRET, Algorithm::Sha1, sha1),
                (SECRET_SHA256, Algorithm::Sha256, sha256),
                (SECRET_SHA512, Algorithm::Sha512, sha512),
            ] {
                let credential = Credential::totp(secret, 30, 0)
                    .with_algorithm(algorithm)
                    .with_digits(8);
                let code = generate(&HmacSha, &credential, Bounds::default(), Some(time)).unwrap();
                assert_eq!(expected, code.to_string(), "{algorithm} at {time}");
            }
        }
    }

    #[test]
    fn hotp_generation() {
        let credential = Credential::hotp(SECRET, 1).with_digits(6);
        let code = generate(&HmacSha, &credential, Bounds::default(), None).unwrap();
        assert_eq!("287082", code.to_string());
    }

    #[test]
    fn hotp_defaults_to_eight_digits() {
        let credential = Credential::hotp(SECRET, 1);
        let code = generate(&HmacSha, &credential, Bounds::default(), None).unwrap();
        assert_eq!(Digits::EIGHT, code.digits());
        assert_eq!(8, code.to_string().len());
    }

    #[test]
    fn totp_out_of_range_digits_fall_back_to_six() {
        let credential = Credential::totp(SECRET, 30, 0).with_digits(10);
        let code = generate(&HmacSha, &credential, Bounds::default(), Some(59)).unwrap();
        assert_eq!("287082", code.to_string());
    }

    #[test]
    fn missing_secret_wins() {
        let credential = Credential::hotp(Vec::<u8>::new(), 0);
        assert!(matches!(
            generate(&HmacSha, &credential, Bounds::default(), None),
            Err(Error::MissingSecret)
        ));

        let mut credential = Credential::totp(Vec::<u8>::new(), 30, 0);
        credential.otp = passcode_core::Otp::Totp {
            period: None,
            initial: None,
        };
        assert!(matches!(
            generate(&HmacSha, &credential, Bounds::default(), None),
            Err(Error::MissingSecret)
        ));
    }

    #[test]
    fn counter_limits() {
        let bounds = Bounds { max_counter: 10 };

        let credential = Credential::hotp(SECRET, 10);
        assert!(generate(&HmacSha, &credential, bounds, None).is_ok());

        let credential = Credential::hotp(SECRET, 11);
        assert!(matches!(
            generate(&HmacSha, &credential, bounds, None),
            Err(Error::CounterOutOfBounds {
                limit: 10,
                actual: 11
            })
        ));

        let credential = Credential::hotp(SECRET, 0);
        assert!(matches!(
            generate(&HmacSha, &credential, bounds, None),
            Err(Error::InvalidCounter)
        ));

        let credential = Credential::totp(SECRET, 30, 0);
        assert!(matches!(
            generate(&HmacSha, &credential, bounds, Some(29)),
            Err(Error::InvalidCounter)
        ));
    }

    fn algorithm() -> impl Strategy<Value = Algorithm> {
        prop_oneof![
            Just(Algorithm::Sha1),
            Just(Algorithm::Sha256),
            Just(Algorithm::Sha512),
        ]
    }

    proptest! {
        #[test]
        fn code_length_matches_digits(
            secret in proptest::collection::vec(any::<u8>(), 1..64),
            counter in any::<u64>(),
            digits in 6_u8..=8,
            algorithm in algorithm(),
        ) {
            let digits = Digits::new(digits).unwrap();
            let code = hotp(&HmacSha, &secret, counter, algorithm, digits).unwrap();
            prop_assert_eq!(usize::from(digits.get()), code.to_string().len());
            prop_assert!(code.value() < digits.modulus());
        }

        #[test]
        fn generation_is_deterministic(
            secret in proptest::collection::vec(any::<u8>(), 1..64),
            counter in 1_u64..=30,
            algorithm in algorithm(),
        ) {
            let credential = Credential::hotp(secret, counter).with_algorithm(algorithm);
            let first = generate(&HmacSha, &credential, Bounds::default(), None).unwrap();
            let second = generate(&HmacSha, &credential, Bounds::default(), None).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
