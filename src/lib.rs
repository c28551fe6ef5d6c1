//! # Passcode
//!
//! One-time passcodes (HOTP and TOTP) for services that keep their credentials elsewhere. Storage,
//! encryption at rest and user facing messages stay with the caller; this crate receives a
//! [`Credential`] per call and hands back a [`Code`] or a [`Verdict`].
//!
//! [`Authenticator`] binds a validated [`Config`] and a [`Hasher`] together, which is what most
//! callers want. The building blocks are available in [`passcode_gen`] for anything else.
//!
//! ```
//! use passcode::{Authenticator, Config, Credential};
//!
//! let auth = Authenticator::new(Config::default())?;
//! let credential = Credential::totp(b"12345678901234567890".as_slice(), 30, 0).with_digits(8);
//!
//! let code = auth.generate_at(&credential, 59)?;
//! assert_eq!("94287082", code.to_string());
//!
//! let verdict = auth.verify_at(&credential, "94287082", 89)?;
//! assert_eq!(Some(-1), verdict.matched_offset);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

#![deny(rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub use passcode_core::{
    Algorithm, Config, ConfigError, Credential, CredentialRecord, Digits, Method, Otp,
    SharedSecret,
};
pub use passcode_gen::{Bounds, Code, Error, Hasher, HmacSha, Result, Verdict};
use tracing::instrument;

/// Generates and validates codes under one [`Config`].
#[derive(Clone, Debug)]
pub struct Authenticator<H = HmacSha> {
    config: Config,
    hasher: H,
}

impl Authenticator {
    /// Create an authenticator that computes HMACs with [`HmacSha`].
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::with_hasher(config, HmacSha)
    }
}

impl Default for Authenticator {
    fn default() -> Self {
        Self {
            config: Config::default(),
            hasher: HmacSha,
        }
    }
}

impl<H: Hasher> Authenticator<H> {
    /// Create an authenticator that computes HMACs with the given `hasher`.
    pub fn with_hasher(config: Config, hasher: H) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, hasher })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The current code for `credential`, taking the time from the system clock for TOTP.
    #[instrument(skip_all, fields(method = %credential.method()))]
    pub fn generate(&self, credential: &Credential) -> Result<Code> {
        passcode_gen::generate(&self.hasher, credential, self.bounds(), None)
    }

    /// The code for `credential` at `now`, given as unix timestamp in seconds.
    #[instrument(skip_all, fields(method = %credential.method()))]
    pub fn generate_at(&self, credential: &Credential, now: u64) -> Result<Code> {
        passcode_gen::generate(&self.hasher, credential, self.bounds(), Some(now))
    }

    /// Check a stored record and create its current code.
    #[instrument(skip_all, fields(method = %record.method))]
    pub fn generate_record(&self, record: CredentialRecord) -> Result<Code> {
        let credential = passcode_gen::check(record)?;
        passcode_gen::generate(&self.hasher, &credential, self.bounds(), None)
    }

    /// Validate `submitted` within the configured window, taking the time from the system clock
    /// for TOTP.
    ///
    /// On an accepted HOTP code, the caller must store [`Verdict::next_counter`] as new counter.
    #[instrument(skip_all, fields(method = %credential.method()))]
    pub fn verify(&self, credential: &Credential, submitted: &str) -> Result<Verdict> {
        self.verify_inner(credential, submitted, None)
    }

    /// Validate `submitted` within the configured window at `now`, given as unix timestamp in
    /// seconds.
    #[instrument(skip_all, fields(method = %credential.method()))]
    pub fn verify_at(
        &self,
        credential: &Credential,
        submitted: &str,
        now: u64,
    ) -> Result<Verdict> {
        self.verify_inner(credential, submitted, Some(now))
    }

    fn verify_inner(
        &self,
        credential: &Credential,
        submitted: &str,
        now: Option<u64>,
    ) -> Result<Verdict> {
        passcode_gen::validate(
            &self.hasher,
            credential,
            submitted,
            self.config.window,
            self.bounds(),
            now,
        )
    }

    fn bounds(&self) -> Bounds {
        Bounds::from(&self.config)
    }
}
