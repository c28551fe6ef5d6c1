//! The keyed-hash step of RFC 4226, `HS = HMAC(K, C)`.

use hmac::{digest::KeyInit, Hmac, Mac};
use passcode_core::Algorithm;
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::{Error, Result};

/// Capability to compute an HMAC with any of the supported hash functions.
///
/// The generator never reaches for a global crypto provider. Whoever calls it decides what computes
/// the HMAC, which is usually [`HmacSha`] but may be a hardware token or a recording fake in tests.
pub trait Hasher {
    /// Compute the HMAC over `message` keyed with `key`, using the hash function of `algorithm`.
    fn mac(&self, algorithm: Algorithm, key: &[u8], message: &[u8]) -> Result<Vec<u8>>;
}

impl<H: Hasher + ?Sized> Hasher for &H {
    fn mac(&self, algorithm: Algorithm, key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
        (**self).mac(algorithm, key, message)
    }
}

/// Default [`Hasher`] based on the `hmac`, `sha1` and `sha2` crates.
#[derive(Clone, Copy, Debug, Default)]
pub struct HmacSha;

impl Hasher for HmacSha {
    fn mac(&self, algorithm: Algorithm, key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
        match algorithm {
            Algorithm::Sha1 => mac::<Hmac<Sha1>>(key, message),
            Algorithm::Sha256 => mac::<Hmac<Sha256>>(key, message),
            Algorithm::Sha512 => mac::<Hmac<Sha512>>(key, message),
        }
    }
}

fn mac<M: Mac + KeyInit>(key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <M as KeyInit>::new_from_slice(key)?;
    mac.update(message);

    Ok(mac.finalize().into_bytes().to_vec())
}

/// Compute the raw HMAC digest for the given `counter`, encoded as 8-byte big-endian value.
///
/// The digest is 20, 32 or 64 bytes long, depending on the `algorithm`. A [`Hasher`] returning
/// anything else is reported as [`Error::DigestLength`].
pub fn digest<H: Hasher + ?Sized>(
    hasher: &H,
    secret: &[u8],
    counter: u64,
    algorithm: Algorithm,
) -> Result<Vec<u8>> {
    if secret.is_empty() {
        return Err(Error::MissingSecret);
    }

    let digest = hasher.mac(algorithm, secret, &counter.to_be_bytes())?;

    if digest.len() != algorithm.digest_len() {
        return Err(Error::DigestLength {
            expected: algorithm.digest_len(),
            actual: digest.len(),
        });
    }

    Ok(digest)
}
