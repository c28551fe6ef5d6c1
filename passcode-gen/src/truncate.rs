//! Dynamic truncation of RFC 4226 §5.3, turning a digest into a decimal code.

use std::fmt::{self, Display};

use passcode_core::Digits;

use crate::{Error, Result};

/// Shortest digest that dynamic truncation can work on. The offset taken from the last byte can
/// point up to index 15, from where 4 bytes are read.
const MIN_DIGEST_LEN: usize = 20;

/// A generated OTP code that can be used to verify identity against a service.
///
/// The numeric value may have fewer digits than requested, in which case it is shifted with
/// leading zeroes in the final representation. Call `to_string()` on an instance to get it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Code {
    value: u32,
    digits: Digits,
}

impl Code {
    /// Numeric value of the code, always below `10^digits`.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    #[must_use]
    pub const fn digits(&self) -> Digits {
        self.digits
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:01$}", self.value, usize::from(self.digits.get()))
    }
}

/// Reduce `digest` to a code of `digits` decimal digits.
///
/// The last 4 bits of the digest select an offset, the 4 bytes from there are read as big-endian
/// number with the most significant bit cleared, and the result is taken modulo `10^digits`.
pub fn extract_code(digest: &[u8], digits: Digits) -> Result<Code> {
    if digest.len() < MIN_DIGEST_LEN {
        return Err(Error::DigestLength {
            expected: MIN_DIGEST_LEN,
            actual: digest.len(),
        });
    }

    let offset = usize::from(digest[digest.len() - 1] & 0xf);
    let bin_code = (u32::from(digest[offset]) & 0x7f) << 24
        | u32::from(digest[offset + 1]) << 16
        | u32::from(digest[offset + 2]) << 8
        | u32::from(digest[offset + 3]);

    Ok(Code {
        value: bin_code % digits.modulus(),
        digits,
    })
}
