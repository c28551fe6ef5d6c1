//! Validation of submitted codes against a tolerance window around the expected counter.

use constant_time_eq::constant_time_eq;
use passcode_core::{Credential, Digits, ExposeSecret, Method};
use tracing::debug;

use crate::{counter::Bounds, Hasher, Result};

/// Outcome of validating a submitted code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the code matched any counter in the window.
    pub accepted: bool,
    /// Distance of the matched counter from the expected one. Always non-negative for HOTP.
    pub matched_offset: Option<i64>,
    /// The counter or time step that produced the matching code.
    pub matched_counter: Option<u64>,
}

impl Verdict {
    const REJECTED: Self = Self {
        accepted: false,
        matched_offset: None,
        matched_counter: None,
    };

    /// The HOTP counter to store after an accepted code, one past the matched counter. Storing it
    /// keeps the same code from being accepted twice.
    #[must_use]
    pub fn next_counter(&self) -> Option<u64> {
        self.matched_counter.and_then(|c| c.checked_add(1))
    }
}

/// Check `submitted` against the codes of all counters within `window` of the expected one.
///
/// HOTP only looks ahead, from the stored counter up to `window` counters past it, and never past
/// [`Bounds::max_counter`]. TOTP looks `window` time steps in both directions, skipping steps that
/// aren't positive. If several counters match, the closest one is reported, preferring the earlier
/// one on a tie.
///
/// The same guards as for generation apply to the expected counter and fail with an error. A
/// submitted value that merely doesn't match, including one of the wrong length or with non-digit
/// characters, is a rejected [`Verdict`] instead.
pub fn validate<H: Hasher + ?Sized>(
    hasher: &H,
    credential: &Credential,
    submitted: &str,
    window: u32,
    bounds: Bounds,
    now: Option<u64>,
) -> Result<Verdict> {
    crate::check_secret(credential)?;

    let base = crate::counter::counter(&credential.otp, bounds, now)?;
    let digits = crate::resolve_digits(credential);

    if !well_formed(submitted, digits) {
        debug!(method = %credential.method(), "rejected malformed code");
        return Ok(Verdict::REJECTED);
    }

    let mut matched = None;

    // All candidates are compared, so the time spent doesn't reveal where a match was found.
    for (offset, counter) in candidates(credential.method(), base, window, bounds) {
        let expected = crate::hotp(
            hasher,
            credential.secret.expose_secret(),
            counter,
            credential.algorithm,
            digits,
        )?
        .to_string();

        if constant_time_eq(expected.as_bytes(), submitted.as_bytes()) && matched.is_none() {
            matched = Some((offset, counter));
        }
    }

    Ok(match matched {
        Some((offset, counter)) => {
            debug!(method = %credential.method(), offset, "accepted code");
            Verdict {
                accepted: true,
                matched_offset: Some(offset),
                matched_counter: Some(counter),
            }
        }
        None => {
            debug!(method = %credential.method(), window, "rejected code");
            Verdict::REJECTED
        }
    })
}

fn well_formed(submitted: &str, digits: Digits) -> bool {
    submitted.len() == usize::from(digits.get()) && submitted.bytes().all(|b| b.is_ascii_digit())
}

/// Counters to try as `(offset, counter)` pairs, ordered by closeness to `base`.
fn candidates(
    method: Method,
    base: u64,
    window: u32,
    bounds: Bounds,
) -> impl Iterator<Item = (i64, u64)> {
    let offsets: Box<dyn Iterator<Item = i64>> = match method {
        Method::Hotp => Box::new(0..=i64::from(window)),
        Method::Totp => Box::new(
            std::iter::once(0).chain((1..=i64::from(window)).flat_map(|d| [-d, d])),
        ),
    };

    offsets.filter_map(move |offset| {
        let counter = base.checked_add_signed(offset).filter(|&c| c > 0)?;
        let in_bounds = method == Method::Totp || counter <= bounds.max_counter;
        in_bounds.then_some((offset, counter))
    })
}
