//! Resolution of the moving factor, either given directly (HOTP) or derived from time (TOTP).

use std::time::UNIX_EPOCH;

use passcode_core::{Config, Method, Otp};
use tracing::debug;

use crate::{Error, Result};

/// Upper limits that a resolved counter is checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    /// Highest accepted HOTP counter.
    pub max_counter: u64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for Bounds {
    fn from(config: &Config) -> Self {
        Self {
            max_counter: config.max_counter,
        }
    }
}

/// Find the raw counter for `otp`, without checking it against any bounds.
///
/// For TOTP this is `floor((now - initial) / period)`, where `now` falls back to the system clock
/// if not given. The result is signed as a clock before `initial` yields negative steps.
pub fn resolve_counter(otp: &Otp, now: Option<u64>) -> Result<i128> {
    match *otp {
        Otp::Hotp { counter } => counter
            .map(i128::from)
            .ok_or(Error::MissingRequiredParameter("counter")),
        Otp::Totp { period, initial } => {
            let period = period
                .filter(|&p| p > 0)
                .ok_or(Error::MissingRequiredParameter("period"))?;
            let initial = initial.ok_or(Error::MissingRequiredParameter("initial"))?;
            let now = unix_now(now)?;

            Ok(time_step(period, initial, now))
        }
    }
}

/// Check a raw counter. Zero is rejected first, then negative values, then HOTP counters above
/// the configured maximum.
pub fn validate_counter(method: Method, counter: i128, bounds: Bounds) -> Result<u64> {
    if counter == 0 {
        return Err(Error::InvalidCounter);
    }

    let Ok(counter) = u64::try_from(counter) else {
        return Err(Error::CounterMustBePositive(counter));
    };

    if method == Method::Hotp && counter > bounds.max_counter {
        return Err(Error::CounterOutOfBounds {
            limit: bounds.max_counter,
            actual: counter,
        });
    }

    Ok(counter)
}

/// Resolve and validate the counter of `otp` in one go.
pub fn counter(otp: &Otp, bounds: Bounds, now: Option<u64>) -> Result<u64> {
    let counter = resolve_counter(otp, now)
        .and_then(|raw| validate_counter(otp.method(), raw, bounds))
        .map_err(|e| {
            debug!(method = %otp.method(), error = %e, "rejected counter");
            e
        })?;

    debug!(method = %otp.method(), counter, "resolved counter");
    Ok(counter)
}

/// Seconds until the time step that `now` falls into ends, for showing a countdown next to a
/// TOTP code. `None` if `period` is zero.
#[must_use]
pub fn seconds_remaining(period: u64, initial: u64, now: u64) -> Option<u64> {
    if period == 0 {
        return None;
    }

    let elapsed = i128::from(now) - i128::from(initial);
    let into_step = elapsed.rem_euclid(i128::from(period));

    u64::try_from(i128::from(period) - into_step).ok()
}

fn time_step(period: u64, initial: u64, now: u64) -> i128 {
    let elapsed = i128::from(now) - i128::from(initial);
    elapsed.div_euclid(i128::from(period))
}

fn unix_now(now: Option<u64>) -> Result<u64> {
    match now {
        Some(now) => Ok(now),
        None => Ok(UNIX_EPOCH.elapsed()?.as_secs()),
    }
}
