use passcode_core::{Algorithm, Credential, CredentialRecord, Method, Otp};
use tracing::debug;

use crate::{Error, Result};

/// Turn a loosely typed record, as read back from storage, into a [`Credential`].
///
/// The first problem found is returned, checking in this order: secret present, algorithm known
/// (SHA-1 if absent), method known. Missing method parameters are left for [`generate`] and
/// [`validate`] to report, as they only matter once a counter is resolved.
///
/// [`generate`]: crate::generate
/// [`validate`]: crate::validate
pub fn check(record: CredentialRecord) -> Result<Credential> {
    let secret = match record.secret {
        Some(secret) if !secret.is_empty() => secret,
        _ => {
            debug!(method = %record.method, "rejected record without secret");
            return Err(Error::MissingSecret);
        }
    };

    let algorithm = match record.algorithm.as_deref() {
        Some(name) => name.parse::<Algorithm>()?,
        None => Algorithm::default(),
    };

    let otp = match record.method.parse::<Method>()? {
        Method::Hotp => Otp::Hotp {
            counter: record.counter,
        },
        Method::Totp => Otp::Totp {
            period: record.period,
            initial: record.initial,
        },
    };

    Ok(Credential {
        secret,
        algorithm,
        digits: record.digits,
        otp,
    })
}

#[cfg(test)]
mod tests {
    use passcode_core::{Algorithm, CredentialRecord, Otp, SharedSecret};
    use pretty_assertions::assert_eq;

    use super::check;
    use crate::Error;

    fn record(method: &str) -> CredentialRecord {
        CredentialRecord {
            secret: Some(SharedSecret::new(b"12345678901234567890".to_vec())),
            method: method.to_owned(),
            algorithm: Some("sha256".to_owned()),
            digits: Some(7),
            counter: Some(3),
            period: Some(30),
            initial: Some(1_700_000_000),
        }
    }

    #[test]
    fn hotp_record() {
        let credential = check(record("hotp")).unwrap();
        assert_eq!(Algorithm::Sha256, credential.algorithm);
        assert_eq!(Some(7), credential.digits);
        assert_eq!(Otp::Hotp { counter: Some(3) }, credential.otp);
    }

    #[test]
    fn totp_record() {
        let credential = check(record("TOTP")).unwrap();
        assert_eq!(
            Otp::Totp {
                period: Some(30),
                initial: Some(1_700_000_000)
            },
            credential.otp
        );
    }

    #[test]
    fn algorithm_defaults_to_sha1() {
        let mut record = record("hotp");
        record.algorithm = None;
        assert_eq!(Algorithm::Sha1, check(record).unwrap().algorithm);
    }

    #[test]
    fn secret_is_checked_first() {
        let mut missing = record("steam");
        missing.secret = None;
        missing.algorithm = Some("md5".to_owned());
        assert!(matches!(check(missing), Err(Error::MissingSecret)));

        let mut empty = record("hotp");
        empty.secret = Some(SharedSecret::new(Vec::new()));
        assert!(matches!(check(empty), Err(Error::MissingSecret)));
    }

    #[test]
    fn unsupported_algorithm() {
        let mut record = record("steam");
        record.algorithm = Some("md5".to_owned());
        assert!(matches!(
            check(record),
            Err(Error::UnsupportedAlgorithm(name)) if name == "md5"
        ));
    }

    #[test]
    fn unsupported_method() {
        assert!(matches!(
            check(record("steam")),
            Err(Error::UnsupportedMethod(name)) if name == "steam"
        ));
    }

    #[test]
    fn from_json() {
        let record: CredentialRecord = serde_json::from_str(
            r#"{"secret": "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ", "method": "totp", "period": 30}"#,
        )
        .unwrap();

        let credential = check(record).unwrap();
        assert_eq!(
            Otp::Totp {
                period: Some(30),
                initial: None
            },
            credential.otp
        );
    }
}
