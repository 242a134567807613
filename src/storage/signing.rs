use crate::types::error::StoreError;
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

pub const DATE_PARAM: &str = "X-Amz-Date";
pub const EXPIRES_PARAM: &str = "X-Amz-Expires";
pub const SIGNATURE_PARAM: &str = "X-Amz-Signature";

const DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Longest lifetime an upload URL may carry, matching S3 presigning
pub const MAX_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Query parameters that authorize one upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    pub date: String,
    pub expires: u64,
    pub signature: String,
}

impl SignedQuery {
    pub fn to_query_string(&self) -> String {
        format!(
            "{}={}&{}={}&{}={}",
            DATE_PARAM, self.date, EXPIRES_PARAM, self.expires, SIGNATURE_PARAM, self.signature
        )
    }
}

/// Signs and verifies upload URLs for the in-memory store.
///
/// The signature covers the method, the `/{bucket}/{key}` path, the issue
/// date and the expiry, so a URL cannot be replayed against another key or
/// have its lifetime extended.
#[derive(Clone)]
pub struct UploadSigner {
    secret: Vec<u8>,
}

impl UploadSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Signer with a secret that only lives as long as the process
    pub fn ephemeral() -> Self {
        let secret = format!("{}{}", uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
        Self::new(secret.into_bytes())
    }

    pub fn sign(
        &self,
        path: &str,
        issued_at: DateTime<Utc>,
        expires_in: Duration,
    ) -> Result<SignedQuery, StoreError> {
        if expires_in > MAX_EXPIRY {
            return Err(StoreError::InvalidRequest(format!(
                "Upload expiry must not exceed {} seconds",
                MAX_EXPIRY.as_secs()
            )));
        }

        let date = issued_at.format(DATE_FORMAT).to_string();
        let expires = expires_in.as_secs();
        let mac = self.mac_for(path, &date, expires)?;

        Ok(SignedQuery {
            date,
            expires,
            signature: hex::encode(mac.finalize().into_bytes()),
        })
    }

    /// Check `params` against `path` at time `now`
    pub fn verify(
        &self,
        path: &str,
        params: &HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let date = required(params, DATE_PARAM)?;
        let expires = required(params, EXPIRES_PARAM)?
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs <= MAX_EXPIRY.as_secs())
            .ok_or_else(|| StoreError::InvalidRequest(format!("Invalid {}", EXPIRES_PARAM)))?;
        let signature = required(params, SIGNATURE_PARAM)?;

        let issued_at = NaiveDateTime::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| StoreError::InvalidRequest(format!("Invalid {}", DATE_PARAM)))?
            .and_utc();

        let provided = hex::decode(signature).map_err(|_| StoreError::SignatureDoesNotMatch)?;
        self.mac_for(path, date, expires)?
            .verify_slice(&provided)
            .map_err(|_| StoreError::SignatureDoesNotMatch)?;

        let expires_at = i64::try_from(expires)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| StoreError::InvalidRequest(format!("Invalid {}", EXPIRES_PARAM)))?;
        if now >= expires_at {
            tracing::debug!("Upload URL for {} expired at {}", path, expires_at);
            return Err(StoreError::AccessDenied("Request has expired".to_string()));
        }

        Ok(())
    }

    fn mac_for(&self, path: &str, date: &str, expires: u64) -> Result<HmacSha256, StoreError> {
        let string_to_sign = format!("PUT\n{}\n{}\n{}", path, date, expires);

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| StoreError::InternalError(format!("HMAC error: {}", e)))?;
        mac.update(string_to_sign.as_bytes());
        Ok(mac)
    }
}

fn required<'a>(params: &'a HashMap<String, String>, name: &str) -> Result<&'a str, StoreError> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| StoreError::InvalidRequest(format!("Missing {} in query string", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(query: &SignedQuery) -> HashMap<String, String> {
        HashMap::from([
            (DATE_PARAM.to_string(), query.date.clone()),
            (EXPIRES_PARAM.to_string(), query.expires.to_string()),
            (SIGNATURE_PARAM.to_string(), query.signature.clone()),
        ])
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = UploadSigner::new("secret");
        let now = Utc::now();
        let query = signer
            .sign("/bucket/report.pdf", now, Duration::from_secs(60))
            .unwrap();

        assert!(signer.verify("/bucket/report.pdf", &params(&query), now).is_ok());
    }

    #[test]
    fn test_signature_bound_to_key() {
        let signer = UploadSigner::new("secret");
        let now = Utc::now();
        let query = signer
            .sign("/bucket/a.txt", now, Duration::from_secs(60))
            .unwrap();

        assert!(matches!(
            signer.verify("/bucket/b.txt", &params(&query), now),
            Err(StoreError::SignatureDoesNotMatch)
        ));
    }

    #[test]
    fn test_expired_url_rejected() {
        let signer = UploadSigner::new("secret");
        let issued = Utc::now();
        let query = signer
            .sign("/bucket/a.txt", issued, Duration::from_secs(60))
            .unwrap();

        let later = issued + chrono::Duration::seconds(120);
        assert!(matches!(
            signer.verify("/bucket/a.txt", &params(&query), later),
            Err(StoreError::AccessDenied(_))
        ));
    }

    #[test]
    fn test_extended_expiry_rejected() {
        let signer = UploadSigner::new("secret");
        let now = Utc::now();
        let mut query = signer
            .sign("/bucket/a.txt", now, Duration::from_secs(60))
            .unwrap();
        query.expires = 86_400;

        assert!(matches!(
            signer.verify("/bucket/a.txt", &params(&query), now),
            Err(StoreError::SignatureDoesNotMatch)
        ));
    }

    #[test]
    fn test_other_secret_rejected() {
        let now = Utc::now();
        let query = UploadSigner::new("one")
            .sign("/bucket/a.txt", now, Duration::from_secs(60))
            .unwrap();

        assert!(
            UploadSigner::new("two")
                .verify("/bucket/a.txt", &params(&query), now)
                .is_err()
        );
    }

    #[test]
    fn test_missing_params() {
        let signer = UploadSigner::ephemeral();
        assert!(matches!(
            signer.verify("/bucket/a.txt", &HashMap::new(), Utc::now()),
            Err(StoreError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_zero_expiry_expires_at_issue() {
        let signer = UploadSigner::new("secret");
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let query = signer
            .sign("/bucket/a.txt", issued, Duration::ZERO)
            .unwrap();

        assert!(matches!(
            signer.verify("/bucket/a.txt", &params(&query), issued),
            Err(StoreError::AccessDenied(_))
        ));
    }

    #[test]
    fn test_expiry_beyond_one_week_not_signed() {
        let signer = UploadSigner::new("secret");

        assert!(signer.sign("/bucket/a.txt", Utc::now(), MAX_EXPIRY).is_ok());
        assert!(matches!(
            signer.sign("/bucket/a.txt", Utc::now(), MAX_EXPIRY + Duration::from_secs(1)),
            Err(StoreError::InvalidRequest(_))
        ));
        assert!(matches!(
            signer.sign("/bucket/a.txt", Utc::now(), Duration::from_secs(100_000_000_000_000)),
            Err(StoreError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_out_of_range_expires_param_rejected() {
        let signer = UploadSigner::new("secret");
        let now = Utc::now();
        let query = signer
            .sign("/bucket/a.txt", now, Duration::from_secs(60))
            .unwrap();

        for expires in [u64::MAX.to_string(), "100000000000000".to_string()] {
            let mut params = params(&query);
            params.insert(EXPIRES_PARAM.to_string(), expires);

            assert!(matches!(
                signer.verify("/bucket/a.txt", &params, now),
                Err(StoreError::InvalidRequest(_))
            ));
        }
    }
}
