//! HS256 token codec.
//!
//! Issues and parses `header.payload.signature` tokens carrying `sub`, `iat`
//! and `exp`. Timestamps are whole seconds since the epoch. The signature is
//! always verified (by `jsonwebtoken`) before any claim is looked at; expiry
//! is checked here against an explicit clock so that `now >= exp` is rejected.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HS256 keys shorter than the hash output are rejected.
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature does not verify")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token ttl must be at least one second")]
    InvalidTtl,
    #[error("token subject must not be empty")]
    EmptySubject,
    #[error("failed to sign token")]
    Signing,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    #[error("secret is not valid base64url")]
    Encoding,
    #[error("secret must decode to at least {min} bytes (got {len})")]
    TooShort { len: usize, min: usize },
}

/// Decode a base64url secret; trailing `=` padding is optional.
pub fn decode_secret(encoded: &str) -> Result<Vec<u8>, SecretError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim().trim_end_matches('='))
        .map_err(|_| SecretError::Encoding)?;

    if bytes.len() < MIN_SECRET_BYTES {
        return Err(SecretError::TooShort {
            len: bytes.len(),
            min: MIN_SECRET_BYTES,
        });
    }
    Ok(bytes)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Claims of a token whose signature and expiry have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// `ttl` is the validity window used by [`TokenCodec::issue_now`].
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, SecretError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(SecretError::TooShort {
                len: secret.len(),
                min: MIN_SECRET_BYTES,
            });
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // exp is checked in `parse_at` against the caller's clock (no leeway).
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    pub fn from_base64url(encoded: &str, ttl: Duration) -> Result<Self, SecretError> {
        let secret = decode_secret(encoded)?;
        Self::new(&secret, ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `subject` valid from `issued_at` (truncated to the
    /// second) until `issued_at + ttl`.
    pub fn issue(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::EmptySubject);
        }
        let ttl_seconds = ttl.num_seconds();
        if ttl_seconds < 1 {
            return Err(TokenError::InvalidTtl);
        }

        let iat = issued_at.timestamp();
        let exp = iat.checked_add(ttl_seconds).ok_or(TokenError::InvalidTtl)?;
        let expires_at = timestamp(exp).ok_or(TokenError::InvalidTtl)?;

        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!(error = %e, "failed to sign token");
                TokenError::Signing
            })?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Issue with the configured ttl, starting now.
    pub fn issue_now(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        self.issue(subject, Utc::now(), self.ttl)
    }

    pub fn parse(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.parse_at(token, Utc::now())
    }

    pub fn parse_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?;
        let claims = data.claims;

        if claims.sub.trim().is_empty() || claims.exp <= claims.iat {
            return Err(TokenError::Malformed);
        }

        let issued_at = timestamp(claims.iat).ok_or(TokenError::Malformed)?;
        let expires_at = timestamp(claims.exp).ok_or(TokenError::Malformed)?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(VerifiedToken {
            subject: claims.sub,
            issued_at,
            expires_at,
        })
    }
}

fn timestamp(seconds: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, Duration::hours(10)).unwrap()
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    #[test]
    fn issue_then_parse_returns_subject() {
        let codec = codec();
        let now = at(1_700_000_000);
        let issued = codec
            .issue("alice@example.com", now, Duration::seconds(60))
            .unwrap();

        let verified = codec.parse_at(&issued.token, now).unwrap();
        assert_eq!(verified.subject, "alice@example.com");
        assert_eq!(verified.issued_at, now);
        assert_eq!(verified.expires_at, at(1_700_000_060));
        assert_eq!(issued.expires_at, verified.expires_at);
    }

    #[test]
    fn valid_strictly_before_expiration() {
        let codec = codec();
        let now = at(1_700_000_000);
        let token = codec
            .issue("alice@example.com", now, Duration::seconds(60))
            .unwrap()
            .token;

        assert!(codec.parse_at(&token, at(1_700_000_059)).is_ok());
        assert_eq!(
            codec.parse_at(&token, at(1_700_000_060)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            codec.parse_at(&token, at(1_800_000_000)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn issuing_is_deterministic() {
        let codec = codec();
        let now = at(1_700_000_000);
        let a = codec.issue("bob@example.com", now, Duration::hours(1)).unwrap();
        let b = codec.issue("bob@example.com", now, Duration::hours(1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn token_has_three_parts_and_hs256_header() {
        let token = codec()
            .issue("bob@example.com", at(1_700_000_000), Duration::hours(1))
            .unwrap()
            .token;
        assert_eq!(token.split('.').count(), 3);

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
        assert!(header.kid.is_none());
    }

    #[test]
    fn different_secret_is_invalid_signature() {
        let now = at(1_700_000_000);
        let token = codec()
            .issue("alice@example.com", now, Duration::hours(1))
            .unwrap()
            .token;

        let other = TokenCodec::new(b"ffffffffffffffffffffffffffffffff", Duration::hours(1)).unwrap();
        assert_eq!(other.parse_at(&token, now), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn tampered_payload_is_invalid_signature() {
        let codec = codec();
        let now = at(1_700_000_000);
        let token = codec
            .issue("user@example.com", now, Duration::hours(1))
            .unwrap()
            .token;
        let forged_payload = URL_SAFE_NO_PAD.encode(
            br#"{"sub":"admin@example.com","iat":1700000000,"exp":1700003600}"#,
        );

        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = &forged_payload;
        let forged = parts.join(".");

        assert_eq!(codec.parse_at(&forged, now), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn expired_token_with_wrong_secret_reports_signature_first() {
        let token = codec()
            .issue("alice@example.com", at(1_000), Duration::seconds(1))
            .unwrap()
            .token;
        let other = TokenCodec::new(b"ffffffffffffffffffffffffffffffff", Duration::hours(1)).unwrap();

        assert_eq!(
            other.parse_at(&token, at(1_700_000_000)),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = codec();
        let now = at(1_700_000_000);
        for token in ["", "abc", "a.b.c", "not.a.jwt.at.all"] {
            assert_eq!(codec.parse_at(token, now), Err(TokenError::Malformed), "{token}");
        }
    }

    #[test]
    fn other_algorithms_are_malformed() {
        let now = at(1_700_000_000);
        let claims = Claims {
            sub: "alice@example.com".to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + 60,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(codec().parse_at(&token, now), Err(TokenError::Malformed));
    }

    #[test]
    fn rejects_non_positive_ttl_and_blank_subject() {
        let codec = codec();
        let now = at(1_700_000_000);
        assert_eq!(
            codec.issue("a@example.com", now, Duration::zero()),
            Err(TokenError::InvalidTtl)
        );
        assert_eq!(
            codec.issue("a@example.com", now, Duration::seconds(-5)),
            Err(TokenError::InvalidTtl)
        );
        assert_eq!(
            codec.issue("  ", now, Duration::seconds(5)),
            Err(TokenError::EmptySubject)
        );
    }

    #[test]
    fn secret_must_be_base64url_and_long_enough() {
        let encoded = URL_SAFE_NO_PAD.encode(SECRET);
        assert_eq!(decode_secret(&encoded).unwrap(), SECRET);
        assert_eq!(decode_secret(&format!("{encoded}=")).unwrap(), SECRET);

        assert_eq!(decode_secret("***"), Err(SecretError::Encoding));
        assert!(matches!(
            decode_secret(&URL_SAFE_NO_PAD.encode(b"short")),
            Err(SecretError::TooShort { len: 5, .. })
        ));
        assert!(TokenCodec::new(b"short", Duration::hours(1)).is_err());
    }

    #[test]
    fn issue_now_uses_configured_ttl() {
        let codec = TokenCodec::new(SECRET, Duration::minutes(5)).unwrap();
        let before = Utc::now();
        let issued = codec.issue_now("carol@example.com").unwrap();

        let verified = codec.parse(&issued.token).unwrap();
        assert_eq!(verified.subject, "carol@example.com");
        assert!(verified.expires_at > before);
        assert!(verified.expires_at <= before + Duration::minutes(5) + Duration::seconds(1));
    }
}
