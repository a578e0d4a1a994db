use crate::config::AuthSettings;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime used when the caller gives no ttl at all.
pub const FALLBACK_TTL_MINUTES: i64 = 15;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the account's email.
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
}

/// Issues and validates signed bearer tokens.
///
/// Holds the signing keys derived from `AuthSettings`, so nothing is read from
/// the environment per request.
#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(settings: &AuthSettings) -> Self {
        // A token stops being accepted the second it expires.
        let mut validation = Validation::new(settings.algorithm);
        validation.leeway = 0;

        Self {
            algorithm: settings.algorithm,
            encoding_key: EncodingKey::from_secret(settings.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret_key.as_bytes()),
            validation,
            default_ttl: Duration::minutes(settings.access_token_expire_minutes),
        }
    }

    /// The configured access-token lifetime.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Generates a token whose subject is `email`.
    ///
    /// `ttl` of `None` means 15 minutes; routes pass `Some(default_ttl())`.
    pub fn issue(&self, email: &str, ttl: Option<Duration>) -> Result<String, AppError> {
        let ttl = ttl.unwrap_or_else(|| Duration::minutes(FALLBACK_TTL_MINUTES));
        let expiration = (Utc::now() + ttl).timestamp().max(0) as usize;

        let claims = Claims {
            sub: Some(email.to_string()),
            exp: expiration,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiry and returns the subject email.
    ///
    /// Every failure, including a missing subject, is the same `Unauthorized` error.
    pub fn validate(&self, token: &str) -> Result<String, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)?;

        match claims.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => {
                log::debug!("token rejected: missing subject");
                Err(AppError::invalid_credentials())
            }
        }
    }
}
