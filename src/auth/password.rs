//! Password hashing.
//!
//! New credentials are written with bcrypt unless the startup probe found bcrypt
//! unusable, in which case they fall back to `pbkdf2$<hex-salt>$<hex-digest>`
//! (PBKDF2-HMAC-SHA256, 100 000 rounds). Verification accepts either format
//! regardless of which scheme is active.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::{AuthSettings, PasswordScheme};
use crate::error::AppError;

/// bcrypt ignores everything past this many bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

const PBKDF2_PREFIX: &str = "pbkdf2$";
const PBKDF2_ROUNDS: u32 = 100_000;
const PBKDF2_SALT_BYTES: usize = 16;
const PBKDF2_DIGEST_BYTES: usize = 32;

/// Hashes and verifies account passwords.
#[derive(Debug, Clone)]
pub struct CredentialCodec {
    scheme: PasswordScheme,
    bcrypt_cost: u32,
}

impl CredentialCodec {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            scheme: settings.password_scheme.unwrap_or(PasswordScheme::Bcrypt),
            bcrypt_cost: settings.bcrypt_cost,
        }
    }

    /// Checks once whether bcrypt works with the configured cost.
    ///
    /// Called at startup; the answer is stored in `AuthSettings::password_scheme`.
    pub fn probe(bcrypt_cost: u32) -> PasswordScheme {
        let usable = bcrypt::hash("probe", bcrypt_cost)
            .and_then(|hashed| bcrypt::verify("probe", &hashed))
            .unwrap_or(false);

        if usable {
            PasswordScheme::Bcrypt
        } else {
            log::warn!("bcrypt unavailable, new passwords will use pbkdf2");
            PasswordScheme::Pbkdf2
        }
    }

    pub fn scheme(&self) -> PasswordScheme {
        self.scheme
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = truncate_password(password);
        match self.scheme {
            PasswordScheme::Bcrypt => bcrypt::hash(password, self.bcrypt_cost).map_err(|e| {
                AppError::InternalServerError(format!("Failed to hash password: {}", e))
            }),
            PasswordScheme::Pbkdf2 => Ok(hash_pbkdf2(password)),
        }
    }

    /// Never errors: malformed hashes simply fail to verify.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        let password = truncate_password(password);
        if hashed_password.starts_with(PBKDF2_PREFIX) {
            verify_pbkdf2(password, hashed_password)
        } else {
            bcrypt::verify(password, hashed_password).unwrap_or(false)
        }
    }
}

/// Cuts `password` to at most 72 bytes without splitting a UTF-8 character.
pub fn truncate_password(password: &str) -> &str {
    if password.len() <= MAX_PASSWORD_BYTES {
        return password;
    }
    let mut end = MAX_PASSWORD_BYTES;
    while !password.is_char_boundary(end) {
        end -= 1;
    }
    &password[..end]
}

fn hash_pbkdf2(password: &str) -> String {
    let mut salt = [0u8; PBKDF2_SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = hex::encode(salt);
    let digest = pbkdf2_digest(password, &salt);
    format!("{}{}${}", PBKDF2_PREFIX, salt, hex::encode(digest))
}

fn verify_pbkdf2(password: &str, hashed_password: &str) -> bool {
    let mut parts = hashed_password.split('$');
    let (Some("pbkdf2"), Some(salt), Some(stored), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Ok(stored) = hex::decode(stored) else {
        return false;
    };

    let computed = pbkdf2_digest(password, salt);
    if stored.len() != computed.len() {
        return false;
    }
    computed[..].ct_eq(&stored[..]).into()
}

// The salt's hex text, not its decoded bytes, is the PBKDF2 salt input.
fn pbkdf2_digest(password: &str, salt: &str) -> [u8; PBKDF2_DIGEST_BYTES] {
    let mut digest = [0u8; PBKDF2_DIGEST_BYTES];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut digest);
    digest
}
