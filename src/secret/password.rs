use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use openssl::memcmp;
use pbkdf2::pbkdf2_hmac_array;
use rand::RngCore;
use sha2::Sha256;

use super::{base64_decode, base64_encode};

static DUMMY_HASH: Lazy<String> = Lazy::new(|| PasswordHasher::hash("usermgr-dummy-password"));

/// One-way password hashing with PBKDF2-HMAC-SHA256 and a random salt.
///
/// Hashes are encoded as `pbkdf2-sha256$<rounds>$<salt>$<key>`, salt and key
/// in base64.
pub struct PasswordHasher;

impl PasswordHasher {
    const SCHEME: &'static str = "pbkdf2-sha256";
    const SALT_LENGTH: usize = 16;
    const ROUNDS: u32 = 10_000;

    pub fn hash(password: &str) -> String {
        let mut salt = [0u8; Self::SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut salt);

        let key = pbkdf2_hmac_array::<Sha256, 32>(password.as_bytes(), &salt, Self::ROUNDS);
        format!(
            "{}${}${}${}",
            Self::SCHEME,
            Self::ROUNDS,
            base64_encode(&salt),
            base64_encode(&key)
        )
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        let parts: Vec<&str> = hash.split('$').collect();
        let (rounds, salt, key) = match parts.as_slice() {
            [scheme, rounds, salt, key] if *scheme == Self::SCHEME => (*rounds, *salt, *key),
            _ => bail!("unsupported password hash format"),
        };

        let rounds: u32 = match rounds.parse() {
            Ok(rounds) => rounds,
            Err(_) => bail!("invalid rounds in password hash"),
        };
        let salt = base64_decode(salt)?;
        let expect = base64_decode(key)?;

        let actual = pbkdf2_hmac_array::<Sha256, 32>(password.as_bytes(), &salt, rounds);
        if actual.len() != expect.len() {
            return Ok(false);
        }
        Ok(memcmp::eq(&actual, &expect))
    }

    /// Spends the same work as [`PasswordHasher::verify`] when there is no
    /// stored hash to check, so unknown accounts answer in the same time.
    /// Always false.
    pub fn verify_dummy(password: &str) -> bool {
        let _ = Self::verify(password, &DUMMY_HASH);
        false
    }
}
