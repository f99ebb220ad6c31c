pub mod password;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as B64Engine;
use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

pub fn base64_encode(data: &[u8]) -> String {
    B64Engine.encode(data)
}

pub fn base64_decode(data: &str) -> Result<Vec<u8>> {
    B64Engine.decode(data).context("invalid base64 content")
}

/// Generates a random alphanumeric string, used for opaque tokens such as the
/// user's remember token and password reset tokens.
pub fn random_string(length: usize) -> String {
    let mut rng = thread_rng();

    (0..length)
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect()
}

pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    let hash = Sha256::digest(data.as_ref());
    format!("{:x}", hash)
}
