//! Password hashing for stored accounts.
//!
//! The directory never stores a password as typed. It asks a
//! [`PasswordHasher`] for a self-describing digest string and later asks
//! the same hasher whether a sign-in attempt matches it.
//!
//! # Why a trait?
//!
//! The default [`SaltedSha256`] is enough for a demo store. A deployment
//! that needs a memory-hard KDF can plug one in without touching the
//! directory, and tests can use a cheap iteration count.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Turns passwords into stored digests and checks attempts against them.
///
/// - `Send + Sync` → the portal may be moved to another thread.
/// - `'static` → the hasher lives as long as the directory that owns it.
pub trait PasswordHasher: Send + Sync + 'static {
    /// Produces the string stored in the account record.
    fn hash(&self, password: &str) -> String;

    /// Returns `true` if `password` produces `stored`.
    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// Salt byte length before hex encoding.
const SALT_BYTES: usize = 16;

/// Prefix identifying the digest scheme in stored strings.
const SCHEME: &str = "sha256";

/// Salted, iterated SHA-256.
///
/// Stored format: `sha256$<iterations>$<salt-hex>$<digest-hex>`. The
/// iteration count travels with the digest, so changing the configured
/// count only affects new passwords.
#[derive(Debug, Clone, Copy)]
pub struct SaltedSha256 {
    iterations: u32,
}

impl SaltedSha256 {
    pub const DEFAULT_ITERATIONS: u32 = 10_000;

    /// Creates a hasher that stretches each digest `iterations` times
    /// (at least once).
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl Default for SaltedSha256 {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ITERATIONS)
    }
}

impl PasswordHasher for SaltedSha256 {
    fn hash(&self, password: &str) -> String {
        let salt = generate_salt();
        let digest = stretch(password, &salt, self.iterations);
        format!("{SCHEME}${}${salt}${digest}", self.iterations)
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        let mut parts = stored.split('$');
        let (Some(SCHEME), Some(iterations), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return false;
        };
        let Ok(iterations) = iterations.parse::<u32>() else {
            return false;
        };
        if iterations == 0 {
            return false;
        }

        let attempt = stretch(password, salt, iterations);
        constant_time_eq(attempt.as_bytes(), expected.as_bytes())
    }
}

/// SHA-256 over salt and password, then re-hashed with the salt until
/// `iterations` rounds have run. Returns lowercase hex.
fn stretch(password: &str, salt: &str, iterations: u32) -> String {
    let mut hash = Sha256::new();
    hash.update(salt.as_bytes());
    hash.update(password.as_bytes());
    let mut result = hash.finalize();

    for _ in 1..iterations {
        let mut h = Sha256::new();
        h.update(result);
        h.update(salt.as_bytes());
        result = h.finalize();
    }

    hex::encode(result)
}

fn generate_salt() -> String {
    let bytes: [u8; SALT_BYTES] = rand::rng().random();
    hex::encode(bytes)
}

/// Compares without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
