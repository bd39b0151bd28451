//! Password hashing with PBKDF2-HMAC-SHA256.
//!
//! Encoded form: `pbkdf2-sha256$<iterations>$<salt hex>$<digest hex>`. The
//! iteration count travels with the hash so it can be raised later without
//! invalidating stored credentials.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

const SCHEME: &str = "pbkdf2-sha256";
const DIGEST_LEN: usize = 32;

/// Salt for the decoy derivation run when an account does not exist
const DECOY_SALT: &[u8] = b"crimemap-decoy-salt";

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> String {
        // v4 UUIDs are 122 bits of OS randomness
        let salt = Uuid::new_v4().into_bytes();
        let digest = pbkdf2_sha256(password.as_bytes(), &salt, self.iterations);

        format!(
            "{}${}${}${}",
            SCHEME,
            self.iterations,
            hex::encode(salt),
            hex::encode(digest)
        )
    }

    /// Check a password against an encoded hash. Malformed hashes never match.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        let mut parts = encoded.split('$');
        let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return false;
        };

        if scheme != SCHEME {
            return false;
        }

        let (Ok(iterations), Ok(salt), Ok(expected)) = (
            iterations.parse::<u32>(),
            hex::decode(salt),
            hex::decode(expected),
        ) else {
            return false;
        };

        if iterations == 0 || expected.len() != DIGEST_LEN {
            return false;
        }

        let actual = pbkdf2_sha256(password.as_bytes(), &salt, iterations);
        actual[..].ct_eq(&expected[..]).into()
    }

    /// Does the work of a real check for an account that doesn't exist,
    /// so unknown emails take as long to reject as wrong passwords.
    /// Never matches.
    pub fn verify_missing(&self, password: &str) -> bool {
        let decoy = pbkdf2_sha256(password.as_bytes(), DECOY_SALT, self.iterations);
        std::hint::black_box(decoy);
        false
    }
}

fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32) -> [u8; DIGEST_LEN] {
    let mut out = [0u8; DIGEST_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
    out
}
