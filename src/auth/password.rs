use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Hash a password as base64(salt || SHA-256(salt || password)) with a fresh
/// 16-byte random salt, so identical passwords never share an encoding.
///
/// Known limitation: this is a single fast SHA-256 pass, not an iterated or
/// memory-hard KDF, and is not resistant to offline brute force at commodity
/// hash rates. The stored format is fixed by the existing user base; moving to
/// a memory-hard KDF requires a hash migration, not a drop-in change here.
pub fn hash_password(plain: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(plain.as_bytes());
    let digest = hasher.finalize();

    let mut out = Vec::with_capacity(SALT_LEN + digest.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&digest);
    BASE64.encode(out)
}

/// Verify a candidate password against a stored hash. Fails closed: malformed
/// base64 or a truncated stored value returns false rather than erroring.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    let Ok(bytes) = BASE64.decode(stored) else {
        return false;
    };
    if bytes.len() <= SALT_LEN {
        return false;
    }
    let (salt, stored_digest) = bytes.split_at(SALT_LEN);

    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(plain.as_bytes());
    let digest = hasher.finalize();

    if digest.len() != stored_digest.len() {
        return false;
    }
    // Constant-time comparison: accumulate XOR differences instead of
    // short-circuiting on the first mismatched byte.
    let mut diff = 0u8;
    for (a, b) in digest.iter().zip(stored_digest.iter()) {
        diff |= a ^ b;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password);
        assert!(verify_password(password, &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct-horse-battery-staple");
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("repeat-after-me");
        let b = hash_password("repeat-after-me");
        assert_ne!(a, b);
        assert!(verify_password("repeat-after-me", &a));
        assert!(verify_password("repeat-after-me", &b));
    }

    #[test]
    fn verify_fails_closed_on_malformed_input() {
        assert!(!verify_password("anything", "not-valid-base64!!!"));
        assert!(!verify_password("anything", ""));
        // Valid base64 but shorter than a salt
        assert!(!verify_password("anything", &BASE64.encode([0u8; 8])));
    }

    #[test]
    fn stored_hash_has_salt_and_digest() {
        let bytes = BASE64.decode(hash_password("x")).unwrap();
        assert_eq!(bytes.len(), SALT_LEN + 32);
    }
}
