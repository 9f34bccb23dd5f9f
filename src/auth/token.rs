use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Generate an opaque bearer session token: 32 random bytes, base64. Shown to
/// the client exactly once; only its hash is ever stored.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

/// Deterministic one-way lookup hash of a session token. Used as both storage
/// value and index key, so a database read never yields a usable credential.
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    BASE64.encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_32_random_bytes() {
        let token = generate_session_token();
        let bytes = BASE64.decode(&token).unwrap();
        assert_eq!(bytes.len(), 32);
    }

    #[test]
    fn distinct_tokens_hash_distinctly() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
        assert_ne!(hash_token(&a), hash_token(&b));
    }

    #[test]
    fn token_hash_is_deterministic() {
        let token = generate_session_token();
        assert_eq!(hash_token(&token), hash_token(&token));
    }

    #[test]
    fn token_hash_differs_from_token() {
        let token = generate_session_token();
        assert_ne!(hash_token(&token), token);
    }
}
