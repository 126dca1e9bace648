//! Argon2id password hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a plaintext password with a freshly generated salt.
pub(crate) fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a plaintext password against a stored hash.
///
/// A malformed stored hash counts as a mismatch rather than an error,
/// so login failures never leak storage state to the caller.
pub(crate) fn verify(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{hash, verify};

    #[test]
    fn roundtrip() {
        let hashed = hash("correct horse").expect("unable to hash");

        assert!(verify("correct horse", &hashed));
        assert!(!verify("wrong horse", &hashed));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!verify("anything", "not-a-phc-string"));
    }
}
