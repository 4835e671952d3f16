/// Password hashing with Argon2id.
///
/// Hashes are stored in PHC string format, so the parameters and salt ride
/// along with the digest and verification needs no configuration. The
/// parameters below (64 MB, 3 passes, 4 lanes) follow current OWASP
/// guidance for interactive logins.
///
/// # Example
///
/// ```
/// use notehub_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("hunter2-but-longer")?;
/// assert_ne!(hash, "hunter2-but-longer");
/// assert!(verify_password("hunter2-but-longer", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored password hash is unreadable: {0}")]
    InvalidHash(String),
}

/// Hashes a raw password with Argon2id and a fresh random salt.
///
/// Returns the PHC string (`$argon2id$v=19$m=65536,t=3,p=4$...`), which is
/// what gets persisted in `users.password_hash`.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536)
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verifies a raw password against a stored PHC hash.
///
/// A mismatched password is `Ok(false)`; only an unparseable or corrupt
/// hash is an error. Comparison is constant-time inside argon2.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::InvalidHash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_phc_and_not_plaintext() {
        let hash = hash_password("secret1").expect("hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, "secret1");
        assert!(!hash.contains("secret1"));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();

        // Fresh salt each time
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();

        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("incorrect horse", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_corrupt_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
        assert!(verify_password("anything", "$argon2id$garbage").is_err());
    }
}
