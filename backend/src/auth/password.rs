//! Password hashing using argon2
//!
//! Provides secure password hashing and verification.
//!
//! # Performance Considerations
//!
//! Argon2 is intentionally CPU-intensive. Async callers use the `_async`
//! variants, which run on the blocking thread pool.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use secrecy::{ExposeSecret, SecretString};

/// Password hashing service
///
/// Uses Argon2id with default parameters. Every hash carries its own random
/// salt, so equal passwords never produce equal hashes.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using argon2 (blocking operation)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(password: SecretString) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(password.expose_secret()))
            .await
            .map_err(|e| anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a hash (blocking operation)
    ///
    /// A wrong password is `Ok(false)`; only a hash that cannot be parsed or
    /// evaluated is an error.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| anyhow!("Invalid hash format: {}", e))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(anyhow!("Failed to verify password: {}", e)),
        }
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: SecretString, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(password.expose_secret(), &hash))
            .await
            .map_err(|e| anyhow!("Task join error: {}", e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hash = PasswordService::hash(password).unwrap();

        assert!(PasswordService::verify(password, &hash).unwrap());
        assert!(!PasswordService::verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let password = "test_password";
        let hash1 = PasswordService::hash(password).unwrap();
        let hash2 = PasswordService::hash(password).unwrap();

        // Hashes should be different due to random salt
        assert_ne!(hash1, hash2);

        assert!(PasswordService::verify(password, &hash1).unwrap());
        assert!(PasswordService::verify(password, &hash2).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(PasswordService::verify("secret", "not-a-phc-string").is_err());
        assert!(PasswordService::verify("secret", "").is_err());
    }

    #[test]
    fn test_plaintext_stored_password_never_matches() {
        // A row holding a cleartext password must not authenticate by equality
        assert!(PasswordService::verify("secret", "secret").is_err());
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let secret = || SecretString::new("async_test_password".to_string());
        let hash = PasswordService::hash_async(secret()).await.unwrap();

        assert!(PasswordService::verify_async(secret(), hash.clone()).await.unwrap());
        assert!(!PasswordService::verify_async(SecretString::new("wrong".to_string()), hash)
            .await
            .unwrap());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_hash_verifies_only_its_password(
            p1 in "[ -~]{1,32}",
            p2 in "[ -~]{1,32}",
        ) {
            let hash = PasswordService::hash(&p1).unwrap();
            prop_assert!(PasswordService::verify(&p1, &hash).unwrap());
            if p1 != p2 {
                prop_assert!(!PasswordService::verify(&p2, &hash).unwrap());
            }
        }
    }
}
