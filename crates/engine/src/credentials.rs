//! Password hashing.
//!
//! Hashes are argon2id PHC strings with a fresh random salt per hash, so the
//! stored value carries its own parameters and salt.

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand_core::OsRng;

use crate::{EngineError, ResultEngine};

/// Hash `password` with a freshly generated salt.
pub(crate) fn hash_password(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Hash checked on logins for unknown emails, so they cost as much as a
/// wrong password on a real account.
static UNKNOWN_ACCOUNT_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("unknown-account").ok());

/// Run a full verification whose result is discarded.
pub(crate) fn verify_unknown_account(password: &str) {
    if let Some(hash) = UNKNOWN_ACCOUNT_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// Check `password` against a stored PHC string.
///
/// A stored value that is not a valid PHC string is reported as
/// [`EngineError::InvalidData`], a mismatch as `Ok(false)`.
pub(crate) fn verify_password(password: &str, stored_hash: &str) -> ResultEngine<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|err| EngineError::InvalidData(format!("stored password hash: {err}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("123456").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("123456", &hash).unwrap());
        assert!(!verify_password("654321", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        let first = hash_password("password").unwrap();
        let second = hash_password("password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn unknown_account_hash_is_a_real_argon2_hash() {
        let hash = UNKNOWN_ACCOUNT_HASH.as_deref().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!verify_password("password", hash).unwrap());
        verify_unknown_account("password");
    }

    #[test]
    fn malformed_hash_is_invalid_data() {
        let err = verify_password("password", "plain-text").unwrap_err();
        assert!(matches!(err, EngineError::InvalidData(_)));
    }
}
