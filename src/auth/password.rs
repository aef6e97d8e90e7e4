//! Password hashing
//!
//! Wraps bcrypt hashing and verification. Verification fails closed: a
//! malformed stored hash rejects the login instead of surfacing an error.

use bcrypt::DEFAULT_COST;

/// Hash a plaintext password with a fresh salt
pub fn hash_password(plain: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plain, DEFAULT_COST)
}

/// Check a plaintext password against a stored bcrypt hash
///
/// Returns false for a wrong password and for a hash that cannot be
/// parsed at all.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast
    fn quick_hash(plain: &str) -> String {
        bcrypt::hash(plain, 4).unwrap()
    }

    #[test]
    fn test_verify_accepts_correct_password() {
        let hash = quick_hash("secretpassword");
        assert!(verify_password("secretpassword", &hash));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = quick_hash("secretpassword");
        assert!(!verify_password("wrongpassword", &hash));
    }

    #[test]
    fn test_verify_fails_closed_on_malformed_hash() {
        assert!(!verify_password("secretpassword", "not-a-bcrypt-hash"));
        assert!(!verify_password("secretpassword", ""));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = quick_hash("secretpassword");
        let second = quick_hash("secretpassword");
        assert_ne!(first, second);
        assert!(verify_password("secretpassword", &first));
        assert!(verify_password("secretpassword", &second));
    }
}
