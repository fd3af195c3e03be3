use crate::error::AppError;

pub const DEFAULT_COST: u32 = 10;

/// bcrypt only reads this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Salted bcrypt hashing for stored credentials.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::ValidationError(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// Over-long input never matches, since no stored digest can come from it.
    pub fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, AppError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        Ok(bcrypt::verify(plaintext, digest)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        // lowest cost bcrypt accepts, keeps the tests fast
        PasswordHasher::with_cost(4)
    }

    #[test]
    fn verify_accepts_own_hash() {
        let hasher = hasher();
        for plaintext in ["pw1", "", "correct horse battery staple", "ünïcødé"] {
            let digest = hasher.hash(plaintext).unwrap();
            assert_ne!(digest, plaintext);
            assert!(hasher.verify(plaintext, &digest).unwrap());
        }
    }

    #[test]
    fn verify_rejects_other_hash() {
        let hasher = hasher();
        let digest = hasher.hash("other").unwrap();
        assert!(!hasher.verify("pw1", &digest).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = hasher();
        assert_ne!(hasher.hash("pw1").unwrap(), hasher.hash("pw1").unwrap());
    }

    #[test]
    fn default_cost_is_ten() {
        let digest = PasswordHasher::default().hash("pw1").unwrap();
        assert!(digest.starts_with("$2b$10$"), "unexpected digest {}", digest);
    }

    #[test]
    fn passwords_past_bcrypt_limit_never_collide() {
        let hasher = hasher();
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);
        let long_x = format!("{}X", prefix);
        let long_y = format!("{}Y", prefix);

        let err = hasher.hash(&long_y).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let digest = hasher.hash(&prefix).unwrap();
        assert!(hasher.verify(&prefix, &digest).unwrap());
        assert!(!hasher.verify(&long_x, &digest).unwrap());
        assert!(!hasher.verify(&long_y, &digest).unwrap());
    }

    #[test]
    fn malformed_digest_is_an_error() {
        let err = hasher().verify("pw1", "not-a-bcrypt-hash").unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }
}
