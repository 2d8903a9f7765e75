use crate::core::error::Error;

/// bcrypt only looks at the first 72 bytes of its input.
pub(crate) const MAX_PASSWORD_BYTES: usize = 72;

/// Lowest cost bcrypt accepts.
#[cfg(test)]
pub(crate) const TEST_COST: u32 = 4;

#[derive(Clone, Copy, Debug)]
pub(crate) struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    #[cfg(test)]
    pub(crate) fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub(crate) fn hash(&self, password: &str) -> Result<String, Error> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(Error::InvalidPassword("Password is too long"));
        }

        bcrypt::hash(password, self.cost).map_err(Error::Bcrypt)
    }

    /// A mismatch is `Ok(false)`; only a malformed hash is an error.
    pub(crate) fn verify(&self, hash: &str, password: &str) -> Result<bool, Error> {
        // Anything longer could only match through truncation.
        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }

        bcrypt::verify(password, hash).map_err(Error::Bcrypt)
    }

    pub(crate) async fn hash_blocking(&self, password: String) -> Result<String, Error> {
        let hasher = *self;

        tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
    }

    pub(crate) async fn verify_blocking(
        &self,
        hash: String,
        password: String,
    ) -> Result<bool, Error> {
        let hasher = *self;

        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::with_cost(TEST_COST)
    }

    #[test]
    fn test_verify_accepts_original_password() {
        let hasher = hasher();
        let longest = "x".repeat(MAX_PASSWORD_BYTES);

        for password in ["hunter2", "пароль", longest.as_str()] {
            let hash = hasher.hash(password).unwrap();
            assert!(hasher.verify(&hash, password).unwrap());
        }
    }

    #[test]
    fn test_verify_rejects_other_password() {
        let hasher = hasher();
        let hash = hasher.hash("hunter2").unwrap();

        assert!(!hasher.verify(&hash, "hunter3").unwrap());
        assert!(!hasher.verify(&hash, "Hunter2").unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = hasher();

        assert_ne!(
            hasher.hash("hunter2").unwrap(),
            hasher.hash("hunter2").unwrap()
        );
    }

    #[test]
    fn test_cost_is_embedded_in_hash() {
        assert!(hasher().hash("hunter2").unwrap().starts_with("$2b$04$"));
    }

    #[test]
    fn test_default_cost_is_embedded_in_hash() {
        let hash = PasswordHasher::default().hash("hunter2").unwrap();

        assert!(hash.starts_with(&format!("$2b${}$", bcrypt::DEFAULT_COST)));
    }

    #[test]
    fn test_overlong_password_is_never_truncated() {
        let hasher = hasher();
        let stored = "x".repeat(MAX_PASSWORD_BYTES);
        let hash = hasher.hash(&stored).unwrap();

        assert!(matches!(
            hasher.hash(&"x".repeat(MAX_PASSWORD_BYTES + 1)),
            Err(Error::InvalidPassword(_))
        ));
        assert!(!hasher.verify(&hash, &format!("{stored}y")).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(matches!(
            hasher().verify("not-a-bcrypt-hash", "hunter2"),
            Err(Error::Bcrypt(_))
        ));
    }

    #[tokio::test]
    async fn test_blocking_variants_agree() {
        let hasher = hasher();
        let hash = hasher.hash_blocking("hunter2".into()).await.unwrap();

        assert!(
            hasher
                .verify_blocking(hash.clone(), "hunter2".into())
                .await
                .unwrap()
        );
        assert!(!hasher.verify_blocking(hash, "wrong".into()).await.unwrap());
    }
}
