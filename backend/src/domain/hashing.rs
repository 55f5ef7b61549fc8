//! Password hashing kept off the async workers.
//!
//! Argon2 is deliberately slow, so every hash and verify runs on Tokio's
//! blocking pool.

use std::sync::Arc;

use crate::domain::Error;
use crate::domain::ports::PasswordHasher;

/// Run `work` against `hasher` on the blocking pool.
pub(crate) async fn off_worker<H, T, F>(hasher: &Arc<H>, work: F) -> Result<T, Error>
where
    H: PasswordHasher + 'static,
    T: Send + 'static,
    F: FnOnce(&H) -> T + Send + 'static,
{
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || work(&hasher))
        .await
        .map_err(|err| Error::internal(format!("password worker failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockPasswordHasher;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn work_runs_against_the_shared_hasher() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .withf(|plaintext| plaintext == "secret-value")
            .times(1)
            .return_once(|_| Ok("hashed".to_owned()));
        let hasher = Arc::new(hasher);

        let hashed = off_worker(&hasher, |hasher| hasher.hash("secret-value"))
            .await
            .expect("worker completes");
        assert_eq!(hashed.ok().as_deref(), Some("hashed"));
    }
}
