use futures::{executor::ThreadPool, task::SpawnExt, FutureExt};
use ring::digest;

use crate::{
    engine::{AlgorithmDescriptor, PendingDigest, PlatformDigest},
    error::BackendError,
};

// Platform digest backed by `ring`. Digests are computed on a worker pool so
// that the calling thread is never blocked, and come back as a future.
pub struct RingDigest {
    pool: ThreadPool,
}

impl RingDigest {
    pub fn new() -> std::io::Result<Self> {
        let pool = ThreadPool::builder()
            .name_prefix("multidigest-")
            .create()?;
        Ok(Self::with_pool(pool))
    }

    pub fn with_pool(pool: ThreadPool) -> Self {
        Self { pool }
    }
}

// Platform APIs normalize algorithm names case-insensitively
fn ring_algorithm(name: &str) -> Option<&'static digest::Algorithm> {
    if name.eq_ignore_ascii_case("SHA-1") {
        Some(&digest::SHA1_FOR_LEGACY_USE_ONLY)
    } else if name.eq_ignore_ascii_case("SHA-256") {
        Some(&digest::SHA256)
    } else if name.eq_ignore_ascii_case("SHA-512") {
        Some(&digest::SHA512)
    } else {
        None
    }
}

impl PlatformDigest for RingDigest {
    fn digest(
        &self,
        algorithm: &AlgorithmDescriptor,
        data: Vec<u8>,
    ) -> Result<PendingDigest, BackendError> {
        let ring_algorithm = ring_algorithm(algorithm.name)
            .ok_or_else(|| BackendError::UnsupportedAlgorithm(algorithm.name.to_owned()))?;

        let handle = self
            .pool
            .spawn_with_handle(async move { digest::digest(ring_algorithm, &data).as_ref().to_vec() })
            .map_err(|err| BackendError::Failed(err.to_string()))?;

        Ok(PendingDigest::Future(handle.map(Ok).boxed_local()))
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::RingDigest;
    use crate::{
        engine::{AlgorithmDescriptor, PendingDigest, PlatformDigest},
        error::BackendError,
    };

    fn run(digest: &RingDigest, name: &'static str, data: &[u8]) -> Result<Vec<u8>, BackendError> {
        let pending = digest.digest(&AlgorithmDescriptor { name }, data.to_vec())?;
        assert!(matches!(pending, PendingDigest::Future(_)));
        block_on(pending.into_future())
    }

    #[test]
    fn test_empty_input() {
        let digest = RingDigest::new().unwrap();

        assert_eq!(
            hex::encode(run(&digest, "SHA-1", b"").unwrap()),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
        assert_eq!(
            hex::encode(run(&digest, "SHA-256", b"").unwrap()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(run(&digest, "SHA-512", b"").unwrap().len(), 64);
    }

    #[test]
    fn test_unsupported() {
        let digest = RingDigest::new().unwrap();
        assert_eq!(
            run(&digest, "SHA-384", b"abc"),
            Err(BackendError::UnsupportedAlgorithm("SHA-384".into()))
        );
    }
}
