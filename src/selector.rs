use std::sync::Arc;
use std::sync::OnceLock;

use futures::{
    future::{self, LocalBoxFuture},
    task::{LocalSpawn, LocalSpawnExt},
    FutureExt,
};
use log::{debug, info};

use crate::{
    algorithm::Algorithm,
    config::Environment,
    engine::{AlgorithmDescriptor, DigestEngine, NativeHashEngine, PlatformDigest},
    error::HashError,
    hash::Digest,
};

pub type DigestFuture = LocalBoxFuture<'static, Result<Digest, HashError>>;

// The selector picks one backend out of its environment the first time it is
// asked to hash and keeps using it. A native engine always wins. The platform
// digest is only used when no native engine was registered, never as a
// fallback for a native engine that fails.
pub struct DigestSelector {
    environment: Environment,
    engine: OnceLock<DigestEngine>,
}

impl DigestSelector {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            engine: OnceLock::new(),
        }
    }

    pub fn detect() -> Self {
        Self::new(Environment::detect())
    }

    /// The resolved backend. Only a successful resolution is stored, so an
    /// unsupported environment is reported again on every call.
    pub fn engine(&self) -> Result<&DigestEngine, HashError> {
        if let Some(engine) = self.engine.get() {
            return Ok(engine);
        }
        let engine = self.resolve()?;
        Ok(self.engine.get_or_init(|| engine))
    }

    fn resolve(&self) -> Result<DigestEngine, HashError> {
        if let Some(native) = self.environment.native() {
            debug!("resolved native hash engine");
            return Ok(DigestEngine::Native(Arc::clone(native)));
        }

        if let Some(platform) = self.environment.platform() {
            info!("native hash engine not found; falling back on platform digest");
            return Ok(DigestEngine::Platform(Arc::clone(platform)));
        }

        Err(HashError::UnsupportedEnvironment)
    }

    /// Starts hashing `data` and returns the pending digest.
    ///
    /// A missing backend is reported here, synchronously. Everything the
    /// backend itself reports comes out of the returned future.
    pub fn digest(&self, algorithm: Algorithm, data: &[u8]) -> Result<DigestFuture, HashError> {
        let pending = match self.engine()? {
            DigestEngine::Native(engine) => {
                // The native engine is synchronous, the result is ready before we return
                future::ready(native_digest(engine.as_ref(), algorithm, data)).boxed_local()
            }
            DigestEngine::Platform(platform) => platform_digest(platform.as_ref(), algorithm, data),
        };
        Ok(pending)
    }

    /// Hashes `data` and hands the outcome to `callback` from `spawner`.
    ///
    /// On `Err` the callback is dropped without being called. On `Ok` it is
    /// called exactly once, never before this returns.
    pub fn hash<S, F>(
        &self,
        spawner: &S,
        algorithm: Algorithm,
        data: &[u8],
        callback: F,
    ) -> Result<(), HashError>
    where
        S: LocalSpawn + ?Sized,
        F: FnOnce(Result<Digest, HashError>) + 'static,
    {
        let pending = self.digest(algorithm, data)?;
        spawner.spawn_local(pending.map(callback))?;
        Ok(())
    }

    pub fn sha1<S, F>(&self, spawner: &S, data: &[u8], callback: F) -> Result<(), HashError>
    where
        S: LocalSpawn + ?Sized,
        F: FnOnce(Result<Digest, HashError>) + 'static,
    {
        self.hash(spawner, Algorithm::Sha1, data, callback)
    }

    pub fn sha2256<S, F>(&self, spawner: &S, data: &[u8], callback: F) -> Result<(), HashError>
    where
        S: LocalSpawn + ?Sized,
        F: FnOnce(Result<Digest, HashError>) + 'static,
    {
        self.hash(spawner, Algorithm::Sha256, data, callback)
    }

    pub fn sha2512<S, F>(&self, spawner: &S, data: &[u8], callback: F) -> Result<(), HashError>
    where
        S: LocalSpawn + ?Sized,
        F: FnOnce(Result<Digest, HashError>) + 'static,
    {
        self.hash(spawner, Algorithm::Sha512, data, callback)
    }
}

fn native_digest(
    engine: &dyn NativeHashEngine,
    algorithm: Algorithm,
    data: &[u8],
) -> Result<Digest, HashError> {
    let mut hasher = engine
        .hasher(algorithm.engine_name())
        .map_err(|err| HashError::backend(algorithm, err))?;
    hasher.update(data);
    Ok(hasher.finalize_reset())
}

fn platform_digest(platform: &dyn PlatformDigest, algorithm: Algorithm, data: &[u8]) -> DigestFuture {
    let descriptor = AlgorithmDescriptor {
        name: algorithm.name(),
    };

    match platform.digest(&descriptor, data.to_vec()) {
        Ok(pending) => pending
            .into_future()
            .map(move |result| {
                result
                    .map(Digest::new)
                    .map_err(|err| HashError::backend(algorithm, err))
            })
            .boxed_local(),
        Err(err) => future::ready(Err(HashError::backend(algorithm, err))).boxed_local(),
    }
}

static DEFAULT_SELECTOR: OnceLock<DigestSelector> = OnceLock::new();

/// The process-wide selector over the backends compiled into this build.
pub fn default_selector() -> &'static DigestSelector {
    DEFAULT_SELECTOR.get_or_init(DigestSelector::detect)
}

pub fn sha1<S, F>(spawner: &S, data: &[u8], callback: F) -> Result<(), HashError>
where
    S: LocalSpawn + ?Sized,
    F: FnOnce(Result<Digest, HashError>) + 'static,
{
    default_selector().sha1(spawner, data, callback)
}

pub fn sha2256<S, F>(spawner: &S, data: &[u8], callback: F) -> Result<(), HashError>
where
    S: LocalSpawn + ?Sized,
    F: FnOnce(Result<Digest, HashError>) + 'static,
{
    default_selector().sha2256(spawner, data, callback)
}

pub fn sha2512<S, F>(spawner: &S, data: &[u8], callback: F) -> Result<(), HashError>
where
    S: LocalSpawn + ?Sized,
    F: FnOnce(Result<Digest, HashError>) + 'static,
{
    default_selector().sha2512(spawner, data, callback)
}
