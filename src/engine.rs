use std::sync::Arc;
use core::fmt;

use futures::future::LocalBoxFuture;

use crate::{
    error::BackendError,
    hash::Hasher,
    operation::DigestOperation,
};

// A native hash engine is synchronous: it constructs a hash object for a
// (case-insensitive) algorithm name, which is then fed and finalized inline.
pub trait NativeHashEngine: Send + Sync {
    fn hasher(&self, name: &str) -> Result<Box<dyn Hasher>, BackendError>;
}

/// What platform digest APIs receive in place of a bare algorithm name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AlgorithmDescriptor {
    pub name: &'static str,
}

// Platform digest APIs come in two calling conventions: modern ones return
// something future-like, legacy ones return an operation with event handlers.
pub enum PendingDigest {
    Future(LocalBoxFuture<'static, Result<Vec<u8>, BackendError>>),
    Operation(DigestOperation),
}

impl PendingDigest {
    pub fn into_future(self) -> LocalBoxFuture<'static, Result<Vec<u8>, BackendError>> {
        match self {
            PendingDigest::Future(future) => future,
            PendingDigest::Operation(operation) => Box::pin(operation.into_future()),
        }
    }
}

pub trait PlatformDigest: Send + Sync {
    fn digest(
        &self,
        algorithm: &AlgorithmDescriptor,
        data: Vec<u8>,
    ) -> Result<PendingDigest, BackendError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EngineKind {
    Native,
    Platform,
}

/// The backend a selector resolved to.
#[derive(Clone)]
pub enum DigestEngine {
    Native(Arc<dyn NativeHashEngine>),
    Platform(Arc<dyn PlatformDigest>),
}

impl DigestEngine {
    pub fn kind(&self) -> EngineKind {
        match self {
            DigestEngine::Native(_) => EngineKind::Native,
            DigestEngine::Platform(_) => EngineKind::Platform,
        }
    }
}

impl fmt::Debug for DigestEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DigestEngine").field(&self.kind()).finish()
    }
}
