//#![warn(missing_docs)]

pub mod algorithm;
pub use algorithm::Algorithm;

pub mod error;
pub use error::{BackendError, HashError};

pub mod hash;
pub use hash::{Digest, Hasher};

pub mod operation;
pub use operation::{digest_operation, DigestOperation, OperationCompleter};

pub mod engine;
pub use engine::{
    AlgorithmDescriptor, DigestEngine, EngineKind, NativeHashEngine, PendingDigest, PlatformDigest,
};

pub mod config;
pub use config::{EngineChoice, Environment, UnknownEngineChoice};

pub mod platform;

pub mod selector;
pub use selector::{default_selector, sha1, sha2256, sha2512, DigestFuture, DigestSelector};
