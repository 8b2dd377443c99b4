use futures::task::SpawnError;
use thiserror::Error;

use crate::algorithm::Algorithm;

#[derive(Error, Debug)]
pub enum HashError {
    #[error("no digest backend available: register a native hash engine or use an environment with a platform digest API")]
    UnsupportedEnvironment,

    #[error("Error hashing data using {algorithm}")]
    Backend {
        algorithm: Algorithm,
        #[source]
        source: BackendError,
    },

    #[error("could not schedule digest completion: {0}")]
    Spawn(#[from] SpawnError),

    #[error("unknown digest algorithm: {0:?}")]
    UnknownAlgorithm(String),
}

impl HashError {
    pub(crate) fn backend(algorithm: Algorithm, source: BackendError) -> Self {
        HashError::Backend { algorithm, source }
    }
}

/// Failures reported by a backend while computing a digest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("algorithm {0:?} is not supported by this backend")]
    UnsupportedAlgorithm(String),

    #[error("{0}")]
    Failed(String),

    // The backend dropped the request without reporting either outcome
    #[error("digest operation was abandoned before completing")]
    Abandoned,

    #[cfg(all(feature = "web", target_arch = "wasm32"))]
    #[error("javascript exception: {0}")]
    Js(String),
}

pub type Result<T> = core::result::Result<T, HashError>;

#[cfg(test)]
mod tests {
    use super::{BackendError, HashError};
    use crate::algorithm::Algorithm;

    #[test]
    fn test_backend_message_names_algorithm() {
        let err = HashError::backend(Algorithm::Sha512, BackendError::Abandoned);
        assert_eq!(err.to_string(), "Error hashing data using SHA-512");

        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("digest operation was abandoned before completing")
        );
    }
}
