use sha1::Sha1;
use sha2::{digest::FixedOutputReset, Sha256, Sha512};

use crate::{
    engine::NativeHashEngine,
    error::BackendError,
    hash::{Digest, Hasher},
};

/// Native engine backed by the RustCrypto `sha1` and `sha2` crates.
#[derive(Copy, Clone, Debug, Default)]
pub struct RustCryptoEngine;

impl NativeHashEngine for RustCryptoEngine {
    fn hasher(&self, name: &str) -> Result<Box<dyn Hasher>, BackendError> {
        match name.to_ascii_lowercase().as_str() {
            "sha-1" | "sha1" => Ok(Box::new(DigestHasher::<Sha1>::new())),
            "sha-256" | "sha256" => Ok(Box::new(DigestHasher::<Sha256>::new())),
            "sha-512" | "sha512" => Ok(Box::new(DigestHasher::<Sha512>::new())),
            _ => Err(BackendError::UnsupportedAlgorithm(name.to_owned())),
        }
    }
}

pub struct DigestHasher<D> {
    inner: D,
}

impl<D: sha2::Digest> DigestHasher<D> {
    pub fn new() -> Self {
        Self { inner: D::new() }
    }
}

impl<D: sha2::Digest> Default for DigestHasher<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Hasher for DigestHasher<D>
where
    D: sha2::Digest + FixedOutputReset,
{
    fn reset(&mut self) {
        sha2::Digest::reset(&mut self.inner);
    }

    fn update(&mut self, input: &[u8]) {
        sha2::Digest::update(&mut self.inner, input);
    }

    fn finalize_reset(&mut self) -> Digest {
        Digest::new(sha2::Digest::finalize_reset(&mut self.inner).to_vec())
    }
}
