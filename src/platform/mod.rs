use std::sync::Arc;

use crate::engine::{NativeHashEngine, PlatformDigest};

#[cfg(feature = "sha2")]
mod rustcrypto;

#[cfg(feature = "sha2")]
pub use rustcrypto::*;

#[cfg(all(feature = "ring", not(target_arch = "wasm32")))]
mod ring_digest;

#[cfg(all(feature = "ring", not(target_arch = "wasm32")))]
pub use ring_digest::*;

#[cfg(any(test, all(feature = "web", target_arch = "wasm32")))]
mod surface;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use surface::SubtleSurface;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::*;

#[cfg(feature = "sha2")]
pub fn native_engine() -> Option<Arc<dyn NativeHashEngine>> {
    Some(Arc::new(RustCryptoEngine))
}

#[cfg(not(feature = "sha2"))]
pub fn native_engine() -> Option<Arc<dyn NativeHashEngine>> {
    None
}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub fn platform_digest() -> Option<Arc<dyn PlatformDigest>> {
    WebSubtle::probe().map(|subtle| Arc::new(subtle) as Arc<dyn PlatformDigest>)
}

#[cfg(all(feature = "ring", not(target_arch = "wasm32")))]
pub fn platform_digest() -> Option<Arc<dyn PlatformDigest>> {
    match RingDigest::new() {
        Ok(digest) => Some(Arc::new(digest)),
        Err(err) => {
            log::warn!("could not start the ring digest worker pool: {}", err);
            None
        }
    }
}

#[cfg(not(any(
    all(feature = "web", target_arch = "wasm32"),
    all(feature = "ring", not(target_arch = "wasm32"))
)))]
pub fn platform_digest() -> Option<Arc<dyn PlatformDigest>> {
    None
}
