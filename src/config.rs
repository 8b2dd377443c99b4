use std::sync::Arc;
use core::str::FromStr;

use log::{debug, warn};
use thiserror::Error;

use crate::{
    engine::{NativeHashEngine, PlatformDigest},
    platform,
};

/// Environment variable restricting which compiled-in backends are registered.
pub const ENGINE_VAR: &str = "MULTIDIGEST_ENGINE";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EngineChoice {
    #[default]
    Auto,
    Native,
    Platform,
}

impl EngineChoice {
    pub fn from_env() -> Self {
        match std::env::var(ENGINE_VAR) {
            Ok(value) => value.parse().unwrap_or_else(|err: UnknownEngineChoice| {
                warn!("ignoring {}: {}, using auto", ENGINE_VAR, err);
                EngineChoice::Auto
            }),
            Err(_) => EngineChoice::Auto,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized engine choice {0:?}, expected auto, native or platform")]
pub struct UnknownEngineChoice(pub String);

impl FromStr for EngineChoice {
    type Err = UnknownEngineChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(EngineChoice::Auto),
            "native" => Ok(EngineChoice::Native),
            "platform" => Ok(EngineChoice::Platform),
            _ => Err(UnknownEngineChoice(s.to_owned())),
        }
    }
}

// The collaborators a selector may choose from. Absence is meaningful: the
// platform digest is only used when no native engine was registered at all.
#[derive(Clone, Default)]
pub struct Environment {
    native: Option<Arc<dyn NativeHashEngine>>,
    platform: Option<Arc<dyn PlatformDigest>>,
}

impl Environment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_native(mut self, engine: Arc<dyn NativeHashEngine>) -> Self {
        self.native = Some(engine);
        self
    }

    pub fn with_platform(mut self, digest: Arc<dyn PlatformDigest>) -> Self {
        self.platform = Some(digest);
        self
    }

    pub fn native(&self) -> Option<&Arc<dyn NativeHashEngine>> {
        self.native.as_ref()
    }

    pub fn platform(&self) -> Option<&Arc<dyn PlatformDigest>> {
        self.platform.as_ref()
    }

    /// Registers the backends compiled into this build, honoring `MULTIDIGEST_ENGINE`.
    pub fn detect() -> Self {
        Self::detect_with(EngineChoice::from_env())
    }

    pub fn detect_with(choice: EngineChoice) -> Self {
        let mut environment = Self::empty();
        if choice != EngineChoice::Platform {
            environment.native = platform::native_engine();
        }
        if choice != EngineChoice::Native {
            environment.platform = platform::platform_digest();
        }
        debug!(
            "detected digest environment ({:?}): native={} platform={}",
            choice,
            environment.native.is_some(),
            environment.platform.is_some()
        );
        environment
    }
}
