//! Ambient device identifiers recorded alongside every golden.
//!
//! The diffing service keys baselines by the hardware/software combination
//! that produced them, so each metadata document carries a model string and a
//! platform version. Both are read once from the environment (the external
//! runner exports them when it knows better than the defaults), and sessions
//! take the identity as an injected value, so tests substitute a fixed one.

use std::env;

use once_cell::sync::Lazy;
use tracing::debug;

/// Environment variable overriding the detected model string.
pub const MODEL_ENV: &str = "RENDER_TEST_MODEL";

/// Environment variable overriding the detected platform version.
pub const SDK_VERSION_ENV: &str = "RENDER_TEST_SDK_VERSION";

static DETECTED: Lazy<DeviceIdentity> = Lazy::new(|| {
    let model = env::var(MODEL_ENV)
        .unwrap_or_else(|_| format!("{}-{}", env::consts::OS, env::consts::ARCH));
    let sdk_version = env::var(SDK_VERSION_ENV).unwrap_or_else(|_| "0".to_string());
    let identity = DeviceIdentity::new(model, sdk_version);
    debug!(identity = %identity.model_sdk_identifier(), "Detected ambient device identity");
    identity
});

/// The device identifiers stamped into golden metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Hardware model string (free-form, spaces allowed).
    pub model: String,
    /// Platform version, already stringified.
    pub sdk_version: String,
}

impl DeviceIdentity {
    /// Identity with explicit values; the substitution point for tests.
    pub fn new(model: impl Into<String>, sdk_version: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            sdk_version: sdk_version.into(),
        }
    }

    /// The ambient identity: environment overrides when present, otherwise the
    /// host OS and architecture with a zero platform version. Read once per
    /// process.
    pub fn detect() -> Self {
        DETECTED.clone()
    }

    /// A single token identifying the model/platform pair, with spaces in the
    /// model replaced by underscores. Used to label device goldens in logs.
    pub fn model_sdk_identifier(&self) -> String {
        format!("{}-{}", self.model.replace(' ', "_"), self.sdk_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_joins_model_and_version() {
        let identity = DeviceIdentity::new("Pixel 2", "27");
        assert_eq!(identity.model_sdk_identifier(), "Pixel_2-27");
    }

    #[test]
    fn identifier_keeps_spaceless_models_intact() {
        let identity = DeviceIdentity::new("linux-x86_64", "0");
        assert_eq!(identity.model_sdk_identifier(), "linux-x86_64-0");
    }

    #[test]
    fn detect_is_stable_within_a_process() {
        assert_eq!(DeviceIdentity::detect(), DeviceIdentity::detect());
    }
}
