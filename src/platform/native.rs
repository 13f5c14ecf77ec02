// SPDX-License-Identifier: MPL-2.0
//! Bridge adapters.

use super::{BridgeError, PlatformBridge};

/// Reports the operating system the binary was compiled for.
///
/// Names follow `std::env::consts::OS` (`"linux"`, `"windows"`, `"macos"`,
/// `"ios"`, `"android"`, ...). WebAssembly builds run inside a browser and
/// have no native bridge.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBridge;

impl PlatformBridge for NativeBridge {
    fn platform(&self) -> Result<String, BridgeError> {
        if cfg!(target_family = "wasm") {
            return Err(BridgeError::Unavailable);
        }

        match std::env::consts::OS {
            "" => Err(BridgeError::Unavailable),
            os => Ok(os.to_string()),
        }
    }
}

/// Always reports the same platform, e.g. a configured override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedBridge(String);

impl FixedBridge {
    pub fn new(platform: impl Into<String>) -> Self {
        Self(platform.into())
    }
}

impl PlatformBridge for FixedBridge {
    fn platform(&self) -> Result<String, BridgeError> {
        Ok(self.0.clone())
    }
}
