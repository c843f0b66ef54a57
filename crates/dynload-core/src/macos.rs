//! macOS loader backend.
//!
//! dyld exports the `dlfcn` entry points from `libSystem`, which is always
//! addressed by absolute path. `RTLD_DEFAULT` is `-2` rather than null.

use crate::config::BackendProfile;
use crate::detect::Platform;
use crate::error::Result;
use crate::native::{NativeLoader, forward_to_native};

/// macOS dyld backend.
#[derive(Debug)]
pub struct MacLoader {
    native: NativeLoader,
}

impl MacLoader {
    /// Binds `/usr/lib/libSystem.dylib`.
    pub fn new() -> Result<Self> {
        Self::with_profile(BackendProfile::MACOS)
    }

    /// Binds a macOS loader description with an overridden library path.
    ///
    /// # Errors
    /// [`LoaderError::Config`](crate::LoaderError::Config) if `profile` describes another
    /// platform's loader, otherwise as [`NativeLoader::bind`].
    pub fn with_profile(profile: BackendProfile) -> Result<Self> {
        Ok(Self {
            native: NativeLoader::bind_for(Platform::MacOS, profile)?,
        })
    }
}

forward_to_native!(MacLoader);
