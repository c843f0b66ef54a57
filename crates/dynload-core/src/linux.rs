//! Linux loader backend.
//!
//! Distributions ship the loader library either under its unversioned name
//! (`libdl.so`) or only under its versioned name (`libdl.so.2`). Both bind
//! to the same glibc loader and share flag encodings.

use crate::config::BackendProfile;
use crate::detect::Platform;
use crate::error::Result;
use crate::native::{NativeLoader, forward_to_native};

/// Linux `libdl` backend.
#[derive(Debug)]
pub struct LinuxLoader {
    native: NativeLoader,
}

impl LinuxLoader {
    /// Binds the unversioned loader library.
    pub fn primary() -> Result<Self> {
        Self::with_profile(BackendProfile::LINUX_PRIMARY)
    }

    /// Binds the versioned loader library.
    pub fn alternate() -> Result<Self> {
        Self::with_profile(BackendProfile::LINUX_ALTERNATE)
    }

    /// Binds a Linux loader description, usually one from `LoaderConfig::profile`.
    ///
    /// # Errors
    /// [`LoaderError::Config`](crate::LoaderError::Config) if `profile` describes another
    /// platform's loader, otherwise as [`NativeLoader::bind`].
    pub fn with_profile(profile: BackendProfile) -> Result<Self> {
        Ok(Self {
            native: NativeLoader::bind_for(Platform::Linux, profile)?,
        })
    }

    /// Returns the loader library this backend is bound to.
    #[must_use]
    pub fn library(&self) -> &str {
        &self.native.profile().library
    }
}

forward_to_native!(LinuxLoader);
