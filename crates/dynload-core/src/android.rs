//! Android loader backend.
//!
//! Bionic exports the `dlfcn` entry points from the same `libdl.so` as
//! Linux, but with the 32-bit ABI encodings: `RTLD_NOW` is `0` and
//! `RTLD_GLOBAL` is `2`. Namespace-aware loading (`android_dlopen_ext`) is
//! not bound.

use crate::config::BackendProfile;
use crate::detect::Platform;
use crate::error::Result;
use crate::native::{NativeLoader, forward_to_native};

/// Android Bionic backend.
#[derive(Debug)]
pub struct AndroidLoader {
    native: NativeLoader,
}

impl AndroidLoader {
    /// Binds Bionic's `libdl.so`.
    pub fn new() -> Result<Self> {
        Self::with_profile(BackendProfile::ANDROID)
    }

    /// Binds an Android loader description with an overridden library name.
    ///
    /// # Errors
    /// [`LoaderError::Config`](crate::LoaderError::Config) if `profile` describes another
    /// platform's loader, otherwise as [`NativeLoader::bind`].
    pub fn with_profile(profile: BackendProfile) -> Result<Self> {
        Ok(Self {
            native: NativeLoader::bind_for(Platform::Android, profile)?,
        })
    }
}

forward_to_native!(AndroidLoader);
