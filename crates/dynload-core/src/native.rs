//! Native loader binding table.
//!
//! Binds the four `dlfcn` entry points out of the loader library named in a
//! [`BackendProfile`] at runtime, so every variant differs only in data.

use std::ffi::{CStr, c_char, c_int, c_void};

use libloading::Library;

use crate::backend::{LibraryHandle, SymbolAddress};
use crate::config::BackendProfile;
use crate::detect::Platform;
use crate::error::{LoaderError, Result};

type DlOpenFn = unsafe extern "C" fn(*const c_char, c_int) -> *mut c_void;
type DlSymFn = unsafe extern "C" fn(*mut c_void, *const c_char) -> *mut c_void;
type DlCloseFn = unsafe extern "C" fn(*mut c_void) -> c_int;
type DlErrorFn = unsafe extern "C" fn() -> *mut c_char;

/// Entry points of one native loader library.
///
/// The `Library` is kept alive so the copied function pointers stay valid.
#[derive(Debug)]
pub struct NativeLoader {
    profile: BackendProfile,
    dlopen: DlOpenFn,
    dlsym: DlSymFn,
    dlclose: DlCloseFn,
    dlerror: DlErrorFn,
    _library: Library,
}

impl NativeLoader {
    /// Loads `profile.library` and binds its entry points.
    ///
    /// # Errors
    /// - [`LoaderError::LibraryUnavailable`] if the library cannot be loaded.
    /// - [`LoaderError::MissingEntryPoint`] if an entry point is absent.
    pub fn bind(profile: BackendProfile) -> Result<Self> {
        // SAFETY: the loader library is part of the system C runtime; its
        // initializers have already run for this process.
        let library = unsafe { Library::new(&*profile.library) }.map_err(|source| {
            LoaderError::LibraryUnavailable {
                library: profile.library.to_string(),
                source,
            }
        })?;

        // SAFETY: each type alias matches the C prototype in <dlfcn.h>.
        let (dlopen, dlsym, dlclose, dlerror) = unsafe {
            (
                entry_point::<DlOpenFn>(&library, &profile, "dlopen")?,
                entry_point::<DlSymFn>(&library, &profile, "dlsym")?,
                entry_point::<DlCloseFn>(&library, &profile, "dlclose")?,
                entry_point::<DlErrorFn>(&library, &profile, "dlerror")?,
            )
        };

        tracing::trace!(
            library = %profile.library,
            variant = %profile.variant,
            "bound loader entry points"
        );

        Ok(Self {
            profile,
            dlopen,
            dlsym,
            dlclose,
            dlerror,
            _library: library,
        })
    }

    /// Binds `profile` after checking that it describes a `platform` loader.
    ///
    /// # Errors
    /// [`LoaderError::Config`] if the profile belongs to another platform,
    /// otherwise as [`NativeLoader::bind`].
    pub fn bind_for(platform: Platform, profile: BackendProfile) -> Result<Self> {
        if profile.variant.platform() != platform {
            return Err(LoaderError::config(format!(
                "{} profile cannot back a {platform} loader",
                profile.variant
            )));
        }
        Self::bind(profile)
    }

    /// Returns the description this loader was bound from.
    #[must_use]
    pub const fn profile(&self) -> &BackendProfile {
        &self.profile
    }

    /// Calls `dlopen`.
    pub fn open(&self, path: &CStr, flags: c_int) -> LibraryHandle {
        // SAFETY: `path` is NUL-terminated and outlives the call. Running a
        // library's initializers is the documented effect of this call.
        LibraryHandle::from_raw(unsafe { (self.dlopen)(path.as_ptr(), flags) })
    }

    /// Calls `dlsym`.
    pub fn resolve(&self, handle: LibraryHandle, symbol: &CStr) -> SymbolAddress {
        // SAFETY: the loader validates `handle`; `symbol` is NUL-terminated.
        SymbolAddress::from_raw(unsafe { (self.dlsym)(handle.as_ptr(), symbol.as_ptr()) })
    }

    /// Calls `dlclose`.
    pub fn close(&self, handle: LibraryHandle) -> c_int {
        // SAFETY: the caller owns `handle`; the loader reports invalid ones.
        unsafe { (self.dlclose)(handle.as_ptr()) }
    }

    /// Calls `dlerror`, copying the message before it can be overwritten.
    pub fn last_error(&self) -> Option<String> {
        // SAFETY: `dlerror` returns null or a NUL-terminated thread-local
        // buffer valid until the next loader call on this thread.
        unsafe {
            let message = (self.dlerror)();
            if message.is_null() {
                None
            } else {
                Some(CStr::from_ptr(message).to_string_lossy().into_owned())
            }
        }
    }

    /// `RTLD_NOW` for this loader.
    #[must_use]
    pub const fn resolve_now(&self) -> c_int {
        self.profile.resolve_now
    }

    /// `RTLD_GLOBAL` for this loader.
    #[must_use]
    pub const fn resolve_global(&self) -> c_int {
        self.profile.resolve_global
    }

    /// `RTLD_DEFAULT` for this loader.
    #[must_use]
    pub const fn global_scope(&self) -> LibraryHandle {
        LibraryHandle::from_sentinel(self.profile.global_scope)
    }
}

/// Copies entry point `name` out of `library`.
///
/// # Safety
/// `T` must be the function pointer type of `name`.
unsafe fn entry_point<T: Copy>(
    library: &Library,
    profile: &BackendProfile,
    name: &'static str,
) -> Result<T> {
    // SAFETY: forwarded to the caller.
    let symbol = unsafe { library.get::<T>(name.as_bytes()) }.map_err(|source| {
        LoaderError::MissingEntryPoint {
            library: profile.library.to_string(),
            symbol: name,
            source,
        }
    })?;
    Ok(*symbol)
}

/// Implements [`LoaderBackend`](crate::backend::LoaderBackend) for a type
/// holding a `native: NativeLoader` field.
macro_rules! forward_to_native {
    ($backend:ty) => {
        impl $crate::backend::LoaderBackend for $backend {
            fn variant(&self) -> $crate::detect::BackendVariant {
                self.native.profile().variant
            }

            fn open(
                &self,
                path: &::std::ffi::CStr,
                flags: ::std::ffi::c_int,
            ) -> $crate::backend::LibraryHandle {
                self.native.open(path, flags)
            }

            fn resolve(
                &self,
                handle: $crate::backend::LibraryHandle,
                symbol: &::std::ffi::CStr,
            ) -> $crate::backend::SymbolAddress {
                self.native.resolve(handle, symbol)
            }

            fn close(&self, handle: $crate::backend::LibraryHandle) -> ::std::ffi::c_int {
                self.native.close(handle)
            }

            fn last_error(&self) -> Option<String> {
                self.native.last_error()
            }

            fn resolve_now(&self) -> ::std::ffi::c_int {
                self.native.resolve_now()
            }

            fn resolve_global(&self) -> ::std::ffi::c_int {
                self.native.resolve_global()
            }

            fn global_scope(&self) -> $crate::backend::LibraryHandle {
                self.native.global_scope()
            }
        }
    };
}

pub(crate) use forward_to_native;
