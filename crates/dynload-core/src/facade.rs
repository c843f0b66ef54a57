//! Loader facade.
//!
//! The single surface the rest of a runtime depends on. It owns the selected
//! backend and forwards every call; it keeps no other state.

use std::ffi::{CString, c_int};
use std::sync::OnceLock;

use crate::backend::{LibraryHandle, LoaderBackend, SymbolAddress};
use crate::config::LoaderConfig;
use crate::detect::BackendVariant;
use crate::error::Result;
use crate::select;

static GLOBAL: OnceLock<Loader> = OnceLock::new();

/// Uniform open/resolve/close/last-error surface over the active backend.
///
/// ```rust,no_run
/// use dynload_core::Loader;
///
/// let loader = Loader::global()?;
/// let handle = loader.open("libm.so.6", loader.resolve_now())?;
/// if handle.is_null() {
///     eprintln!("open failed: {:?}", loader.last_error());
/// }
/// # Ok::<(), dynload_core::LoaderError>(())
/// ```
#[derive(Debug)]
pub struct Loader {
    backend: Box<dyn LoaderBackend>,
}

impl Loader {
    /// Wraps an already constructed backend.
    #[must_use]
    pub fn new(backend: Box<dyn LoaderBackend>) -> Self {
        Self { backend }
    }

    /// Selects the backend for this host with the default configuration.
    pub fn select() -> Result<Self> {
        select::select().map(Self::new)
    }

    /// Selects the backend for this host with `config`.
    pub fn select_with(config: &LoaderConfig) -> Result<Self> {
        select::select_with(config).map(Self::new)
    }

    /// Returns the process-wide loader, selecting it on first use.
    ///
    /// Selection uses [`LoaderConfig::from_env`]. A failed selection is not
    /// cached; the next call selects again.
    pub fn global() -> Result<&'static Self> {
        if let Some(loader) = GLOBAL.get() {
            return Ok(loader);
        }
        let loader = Self::select_with(&LoaderConfig::from_env()?)?;
        Ok(GLOBAL.get_or_init(|| loader))
    }

    /// Returns the active backend.
    #[must_use]
    pub fn backend(&self) -> &dyn LoaderBackend {
        self.backend.as_ref()
    }

    /// Returns the active backend variant.
    #[must_use]
    pub fn variant(&self) -> BackendVariant {
        self.backend.variant()
    }

    /// Opens the shared library at `path`.
    ///
    /// A library that cannot be loaded yields `Ok` with a null handle; the
    /// reason is available from [`Loader::last_error`].
    ///
    /// # Errors
    /// [`LoaderError::InvalidName`](crate::LoaderError::InvalidName) if
    /// `path` contains a NUL byte.
    pub fn open(&self, path: &str, flags: c_int) -> Result<LibraryHandle> {
        let c_path = CString::new(path)?;
        let handle = self.backend.open(&c_path, flags);
        tracing::trace!(path, flags, null = handle.is_null(), "open");
        Ok(handle)
    }

    /// Resolves `symbol` in `handle` (or the global scope sentinel).
    ///
    /// An absent symbol yields `Ok` with a null address.
    ///
    /// # Errors
    /// [`LoaderError::InvalidName`](crate::LoaderError::InvalidName) if
    /// `symbol` contains a NUL byte.
    pub fn resolve(&self, handle: LibraryHandle, symbol: &str) -> Result<SymbolAddress> {
        let c_symbol = CString::new(symbol)?;
        let address = self.backend.resolve(handle, &c_symbol);
        tracing::trace!(?handle, symbol, null = address.is_null(), "resolve");
        Ok(address)
    }

    /// Closes `handle`, returning the native status code (0 on success).
    pub fn close(&self, handle: LibraryHandle) -> c_int {
        let status = self.backend.close(handle);
        tracing::trace!(?handle, status, "close");
        status
    }

    /// Takes the calling thread's most recent loader error.
    pub fn last_error(&self) -> Option<String> {
        self.backend.last_error()
    }

    /// Eager binding flag of the active backend.
    #[must_use]
    pub fn resolve_now(&self) -> c_int {
        self.backend.resolve_now()
    }

    /// Global visibility flag of the active backend.
    #[must_use]
    pub fn resolve_global(&self) -> c_int {
        self.backend.resolve_global()
    }

    /// Global-scope sentinel of the active backend.
    #[must_use]
    pub fn global_scope(&self) -> LibraryHandle {
        self.backend.global_scope()
    }
}
