//! Loader backend contract.
//!
//! Every platform variant exposes the same four native operations plus the
//! flag constants and the global-scope sentinel of its loader. Failures use
//! the OS convention: null handles, null addresses and raw status codes.

use std::ffi::{CStr, c_int, c_void};
use std::fmt;

use crate::detect::BackendVariant;

/// Opaque handle to a loaded native module.
///
/// The handle is owned by whoever called `open`; nothing in this crate
/// closes it implicitly.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct LibraryHandle(*mut c_void);

// SAFETY: a loader handle is an identifier the OS resolves on every call.
// It does not point at memory this process dereferences.
unsafe impl Send for LibraryHandle {}
unsafe impl Sync for LibraryHandle {}

impl LibraryHandle {
    /// The null handle.
    #[must_use]
    pub const fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    /// Wraps a raw handle value.
    #[must_use]
    pub const fn from_raw(raw: *mut c_void) -> Self {
        Self(raw)
    }

    /// Builds a handle from a sentinel bit pattern such as `-2`.
    #[must_use]
    pub const fn from_sentinel(value: isize) -> Self {
        Self(value as *mut c_void)
    }

    /// Returns true for the null handle.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Returns the raw handle value.
    #[must_use]
    pub const fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

impl fmt::Debug for LibraryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LibraryHandle({:p})", self.0)
    }
}

/// Opaque address of a resolved symbol.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SymbolAddress(*mut c_void);

// SAFETY: the address is handed back to the caller uninterpreted.
unsafe impl Send for SymbolAddress {}
unsafe impl Sync for SymbolAddress {}

impl SymbolAddress {
    /// The null address.
    #[must_use]
    pub const fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    /// Wraps a raw address.
    #[must_use]
    pub const fn from_raw(raw: *mut c_void) -> Self {
        Self(raw)
    }

    /// Returns true if the symbol was not found (or resolved to zero).
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Returns the raw address.
    #[must_use]
    pub const fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

impl fmt::Debug for SymbolAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolAddress({:p})", self.0)
    }
}

/// Platform-specific native loader.
///
/// Implementations forward each call to exactly one native entry point and
/// do not interpret the result.
pub trait LoaderBackend: Send + Sync + fmt::Debug {
    /// Returns the variant this backend implements.
    fn variant(&self) -> BackendVariant;

    /// Maps the shared library at `path` into the process.
    ///
    /// Returns a null handle on failure; see [`LoaderBackend::last_error`].
    fn open(&self, path: &CStr, flags: c_int) -> LibraryHandle;

    /// Looks up `symbol` in `handle`, or in the global scope when `handle`
    /// is the [`global_scope`](LoaderBackend::global_scope) sentinel.
    fn resolve(&self, handle: LibraryHandle, symbol: &CStr) -> SymbolAddress;

    /// Drops one reference to `handle`. Returns the native status code.
    fn close(&self, handle: LibraryHandle) -> c_int;

    /// Takes the calling thread's most recent loader error message.
    ///
    /// The message is cleared by this call; a second call returns `None`.
    fn last_error(&self) -> Option<String>;

    /// Flag value for eager symbol binding.
    fn resolve_now(&self) -> c_int;

    /// Flag value for exporting symbols to later loads.
    fn resolve_global(&self) -> c_int;

    /// Handle meaning "search the global symbol table".
    fn global_scope(&self) -> LibraryHandle;
}
