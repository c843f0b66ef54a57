//! Recording loader backend.
//!
//! Simulates a native loader over an in-memory set of libraries and records
//! every call it receives. Unlike a real loader, the error message is shared
//! across threads.

use std::collections::HashMap;
use std::ffi::{CStr, c_int, c_void};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use dynload_core::{BackendProfile, BackendVariant, LibraryHandle, LoaderBackend, SymbolAddress};
use parking_lot::Mutex;

/// First fake handle value; small values are reserved for sentinels.
const HANDLE_BASE: usize = 0x1000;

/// A call received by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `open(path, flags)`.
    Open {
        /// Requested path.
        path: String,
        /// Requested flags.
        flags: c_int,
    },
    /// `resolve(handle, symbol)`.
    Resolve {
        /// Handle searched.
        handle: LibraryHandle,
        /// Requested symbol.
        symbol: String,
    },
    /// `close(handle)`.
    Close {
        /// Handle closed.
        handle: LibraryHandle,
    },
    /// `last_error()`.
    LastError,
}

/// In-memory loader backend for tests.
///
/// Cloning shares state, so a test can keep one clone for inspection while
/// the facade owns another.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    profile: BackendProfile,
    state: Arc<State>,
}

#[derive(Debug, Default)]
struct State {
    inner: Mutex<Inner>,
    open_count: AtomicU32,
    close_count: AtomicU32,
}

#[derive(Debug, Default)]
struct Inner {
    /// Library path to exported symbols.
    available: HashMap<String, Vec<String>>,
    /// Handle value to (library path, reference count).
    loaded: HashMap<usize, (String, u32)>,
    /// Handles ever issued; never reused after close.
    issued: usize,
    calls: Vec<Call>,
    last_error: Option<String>,
}

impl RecordingBackend {
    /// Creates a backend reporting the constants of `variant`.
    #[must_use]
    pub fn new(variant: BackendVariant) -> Self {
        Self {
            profile: BackendProfile::for_variant(variant),
            state: Arc::new(State::default()),
        }
    }

    /// Makes `path` loadable, exporting `symbols`.
    #[must_use]
    pub fn with_library(self, path: &str, symbols: &[&str]) -> Self {
        self.state.inner.lock().available.insert(
            path.to_string(),
            symbols.iter().map(|s| (*s).to_string()).collect(),
        );
        self
    }

    /// Returns every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.state.inner.lock().calls.clone()
    }

    /// Number of `open` calls received.
    #[must_use]
    pub fn open_count(&self) -> u32 {
        self.state.open_count.load(Ordering::SeqCst)
    }

    /// Number of `close` calls received.
    #[must_use]
    pub fn close_count(&self) -> u32 {
        self.state.close_count.load(Ordering::SeqCst)
    }

    /// Number of libraries currently loaded.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.state.inner.lock().loaded.len()
    }

    fn handle_for(index: usize) -> LibraryHandle {
        LibraryHandle::from_raw((HANDLE_BASE + index) as *mut c_void)
    }

    fn address_for(handle: usize, symbol: usize) -> SymbolAddress {
        SymbolAddress::from_raw((handle + 0x10 * (symbol + 1)) as *mut c_void)
    }
}

impl Inner {
    fn lookup(&self, handle: usize, symbol: &str) -> Option<usize> {
        let (path, _) = self.loaded.get(&handle)?;
        self.available.get(path)?.iter().position(|s| s == symbol)
    }
}

impl LoaderBackend for RecordingBackend {
    fn variant(&self) -> BackendVariant {
        self.profile.variant
    }

    fn open(&self, path: &CStr, flags: c_int) -> LibraryHandle {
        self.state.open_count.fetch_add(1, Ordering::SeqCst);
        let path = path.to_string_lossy().into_owned();
        let mut inner = self.state.inner.lock();
        inner.calls.push(Call::Open {
            path: path.clone(),
            flags,
        });

        if !inner.available.contains_key(&path) {
            inner.last_error = Some(format!(
                "{path}: cannot open shared object file: No such file or directory"
            ));
            return LibraryHandle::null();
        }

        let existing = inner
            .loaded
            .iter_mut()
            .find(|(_, (loaded, _))| *loaded == path);
        if let Some((&raw, (_, refs))) = existing {
            *refs += 1;
            return LibraryHandle::from_raw(raw as *mut c_void);
        }

        let handle = Self::handle_for(inner.issued);
        inner.issued += 1;
        inner.loaded.insert(handle.as_ptr() as usize, (path, 1));
        tracing::trace!(?handle, "recording backend opened library");
        handle
    }

    fn resolve(&self, handle: LibraryHandle, symbol: &CStr) -> SymbolAddress {
        let symbol = symbol.to_string_lossy().into_owned();
        let mut inner = self.state.inner.lock();
        inner.calls.push(Call::Resolve {
            handle,
            symbol: symbol.clone(),
        });

        let found = if handle == self.global_scope() {
            inner
                .loaded
                .keys()
                .copied()
                .find_map(|raw| inner.lookup(raw, &symbol).map(|i| (raw, i)))
        } else {
            let raw = handle.as_ptr() as usize;
            inner.lookup(raw, &symbol).map(|i| (raw, i))
        };

        match found {
            Some((raw, index)) => Self::address_for(raw, index),
            None => {
                inner.last_error = Some(format!("undefined symbol: {symbol}"));
                SymbolAddress::null()
            }
        }
    }

    fn close(&self, handle: LibraryHandle) -> c_int {
        self.state.close_count.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.state.inner.lock();
        inner.calls.push(Call::Close { handle });

        let raw = handle.as_ptr() as usize;
        match inner.loaded.get_mut(&raw) {
            Some((_, refs)) if *refs > 1 => {
                *refs -= 1;
                0
            }
            Some(_) => {
                inner.loaded.remove(&raw);
                0
            }
            None => {
                inner.last_error = Some("invalid handle".to_string());
                -1
            }
        }
    }

    fn last_error(&self) -> Option<String> {
        let mut inner = self.state.inner.lock();
        inner.calls.push(Call::LastError);
        inner.last_error.take()
    }

    fn resolve_now(&self) -> c_int {
        self.profile.resolve_now
    }

    fn resolve_global(&self) -> c_int {
        self.profile.resolve_global
    }

    fn global_scope(&self) -> LibraryHandle {
        LibraryHandle::from_sentinel(self.profile.global_scope)
    }
}
