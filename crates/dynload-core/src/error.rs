//! Loader error types.
//!
//! Only failures that cannot be expressed in the OS loader's own convention
//! (null handle, null address, status code) become errors here.

use crate::detect::Platform;

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Loader errors.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// The native loader library itself could not be loaded.
    #[error("loader library unavailable: {library}: {source}")]
    LibraryUnavailable {
        /// Library name or path that was requested.
        library: String,
        /// Underlying loading failure.
        #[source]
        source: libloading::Error,
    },

    /// The loader library loaded but lacks a required entry point.
    #[error("loader library {library} has no entry point `{symbol}`: {source}")]
    MissingEntryPoint {
        /// Library name or path that was loaded.
        library: String,
        /// Entry point that could not be resolved.
        symbol: &'static str,
        /// Underlying resolution failure.
        #[source]
        source: libloading::Error,
    },

    /// Path or symbol name cannot be passed to the OS (interior NUL byte).
    #[error("invalid name: {0}")]
    InvalidName(#[from] std::ffi::NulError),

    /// No loader backend exists for this platform.
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(Platform),

    /// Invalid loader configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl LoaderError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true if the loader library itself could not be found or loaded.
    ///
    /// This is the only failure the backend selector recovers from.
    #[must_use]
    pub const fn is_library_unavailable(&self) -> bool {
        matches!(self, Self::LibraryUnavailable { .. })
    }
}
