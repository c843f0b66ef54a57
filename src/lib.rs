//! dynload: Cross-Platform Native Library Loading
//!
//! Loads native shared libraries and resolves symbols through one uniform
//! surface, whatever the host's dynamic loader is called.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dynload::prelude::*;
//!
//! let loader = Loader::global()?;
//! let handle = loader.open("libm.so.6", loader.resolve_now())?;
//! let sqrt = loader.resolve(handle, "sqrt")?;
//! assert!(!sqrt.is_null());
//! loader.close(handle);
//! # Ok::<(), LoaderError>(())
//! ```

pub use dynload_core as core;

/// Prelude module for common imports.
pub mod prelude {
    pub use dynload_core::{
        BackendVariant, LibraryHandle, Loader, LoaderBackend, LoaderConfig, LoaderError,
        Platform, SymbolAddress, detect_platform,
    };
}
