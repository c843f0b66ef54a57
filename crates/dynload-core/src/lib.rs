// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # dynload-core
//!
//! Cross-platform loading of native shared libraries and symbol resolution.
//!
//! The host platform picks one loader backend at startup. Every backend
//! exposes the same contract:
//!
//! - `open(path, flags)`: null handle on failure
//! - `resolve(handle, name)`: null address if the symbol is absent
//! - `close(handle)`: native status code
//! - `last_error()`: thread-local message, cleared when read
//!
//! plus the flag constants `RESOLVE_NOW` and `RESOLVE_GLOBAL` and the
//! `GLOBAL_SCOPE` sentinel, whose numeric values differ per platform.
//!
//! ## Platform Support
//!
//! | Variant | Loader library | `RESOLVE_NOW` | `RESOLVE_GLOBAL` | `GLOBAL_SCOPE` |
//! |---------|----------------|---------------|------------------|----------------|
//! | Linux (primary) | `libdl.so` | `0x2` | `0x100` | `0` |
//! | Linux (alternate) | `libdl.so.2` | `0x2` | `0x100` | `0` |
//! | macOS | `/usr/lib/libSystem.dylib` | `0x2` | `0x8` | `-2` |
//! | Android | `libdl.so` | `0x0` | `0x2` | `0` |
//!
//! On Linux the alternate library is tried first; if it is absent the
//! primary name is used. No other failure is recovered.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dynload_core::Loader;
//!
//! let loader = Loader::select()?;
//! let handle = loader.open("libm.so.6", loader.resolve_now())?;
//! let cos = loader.resolve(handle, "cos")?;
//! assert!(!cos.is_null());
//! assert_eq!(loader.close(handle), 0);
//! # Ok::<(), dynload_core::LoaderError>(())
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod backend;
pub mod config;
pub mod detect;
pub mod error;
pub mod facade;
pub mod select;

#[cfg(unix)]
pub mod android;
#[cfg(unix)]
pub mod linux;
#[cfg(unix)]
pub mod macos;
#[cfg(unix)]
pub mod native;

pub use backend::{LibraryHandle, LoaderBackend, SymbolAddress};
pub use config::{BackendProfile, LoaderConfig, LoaderConfigBuilder};
pub use detect::{BackendVariant, Platform, detect_platform};
pub use error::{LoaderError, Result};
pub use facade::Loader;
pub use select::{select, select_for, select_with};

#[cfg(unix)]
pub use android::AndroidLoader;
#[cfg(unix)]
pub use linux::LinuxLoader;
#[cfg(unix)]
pub use macos::MacLoader;
#[cfg(unix)]
pub use native::NativeLoader;
