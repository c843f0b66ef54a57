//! # dynload-test
//!
//! Testing infrastructure for dynload.
//!
//! This crate provides:
//! - **Recording backend**: an in-memory [`LoaderBackend`] that records
//!   every call the facade forwards, for testing code above the loader
//! - **Falsification tests**: each test in `tests/` attempts to refute one
//!   claim about loader behaviour on the host
//!
//! ## Example
//!
//! ```rust
//! use dynload_core::{BackendVariant, Loader};
//! use dynload_test::RecordingBackend;
//!
//! let backend = RecordingBackend::new(BackendVariant::LinuxPrimary)
//!     .with_library("libfoo.so", &["foo_init"]);
//! let loader = Loader::new(Box::new(backend.clone()));
//!
//! let handle = loader.open("libfoo.so", loader.resolve_now()).unwrap();
//! assert!(!loader.resolve(handle, "foo_init").unwrap().is_null());
//! assert_eq!(backend.calls().len(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod recording;

pub use recording::{Call, RecordingBackend};
