//! Falsification Tests: Category C - Loader Operations (F021-F024, F026-F032)
//!
//! These run against the real OS loader of the host.

#![cfg(any(target_os = "linux", target_os = "macos"))]

use dynload_core::Loader;
use proptest::prelude::*;

/// A system library present on every supported host, and one of its exports.
#[cfg(target_os = "linux")]
const SYSTEM_LIBRARY: &str = "libm.so.6";
#[cfg(target_os = "macos")]
const SYSTEM_LIBRARY: &str = "/usr/lib/libSystem.B.dylib";
const KNOWN_SYMBOL: &str = "cos";

fn loader() -> Loader {
    Loader::select().expect("host loader backend")
}

// =============================================================================
// F021-F024: Error reporting
// =============================================================================

/// F021: Opening an absent library yields null, not an error
#[test]
fn f021_open_absent_is_null() {
    let loader = loader();
    let handle = loader
        .open("/nonexistent/libfalsification.so", loader.resolve_now())
        .unwrap();
    assert!(handle.is_null(), "F021 FALSIFIED: absent library opened");
}

/// F022: Last error is reported once, then cleared
///
/// # Falsification Attempt
/// Read the error twice after a failed open.
#[test]
fn f022_last_error_consumed_once() {
    let loader = loader();
    let _ = loader.last_error();
    let handle = loader
        .open("/nonexistent/libfalsification.so", loader.resolve_now())
        .unwrap();
    assert!(handle.is_null());

    let first = loader.last_error();
    assert!(
        first.as_deref().is_some_and(|m| !m.is_empty()),
        "F022 FALSIFIED: no error message after failed open"
    );
    assert!(
        loader.last_error().is_none(),
        "F022 FALSIFIED: error message not cleared"
    );
}

/// F023: Last error is thread-local
///
/// # Falsification Attempt
/// Fail on one thread, read on another.
#[test]
fn f023_last_error_thread_local() {
    let loader = std::sync::Arc::new(loader());
    let _ = loader.last_error();
    let handle = loader
        .open("/nonexistent/libfalsification.so", loader.resolve_now())
        .unwrap();
    assert!(handle.is_null());

    let other = std::sync::Arc::clone(&loader);
    let seen_elsewhere = std::thread::spawn(move || other.last_error())
        .join()
        .unwrap();
    assert!(seen_elsewhere.is_none(), "F023 FALSIFIED: error leaked across threads");
    assert!(loader.last_error().is_some());
}

/// F024: Resolving an absent symbol yields null and an error message
#[test]
fn f024_resolve_absent_symbol() {
    let loader = loader();
    let handle = loader.open(SYSTEM_LIBRARY, loader.resolve_now()).unwrap();
    assert!(!handle.is_null());

    let address = loader
        .resolve(handle, "falsification_symbol_that_does_not_exist")
        .unwrap();
    assert!(address.is_null(), "F024 FALSIFIED: absent symbol resolved");
    assert!(loader.last_error().is_some());
    assert_eq!(loader.close(handle), 0);
}

// =============================================================================
// F026-F030: Successful operations
// =============================================================================

/// F026: End-to-end open, resolve, close
#[test]
fn f026_end_to_end() {
    let loader = loader();
    let handle = loader.open(SYSTEM_LIBRARY, loader.resolve_now()).unwrap();
    assert!(!handle.is_null(), "F026 FALSIFIED: {:?}", loader.last_error());

    let address = loader.resolve(handle, KNOWN_SYMBOL).unwrap();
    assert!(!address.is_null(), "F026 FALSIFIED: {KNOWN_SYMBOL} not found");
    assert_eq!(loader.close(handle), 0, "F026 FALSIFIED: close failed");
}

/// F027: Global scope finds symbols without a handle
#[test]
fn f027_global_scope_resolution() {
    let loader = loader();
    let address = loader.resolve(loader.global_scope(), "malloc").unwrap();
    assert!(!address.is_null(), "F027 FALSIFIED: malloc not in global scope");
}

/// F028: Combined flags are accepted by the OS
#[test]
fn f028_combined_flags() {
    let loader = loader();
    let flags = loader.resolve_now() | loader.resolve_global();
    let handle = loader.open(SYSTEM_LIBRARY, flags).unwrap();
    assert!(!handle.is_null(), "F028 FALSIFIED: {:?}", loader.last_error());
    assert_eq!(loader.close(handle), 0);
}

/// F029: Handles are reference counted by the OS
///
/// # Falsification Attempt
/// Open twice, close once, the handle must still resolve.
#[test]
fn f029_reference_counted_handles() {
    let loader = loader();
    let first = loader.open(SYSTEM_LIBRARY, loader.resolve_now()).unwrap();
    let second = loader.open(SYSTEM_LIBRARY, loader.resolve_now()).unwrap();
    assert_eq!(first, second, "F029 FALSIFIED: distinct handles for one library");

    assert_eq!(loader.close(first), 0);
    assert!(!loader.resolve(second, KNOWN_SYMBOL).unwrap().is_null());
    assert_eq!(loader.close(second), 0);
}

/// F030: Resolution is stable across calls
#[test]
fn f030_resolution_stable() {
    let loader = loader();
    let handle = loader.open(SYSTEM_LIBRARY, loader.resolve_now()).unwrap();
    let a = loader.resolve(handle, KNOWN_SYMBOL).unwrap();
    let b = loader.resolve(handle, KNOWN_SYMBOL).unwrap();
    assert_eq!(a, b, "F030 FALSIFIED: address moved");
    assert_eq!(loader.close(handle), 0);
}

// =============================================================================
// F031-F032: Property-based claims
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// F031: Any absent library path yields null plus one error message
    #[test]
    fn f031_absent_paths_yield_null(name in "[a-z]{6,16}") {
        let loader = loader();
        let path = format!("/nonexistent/falsification/lib{name}.so");
        let handle = loader.open(&path, loader.resolve_now()).unwrap();
        prop_assert!(handle.is_null());
        prop_assert!(loader.last_error().is_some());
        prop_assert!(loader.last_error().is_none());
    }

    /// F032: Names with interior NUL never reach the OS
    #[test]
    fn f032_interior_nul_rejected(head in "[a-z]{1,8}", tail in "[a-z]{1,8}") {
        let loader = loader();
        let path = format!("{head}\0{tail}");
        prop_assert!(loader.open(&path, loader.resolve_now()).is_err());
        prop_assert!(loader.resolve(loader.global_scope(), &path).is_err());
    }
}
