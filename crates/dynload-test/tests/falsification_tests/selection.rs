//! Falsification Tests: Category B - Backend Selection (F011-F013, F016-F020)

use dynload_core::{
    BackendProfile, BackendVariant, LoaderConfig, LoaderError, Platform, detect_platform, select,
    select_for, select_with,
};

// =============================================================================
// F011-F013: Platform-independent selection claims
// =============================================================================

/// F011: Unsupported platforms are refused, not defaulted
#[test]
fn f011_unsupported_platform_refused() {
    let result = select_for(Platform::Unsupported, &LoaderConfig::default());
    assert!(
        matches!(result, Err(LoaderError::UnsupportedPlatform(_))),
        "F011 FALSIFIED: unsupported platform produced a backend"
    );
}

/// F012: Invalid configuration is rejected before any library is bound
#[test]
fn f012_invalid_config_rejected() {
    let config = LoaderConfig::builder().alternate_library("").build();
    let result = select_for(Platform::Linux, &config);
    assert!(
        matches!(result, Err(LoaderError::Config(_))),
        "F012 FALSIFIED: empty library override accepted"
    );
}

/// F013: Detection is deterministic
#[test]
fn f013_detection_deterministic() {
    assert_eq!(detect_platform(), detect_platform(), "F013 FALSIFIED");
}

// =============================================================================
// F016-F020: Linux selection against the host loader
// =============================================================================

/// F016: Selection is deterministic per host
///
/// # Falsification Attempt
/// Select twice, compare every constant.
#[cfg(target_os = "linux")]
#[test]
fn f016_selection_deterministic() {
    let first = select().unwrap();
    let second = select().unwrap();
    assert_eq!(first.variant(), second.variant(), "F016 FALSIFIED: variant changed");
    assert_eq!(first.resolve_now(), second.resolve_now());
    assert_eq!(first.resolve_global(), second.resolve_global());
    assert_eq!(first.global_scope(), second.global_scope());
}

/// F017: Absent alternate library falls back to primary without error
///
/// # Falsification Attempt
/// Point the alternate name at a library that cannot exist.
#[cfg(target_os = "linux")]
#[test]
fn f017_absent_alternate_falls_back() {
    let config = LoaderConfig::builder()
        .alternate_library("libdl-falsification-absent.so.99")
        .primary_library("libdl.so.2")
        .build();
    let backend = select_with(&config).expect("F017 FALSIFIED: fallback raised an error");
    let primary = BackendProfile::LINUX_PRIMARY;
    assert_eq!(backend.variant(), BackendVariant::LinuxPrimary);
    assert_eq!(backend.resolve_now(), primary.resolve_now);
    assert_eq!(backend.resolve_global(), primary.resolve_global);
    assert!(backend.global_scope().is_null());
}

/// F018: Absent primary after absent alternate is fatal
///
/// # Falsification Attempt
/// Remove both libraries; selection must not invent a third option.
#[cfg(target_os = "linux")]
#[test]
fn f018_no_second_fallback() {
    let config = LoaderConfig::builder()
        .alternate_library("libdl-falsification-absent.so.98")
        .primary_library("libdl-falsification-absent.so.97")
        .build();
    let err = select_with(&config).unwrap_err();
    assert!(
        err.is_library_unavailable(),
        "F018 FALSIFIED: unexpected error kind: {err}"
    );
}

/// F019: The versioned library is preferred when present
#[cfg(target_os = "linux")]
#[test]
fn f019_alternate_preferred() {
    let backend = select().unwrap();
    assert_eq!(
        backend.variant(),
        BackendVariant::LinuxAlternate,
        "F019 FALSIFIED: libdl.so.2 present but not selected"
    );
}

/// F020: Selected backend matches the detected platform
#[cfg(any(target_os = "linux", target_os = "macos", target_os = "android"))]
#[test]
fn f020_backend_matches_platform() {
    let backend = select().unwrap();
    assert_eq!(
        backend.variant().platform(),
        detect_platform(),
        "F020 FALSIFIED: backend serves another platform"
    );
}
