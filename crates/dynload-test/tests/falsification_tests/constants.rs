//! Falsification Tests: Category A - Backend Constants (F001-F010)

use std::collections::HashSet;

use dynload_core::{BackendProfile, BackendVariant, LibraryHandle, Platform};

// =============================================================================
// F001-F010: Flag and sentinel tables
// =============================================================================

/// F001: Flags are distinct within every variant
///
/// # Falsification Attempt
/// Compare RESOLVE_NOW and RESOLVE_GLOBAL for each variant.
#[test]
fn f001_flags_distinct_per_variant() {
    for variant in BackendVariant::all() {
        let profile = BackendProfile::for_variant(variant);
        assert_ne!(
            profile.resolve_now, profile.resolve_global,
            "F001 FALSIFIED: {variant} flags collide"
        );
    }
}

/// F002: RESOLVE_GLOBAL is non-zero on every variant
///
/// # Falsification Attempt
/// A zero flag cannot be combined with bitwise OR meaningfully.
#[test]
fn f002_resolve_global_non_zero() {
    for variant in BackendVariant::all() {
        assert_ne!(
            BackendProfile::for_variant(variant).resolve_global,
            0,
            "F002 FALSIFIED: {variant} RESOLVE_GLOBAL is zero"
        );
    }
}

/// F003: RESOLVE_NOW is non-zero except on Android
///
/// # Falsification Attempt
/// Bionic's 32-bit ABI encodes RTLD_NOW as 0; every other loader does not.
#[test]
fn f003_resolve_now_non_zero_outside_android() {
    for variant in BackendVariant::all() {
        let now = BackendProfile::for_variant(variant).resolve_now;
        if variant == BackendVariant::Android {
            assert_eq!(now, 0, "F003 FALSIFIED: Android RESOLVE_NOW should be 0");
        } else {
            assert_ne!(now, 0, "F003 FALSIFIED: {variant} RESOLVE_NOW is zero");
        }
    }
}

/// F004: Flag table matches the documented values
#[test]
fn f004_flag_table() {
    let expected = [
        (BackendVariant::LinuxPrimary, 0x2, 0x100, 0),
        (BackendVariant::LinuxAlternate, 0x2, 0x100, 0),
        (BackendVariant::MacOS, 0x2, 0x8, -2),
        (BackendVariant::Android, 0x0, 0x2, 0),
    ];
    for (variant, now, global, scope) in expected {
        let profile = BackendProfile::for_variant(variant);
        assert_eq!(
            (profile.resolve_now, profile.resolve_global, profile.global_scope),
            (now, global, scope),
            "F004 FALSIFIED: {variant} table mismatch"
        );
    }
}

/// F005: Only macOS has a non-null global scope sentinel
#[test]
fn f005_global_scope_sentinels() {
    for variant in BackendVariant::all() {
        let sentinel = BackendProfile::for_variant(variant).global_scope;
        let handle = LibraryHandle::from_sentinel(sentinel);
        assert_eq!(
            handle.is_null(),
            variant != BackendVariant::MacOS,
            "F005 FALSIFIED: {variant} sentinel nullness"
        );
    }
}

/// F006: Linux variants differ only by library name
#[test]
fn f006_linux_variants_share_encodings() {
    let primary = BackendProfile::LINUX_PRIMARY;
    let alternate = BackendProfile::LINUX_ALTERNATE;
    assert_ne!(primary.library, alternate.library, "F006 FALSIFIED: same library name");
    assert_eq!(primary.resolve_now, alternate.resolve_now);
    assert_eq!(primary.resolve_global, alternate.resolve_global);
    assert_eq!(primary.global_scope, alternate.global_scope);
}

/// F007: Android binds the same loader library as Linux primary
#[test]
fn f007_android_uses_primary_library() {
    assert_eq!(
        BackendProfile::ANDROID.library,
        BackendProfile::LINUX_PRIMARY.library,
        "F007 FALSIFIED: Android library differs"
    );
}

/// F008: macOS binds an absolute path
#[test]
fn f008_macos_library_absolute() {
    assert!(
        BackendProfile::MACOS.library.starts_with('/'),
        "F008 FALSIFIED: macOS loader library is not an absolute path"
    );
}

/// F009: Variant names are unique
#[test]
fn f009_variant_names_unique() {
    let mut seen = HashSet::new();
    for variant in BackendVariant::all() {
        assert!(
            seen.insert(variant.name()),
            "F009 FALSIFIED: Duplicate variant name: {}",
            variant.name()
        );
    }
}

/// F010: Every variant maps to a supported platform
#[test]
fn f010_variants_map_to_supported_platforms() {
    for variant in BackendVariant::all() {
        assert_ne!(
            variant.platform(),
            Platform::Unsupported,
            "F010 FALSIFIED: {variant} has no platform"
        );
    }
}
