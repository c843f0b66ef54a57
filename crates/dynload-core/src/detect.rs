//! Platform detection.
//!
//! The host platform is fixed at compile time, so detection is a pure
//! function of the build target. Android is reported separately from Linux
//! because its loader uses different flag encodings.

use serde::{Deserialize, Serialize};

/// Supported platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux with a glibc-style `libdl`.
    Linux,
    /// macOS (dyld via `libSystem`).
    MacOS,
    /// Android (Bionic loader).
    Android,
    /// Any platform without a loader backend.
    Unsupported,
}

impl Platform {
    /// Returns the platform name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOS => "macos",
            Self::Android => "android",
            Self::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the current platform.
#[must_use]
pub const fn detect_platform() -> Platform {
    if cfg!(target_os = "android") {
        Platform::Android
    } else if cfg!(target_os = "linux") {
        Platform::Linux
    } else if cfg!(target_os = "macos") {
        Platform::MacOS
    } else {
        Platform::Unsupported
    }
}

/// Loader backend variants.
///
/// Each variant binds to one native loader library with its own flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendVariant {
    /// Linux loader under its unversioned name.
    LinuxPrimary,
    /// Linux loader under its versioned name.
    LinuxAlternate,
    /// macOS combined system runtime.
    MacOS,
    /// Android Bionic loader.
    Android,
}

impl BackendVariant {
    /// Returns every variant.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [
            Self::LinuxPrimary,
            Self::LinuxAlternate,
            Self::MacOS,
            Self::Android,
        ]
    }

    /// Returns the variant name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LinuxPrimary => "linux-primary",
            Self::LinuxAlternate => "linux-alternate",
            Self::MacOS => "macos",
            Self::Android => "android",
        }
    }

    /// Returns the platform this variant serves.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        match self {
            Self::LinuxPrimary | Self::LinuxAlternate => Platform::Linux,
            Self::MacOS => Platform::MacOS,
            Self::Android => Platform::Android,
        }
    }
}

impl std::fmt::Display for BackendVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
