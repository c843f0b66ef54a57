//! Loader configuration.
//!
//! [`BackendProfile`] describes one native loader: the library that provides
//! the entry points and the numeric encodings of its flags. The four
//! variant descriptions are constants; [`LoaderConfig`] only overrides
//! library names and the selection probe.

use std::borrow::Cow;
use std::ffi::c_int;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detect::BackendVariant;
use crate::error::{LoaderError, Result};

/// Description of one native loader variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendProfile {
    /// Variant described.
    pub variant: BackendVariant,
    /// Library exporting `dlopen`, `dlsym`, `dlclose` and `dlerror`.
    pub library: Cow<'static, str>,
    /// `RTLD_NOW` on this loader.
    pub resolve_now: c_int,
    /// `RTLD_GLOBAL` on this loader.
    pub resolve_global: c_int,
    /// Bit pattern of `RTLD_DEFAULT` on this loader.
    pub global_scope: isize,
}

impl BackendProfile {
    /// Linux loader, unversioned library name.
    pub const LINUX_PRIMARY: Self = Self {
        variant: BackendVariant::LinuxPrimary,
        library: Cow::Borrowed("libdl.so"),
        resolve_now: 0x2,
        resolve_global: 0x100,
        global_scope: 0,
    };

    /// Linux loader, versioned library name.
    pub const LINUX_ALTERNATE: Self = Self {
        variant: BackendVariant::LinuxAlternate,
        library: Cow::Borrowed("libdl.so.2"),
        resolve_now: 0x2,
        resolve_global: 0x100,
        global_scope: 0,
    };

    /// macOS, where the loader lives in the combined system runtime.
    pub const MACOS: Self = Self {
        variant: BackendVariant::MacOS,
        library: Cow::Borrowed("/usr/lib/libSystem.dylib"),
        resolve_now: 0x2,
        resolve_global: 0x8,
        global_scope: -2,
    };

    /// Android Bionic loader (32-bit ABI encodings).
    pub const ANDROID: Self = Self {
        variant: BackendVariant::Android,
        library: Cow::Borrowed("libdl.so"),
        resolve_now: 0x0,
        resolve_global: 0x00002,
        global_scope: 0,
    };

    /// Returns the built-in description of `variant`.
    #[must_use]
    pub const fn for_variant(variant: BackendVariant) -> Self {
        match variant {
            BackendVariant::LinuxPrimary => Self::LINUX_PRIMARY,
            BackendVariant::LinuxAlternate => Self::LINUX_ALTERNATE,
            BackendVariant::MacOS => Self::MACOS,
            BackendVariant::Android => Self::ANDROID,
        }
    }

    /// Replaces the loader library name, keeping the flag encodings.
    #[must_use]
    pub fn with_library(mut self, library: impl Into<Cow<'static, str>>) -> Self {
        self.library = library.into();
        self
    }
}

/// Configuration for backend selection.
///
/// ```rust
/// use dynload_core::LoaderConfig;
///
/// let config = LoaderConfig::builder()
///     .alternate_library("libdl.so.2")
///     .probe_alternate(true)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Override for the Linux primary loader library.
    pub primary_library: Option<String>,
    /// Override for the Linux alternate loader library.
    pub alternate_library: Option<String>,
    /// Override for the macOS loader library.
    pub macos_library: Option<String>,
    /// Override for the Android loader library.
    pub android_library: Option<String>,
    /// Try the alternate Linux library before the primary one.
    pub probe_alternate: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            primary_library: None,
            alternate_library: None,
            macos_library: None,
            android_library: None,
            probe_alternate: true,
        }
    }
}

impl LoaderConfig {
    /// Environment variable overriding the Linux primary library.
    pub const ENV_PRIMARY_LIBRARY: &'static str = "DYNLOAD_PRIMARY_LIBRARY";
    /// Environment variable overriding the Linux alternate library.
    pub const ENV_ALTERNATE_LIBRARY: &'static str = "DYNLOAD_ALTERNATE_LIBRARY";
    /// Environment variable overriding the macOS library.
    pub const ENV_MACOS_LIBRARY: &'static str = "DYNLOAD_MACOS_LIBRARY";
    /// Environment variable overriding the Android library.
    pub const ENV_ANDROID_LIBRARY: &'static str = "DYNLOAD_ANDROID_LIBRARY";
    /// Environment variable toggling the alternate probe (`0`/`false` disables).
    pub const ENV_PROBE_ALTERNATE: &'static str = "DYNLOAD_PROBE_ALTERNATE";

    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> LoaderConfigBuilder {
        LoaderConfigBuilder::new()
    }

    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| LoaderError::config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps variable names to values.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(value) = lookup(Self::ENV_PRIMARY_LIBRARY) {
            self.primary_library = Some(value);
        }
        if let Some(value) = lookup(Self::ENV_ALTERNATE_LIBRARY) {
            self.alternate_library = Some(value);
        }
        if let Some(value) = lookup(Self::ENV_MACOS_LIBRARY) {
            self.macos_library = Some(value);
        }
        if let Some(value) = lookup(Self::ENV_ANDROID_LIBRARY) {
            self.android_library = Some(value);
        }
        if let Some(value) = lookup(Self::ENV_PROBE_ALTERNATE) {
            self.probe_alternate = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(LoaderError::config(format!(
                        "{} must be a boolean, got {other:?}",
                        Self::ENV_PROBE_ALTERNATE
                    )));
                }
            };
        }
        self.validate()?;
        Ok(self)
    }

    /// Validates library name overrides.
    pub fn validate(&self) -> Result<()> {
        let overrides = [
            ("primary_library", &self.primary_library),
            ("alternate_library", &self.alternate_library),
            ("macos_library", &self.macos_library),
            ("android_library", &self.android_library),
        ];
        for (field, value) in overrides {
            let Some(name) = value else { continue };
            if name.trim().is_empty() {
                return Err(LoaderError::config(format!("{field} cannot be empty")));
            }
            if name.contains('\0') {
                return Err(LoaderError::config(format!(
                    "{field} cannot contain NUL bytes"
                )));
            }
        }
        Ok(())
    }

    /// Resolves the backend description for `variant`, applying any override.
    #[must_use]
    pub fn profile(&self, variant: BackendVariant) -> BackendProfile {
        let library = match variant {
            BackendVariant::LinuxPrimary => &self.primary_library,
            BackendVariant::LinuxAlternate => &self.alternate_library,
            BackendVariant::MacOS => &self.macos_library,
            BackendVariant::Android => &self.android_library,
        };
        let profile = BackendProfile::for_variant(variant);
        match library {
            Some(name) => profile.with_library(name.clone()),
            None => profile,
        }
    }
}

/// Builder for [`LoaderConfig`].
#[derive(Debug, Clone, Default)]
pub struct LoaderConfigBuilder {
    config: LoaderConfig,
}

impl LoaderConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the Linux primary loader library.
    #[must_use]
    pub fn primary_library(mut self, name: impl Into<String>) -> Self {
        self.config.primary_library = Some(name.into());
        self
    }

    /// Override the Linux alternate loader library.
    #[must_use]
    pub fn alternate_library(mut self, name: impl Into<String>) -> Self {
        self.config.alternate_library = Some(name.into());
        self
    }

    /// Override the macOS loader library.
    #[must_use]
    pub fn macos_library(mut self, name: impl Into<String>) -> Self {
        self.config.macos_library = Some(name.into());
        self
    }

    /// Override the Android loader library.
    #[must_use]
    pub fn android_library(mut self, name: impl Into<String>) -> Self {
        self.config.android_library = Some(name.into());
        self
    }

    /// Whether Linux selection tries the alternate library first.
    ///
    /// Default: `true`
    #[must_use]
    pub const fn probe_alternate(mut self, value: bool) -> Self {
        self.config.probe_alternate = value;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> LoaderConfig {
        self.config
    }
}
