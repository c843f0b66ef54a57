//! Backend selection.
//!
//! Runs once per process. On Linux the versioned loader library is tried
//! first and the unversioned name is the fallback; the fallback is taken
//! only when the versioned library itself is unavailable.

use crate::backend::LoaderBackend;
use crate::config::LoaderConfig;
use crate::detect::{Platform, detect_platform};
use crate::error::{LoaderError, Result};

/// Selects the backend for this host using the default configuration.
pub fn select() -> Result<Box<dyn LoaderBackend>> {
    select_with(&LoaderConfig::default())
}

/// Selects the backend for this host.
///
/// # Errors
/// - [`LoaderError::UnsupportedPlatform`] when the host has no loader backend.
/// - Any construction error other than "alternate Linux library unavailable".
pub fn select_with(config: &LoaderConfig) -> Result<Box<dyn LoaderBackend>> {
    select_for(detect_platform(), config)
}

/// Selects the backend for `platform`.
pub fn select_for(platform: Platform, config: &LoaderConfig) -> Result<Box<dyn LoaderBackend>> {
    config.validate()?;
    let backend = build(platform, config)?;
    tracing::info!(
        platform = %platform,
        variant = %backend.variant(),
        "selected native loader backend"
    );
    Ok(backend)
}

#[cfg(unix)]
fn build(platform: Platform, config: &LoaderConfig) -> Result<Box<dyn LoaderBackend>> {
    use crate::android::AndroidLoader;
    use crate::detect::BackendVariant;
    use crate::linux::LinuxLoader;
    use crate::macos::MacLoader;

    match platform {
        Platform::Linux => {
            let primary =
                || LinuxLoader::with_profile(config.profile(BackendVariant::LinuxPrimary));
            let loader = if config.probe_alternate {
                with_fallback(|| probe_alternate(config), primary)?
            } else {
                primary()?
            };
            Ok(Box::new(loader))
        }
        Platform::MacOS => Ok(Box::new(MacLoader::with_profile(
            config.profile(BackendVariant::MacOS),
        )?)),
        Platform::Android => Ok(Box::new(AndroidLoader::with_profile(
            config.profile(BackendVariant::Android),
        )?)),
        Platform::Unsupported => Err(LoaderError::UnsupportedPlatform(platform)),
    }
}

#[cfg(not(unix))]
fn build(platform: Platform, _config: &LoaderConfig) -> Result<Box<dyn LoaderBackend>> {
    Err(LoaderError::UnsupportedPlatform(platform))
}

/// Runs `attempt`, switching to `fallback` only if a loader library is absent.
#[cfg_attr(not(unix), allow(dead_code))]
fn with_fallback<T>(
    attempt: impl FnOnce() -> Result<T>,
    fallback: impl FnOnce() -> Result<T>,
) -> Result<T> {
    match attempt() {
        Err(e) if e.is_library_unavailable() => {
            tracing::debug!(error = %e, "alternate loader library absent, using primary");
            fallback()
        }
        other => other,
    }
}

/// Binds the alternate Linux library and forces one loader call through it.
#[cfg(unix)]
fn probe_alternate(config: &LoaderConfig) -> Result<crate::linux::LinuxLoader> {
    let loader = crate::linux::LinuxLoader::with_profile(
        config.profile(crate::detect::BackendVariant::LinuxAlternate),
    )?;
    // Liveness probe; also discards any stale message on this thread.
    let _ = loader.last_error();
    Ok(loader)
}
