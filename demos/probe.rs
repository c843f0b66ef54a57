// Examples are allowed to use expect/unwrap for simplicity
#![allow(clippy::expect_used, clippy::unwrap_used)]

//! dynload Probe Example
//!
//! Selects the host loader backend, prints its constants, then loads a
//! library and resolves one symbol from it.
//!
//! # Usage
//!
//! ```bash
//! # Probe the platform math library for `cos`
//! cargo run --example probe
//!
//! # Probe a specific library and symbol
//! cargo run --example probe -- --library libz.so.1 --symbol zlibVersion
//!
//! # Show backend selection in the log
//! RUST_LOG=dynload_core=debug cargo run --example probe
//! ```

use dynload::prelude::*;
use tracing_subscriber::EnvFilter;

#[cfg(target_os = "macos")]
const DEFAULT_LIBRARY: &str = "/usr/lib/libSystem.B.dylib";
#[cfg(not(target_os = "macos"))]
const DEFAULT_LIBRARY: &str = "libm.so.6";
const DEFAULT_SYMBOL: &str = "cos";

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("dynload Probe Example");
        println!();
        println!("Usage: probe [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --library <PATH>  Library to open (default: {DEFAULT_LIBRARY})");
        println!("  --symbol <NAME>   Symbol to resolve (default: {DEFAULT_SYMBOL})");
        println!("  --global          Open with RESOLVE_GLOBAL as well");
        println!("  --help            Show this help");
        return Ok(());
    }
    let library = flag_value(&args, "--library").unwrap_or(DEFAULT_LIBRARY);
    let symbol = flag_value(&args, "--symbol").unwrap_or(DEFAULT_SYMBOL);

    println!("[PLATFORM] {}", detect_platform());

    let loader = Loader::global()?;
    println!("[BACKEND]  {}", loader.variant());
    println!(
        "[FLAGS]    RESOLVE_NOW=0x{:x} RESOLVE_GLOBAL=0x{:x}",
        loader.resolve_now(),
        loader.resolve_global()
    );
    println!("[SCOPE]    GLOBAL_SCOPE={:?}", loader.global_scope());
    println!();

    let mut flags = loader.resolve_now();
    if args.iter().any(|a| a == "--global") {
        flags |= loader.resolve_global();
    }

    let handle = loader.open(library, flags)?;
    if handle.is_null() {
        println!("[OPEN]     {library}: failed: {}", loader.last_error().unwrap_or_default());
        return Ok(());
    }
    println!("[OPEN]     {library}: {handle:?}");

    let address = loader.resolve(handle, symbol)?;
    if address.is_null() {
        println!("[RESOLVE]  {symbol}: not found: {}", loader.last_error().unwrap_or_default());
    } else {
        println!("[RESOLVE]  {symbol}: {address:?}");
    }

    let status = loader.close(handle);
    println!("[CLOSE]    status={status}");

    Ok(())
}
