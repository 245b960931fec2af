//! Determine the specific platform of a host: which Linux distribution,
//! which version, and whether its release stream is ABI-stable.
//!
//! Generic platform tags only report the OS family (`linux`). This crate
//! goes further, asking in order:
//!
//! - **os-release** - `/etc/os-release` or `/usr/lib/os-release`
//! - **lsb-release** - `lsb_release -a`, or `/etc/lsb-release`
//! - **Legacy files** - `/etc/arch-release`, `/etc/*-release`, `/etc/debian_version`, ...
//!
//! Nothing is cached; every call inspects the host again.
//!
//! # Example
//!
//! ```rust,no_run
//! use specific_platform::{get_platform_stability_string, get_specific_platform_string};
//!
//! // e.g. "ubuntu-20_04" and "stable"
//! println!("{}", get_specific_platform_string()?);
//! println!("{}", get_platform_stability_string()?);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod host;
pub mod keyvalue;
pub mod linux;
pub mod normalize;
pub mod platform;
pub mod source;

use anyhow::Result;

pub use host::{CommandRunner, Host, SystemRunner};
pub use normalize::normalize_name;
pub use platform::{SpecificPlatform, Stability};
pub use source::{Detector, Partial, SourceError, SourceKind};

/// Text returned by the string accessors when the platform is undetermined.
pub const UNDETERMINED: &str = "None";

/// Detect the specific platform of the running system.
///
/// `Ok(None)` means the platform could not be determined, which is normal
/// on non-Linux systems and minimal containers.
pub fn get_specific_platform() -> Result<Option<SpecificPlatform>> {
    get_specific_platform_for(&Host::system())
}

/// Detect the specific platform of `host`.
pub fn get_specific_platform_for(host: &Host) -> Result<Option<SpecificPlatform>> {
    if !host.is_linux() {
        tracing::debug!(os_family = host.os_family(), "no specific platform detection for this OS");
        return Ok(None);
    }
    linux::resolve(host)
}

/// The normalized platform string, e.g. `ubuntu-20_04` or `centos-7-7_9_2009`.
pub fn get_specific_platform_string() -> Result<String> {
    get_specific_platform_string_for(&Host::system())
}

pub fn get_specific_platform_string_for(host: &Host) -> Result<String> {
    Ok(get_specific_platform_for(host)?
        .map(|plat| plat.to_string())
        .unwrap_or_else(|| UNDETERMINED.to_string()))
}

/// `stable`, `unstable`, or `None` if the platform is undetermined.
pub fn get_platform_stability_string() -> Result<String> {
    get_platform_stability_string_for(&Host::system())
}

pub fn get_platform_stability_string_for(host: &Host) -> Result<String> {
    Ok(get_specific_platform_for(host)?
        .map(|plat| plat.stability().to_string())
        .unwrap_or_else(|| UNDETERMINED.to_string()))
}
