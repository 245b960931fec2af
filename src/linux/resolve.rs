//! Combine the sources into a [`SpecificPlatform`].

use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use tracing::debug;

use super::legacy::Legacy;
use super::lsb_release::LsbRelease;
use super::os_release::OsRelease;
use crate::host::Host;
use crate::platform::{SpecificPlatform, Stability};
use crate::source::{Detector, Partial, SourceKind};

/// These distributions do not produce rolling or unstable releases.
pub const STABLE_DISTRIBUTIONS: &[&str] = &["centos", "redhat", "sles", "ubuntu"];

/// Version suffix carried by Debian testing and unstable.
pub const DEBIAN_DEVELOPMENT_SUFFIX: &str = "/sid";

/// Sources in priority order. Legacy files come last.
pub fn detectors() -> [&'static dyn Detector; 3] {
    [&OsRelease, &LsbRelease, &Legacy]
}

/// Determine the Linux distribution of `host`, asking in order:
///
/// 1. os-release
/// 2. `lsb_release -a`, or `/etc/lsb-release` if the command is missing
/// 3. distribution-specific legacy files
///
/// When the winning source names a distribution but no version, the legacy
/// files are scanned for a version only. The distribution is never
/// replaced.
pub fn resolve(host: &Host) -> Result<Option<SpecificPlatform>> {
    // TODO: the lsb_release version could be tried before legacy files when
    // os-release lacks VERSION_ID.
    let mut found: Option<(SourceKind, Partial)> = None;
    for detector in detectors() {
        debug!(source = %detector.kind(), "trying platform source");
        if let Some(partial) = detector.detect(host)? {
            found = Some((detector.kind(), partial));
            break;
        }
    }

    let Some((kind, mut partial)) = found else {
        debug!("no platform source identified a distribution");
        return Ok(None);
    };
    debug!(source = %kind, dist = %partial.dist, version = ?partial.version, "platform source matched");

    if partial.version.is_none() && kind != SourceKind::Legacy {
        if let Some(legacy) = Legacy.detect(host)? {
            debug!(version = ?legacy.version, "recovered version from legacy files");
            partial.version = legacy.version;
        }
    }

    Ok(Some(build_platform(partial)))
}

/// Derive the major version and stability of a resolved distribution.
pub fn build_platform(partial: Partial) -> SpecificPlatform {
    let Partial { dist, version } = partial;
    let major = version.as_deref().map(|v| major_version(&dist, v));
    let stability = stability(&dist, version.as_deref());
    SpecificPlatform::new(dist, major, version, stability)
}

/// Coarsen `version` to what `dist` considers its ABI-compatible release.
///
/// Ubuntu keeps `YY.MM`; everything else keeps the first component.
pub fn major_version(dist: &str, version: &str) -> String {
    let keep = if dist == "ubuntu" { 2 } else { 1 };
    version.split('.').take(keep).collect::<Vec<_>>().join(".")
}

/// Whether the ABI of `dist` at `version` can be considered stable.
///
/// A missing version carries no development marker, so Debian and openSUSE
/// count as stable without one.
pub fn stability(dist: &str, version: Option<&str>) -> Stability {
    static TUMBLEWEED: OnceLock<Regex> = OnceLock::new();
    let tumbleweed =
        TUMBLEWEED.get_or_init(|| Regex::new(r"\d{8}$").expect("snapshot pattern is valid"));

    let version = version.unwrap_or("");
    let stable = match dist {
        d if STABLE_DISTRIBUTIONS.contains(&d) => true,
        "debian" => !version.ends_with(DEBIAN_DEVELOPMENT_SUFFIX),
        "opensuse" => !tumbleweed.is_match(version),
        _ => false,
    };

    if stable {
        Stability::Stable
    } else {
        Stability::Unstable
    }
}
