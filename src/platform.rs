//! The detected platform record.

use std::fmt;

use serde::Serialize;

use crate::normalize::normalize_name;

/// Whether a distribution release stream is ABI-stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    Stable,
    Unstable,
}

impl Stability {
    pub fn as_str(self) -> &'static str {
        match self {
            Stability::Stable => "stable",
            Stability::Unstable => "unstable",
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Linux distribution, version and stability.
///
/// Strings are lower-cased but not sanitized; [`fmt::Display`] produces the
/// normalized platform string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecificPlatform {
    dist: String,
    major_vers: Option<String>,
    full_vers: Option<String>,
    stability: Stability,
}

impl SpecificPlatform {
    pub(crate) fn new(
        dist: String,
        major_vers: Option<String>,
        full_vers: Option<String>,
        stability: Stability,
    ) -> Self {
        Self {
            dist,
            major_vers,
            full_vers,
            stability,
        }
    }

    /// Distribution id, e.g. `ubuntu`.
    pub fn dist(&self) -> &str {
        &self.dist
    }

    /// Version truncated to the distribution's major release.
    pub fn major_vers(&self) -> Option<&str> {
        self.major_vers.as_deref()
    }

    /// Version as reported by the most authoritative source.
    pub fn full_vers(&self) -> Option<&str> {
        self.full_vers.as_deref()
    }

    pub fn stability(&self) -> Stability {
        self.stability
    }
}

/// `dist-major`, or `dist-major-full` when the two versions differ, each
/// part normalized. A missing version renders as `None`.
impl fmt::Display for SpecificPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.major_vers.as_deref().unwrap_or("None");
        let full = self.full_vers.as_deref().unwrap_or("None");

        let mut parts = vec![self.dist.as_str(), major];
        if self.major_vers != self.full_vers {
            parts.push(full);
        }

        let joined = parts
            .into_iter()
            .map(normalize_name)
            .collect::<Vec<_>>()
            .join("-");
        f.write_str(&joined)
    }
}
