//! Pre-os-release vendor files (`/etc/arch-release`, `/etc/*-release`, ...).
//!
//! Each check names a file (or a glob) and how to pull a distribution and
//! version out of its first line. Derivative distributions must be checked
//! before their upstreams. Read errors skip the candidate.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use tracing::{debug, warn};

use crate::host::Host;
use crate::source::{Detector, Partial, SourceKind};

/// Files handled by the os-release and lsb-release readers.
const EXCLUDED_RELEASE_FILES: &[&str] = &["os-release", "lsb-release"];

const RELEASE_GLOB: &str = "etc/*-release";

/// Where a check looks.
#[derive(Debug, Clone, Copy)]
enum Candidates {
    File(&'static str),
    Glob(&'static str),
}

/// How a check reads the first line of a candidate.
#[derive(Debug, Clone, Copy)]
enum Extract {
    /// The file's existence is the answer.
    Fixed {
        dist: &'static str,
        version: &'static str,
    },
    /// Vendor banner: first word is the distribution, trailing numeric
    /// token is the version.
    Banner,
    /// The whole line is the version of `dist`.
    WholeLine { dist: &'static str },
}

impl Extract {
    fn apply(self, line: &str) -> Option<Partial> {
        match self {
            Extract::Fixed { dist, version } => Some(Partial::new(dist, Some(version.to_string()))),
            Extract::Banner => {
                let dist = extract_distribution(line)?;
                Some(Partial::new(dist, extract_version(line)))
            }
            Extract::WholeLine { dist } => {
                let version = Some(line.to_lowercase()).filter(|v| !v.is_empty());
                Some(Partial::new(dist, version))
            }
        }
    }
}

const CHECKS: &[(Candidates, Extract)] = &[
    // Empty file
    (
        Candidates::File("etc/arch-release"),
        Extract::Fixed {
            dist: "arch",
            version: "rolling",
        },
    ),
    (Candidates::File("etc/slackware-version"), Extract::Banner),
    (Candidates::Glob(RELEASE_GLOB), Extract::Banner),
    // Holds either the release number or the codename
    (
        Candidates::File("etc/debian_version"),
        Extract::WholeLine { dist: "debian" },
    ),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct Legacy;

impl Detector for Legacy {
    fn kind(&self) -> SourceKind {
        SourceKind::Legacy
    }

    fn detect(&self, host: &Host) -> Result<Option<Partial>> {
        for (candidates, extract) in CHECKS {
            for path in candidate_paths(host, *candidates) {
                let line = match read_first_line(&path) {
                    Ok(line) => line,
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "skipping legacy release file");
                        continue;
                    }
                };
                if let Some(found) = extract.apply(&line) {
                    debug!(path = %path.display(), dist = %found.dist, "legacy release file matched");
                    return Ok(Some(found));
                }
            }
        }
        Ok(None)
    }
}

fn candidate_paths(host: &Host, candidates: Candidates) -> Vec<PathBuf> {
    match candidates {
        Candidates::File(rel) => vec![host.path(rel)],
        Candidates::Glob(pattern) => {
            let root = glob::Pattern::escape(&host.root().display().to_string());
            let full = format!("{}/{}", root.trim_end_matches('/'), pattern);
            let paths = match glob::glob(&full) {
                Ok(paths) => paths,
                Err(e) => {
                    warn!(pattern = %full, error = %e, "invalid release glob");
                    return Vec::new();
                }
            };
            paths
                .filter_map(|entry| entry.ok())
                .filter(|path| !is_excluded(path))
                .collect()
        }
    }
}

fn is_excluded(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| EXCLUDED_RELEASE_FILES.contains(&name))
}

fn read_first_line(path: &Path) -> std::io::Result<String> {
    let contents = fs::read_to_string(path)?;
    Ok(contents.lines().next().unwrap_or("").trim().to_string())
}

/// Distribution named by a vendor banner such as
/// `Red Hat Enterprise Linux Server release 6.5 (Santiago)`.
pub fn extract_distribution(line: &str) -> Option<String> {
    let line = line.to_lowercase();
    if line.starts_with("red hat enterprise") {
        return Some("rhel".to_string());
    }
    if line.starts_with("suse linux enterprise") {
        return Some("sles".to_string());
    }
    line.split_whitespace().next().map(str::to_string)
}

/// Last whitespace-separated token that is purely dotted digits.
pub fn extract_version(line: &str) -> Option<String> {
    static VERSIONISH: OnceLock<Regex> = OnceLock::new();
    let versionish = VERSIONISH.get_or_init(|| {
        Regex::new(r"^\d+(?:\.\d+)*$").expect("version pattern is valid")
    });

    line.split_whitespace()
        .rev()
        .find(|token| versionish.is_match(token))
        .map(str::to_string)
}
