//! Sources of distribution information and what they hand back.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::host::Host;

/// Partial answer from one source: a distribution and possibly a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partial {
    pub dist: String,
    pub version: Option<String>,
}

impl Partial {
    pub fn new(dist: impl Into<String>, version: Option<String>) -> Self {
        Self {
            dist: dist.into(),
            version,
        }
    }
}

/// Why a source produced no answer.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file or command is not there. Expected on most systems.
    #[error("source not present")]
    Absent,

    /// The file exists but could not be read.
    #[error("reading '{}'", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but its contents make no sense.
    #[error("parsing '{}': {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// The release command could not be started.
    #[error("running '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    pub fn is_absent(&self) -> bool {
        matches!(self, SourceError::Absent)
    }
}

/// Which kind of source produced a [`Partial`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    OsRelease,
    LsbRelease,
    Legacy,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::OsRelease => "os-release",
            SourceKind::LsbRelease => "lsb-release",
            SourceKind::Legacy => "legacy",
        };
        f.write_str(name)
    }
}

/// One link in the detection chain.
///
/// `Ok(None)` means the source had nothing to say and the next one should
/// be asked. `Err` aborts detection entirely, so detectors swallow
/// whatever they consider optional.
pub trait Detector {
    fn kind(&self) -> SourceKind;
    fn detect(&self, host: &Host) -> anyhow::Result<Option<Partial>>;
}
