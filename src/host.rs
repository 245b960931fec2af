//! The host being inspected: a filesystem root, an OS family, and a way to
//! run the release-info command.
//!
//! Detection only ever reads files below [`Host::root`] and runs at most one
//! command through [`Host::runner`]. Tests substitute both.
//!
//! # Example
//!
//! ```rust
//! use specific_platform::host::Host;
//!
//! // Inspect a mounted image instead of the running system
//! let host = Host::system().with_root("/mnt/image");
//! assert_eq!(host.path("etc/os-release").to_str(), Some("/mnt/image/etc/os-release"));
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Executes an external program and returns its captured stdout.
///
/// An `Err` means the program could not be started at all (not installed,
/// not executable). A program that starts and exits non-zero still yields
/// its stdout.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<String>;
}

/// Runs programs found on `PATH` of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<String> {
        let resolved = which::which(program)
            .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("{program}: {e}")))?;

        let output = Command::new(resolved)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Context for one detection run.
pub struct Host {
    root: PathBuf,
    os_family: String,
    runner: Box<dyn CommandRunner>,
}

impl Host {
    /// The running system: root `/`, the compile-time OS family, and
    /// commands from `PATH`.
    pub fn system() -> Self {
        Self {
            root: PathBuf::from("/"),
            os_family: base_os_family().to_string(),
            runner: Box::new(SystemRunner),
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_os_family(mut self, os_family: impl Into<String>) -> Self {
        self.os_family = os_family.into();
        self
    }

    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn os_family(&self) -> &str {
        &self.os_family
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// Resolve a fixed system path (given without its leading `/`) against
    /// the root.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel.trim_start_matches('/'))
    }

    pub fn is_linux(&self) -> bool {
        self.os_family == "linux"
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("root", &self.root)
            .field("os_family", &self.os_family)
            .finish_non_exhaustive()
    }
}

/// Base OS family of the build target (`linux`, `macos`, `windows`, ...).
pub fn base_os_family() -> &'static str {
    std::env::consts::OS
}
