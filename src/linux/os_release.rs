//! `/etc/os-release` (falling back to `/usr/lib/os-release`).

use anyhow::{Context, Result};
use tracing::debug;

use crate::host::Host;
use crate::keyvalue::read_assignments;
use crate::source::{Detector, Partial, SourceKind};

/// Candidate locations, most specific first.
pub const OS_RELEASE_PATHS: &[&str] = &["etc/os-release", "usr/lib/os-release"];

#[derive(Debug, Default, Clone, Copy)]
pub struct OsRelease;

impl Detector for OsRelease {
    fn kind(&self) -> SourceKind {
        SourceKind::OsRelease
    }

    /// A file that exists but cannot be read or parsed is an error: the
    /// system is broken, not merely old. A missing (or dangling) candidate
    /// moves on to the next one.
    fn detect(&self, host: &Host) -> Result<Option<Partial>> {
        let mut found = None;
        for path in OS_RELEASE_PATHS.iter().map(|rel| host.path(rel)) {
            match read_assignments(&path) {
                Ok(fields) => {
                    debug!(path = %path.display(), "read os-release");
                    found = Some((path, fields));
                    break;
                }
                Err(e) if e.is_absent() => continue,
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("reading os-release '{}'", path.display()))
                }
            }
        }

        let Some((path, fields)) = found else {
            debug!("no os-release file found");
            return Ok(None);
        };

        let Some(dist) = fields.get("ID").or_else(|| fields.get("NAME")) else {
            debug!(path = %path.display(), "os-release has neither ID nor NAME");
            return Ok(None);
        };

        let version = fields
            .get("VERSION_ID")
            .or_else(|| fields.get("VERSION"))
            .map(|v| v.to_lowercase());

        Ok(Some(Partial::new(dist.to_lowercase(), version)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::{fake_host, write_file};
    use crate::source::SourceError;
    use tempfile::TempDir;

    #[test]
    fn test_reads_id_and_version_id() {
        let temp = TempDir::new().unwrap();
        write_file(
            temp.path(),
            "etc/os-release",
            "NAME=\"Ubuntu\"\nVERSION=\"20.04.1 LTS (Focal Fossa)\"\nID=ubuntu\nVERSION_ID=\"20.04\"\n",
        );

        let found = OsRelease.detect(&fake_host(temp.path())).unwrap();
        assert_eq!(found, Some(Partial::new("ubuntu", Some("20.04".into()))));
    }

    #[test]
    fn test_falls_back_to_usr_lib() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "usr/lib/os-release", "ID=fedora\nVERSION_ID=39\n");

        let found = OsRelease.detect(&fake_host(temp.path())).unwrap();
        assert_eq!(found, Some(Partial::new("fedora", Some("39".into()))));
    }

    #[test]
    fn test_etc_wins_over_usr_lib() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "etc/os-release", "ID=debian\nVERSION_ID=11\n");
        write_file(temp.path(), "usr/lib/os-release", "ID=fedora\nVERSION_ID=39\n");

        let found = OsRelease.detect(&fake_host(temp.path())).unwrap();
        assert_eq!(found.unwrap().dist, "debian");
    }

    #[test]
    fn test_name_and_version_fallbacks_are_lowercased() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "etc/os-release", "NAME=Gentoo\nVERSION=\"2.14 Beta\"\n");

        let found = OsRelease.detect(&fake_host(temp.path())).unwrap();
        assert_eq!(found, Some(Partial::new("gentoo", Some("2.14 beta".into()))));
    }

    #[test]
    fn test_missing_version_is_partial() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "etc/os-release", "ID=arch\nBUILD_ID=rolling\n");

        let found = OsRelease.detect(&fake_host(temp.path())).unwrap();
        assert_eq!(found, Some(Partial::new("arch", None)));
    }

    #[test]
    fn test_no_identity_is_none() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "etc/os-release", "VERSION_ID=1\n");

        assert_eq!(OsRelease.detect(&fake_host(temp.path())).unwrap(), None);
    }

    #[test]
    fn test_no_file_is_none() {
        let temp = TempDir::new().unwrap();
        assert_eq!(OsRelease.detect(&fake_host(temp.path())).unwrap(), None);
    }

    #[test]
    fn test_existing_but_unreadable_is_error() {
        let temp = TempDir::new().unwrap();
        // A directory exists but cannot be read as a file
        std::fs::create_dir_all(temp.path().join("etc/os-release")).unwrap();

        let err = OsRelease.detect(&fake_host(temp.path())).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_malformed_is_error() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "etc/os-release", "ID=\"debian\nVERSION_ID=11\n");

        let err = OsRelease.detect(&fake_host(temp.path())).unwrap_err();
        assert!(err.to_string().contains("reading os-release"));
        assert!(err.to_string().contains("etc/os-release"));
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::Malformed { .. })
        ));
    }

    #[test]
    fn test_dangling_etc_link_falls_through() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("etc")).unwrap();
        std::os::unix::fs::symlink(
            temp.path().join("gone/os-release"),
            temp.path().join("etc/os-release"),
        )
        .unwrap();

        assert_eq!(OsRelease.detect(&fake_host(temp.path())).unwrap(), None);

        write_file(temp.path(), "usr/lib/os-release", "ID=fedora\nVERSION_ID=39\n");
        let found = OsRelease.detect(&fake_host(temp.path())).unwrap();
        assert_eq!(found, Some(Partial::new("fedora", Some("39".into()))));
    }
}
