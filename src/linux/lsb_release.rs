//! `lsb_release -a`, falling back to `/etc/lsb-release`.
//!
//! Only the `lsb_release` command is specified by LSB. Some distributions
//! ship `/etc/lsb-release` in the base system while leaving the command
//! optional, so the file is consulted when the command cannot be started.
//! Everything here is optional: failures are logged and yield `None`.

use anyhow::Result;
use tracing::{debug, warn};

use crate::host::Host;
use crate::keyvalue::read_assignments;
use crate::source::{Detector, Partial, SourceError, SourceKind};

pub const LSB_RELEASE_COMMAND: &str = "lsb_release";
pub const LSB_RELEASE_ARGS: &[&str] = &["-a"];
pub const LSB_RELEASE_PATH: &str = "etc/lsb-release";

/// Fields reported by the command (or the fallback file), lower-cased.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LsbInfo {
    pub distributor: Option<String>,
    pub release: Option<String>,
    pub description: Option<String>,
    pub codename: Option<String>,
}

/// How a rule matches the distributor value.
#[derive(Debug, Clone, Copy)]
pub enum DistributorMatch {
    Prefix(&'static str),
    Exact(&'static str),
}

impl DistributorMatch {
    fn matches(self, distributor: &str) -> bool {
        match self {
            DistributorMatch::Prefix(p) => distributor.starts_with(p),
            DistributorMatch::Exact(e) => distributor == e,
        }
    }
}

/// What a matching rule does to the result.
#[derive(Debug, Clone, Copy)]
pub enum RuleAction {
    /// Use this id, keep the release as the version.
    Rename(&'static str),
    /// Use this id and report the codename as the version, with `suffix`
    /// appended unless already present.
    Codename {
        id: &'static str,
        suffix: &'static str,
    },
}

/// One entry of the distributor canonicalization table.
#[derive(Debug, Clone, Copy)]
pub struct DistributorRule {
    pub distributor: DistributorMatch,
    /// Required prefix of the description, if any.
    pub description: Option<&'static str>,
    /// Required exact release, if any.
    pub release: Option<&'static str>,
    pub action: RuleAction,
}

impl DistributorRule {
    fn matches(&self, distributor: &str, info: &LsbInfo) -> bool {
        if !self.distributor.matches(distributor) {
            return false;
        }
        if let Some(prefix) = self.description {
            let description = info.description.as_deref().unwrap_or("");
            if !description.starts_with(prefix) {
                return false;
            }
        }
        if let Some(release) = self.release {
            if info.release.as_deref() != Some(release) {
                return false;
            }
        }
        true
    }
}

/// Checked in order; the first match wins. Anything unmatched uses the
/// first word of the distributor.
///
/// Debian testing reports `Release: testing`, which is rewritten to
/// `<codename>/sid` so the tag agrees with os-release and
/// `/etc/debian_version` on the same system.
pub const DISTRIBUTOR_RULES: &[DistributorRule] = &[
    DistributorRule {
        distributor: DistributorMatch::Prefix("redhatenterprise"),
        description: None,
        release: None,
        action: RuleAction::Rename("rhel"),
    },
    DistributorRule {
        distributor: DistributorMatch::Exact("archlinux"),
        description: None,
        release: None,
        action: RuleAction::Rename("arch"),
    },
    DistributorRule {
        distributor: DistributorMatch::Prefix("suse"),
        description: Some("opensuse"),
        release: None,
        action: RuleAction::Rename("opensuse"),
    },
    DistributorRule {
        distributor: DistributorMatch::Prefix("suse"),
        description: Some("suse linux enterprise"),
        release: None,
        action: RuleAction::Rename("sles"),
    },
    DistributorRule {
        distributor: DistributorMatch::Exact("debian"),
        description: None,
        release: Some("testing"),
        action: RuleAction::Codename {
            id: "debian",
            suffix: "/sid",
        },
    },
];

#[derive(Debug, Default, Clone, Copy)]
pub struct LsbRelease;

impl Detector for LsbRelease {
    fn kind(&self) -> SourceKind {
        SourceKind::LsbRelease
    }

    fn detect(&self, host: &Host) -> Result<Option<Partial>> {
        let info = match read_lsb_info(host) {
            Ok(info) => info,
            Err(SourceError::Absent) => {
                debug!("no lsb_release command or lsb-release file");
                return Ok(None);
            }
            Err(e) => {
                warn!(error = %e, "ignoring unusable lsb-release source");
                return Ok(None);
            }
        };
        Ok(canonicalize(&info))
    }
}

/// Run the command; if it cannot be started, read the fallback file.
pub fn read_lsb_info(host: &Host) -> Result<LsbInfo, SourceError> {
    match host.runner().run(LSB_RELEASE_COMMAND, LSB_RELEASE_ARGS) {
        Ok(stdout) => Ok(parse_lsb_output(&stdout)),
        Err(source) => {
            let spawn = SourceError::Spawn {
                program: LSB_RELEASE_COMMAND.to_string(),
                source,
            };
            debug!(error = %spawn, "falling back to lsb-release file");
            read_lsb_file(host)
        }
    }
}

/// Parse `Label: value` lines. Unknown labels and lines without a colon are
/// ignored.
pub fn parse_lsb_output(stdout: &str) -> LsbInfo {
    let mut info = LsbInfo::default();
    for line in stdout.lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let value = Some(value.trim().to_lowercase());
        match label {
            "Distributor ID" => info.distributor = value,
            "Release" => info.release = value,
            "Description" => info.description = value,
            "Codename" => info.codename = value,
            _ => {}
        }
    }
    info
}

fn read_lsb_file(host: &Host) -> Result<LsbInfo, SourceError> {
    let fields = read_assignments(&host.path(LSB_RELEASE_PATH))?;
    Ok(LsbInfo {
        distributor: fields.get("DISTRIB_ID").map(|v| v.to_lowercase()),
        release: fields.get("DISTRIB_RELEASE").map(|v| v.to_lowercase()),
        ..LsbInfo::default()
    })
}

/// Map reported fields to a canonical distribution id and version.
pub fn canonicalize(info: &LsbInfo) -> Option<Partial> {
    let distributor = info.distributor.as_deref()?;

    let rule = DISTRIBUTOR_RULES
        .iter()
        .find(|rule| rule.matches(distributor, info));

    match rule.map(|r| r.action) {
        Some(RuleAction::Rename(id)) => Some(Partial::new(id, info.release.clone())),
        Some(RuleAction::Codename { id, suffix }) => {
            let version = info.codename.as_ref().map(|codename| {
                if codename.ends_with(suffix) {
                    codename.clone()
                } else {
                    format!("{codename}{suffix}")
                }
            });
            Some(Partial::new(id, version))
        }
        None => {
            let first = distributor.split_whitespace().next()?;
            Some(Partial::new(first.to_lowercase(), info.release.clone()))
        }
    }
}
