//! Shell-style `KEY=VALUE` files such as `/etc/os-release` and
//! `/etc/lsb-release`.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::source::SourceError;

/// Read and parse a shell-assignment file.
///
/// A missing file is [`SourceError::Absent`]; any other read failure is
/// [`SourceError::Unreadable`].
pub fn read_assignments(path: &Path) -> Result<HashMap<String, String>, SourceError> {
    let contents = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            SourceError::Absent
        } else {
            SourceError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_assignments(&contents).map_err(|reason| SourceError::Malformed {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parse shell-quoted assignments into a map. Later keys win.
///
/// Comment lines are dropped before lexing, so quoted values may still span
/// lines.
pub fn parse_assignments(contents: &str) -> Result<HashMap<String, String>, String> {
    let body = contents
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    let words = shlex::split(&body).ok_or_else(|| "unbalanced quoting".to_string())?;

    let mut map = HashMap::new();
    for word in words {
        let Some((key, value)) = word.split_once('=') else {
            return Err(format!("expected KEY=VALUE, got '{word}'"));
        };
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted_values() {
        let map = parse_assignments(
            "NAME=\"Ubuntu\"\nVERSION='20.04.1 LTS (Focal Fossa)'\nID=ubuntu\nPRETTY_NAME=\"Ubuntu \\\"Focal\\\"\"\n",
        )
        .unwrap();
        assert_eq!(map["NAME"], "Ubuntu");
        assert_eq!(map["VERSION"], "20.04.1 LTS (Focal Fossa)");
        assert_eq!(map["ID"], "ubuntu");
        assert_eq!(map["PRETTY_NAME"], "Ubuntu \"Focal\"");
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let map = parse_assignments("# generated\n\nID=arch\n  # trailing note\nBUILD_ID=rolling\n").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["BUILD_ID"], "rolling");
    }

    #[test]
    fn test_parse_value_keeps_later_equals() {
        let map = parse_assignments("HOME_URL=https://example.org/?a=b\n").unwrap();
        assert_eq!(map["HOME_URL"], "https://example.org/?a=b");
    }

    #[test]
    fn test_parse_rejects_bare_words() {
        let err = parse_assignments("ID=debian\nnonsense\n").unwrap_err();
        assert!(err.contains("nonsense"));
    }

    #[test]
    fn test_parse_rejects_unbalanced_quotes() {
        assert!(parse_assignments("NAME=\"Debian\n").is_err());
    }

    #[test]
    fn test_read_missing_is_absent() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = read_assignments(&temp.path().join("lsb-release")).unwrap_err();
        assert!(err.is_absent());
    }

    #[test]
    fn test_read_malformed_names_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("os-release");
        fs::write(&path, "ID='broken\n").unwrap();

        match read_assignments(&path) {
            Err(SourceError::Malformed { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }
}
