use std::io::ErrorKind;
use std::path::Path;

use crate::error::{ConfigError, Result};

use super::model::SshConfigFile;

impl SshConfigFile {
    /// Load an SSH config file as raw lines.
    /// A missing file is not an error: it yields an empty document that will be created on save.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!(
                    "SSH config file does not exist, creating new file at {}",
                    path.display()
                );
                String::new()
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Ok(SshConfigFile {
            lines: Self::parse_content(&content),
            path: path.to_path_buf(),
            crlf: content.contains("\r\n"),
        })
    }

    /// Split config content into lines. `str::lines` also drops the `\r` of CRLF endings.
    pub fn parse_content(content: &str) -> Vec<String> {
        content.lines().map(str::to_string).collect()
    }
}

/// Check if a line is a "Host <pattern>" header.
/// Returns the pattern (everything after the keyword, trimmed) if it is.
///
/// The keyword is case-sensitive and may be followed by a space or a tab.
/// `Host a b` yields `"a b"`: it is a block boundary, but only the exact alias `a b` matches it.
pub fn parse_host_line(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let mut parts = trimmed.splitn(2, [' ', '\t']);
    // "HostName" splits as keyword="HostName" which fails this check
    if parts.next()? != "Host" {
        return None;
    }
    let pattern = parts.next()?.trim();
    if pattern.is_empty() {
        return None;
    }
    Some(pattern)
}
