use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

use super::model::{DirectiveMap, ScanState, SshConfigFile};
use super::parser::parse_host_line;

/// Indentation for generated directive lines.
const INDENT: &str = "    ";

/// Whether `merge_host` rewrote an existing block or appended a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Replaced,
    Appended,
}

/// Render a fresh Host block: header plus one indented line per directive.
fn render_block(alias: &str, directives: &DirectiveMap) -> Vec<String> {
    let mut block = Vec::with_capacity(directives.len() + 1);
    block.push(format!("Host {}", alias));
    for (directive, value) in directives.iter() {
        block.push(format!("{}{} {}", INDENT, directive, value));
    }
    block
}

/// Advance the scan by one line. Returns the next state and whether the
/// original line is kept. Entering `Replacing` drops the old header too; the
/// caller emits the fresh block in its place.
pub fn scan_step(state: ScanState, line: &str, alias: &str) -> (ScanState, bool) {
    match (state, parse_host_line(line)) {
        (ScanState::Searching, Some(pattern)) if pattern == alias => {
            (ScanState::Replacing, false)
        }
        (ScanState::Replacing, Some(_)) => (ScanState::Done, true),
        (ScanState::Replacing, None) => (ScanState::Replacing, false),
        (state, _) => (state, true),
    }
}

/// Merge `directives` for `alias` into a list of config lines.
///
/// The first `Host <alias>` block is replaced in place (followed by one blank
/// separator line); its old body up to the next Host header is dropped. Without
/// a match the block is appended, separated from prior content by a blank line.
/// Everything outside the target block is copied verbatim.
pub fn merge_host(
    lines: &[String],
    alias: &str,
    directives: &DirectiveMap,
) -> (Vec<String>, MergeOutcome) {
    let mut out = Vec::with_capacity(lines.len() + directives.len() + 2);
    let mut state = ScanState::Searching;

    for line in lines {
        let (next, keep) = scan_step(state, line, alias);
        if state == ScanState::Searching && next == ScanState::Replacing {
            out.extend(render_block(alias, directives));
            out.push(String::new());
        }
        if keep {
            out.push(line.clone());
        }
        state = next;
    }

    if state != ScanState::Searching {
        return (out, MergeOutcome::Replaced);
    }

    // Add a blank line separator if the file isn't empty and doesn't already end with one
    if out.last().is_some_and(|l| !l.trim().is_empty()) {
        out.push(String::new());
    }
    out.extend(render_block(alias, directives));
    (out, MergeOutcome::Appended)
}

impl SshConfigFile {
    /// Merge a host block into this document. See [`merge_host`].
    pub fn upsert_host(&mut self, alias: &str, directives: &DirectiveMap) -> MergeOutcome {
        let (lines, outcome) = merge_host(&self.lines, alias, directives);
        self.lines = lines;
        outcome
    }

    /// Serialize the config to a string, restoring the original line endings.
    pub fn serialize(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let eol = if self.crlf { "\r\n" } else { "\n" };
        let mut result = self.lines.join(eol);
        result.push_str(eol);
        result
    }

    /// Write the config back to disk, replacing the whole file.
    ///
    /// A symlinked config is written through the link: the link stays, its
    /// target gets the new content. The target's directory is created if needed.
    pub fn write(&self) -> Result<()> {
        let target = resolve_target(&self.path);

        if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        replace_file(&target, self.serialize().as_bytes()).map_err(|source| {
            ConfigError::Write {
                path: target.clone(),
                source,
            }
        })
    }
}

/// The file a save should replace.
fn resolve_target(path: &Path) -> PathBuf {
    if let Ok(real) = fs::canonicalize(path) {
        return real;
    }
    // Dangling link: create the file it points at
    match fs::read_link(path) {
        Ok(dest) => match path.parent() {
            Some(dir) => dir.join(dest),
            None => dest,
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Stage `content` in a private sibling of `target`, then rename it into place.
/// The staged file is removed if any step fails.
fn replace_file(target: &Path, content: &[u8]) -> io::Result<()> {
    let mut staged = target.as_os_str().to_owned();
    staged.push(format!(".slosh-{}", std::process::id()));
    let staged = PathBuf::from(staged);

    let result = create_private(&staged)
        .and_then(|mut file| file.write_all(content))
        .and_then(|()| fs::rename(&staged, target));
    if result.is_err() {
        let _ = fs::remove_file(&staged);
    }
    result
}

#[cfg(unix)]
fn create_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> io::Result<File> {
    File::create(path)
}
