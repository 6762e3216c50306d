use std::fmt;
use std::path::PathBuf;

/// The SSH config file as an ordered list of raw lines (terminators stripped).
/// Blank lines and comments are kept verbatim so untouched content round-trips.
#[derive(Debug, Clone)]
pub struct SshConfigFile {
    pub lines: Vec<String>,
    pub path: PathBuf,
    /// Whether the original file used CRLF line endings.
    pub crlf: bool,
}

/// The directives slosh knows how to write into a Host block.
/// Variant order is the order directives appear in a generated block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Directive {
    HostName,
    User,
    Port,
    IdentityFile,
    ForwardAgent,
    Compression,
    LogLevel,
}

impl Directive {
    pub const ALL: [Directive; 7] = [
        Directive::HostName,
        Directive::User,
        Directive::Port,
        Directive::IdentityFile,
        Directive::ForwardAgent,
        Directive::Compression,
        Directive::LogLevel,
    ];

    /// Keyword as written in ssh_config(5).
    pub fn keyword(self) -> &'static str {
        match self {
            Directive::HostName => "HostName",
            Directive::User => "User",
            Directive::Port => "Port",
            Directive::IdentityFile => "IdentityFile",
            Directive::ForwardAgent => "ForwardAgent",
            Directive::Compression => "Compression",
            Directive::LogLevel => "LogLevel",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Insertion-ordered directive → value mapping. Never holds an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveMap {
    entries: Vec<(Directive, String)>,
}

impl DirectiveMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a directive. `None` and empty values are dropped.
    /// Re-inserting an existing directive replaces its value in place.
    pub fn insert(&mut self, directive: Directive, value: Option<&str>) {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => return,
        };
        if let Some(slot) = self.entries.iter_mut().find(|(d, _)| *d == directive) {
            slot.1 = value.to_string();
        } else {
            self.entries.push((directive, value.to_string()));
        }
    }

    pub fn get(&self, directive: Directive) -> Option<&str> {
        self.entries
            .iter()
            .find(|(d, _)| *d == directive)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Directive, &str)> {
        self.entries.iter().map(|(d, v)| (*d, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where the merge pass is relative to the target alias's block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Target header not seen yet. Lines are copied.
    Searching,
    /// Inside the target block. Original lines are suppressed.
    Replacing,
    /// Target block already rewritten. Everything else is copied, including duplicates.
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_skips_absent_and_empty() {
        let mut map = DirectiveMap::new();
        map.insert(Directive::User, None);
        map.insert(Directive::Port, Some(""));
        assert!(map.is_empty());
    }

    #[test]
    fn test_insert_keeps_order_and_replaces_in_place() {
        let mut map = DirectiveMap::new();
        map.insert(Directive::HostName, Some("example.com"));
        map.insert(Directive::User, Some("admin"));
        map.insert(Directive::HostName, Some("10.0.0.1"));
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(
            entries,
            vec![(Directive::HostName, "10.0.0.1"), (Directive::User, "admin")]
        );
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_keyword_matches_display() {
        for d in Directive::ALL {
            assert_eq!(d.to_string(), d.keyword());
        }
        assert_eq!(Directive::IdentityFile.keyword(), "IdentityFile");
    }
}
