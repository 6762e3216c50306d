use std::ffi::OsString;

use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser};

/// The only option slosh owns. Everything else belongs to ssh.
pub const SAVE_FLAG: &str = "--save-as";

/// ssh(1) option letters that take an argument.
const VALUE_FLAGS: &str = "bceilmopBDEFIJLOPQRSwW";

/// ssh(1) option letters that end up as directives in a saved Host block.
const SAVED_FLAGS: &str = "lpiACv";

/// The part of the ssh command line that slosh understands, parsed once a save was requested.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "slosh",
    about = "ssh, but `--save-as <ALIAS>` also writes the connection to ~/.ssh/config.",
    long_about = "slosh forwards every argument to ssh unchanged.\n\
                  With --save-as ALIAS it first saves the destination and the -l, -p, -i, -A, -C \
                  and -v flags as a `Host ALIAS` block in your SSH config.",
    args_override_self = true
)]
pub struct SaveArgs {
    /// Save this connection as `Host ALIAS` before connecting
    #[arg(long = "save-as", value_name = "ALIAS", value_parser = NonEmptyStringValueParser::new())]
    pub save_as: String,

    /// [ssh://][user@]hostname[:port]
    #[arg(value_name = "DESTINATION")]
    pub destination: String,

    /// Login name (User)
    #[arg(short = 'l', value_name = "LOGIN_NAME")]
    pub user: Option<String>,

    /// Port (Port)
    #[arg(short = 'p', value_name = "PORT")]
    pub port: Option<String>,

    /// Identity file (IdentityFile)
    #[arg(short = 'i', value_name = "IDENTITY_FILE")]
    pub identity_file: Option<String>,

    /// Enable agent forwarding (ForwardAgent yes)
    #[arg(short = 'A')]
    pub forward_agent: bool,

    /// Enable compression (Compression yes)
    #[arg(short = 'C')]
    pub compression: bool,

    /// Verbose mode, repeatable (LogLevel)
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

/// Raw arguments split into what goes to ssh and what slosh parses itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiftedArgs {
    /// Arguments forwarded to ssh, byte for byte, with the save trigger removed.
    pub passthrough: Vec<OsString>,
    /// Tokens for [`SaveArgs`], normalized to clap syntax.
    pub wrapper: Vec<String>,
    pub save_requested: bool,
}

impl SiftedArgs {
    /// Parse the wrapper tokens. Only meaningful when a save was requested.
    pub fn parse_save_args(&self) -> Result<SaveArgs, clap::Error> {
        let tokens = self.wrapper.iter().map(String::as_str);
        SaveArgs::try_parse_from(std::iter::once("slosh").chain(tokens))
    }
}

/// Walk the arguments with ssh's own option grammar.
///
/// The first `--save-as ALIAS` or `--save-as=ALIAS` in option position is
/// removed from the pass-through list. Single-dash clusters are scanned letter
/// by letter; a value-taking letter consumes the rest of the cluster or the
/// next token. The first operand is the destination, options after it are
/// still scanned, and the second operand starts the remote command, which is
/// forwarded untouched. `raw` itself is never modified.
///
/// Tokens need not be UTF-8. Decisions are made on a lossy view of each
/// token, but ssh always receives the original bytes.
pub fn sift(raw: &[OsString]) -> SiftedArgs {
    let text: Vec<String> = raw
        .iter()
        .map(|t| t.to_string_lossy().into_owned())
        .collect();
    let mut sifted = SiftedArgs::default();
    let mut destination: Option<&str> = None;
    let mut i = 0;

    while i < raw.len() {
        let token = text[i].as_str();

        if !sifted.save_requested {
            if token == SAVE_FLAG {
                sifted.save_requested = true;
                match text.get(i + 1) {
                    Some(alias) => {
                        sifted.wrapper.push(format!("{}={}", SAVE_FLAG, alias));
                        i += 2;
                    }
                    None => {
                        // Empty alias so clap reports the missing value
                        sifted.wrapper.push(format!("{}=", SAVE_FLAG));
                        i += 1;
                    }
                }
                continue;
            }
            if token.starts_with("--save-as=") {
                sifted.save_requested = true;
                sifted.wrapper.push(token.to_string());
                i += 1;
                continue;
            }
        }

        sifted.passthrough.push(raw[i].clone());

        if token == "--" {
            if destination.is_none() {
                destination = text.get(i + 1).map(String::as_str);
            }
            sifted.passthrough.extend(raw[i + 1..].iter().cloned());
            break;
        }

        if let Some(cluster) = token.strip_prefix('-').filter(|c| !c.is_empty()) {
            // ssh has no long options; leave them for ssh to reject
            if !cluster.starts_with('-') {
                let next = text.get(i + 1).map(String::as_str);
                if scan_cluster(cluster, next, &mut sifted.wrapper) {
                    sifted.passthrough.push(raw[i + 1].clone());
                    i += 1;
                }
            }
        } else if destination.is_none() {
            destination = Some(token);
        } else {
            sifted.passthrough.extend(raw[i + 1..].iter().cloned());
            break;
        }
        i += 1;
    }

    if let Some(destination) = destination {
        sifted.wrapper.push("--".to_string());
        sifted.wrapper.push(destination.to_string());
    }
    sifted
}

/// Scan one `-abc` cluster (without the dash), collecting the flags slosh saves.
/// Returns true if the cluster's value was the following token.
fn scan_cluster(cluster: &str, next: Option<&str>, wrapper: &mut Vec<String>) -> bool {
    for (pos, c) in cluster.char_indices() {
        if VALUE_FLAGS.contains(c) {
            let inline = &cluster[pos + c.len_utf8()..];
            let (value, consumed_next) = if inline.is_empty() {
                (next, next.is_some())
            } else {
                (Some(inline), false)
            };
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                if SAVED_FLAGS.contains(c) {
                    // Attached form so values starting with '-' survive clap
                    wrapper.push(format!("-{}{}", c, value));
                }
            }
            return consumed_next;
        }
        if SAVED_FLAGS.contains(c) {
            wrapper.push(format!("-{}", c));
        }
    }
    false
}
