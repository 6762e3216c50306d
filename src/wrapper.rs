use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitStatus;

use crate::args::{self, SaveArgs};
use crate::connection;
use crate::directives;
use crate::error::{ConfigError, Result};
use crate::ssh_config::model::SshConfigFile;
use crate::ssh_config::writer::MergeOutcome;

/// Overrides the config file slosh saves into.
pub const CONFIG_ENV: &str = "SLOSH_SSH_CONFIG";
/// Overrides the client binary slosh forwards to.
pub const PROGRAM_ENV: &str = "SLOSH_SSH";

const DEFAULT_CONFIG: &str = "~/.ssh/config";
const DEFAULT_PROGRAM: &str = "ssh";

/// What one run of slosh will do: maybe save, then always forward.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub passthrough: Vec<OsString>,
    pub save: Option<SaveArgs>,
}

#[derive(Debug, Clone)]
pub struct Wrapper {
    /// Config file path; a leading `~/` is resolved against the home directory.
    pub config: String,
    pub program: OsString,
}

pub fn resolve_config_path(path: &str) -> Result<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
        Ok(home.join(rest))
    } else {
        Ok(PathBuf::from(path))
    }
}

impl Wrapper {
    pub fn new(config: impl Into<String>, program: impl Into<OsString>) -> Self {
        Wrapper {
            config: config.into(),
            program: program.into(),
        }
    }

    /// Defaults (`~/.ssh/config`, `ssh`), overridable via `SLOSH_SSH_CONFIG` and `SLOSH_SSH`.
    pub fn from_env() -> Self {
        let config = std::env::var(CONFIG_ENV)
            .ok()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
        let program = std::env::var_os(PROGRAM_ENV)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PROGRAM.into());
        Wrapper::new(config, program)
    }

    /// Split the raw arguments. A save request without a destination (or
    /// without an alias) is a usage error, and nothing should run.
    pub fn prepare(&self, raw: &[OsString]) -> std::result::Result<Invocation, clap::Error> {
        let sifted = args::sift(raw);
        let save = if sifted.save_requested {
            Some(sifted.parse_save_args()?)
        } else {
            None
        };
        Ok(Invocation {
            passthrough: sifted.passthrough,
            save,
        })
    }

    /// Load the config, merge the host block for `save.save_as`, write it back.
    pub fn save(&self, save: &SaveArgs) -> Result<MergeOutcome> {
        let path = resolve_config_path(&self.config)?;
        let directives = directives::normalize(save);
        let mut config = SshConfigFile::load(&path)?;
        let outcome = config.upsert_host(&save.save_as, &directives);
        config.write()?;
        match outcome {
            MergeOutcome::Replaced => {
                log::info!("Updated host '{}' in {}", save.save_as, path.display())
            }
            MergeOutcome::Appended => {
                log::info!("Saved host '{}' to {}", save.save_as, path.display())
            }
        }
        Ok(outcome)
    }

    /// Save if requested, then hand the pass-through arguments to the client.
    /// A failed save is logged and does not stop the connection.
    pub fn run(&self, invocation: &Invocation) -> anyhow::Result<ExitStatus> {
        if let Some(save) = &invocation.save {
            if let Err(e) = self.save(save) {
                log::error!("{}", e);
            }
        }
        connection::forward(&self.program, &invocation.passthrough)
    }
}
