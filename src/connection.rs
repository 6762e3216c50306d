use std::ffi::OsStr;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};

/// Run `program` with `args` verbatim, inheriting stdin/stdout/stderr.
/// Blocks until the client exits.
pub fn forward<S: AsRef<OsStr>>(program: &OsStr, args: &[S]) -> Result<ExitStatus> {
    log::debug!(
        "exec {} {:?}",
        program.to_string_lossy(),
        args.iter()
            .map(|a| a.as_ref().to_string_lossy())
            .collect::<Vec<_>>()
    );
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to launch {}", program.to_string_lossy()))?;
    Ok(status)
}

/// Exit code to report for a finished client.
/// A client killed by a signal maps to 128 + signal, like a shell would report it.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
