use std::ffi::OsString;

use env_logger::Env;

use slosh::connection;
use slosh::wrapper::Wrapper;

/// Exit code ssh itself uses when it could not connect.
const LAUNCH_FAILURE: i32 = 255;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Arguments need not be UTF-8
    let raw: Vec<OsString> = std::env::args_os().skip(1).collect();
    let wrapper = Wrapper::from_env();

    // Usage errors print clap's message and exit before ssh runs
    let invocation = match wrapper.prepare(&raw) {
        Ok(invocation) => invocation,
        Err(e) => e.exit(),
    };

    match wrapper.run(&invocation) {
        Ok(status) => std::process::exit(connection::exit_code(status)),
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(LAUNCH_FAILURE);
        }
    }
}
