//! slosh: an ssh wrapper that can save the connection it is about to make.
//!
//! `slosh --save-as box user@host:2222 -i ~/.ssh/id` writes a `Host box`
//! block to `~/.ssh/config`, then runs `ssh user@host:2222 -i ~/.ssh/id`.

pub mod args;
pub mod connection;
pub mod directives;
pub mod error;
pub mod ssh_config;
pub mod wrapper;
