//! Subcommand implementations.

pub mod export;
pub mod init;
pub mod locate;
pub mod run;
