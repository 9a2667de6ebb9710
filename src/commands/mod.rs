//! CLI subcommand implementations

pub mod ask;
pub mod extract;
pub mod init;
pub mod serve;
