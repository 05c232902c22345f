//! CLI subcommands.

pub mod agents;
pub mod ask;
pub mod init;
pub mod route;
pub mod status;
