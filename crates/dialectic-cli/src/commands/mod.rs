//! CLI subcommands

pub mod info;
pub mod run;
pub mod show;
