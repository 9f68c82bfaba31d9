//! Library half of the `bullseye` binary: logging, commands and terminal tables.

pub mod commands;
pub mod logging;
pub mod summary;
