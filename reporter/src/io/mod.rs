//! I/O edges of the reporter: config files, event logs and the console sink.

pub mod config;
pub mod events;
pub mod sink;
