//! Command-line interface.
//!
//! - `commands`: argument definitions using clap derive
//! - `client`: IPC client for daemon communication
//! - `display`: output formatting

pub mod client;
pub mod commands;
pub mod display;

pub use client::IpcClient;
pub use commands::{Cli, Commands, ConfigArgs, StartArgs};
pub use display::Display;
