//! Library half of the `k90-profile` command.
//!
//! - **`config`**: the tool's TOML settings file.
//! - **`dump`**: a [`ProfileTransport`](k90_core::ProfileTransport) that prints
//!   requests instead of sending them, plus raw buffer and summary output.

pub mod config;
pub mod dump;
