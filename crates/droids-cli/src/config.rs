//! Run configuration for the `compare` command.
//!
//! Values are merged in increasing precedence: built-in defaults, the configuration file
//! (TOML or legacy `DROIDS.ctl`), command-line flags, and finally `-S key=value` overrides.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod legacy;
pub mod models;

pub use builder::build_config;
