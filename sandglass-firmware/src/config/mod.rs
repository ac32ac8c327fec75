//! Configuration loading
//!
//! The configuration is the `sandglass.toml` embedded at build time. It is
//! checked by build.rs, so a parse failure here means the two parsers
//! disagree; the firmware then runs on built-in defaults.

pub mod loader;

pub use loader::load_config;
