//! Configuration module for pbilint
//!
//! This module handles:
//! - Project-level configuration (pbilint.toml)
//! - Linter tool locations and timeouts
//! - Scan depth

mod lint_config;

pub use lint_config::{
    install_dir, load_config, LintConfig, ToolConfig, CONFIG_FILE_NAME, DEFAULT_TIMEOUT_SECS,
};
