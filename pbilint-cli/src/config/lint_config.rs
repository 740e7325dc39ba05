//! Project-level configuration support
//!
//! Loads optional settings from `pbilint.toml` in the working directory
//! (or the file given with `--config`).
//!
//! # Configuration Format
//!
//! ```toml
//! # pbilint.toml
//!
//! [tools]
//! dotnet = "dotnet"
//! model_linter = "TMDLLint"
//! visuals_linter = "PBI-Inspector/PBIXInspectorCLI"
//! rules = "pbi_inspector_rules.json"
//! timeout_secs = 120
//!
//! [scan]
//! max_depth = 5
//! ```
//!
//! Relative paths in the file are resolved against the file's directory.
//! Paths left unset default to locations next to the pbilint executable.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::discovery::DEFAULT_MAX_DEPTH;

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "pbilint.toml";

pub const DEFAULT_DOTNET: &str = "dotnet";
pub const DEFAULT_MODEL_LINTER: &str = "TMDLLint";
pub const DEFAULT_VISUALS_LINTER: &str = "PBI-Inspector/PBIXInspectorCLI";
pub const DEFAULT_RULES_FILE: &str = "pbi_inspector_rules.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Raw file contents; every key is optional
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    tools: ToolsSection,
    #[serde(default)]
    scan: ScanSection,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ToolsSection {
    dotnet: Option<String>,
    model_linter: Option<PathBuf>,
    visuals_linter: Option<PathBuf>,
    rules: Option<PathBuf>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ScanSection {
    max_depth: Option<usize>,
}

/// External tool locations and limits
#[derive(Debug, Clone, PartialEq)]
pub struct ToolConfig {
    /// Launcher used to run both linter projects
    pub dotnet: String,
    /// Project directory of the model linter
    pub model_linter: PathBuf,
    /// Project directory of the visuals linter
    pub visuals_linter: PathBuf,
    /// Rules file passed to the visuals linter
    pub rules: PathBuf,
    /// Per-invocation timeout (0 disables it)
    pub timeout_secs: u64,
}

impl ToolConfig {
    /// Defaults anchored at `base`
    pub fn with_base(base: &Path) -> Self {
        Self {
            dotnet: DEFAULT_DOTNET.to_string(),
            model_linter: base.join(DEFAULT_MODEL_LINTER),
            visuals_linter: base.join(DEFAULT_VISUALS_LINTER),
            rules: base.join(DEFAULT_RULES_FILE),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Resolved configuration used for a run
#[derive(Debug, Clone, PartialEq)]
pub struct LintConfig {
    pub tools: ToolConfig,
    pub max_depth: usize,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self::with_base(&install_dir())
    }
}

impl LintConfig {
    pub fn with_base(base: &Path) -> Self {
        Self {
            tools: ToolConfig::with_base(base),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Parse TOML content; relative paths resolve against `config_dir`,
    /// unset paths against `default_base`.
    pub fn from_toml(content: &str, config_dir: &Path, default_base: &Path) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = Self::with_base(default_base);

        let tools = file.tools;
        if let Some(dotnet) = tools.dotnet {
            config.tools.dotnet = dotnet;
        }
        if let Some(path) = tools.model_linter {
            config.tools.model_linter = config_dir.join(path);
        }
        if let Some(path) = tools.visuals_linter {
            config.tools.visuals_linter = config_dir.join(path);
        }
        if let Some(path) = tools.rules {
            config.tools.rules = config_dir.join(path);
        }
        if let Some(secs) = tools.timeout_secs {
            config.tools.timeout_secs = secs;
        }
        if let Some(depth) = file.scan.max_depth {
            config.max_depth = depth;
        }

        Ok(config)
    }

    /// Apply command-line overrides on top of the file settings
    pub fn with_overrides(
        mut self,
        rules: Option<PathBuf>,
        max_depth: Option<usize>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(rules) = rules {
            self.tools.rules = rules;
        }
        if let Some(depth) = max_depth {
            self.max_depth = depth;
        }
        if let Some(secs) = timeout_secs {
            self.tools.timeout_secs = secs;
        }
        self
    }
}

/// Directory of the running executable, where the linter projects live by default
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load configuration.
///
/// An explicit path must exist. Otherwise `pbilint.toml` is looked up in
/// `cwd`, and built-in defaults are used when it is absent.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<LintConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = cwd.join(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                debug!("No {} found in {}, using defaults", CONFIG_FILE_NAME, cwd.display());
                return Ok(LintConfig::default());
            }
            candidate
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf());

    let config = LintConfig::from_toml(&content, &config_dir, &install_dir())
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}
