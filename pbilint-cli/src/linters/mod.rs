//! External linters
//!
//! Each item kind has one linter:
//! - Semantic models: TMDL rules (`model`), which print a JSON summary
//! - Reports: PBI Inspector (`visuals`), which writes rule results to a file
//!
//! `LinterBackend` is the seam the orchestrator talks to, so runs can be
//! exercised without the .NET tools installed.

pub mod external_tool;
pub mod model;
pub mod visuals;

pub use external_tool::{run_external_tool, ExternalToolResult};
pub use model::{run_model_linter, MODEL_LINTER_NAME};
pub use visuals::{run_visuals_linter, VISUALS_LINTER_NAME};

use crate::config::ToolConfig;
use crate::errors::LintError;
use crate::models::LinterResult;
use std::path::Path;

/// Runs the linters for each item kind
pub trait LinterBackend {
    /// Lint a semantic model item
    fn lint_model(&self, model_root: &Path) -> Result<LinterResult, LintError>;

    /// Lint the visuals of a report item
    fn lint_visuals(&self, report_root: &Path) -> Result<LinterResult, LintError>;
}

/// Backend that shells out to the .NET linter projects
#[derive(Debug, Clone)]
pub struct DotnetLinters {
    tools: ToolConfig,
}

impl DotnetLinters {
    pub fn new(tools: ToolConfig) -> Self {
        Self { tools }
    }
}

impl LinterBackend for DotnetLinters {
    fn lint_model(&self, model_root: &Path) -> Result<LinterResult, LintError> {
        run_model_linter(&self.tools, model_root)
    }

    fn lint_visuals(&self, report_root: &Path) -> Result<LinterResult, LintError> {
        run_visuals_linter(&self.tools, report_root)
    }
}
