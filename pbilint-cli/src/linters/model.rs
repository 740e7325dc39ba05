//! Semantic model linter (TMDL rules run through Tabular Editor)

use super::external_tool::run_external_tool;
use crate::config::ToolConfig;
use crate::errors::LintError;
use crate::models::LinterResult;
use crate::scoring::normalize_model_output;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const MODEL_LINTER_NAME: &str = "TMDLLint";

/// Subfolder of a semantic model holding its TMDL definition
const DEFINITION_DIR: &str = "definition";

/// Command line that lints one semantic model
pub fn model_linter_command(tools: &ToolConfig, model_root: &Path) -> Vec<String> {
    vec![
        tools.dotnet.clone(),
        "run".to_string(),
        "--configuration".to_string(),
        "Release".to_string(),
        "--project".to_string(),
        tools.model_linter.to_string_lossy().to_string(),
        model_root.join(DEFINITION_DIR).to_string_lossy().to_string(),
    ]
}

/// Run the model linter against a semantic model and normalize its output
pub fn run_model_linter(tools: &ToolConfig, model_root: &Path) -> Result<LinterResult, LintError> {
    let cmd = model_linter_command(tools, model_root);
    debug!("Linting semantic model {}", model_root.display());
    collect_model_result(&cmd, tools.timeout())
}

fn collect_model_result(cmd: &[String], timeout: Duration) -> Result<LinterResult, LintError> {
    let output = run_external_tool(cmd, MODEL_LINTER_NAME, timeout)?;
    debug!("{} output:\n{}", MODEL_LINTER_NAME, output.combined_output());

    let output = output.require_success(MODEL_LINTER_NAME)?;

    // The JSON summary normally lands on stdout; fall back to both streams
    normalize_model_output(&output.stdout)
        .or_else(|_| normalize_model_output(&output.combined_output()))
}
