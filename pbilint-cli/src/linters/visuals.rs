//! Report visuals linter (PBI Inspector)
//!
//! The inspector only accepts report folders whose path is all lowercase and
//! ends in `.report`. Reports that don't qualify are copied to a scratch
//! folder first. Results are written as a JSON file into a second scratch
//! folder; both are removed when the check finishes.

use super::external_tool::{run_external_tool, ExternalToolResult};
use crate::config::ToolConfig;
use crate::errors::LintError;
use crate::models::LinterResult;
use crate::scoring::{count_report_objects, normalize_visuals_output, parse_inspector_output};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;
use walkdir::WalkDir;

pub const VISUALS_LINTER_NAME: &str = "PBI Inspector";

/// Suffix the inspector requires on report paths
pub const REPORT_SUFFIX: &str = ".report";

/// Printed by the inspector when it cannot load the rules
const INVALID_RULES_MARKER: &str = "Error: Could not deserialise rules file with path";

/// Whether the inspector accepts `path` as-is
pub fn satisfies_path_constraints(path: &Path) -> bool {
    let path = path.to_string_lossy();
    !path.chars().any(char::is_uppercase) && path.ends_with(REPORT_SUFFIX)
}

/// Command line that lints one report
pub fn visuals_linter_command(tools: &ToolConfig, report_path: &Path, output_dir: &Path) -> Vec<String> {
    vec![
        tools.dotnet.clone(),
        "run".to_string(),
        "--project".to_string(),
        tools.visuals_linter.to_string_lossy().to_string(),
        "--configuration".to_string(),
        "Release".to_string(),
        "-pbipreport".to_string(),
        report_path.to_string_lossy().to_string(),
        "-output".to_string(),
        output_dir.to_string_lossy().to_string(),
        "-rules".to_string(),
        tools.rules.to_string_lossy().to_string(),
        "-formats".to_string(),
        "JSON".to_string(),
    ]
}

/// Run the visuals linter against a report and score its findings
pub fn run_visuals_linter(tools: &ToolConfig, report_root: &Path) -> Result<LinterResult, LintError> {
    let result_dir = scratch_dir()?;
    // Keep the copy alive until the linter is done with it
    let (report_path, _copy) = linter_report_path(report_root)?;

    let cmd = visuals_linter_command(tools, &report_path, result_dir.path());
    let output = run_external_tool(&cmd, VISUALS_LINTER_NAME, tools.timeout())?;
    debug!("{} output for {}:\n{}", VISUALS_LINTER_NAME, report_root.display(), output.combined_output());

    collect_visuals_result(output, result_dir.path(), &tools.rules, report_root)
}

fn collect_visuals_result(
    output: ExternalToolResult,
    result_dir: &Path,
    rules: &Path,
    report_root: &Path,
) -> Result<LinterResult, LintError> {
    if output.combined_output().contains(INVALID_RULES_MARKER) {
        return Err(LintError::InvalidRulesFile(rules.to_path_buf()));
    }
    output.require_success(VISUALS_LINTER_NAME)?;

    let result_file = first_result_file(result_dir)?;
    let content = fs::read_to_string(&result_file).map_err(|e| LintError::io(&result_file, e))?;
    let findings = parse_inspector_output(&content)?;

    let objects = count_report_objects(report_root)?;
    normalize_visuals_output(&findings, objects)
}

fn first_result_file(dir: &Path) -> Result<PathBuf, LintError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| LintError::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    files.into_iter().next().ok_or_else(|| {
        LintError::malformed(format!(
            "{} wrote no result file to {}",
            VISUALS_LINTER_NAME,
            dir.display()
        ))
    })
}

fn scratch_dir() -> Result<TempDir, LintError> {
    tempfile::Builder::new()
        .prefix("pbilint-")
        .tempdir()
        .map_err(|e| LintError::io(std::env::temp_dir(), e))
}

/// Path to hand to the inspector, plus the scratch folder holding a copy when one was needed
fn linter_report_path(report_root: &Path) -> Result<(PathBuf, Option<TempDir>), LintError> {
    if satisfies_path_constraints(report_root) {
        return Ok((report_root.to_path_buf(), None));
    }

    let scratch = scratch_dir()?;
    let copy = scratch.path().join(REPORT_SUFFIX);
    debug!("Copying {} to {} for {}", report_root.display(), copy.display(), VISUALS_LINTER_NAME);
    copy_dir_all(report_root, &copy)?;
    Ok((copy, Some(scratch)))
}

/// Recursively copy `src` into `dst`, creating `dst` if needed
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<(), LintError> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| src.to_path_buf());
            LintError::io(path, e.into())
        })?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| LintError::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| LintError::io(&target, e))?;
        }
    }
    Ok(())
}
