//! Conversion of raw linter output into `LinterResult`.
//!
//! The model linter prints one JSON object somewhere in its console output;
//! the visuals linter writes a list of rule results to a file. Both end up in
//! the same normalized shape.

use super::{round2, score_from_penalty, MAX_SCORE};
use crate::discovery::classifier::strip_bom;
use crate::errors::LintError;
use crate::models::{FindingCounts, LinterResult};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::path::Path;

/// Findings assumed for a rule whose check failed outright
const FAILED_CHECK_FINDINGS: u64 = 5;
const ERROR_WEIGHT: f64 = 2.0;
const WARNING_WEIGHT: f64 = 1.0;

/// Report definition holding the visual containers
pub const REPORT_DEFINITION_FILE: &str = "report.json";

/// Span from the first `{` to the last `}` of `text`, if any
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end >= start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Normalize the console output of the model linter.
///
/// The embedded object must carry a numeric `score`. Known count fields are
/// lifted into the result; anything else is kept as details.
pub fn normalize_model_output(raw: &str) -> Result<LinterResult, LintError> {
    let span = extract_json_object(raw)
        .ok_or_else(|| LintError::malformed(format!("No JSON object found in the output: {}", raw.trim())))?;

    let mut object: Map<String, JsonValue> = match serde_json::from_str(span) {
        Ok(JsonValue::Object(map)) => map,
        Ok(other) => {
            return Err(LintError::malformed(format!(
                "expected a JSON object, got {}",
                other
            )))
        }
        Err(e) => return Err(LintError::malformed(format!("invalid JSON in output: {}", e))),
    };

    let score = match object.remove("score") {
        Some(value) => number_field("score", &value)?,
        None => return Err(LintError::malformed("missing field `score`")),
    };
    if !score.is_finite() {
        return Err(LintError::malformed(format!("score is not a finite number: {}", score)));
    }

    let counts = FindingCounts {
        errors: take_count(&mut object, "errors")?,
        warnings: take_count(&mut object, "warnings")?,
        infos: take_count(&mut object, "infos")?,
    };
    let penalty = match object.remove("penalty") {
        Some(value) => number_field("penalty", &value)?.max(0.0),
        None => 0.0,
    };
    let objects = take_count(&mut object, "objects")?;

    Ok(LinterResult {
        counts,
        penalty,
        objects,
        score: round2(score.clamp(0.0, MAX_SCORE)),
        details: object,
    })
}

fn number_field(name: &str, value: &JsonValue) -> Result<f64, LintError> {
    match value {
        JsonValue::Number(n) => n
            .as_f64()
            .ok_or_else(|| LintError::malformed(format!("`{}` is out of range", name))),
        // Some tool versions print the score as a string
        JsonValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| LintError::malformed(format!("`{}` is not a number: {:?}", name, s))),
        other => Err(LintError::malformed(format!(
            "`{}` is not a number: {}",
            name, other
        ))),
    }
}

fn take_count(object: &mut Map<String, JsonValue>, name: &str) -> Result<u64, LintError> {
    match object.remove(name) {
        None | Some(JsonValue::Null) => Ok(0),
        Some(value) => value.as_u64().ok_or_else(|| {
            LintError::malformed(format!("`{}` is not a non-negative integer: {}", name, value))
        }),
    }
}

/// Severity tier of a visuals finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingSeverity {
    Error,
    Warning,
    Info,
}

impl FindingSeverity {
    /// 0 is an error, 1 a warning, anything else informational
    pub fn from_log_type(log_type: &JsonValue) -> Self {
        match log_type.as_i64() {
            Some(0) => FindingSeverity::Error,
            Some(1) => FindingSeverity::Warning,
            _ => FindingSeverity::Info,
        }
    }

    fn weight(&self) -> f64 {
        match self {
            FindingSeverity::Error => ERROR_WEIGHT,
            FindingSeverity::Warning => WARNING_WEIGHT,
            FindingSeverity::Info => 0.0,
        }
    }
}

/// One rule result from the visuals linter
#[derive(Debug, Clone, Deserialize)]
pub struct VisualFinding {
    #[serde(rename = "LogType")]
    pub log_type: JsonValue,
    /// `false` when the check failed, otherwise the offending objects
    #[serde(rename = "Actual")]
    pub actual: JsonValue,
    #[serde(rename = "RuleName", default)]
    pub rule_name: Option<String>,
}

impl VisualFinding {
    pub fn severity(&self) -> FindingSeverity {
        FindingSeverity::from_log_type(&self.log_type)
    }

    /// Number of findings this rule result stands for
    pub fn finding_count(&self) -> Result<u64, LintError> {
        match &self.actual {
            JsonValue::Bool(false) => Ok(FAILED_CHECK_FINDINGS),
            JsonValue::Array(values) => Ok(values.len() as u64),
            JsonValue::Object(map) => Ok(map.len() as u64),
            other => Err(LintError::malformed(format!(
                "unexpected `Actual` value{}: {}",
                self.rule_name
                    .as_deref()
                    .map(|r| format!(" for rule '{}'", r))
                    .unwrap_or_default(),
                other
            ))),
        }
    }
}

#[derive(Deserialize)]
struct InspectorOutput {
    #[serde(rename = "Results")]
    results: Vec<VisualFinding>,
}

/// Parse the JSON file written by the visuals linter
pub fn parse_inspector_output(content: &str) -> Result<Vec<VisualFinding>, LintError> {
    let output: InspectorOutput = serde_json::from_str(strip_bom(content))
        .map_err(|e| LintError::malformed(format!("invalid visuals linter results: {}", e)))?;
    Ok(output.results)
}

/// Aggregate visuals findings into a scored result.
///
/// `objects` comes from the report definition, not from the findings.
pub fn normalize_visuals_output(
    results: &[VisualFinding],
    objects: u64,
) -> Result<LinterResult, LintError> {
    let mut counts = FindingCounts::default();
    let mut penalty = 0.0;

    for result in results {
        let count = result.finding_count()?;
        let severity = result.severity();
        match severity {
            FindingSeverity::Error => counts.errors += count,
            FindingSeverity::Warning => counts.warnings += count,
            FindingSeverity::Info => counts.infos += count,
        }
        penalty += count as f64 * severity.weight();
    }

    Ok(LinterResult {
        counts,
        penalty,
        objects,
        score: score_from_penalty(penalty, objects),
        details: Map::new(),
    })
}

#[derive(Deserialize)]
struct ReportDefinition {
    #[serde(default)]
    sections: Vec<ReportSection>,
}

#[derive(Deserialize)]
struct ReportSection {
    #[serde(rename = "visualContainers", default)]
    visual_containers: Vec<JsonValue>,
}

/// Count the visual containers across all sections of `report.json`
pub fn count_report_objects(report_root: &Path) -> Result<u64, LintError> {
    let path = report_root.join(REPORT_DEFINITION_FILE);
    let content = std::fs::read_to_string(&path).map_err(|e| LintError::io(&path, e))?;
    let report: ReportDefinition = serde_json::from_str(strip_bom(&content))
        .map_err(|e| LintError::malformed(format!("{} is not a valid report: {}", path.display(), e)))?;

    Ok(report
        .sections
        .iter()
        .map(|s| s.visual_containers.len() as u64)
        .sum())
}
