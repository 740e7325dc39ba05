//! Orchestrator tests
//!
//! Build small PBIP trees in temp directories and run the orchestrator with
//! a scripted linter backend, so no .NET tooling is needed.

use pbilint::scoring::{normalize_model_output, normalize_visuals_output, parse_inspector_output};
use pbilint::{ItemKind, LintError, LinterBackend, LinterResult, Orchestrator, RunState};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Backend that records calls and answers from a script keyed by folder name
#[derive(Default)]
struct ScriptedBackend {
    calls: RefCell<Vec<(ItemKind, PathBuf)>>,
    scores: HashMap<String, f64>,
    failures: Vec<String>,
}

impl ScriptedBackend {
    fn with_score(mut self, name: &str, score: f64) -> Self {
        self.scores.insert(name.to_string(), score);
        self
    }

    fn failing(mut self, name: &str) -> Self {
        self.failures.push(name.to_string());
        self
    }

    fn answer(&self, kind: ItemKind, path: &Path) -> Result<LinterResult, LintError> {
        self.calls.borrow_mut().push((kind, path.to_path_buf()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        if self.failures.contains(&name) {
            return Err(LintError::ToolCrash {
                tool: "scripted".into(),
                message: "exited with status 1".into(),
            });
        }
        let score = self.scores.get(&name).copied().unwrap_or(9.5);
        normalize_model_output(&format!("{{\"score\": {}}}", score))
    }

    fn call_names(&self) -> Vec<(ItemKind, String)> {
        self.calls
            .borrow()
            .iter()
            .map(|(kind, path)| (*kind, path.file_name().unwrap().to_string_lossy().to_string()))
            .collect()
    }
}

impl LinterBackend for ScriptedBackend {
    fn lint_model(&self, model_root: &Path) -> Result<LinterResult, LintError> {
        self.answer(ItemKind::SemanticModel, model_root)
    }

    fn lint_visuals(&self, report_root: &Path) -> Result<LinterResult, LintError> {
        self.answer(ItemKind::Report, report_root)
    }
}

fn make_item(dir: &Path, item_type: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join(".platform"),
        format!(
            r#"{{"$schema": "https://developer.microsoft.com/json-schemas/fabric/gitIntegration/platformProperties/2.0.0/schema.json",
"metadata": {{"type": "{}", "displayName": "x"}},
"config": {{"version": "2.0", "logicalId": "00000000-0000-0000-0000-000000000000"}}}}"#,
            item_type
        ),
    )
    .unwrap();
}

#[test]
fn test_sibling_model_and_report_are_both_linted() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("project");
    make_item(&project.join("Sales.Report"), "Report");
    make_item(&project.join("Sales.SemanticModel"), "SemanticModel");

    let backend = ScriptedBackend::default();
    let mut state = RunState::new();
    Orchestrator::new(&backend, 5).lint_root(dir.path(), &mut state);

    assert_eq!(
        backend.call_names(),
        vec![
            (ItemKind::SemanticModel, "Sales.SemanticModel".to_string()),
            (ItemKind::Report, "Sales.Report".to_string()),
        ]
    );
    assert!(state.is_success());
    assert_eq!(state.tally().excellent, 2);
}

#[test]
fn test_groups_are_processed_models_first() {
    let dir = tempfile::tempdir().unwrap();
    make_item(&dir.path().join("a").join("B.Report"), "Report");
    make_item(&dir.path().join("a").join("A.Report"), "Report");
    make_item(&dir.path().join("a").join("Z.SemanticModel"), "SemanticModel");
    make_item(&dir.path().join("b").join("C.SemanticModel"), "SemanticModel");

    let backend = ScriptedBackend::default();
    let mut state = RunState::new();
    Orchestrator::new(&backend, 5).lint_root(dir.path(), &mut state);

    assert_eq!(
        backend.call_names(),
        vec![
            (ItemKind::SemanticModel, "Z.SemanticModel".to_string()),
            (ItemKind::Report, "A.Report".to_string()),
            (ItemKind::Report, "B.Report".to_string()),
            (ItemKind::SemanticModel, "C.SemanticModel".to_string()),
        ]
    );
}

#[test]
fn test_needs_attention_does_not_fail_run() {
    let dir = tempfile::tempdir().unwrap();
    make_item(&dir.path().join("Sales.Report"), "Report");

    let backend = ScriptedBackend::default().with_score("Sales.Report", 6.0);
    let mut state = RunState::new();
    Orchestrator::new(&backend, 5).lint_root(dir.path(), &mut state);

    assert!(state.is_success());
    assert_eq!(state.tally().needs_attention, 1);
}

#[test]
fn test_poor_score_fails_run_but_continues() {
    let dir = tempfile::tempdir().unwrap();
    make_item(&dir.path().join("Bad.SemanticModel"), "SemanticModel");
    make_item(&dir.path().join("Good.Report"), "Report");

    let backend = ScriptedBackend::default().with_score("Bad.SemanticModel", 5.99);
    let mut state = RunState::new();
    Orchestrator::new(&backend, 5).lint_root(dir.path(), &mut state);

    assert_eq!(backend.call_names().len(), 2);
    assert!(!state.is_success());
    assert_eq!(state.exit_code(), 1);
}

#[test]
fn test_linter_failure_is_contained() {
    let dir = tempfile::tempdir().unwrap();
    make_item(&dir.path().join("Broken.SemanticModel"), "SemanticModel");
    make_item(&dir.path().join("Fine.Report"), "Report");

    let backend = ScriptedBackend::default().failing("Broken.SemanticModel");
    let mut state = RunState::new();
    Orchestrator::new(&backend, 5).lint_root(dir.path(), &mut state);

    assert_eq!(backend.call_names().len(), 2);
    assert!(!state.is_success());
    let tally = state.tally();
    assert_eq!(tally.failed, 1);
    assert_eq!(tally.excellent, 1);
}

#[test]
fn test_missing_root_does_not_stop_siblings() {
    let dir = tempfile::tempdir().unwrap();
    make_item(&dir.path().join("Sales.Report"), "Report");
    let missing = dir.path().join("does-not-exist");

    let backend = ScriptedBackend::default();
    let mut state = RunState::new();
    Orchestrator::new(&backend, 5).lint_paths(&[missing, dir.path().to_path_buf()], &mut state);

    assert_eq!(backend.call_names().len(), 1);
    assert!(!state.is_success());
    assert_eq!(state.exit_code(), 1);
}

#[test]
fn test_empty_tree_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("docs")).unwrap();

    let backend = ScriptedBackend::default();
    let mut state = RunState::new();
    Orchestrator::new(&backend, 5).lint_root(dir.path(), &mut state);

    assert!(backend.call_names().is_empty());
    assert!(state.is_success());
}

#[test]
fn test_unrecognized_and_untyped_items_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    make_item(&dir.path().join("Board.Dashboard"), "Dashboard");
    let untyped = dir.path().join("Untyped");
    fs::create_dir_all(&untyped).unwrap();
    fs::write(untyped.join(".platform"), r#"{"config": {}}"#).unwrap();

    let backend = ScriptedBackend::default();
    let mut state = RunState::new();
    let orchestrator = Orchestrator::new(&backend, 5);

    let items = orchestrator.discover(dir.path(), &mut state);
    assert_eq!(items.len(), 2);

    orchestrator.lint_root(dir.path(), &mut state);
    assert!(backend.call_names().is_empty());
    assert!(state.is_success());
}

#[test]
fn test_malformed_marker_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("Broken.Report");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join(".platform"), "{ not json").unwrap();

    let backend = ScriptedBackend::default();
    let mut state = RunState::new();
    Orchestrator::new(&backend, 5).lint_root(dir.path(), &mut state);

    assert!(backend.call_names().is_empty());
    assert!(!state.is_success());
}

#[test]
fn test_items_below_depth_bound_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    make_item(&dir.path().join("a").join("b").join("Deep.Report"), "Report");

    let backend = ScriptedBackend::default();
    let mut state = RunState::new();
    Orchestrator::new(&backend, 2).lint_root(dir.path(), &mut state);
    assert!(backend.call_names().is_empty());

    Orchestrator::new(&backend, 3).lint_root(dir.path(), &mut state);
    assert_eq!(backend.call_names().len(), 1);
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_does_not_fail_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a")).unwrap();
    std::os::unix::fs::symlink(dir.path(), dir.path().join("a").join("back")).unwrap();
    make_item(&dir.path().join("b").join("X.Report"), "Report");

    let backend = ScriptedBackend::default();
    let mut state = RunState::new();
    Orchestrator::new(&backend, 5).lint_root(dir.path(), &mut state);

    assert_eq!(
        backend.call_names(),
        vec![(ItemKind::Report, "X.Report".to_string())]
    );
    assert!(state.is_success());
}

/// Backend that scores reports with the real visuals normalization
struct InspectorBackend {
    raw_results: String,
    objects: u64,
}

impl LinterBackend for InspectorBackend {
    fn lint_model(&self, _model_root: &Path) -> Result<LinterResult, LintError> {
        normalize_model_output("noise before {\"score\": 9.1, \"x\":1} noise after")
    }

    fn lint_visuals(&self, _report_root: &Path) -> Result<LinterResult, LintError> {
        let findings = parse_inspector_output(&self.raw_results)?;
        normalize_visuals_output(&findings, self.objects)
    }
}

#[test]
fn test_failed_visual_check_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    make_item(&dir.path().join("Sales.SemanticModel"), "SemanticModel");
    make_item(&dir.path().join("Sales.Report"), "Report");

    let backend = InspectorBackend {
        raw_results: r#"{"Results": [{"LogType": 0, "Actual": false}]}"#.to_string(),
        objects: 2,
    };
    let mut state = RunState::new();
    Orchestrator::new(&backend, 5).lint_root(dir.path(), &mut state);

    let tally = state.tally();
    assert_eq!(tally.excellent, 1);
    assert_eq!(tally.poor, 1);
    assert!(!state.is_success());
}
