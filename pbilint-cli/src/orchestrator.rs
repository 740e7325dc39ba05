//! Sequencing of discovery and linting across root paths.
//!
//! For each root: scan, classify, group, then lint every semantic model
//! followed by every report of each group. Items are checked one at a time.

use crate::discovery::{self, classify};
use crate::errors::LintError;
use crate::linters::{LinterBackend, MODEL_LINTER_NAME, VISUALS_LINTER_NAME};
use crate::models::{Item, ItemGroup, ItemKind};
use crate::reporter::{report, RunState};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct Orchestrator<'a, B: LinterBackend> {
    backend: &'a B,
    max_depth: usize,
}

impl<'a, B: LinterBackend> Orchestrator<'a, B> {
    pub fn new(backend: &'a B, max_depth: usize) -> Self {
        Self { backend, max_depth }
    }

    /// Lint every root path; a failing root does not stop the others
    pub fn lint_paths(&self, paths: &[PathBuf], state: &mut RunState) {
        for path in paths {
            self.lint_root(path, state);
        }
        state.log_summary();
    }

    /// Lint all items found under one root path
    pub fn lint_root(&self, root: &Path, state: &mut RunState) {
        if !root.exists() {
            state.log_error(LintError::PathNotFound(root.to_path_buf()));
            return;
        }

        let items = self.discover(root, state);
        let groups = discovery::group(&items);
        if groups.is_empty() {
            warn!("No items found at {}", root.display());
            return;
        }

        for group in groups.values() {
            self.lint_group(group, state);
        }
    }

    /// Scan `root` and classify each item found
    pub fn discover(&self, root: &Path, state: &mut RunState) -> Vec<Item> {
        discovery::scan(root, self.max_depth)
            .into_iter()
            .map(|path| {
                let declared = match classify(&path) {
                    Ok(declared) => declared,
                    Err(e) => {
                        state.log_exception(format_args!("Reading item type of '{}'", path.display()), &e);
                        None
                    }
                };
                let item = Item::new(path, declared);
                if item.kind().is_none() {
                    debug!(
                        "Skipping '{}': unrecognized item type {:?}",
                        item.path.display(),
                        item.declared_type
                    );
                }
                item
            })
            .collect()
    }

    fn lint_group(&self, group: &ItemGroup, state: &mut RunState) {
        info!("In '{}', reviewing: {}", group.container.display(), describe_buckets(&group.buckets));

        for model in group.items(ItemKind::SemanticModel) {
            report(state, &label(model), MODEL_LINTER_NAME, || {
                self.backend.lint_model(&model.path)
            });
        }

        for report_item in group.items(ItemKind::Report) {
            report(state, &label(report_item), VISUALS_LINTER_NAME, || {
                self.backend.lint_visuals(&report_item.path)
            });
        }
    }
}

fn label(item: &Item) -> String {
    item.path.display().to_string()
}

fn describe_buckets(buckets: &BTreeMap<ItemKind, Vec<Item>>) -> String {
    ItemKind::ALL
        .iter()
        .map(|kind| {
            let names: Vec<String> = buckets
                .get(kind)
                .map(|items| {
                    items
                        .iter()
                        .map(|i| {
                            i.path
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_else(|| i.path.display().to_string())
                        })
                        .collect()
                })
                .unwrap_or_default();
            format!("{}: [{}]", kind, names.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
