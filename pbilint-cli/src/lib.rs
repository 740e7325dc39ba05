//! pbilint - quality gate for Power BI projects (PBIP)
//!
//! Finds semantic models and reports in a project tree, runs an external
//! linter against each and reduces the outputs to one 0-10 score with
//! pass/warn/fail classification.
//!
//! # Architecture
//!
//! - `discovery`: finds item roots by their `.platform` marker and groups them
//! - `linters`: runs the .NET linters as subprocesses
//! - `scoring`: normalizes linter output and computes scores and tiers
//! - `reporter`: logs each outcome and tracks overall success
//! - `orchestrator`: sequences the above across root paths
//! - `config`, `cli`: settings and command line

pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod linters;
pub mod models;
pub mod orchestrator;
pub mod reporter;
pub mod scoring;

pub use errors::LintError;
pub use linters::{DotnetLinters, LinterBackend};
pub use models::{FindingCounts, Item, ItemGroup, ItemKind, LinterResult, ScoreTier};
pub use orchestrator::Orchestrator;
pub use reporter::{report, RunState, RunTally};
