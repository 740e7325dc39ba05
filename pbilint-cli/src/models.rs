//! Core data models for pbilint
//!
//! These models describe the items found in a PBIP tree and the
//! normalized results produced by the linters run against them.

use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Item types the orchestrator knows how to lint.
///
/// Variant order is the order buckets are processed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKind {
    SemanticModel,
    Report,
}

impl ItemKind {
    pub const ALL: [ItemKind; 2] = [ItemKind::SemanticModel, ItemKind::Report];

    /// Map a declared type from a marker file to a recognized kind
    pub fn from_declared(declared: &str) -> Option<ItemKind> {
        match declared {
            "SemanticModel" => Some(ItemKind::SemanticModel),
            "Report" => Some(ItemKind::Report),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::SemanticModel => "SemanticModel",
            ItemKind::Report => "Report",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One analyzable unit located through its marker file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub path: PathBuf,
    /// `metadata.type` from the marker file, if the marker could be read
    pub declared_type: Option<String>,
}

impl Item {
    pub fn new(path: impl Into<PathBuf>, declared_type: Option<String>) -> Self {
        Self {
            path: path.into(),
            declared_type,
        }
    }

    /// Recognized kind, or `None` for unclassified items
    pub fn kind(&self) -> Option<ItemKind> {
        self.declared_type.as_deref().and_then(ItemKind::from_declared)
    }

    /// Folder directly containing the item
    pub fn container(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Items sharing an immediate parent folder, bucketed by kind
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemGroup {
    pub container: PathBuf,
    pub buckets: BTreeMap<ItemKind, Vec<Item>>,
}

impl ItemGroup {
    pub fn new(container: impl Into<PathBuf>) -> Self {
        Self {
            container: container.into(),
            buckets: BTreeMap::new(),
        }
    }

    /// Items of one kind, empty when the bucket has none
    pub fn items(&self, kind: ItemKind) -> &[Item] {
        self.buckets.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }
}

/// Finding counts per severity tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindingCounts {
    pub errors: u64,
    pub warnings: u64,
    pub infos: u64,
}

impl FindingCounts {
    pub fn total(&self) -> u64 {
        self.errors + self.warnings + self.infos
    }
}

/// Normalized output of one linter run against one item
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinterResult {
    pub counts: FindingCounts,
    pub penalty: f64,
    /// Number of objects the penalty is spread over
    pub objects: u64,
    /// 0-10, rounded to 2 decimals
    pub score: f64,
    /// Extra fields reported by the tool, kept for logging
    pub details: Map<String, JsonValue>,
}

impl LinterResult {
    /// Everything but the score, as logged next to it
    pub fn details_json(&self) -> JsonValue {
        let mut out = Map::new();
        out.insert("errors".into(), self.counts.errors.into());
        out.insert("warnings".into(), self.counts.warnings.into());
        out.insert("infos".into(), self.counts.infos.into());
        out.insert("penalty".into(), json_number(self.penalty));
        out.insert("objects".into(), self.objects.into());
        for (key, value) in &self.details {
            out.entry(key.clone()).or_insert_with(|| value.clone());
        }
        JsonValue::Object(out)
    }
}

fn json_number(value: f64) -> JsonValue {
    serde_json::Number::from_f64(value)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

/// Classification of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoreTier {
    /// Below the attention threshold; fails the run
    Poor,
    NeedsAttention,
    Excellent,
}

impl std::fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreTier::Excellent => write!(f, "Excellent!"),
            ScoreTier::NeedsAttention => write!(f, "Needs attention."),
            ScoreTier::Poor => write!(f, "Poor performance."),
        }
    }
}
