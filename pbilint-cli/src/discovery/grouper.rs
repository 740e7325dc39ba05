//! Grouping of discovered items by their parent folder.

use crate::models::{Item, ItemGroup};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Group items by immediate parent folder, then bucket them by kind.
///
/// Every container of a discovered item gets a group, even when none of its
/// items has a recognized kind. Unrecognized items land in no bucket.
/// The output depends only on the set of items, not on their order.
pub fn group(items: &[Item]) -> BTreeMap<PathBuf, ItemGroup> {
    let mut groups: BTreeMap<PathBuf, ItemGroup> = BTreeMap::new();

    for item in items {
        let container = item.container().to_path_buf();
        let group = groups
            .entry(container.clone())
            .or_insert_with(|| ItemGroup::new(container));

        if let Some(kind) = item.kind() {
            group.buckets.entry(kind).or_default().push(item.clone());
        }
    }

    for group in groups.values_mut() {
        for bucket in group.buckets.values_mut() {
            bucket.sort();
            bucket.dedup();
        }
    }

    groups
}
