use std::collections::HashSet;

use crate::file_utils;
use crate::repository::RemoteItem;

// @module: Dedup/idempotency authority for the poll loop

/// Snapshot of the destination folder used to decide which source items
/// still need translation.
///
/// The tracker is rebuilt from a fresh destination listing on every poll
/// cycle and lives for exactly one cycle; nothing is persisted between
/// cycles. The destination listing, not any local state, is the authority
/// on what has been translated.
#[derive(Debug, Default)]
pub struct CompletionTracker {
    /// Names currently present at the destination
    destination_names: HashSet<String>,
}

impl CompletionTracker {
    /// Build a tracker from a destination folder listing
    pub fn from_listing(listing: &[RemoteItem]) -> Self {
        Self {
            destination_names: listing.iter().map(|item| item.name.clone()).collect(),
        }
    }

    /// Decide whether a source item still needs translation.
    ///
    /// Returns false when either:
    /// - the item's own name carries the translation marker (it is itself a
    ///   published translation and selecting it would loop forever), or
    /// - the destination already holds the item's expected artifact name.
    ///
    /// Name comparison is exact-string after marker handling. Two distinct
    /// items whose names collide after marker stripping are conflated; the
    /// pipeline identifies work by name, not by content.
    pub fn is_pending(&self, item: &RemoteItem) -> bool {
        if file_utils::has_translation_suffix(&item.name) {
            return false;
        }

        let expected = file_utils::translated_name(&item.name);
        !self.destination_names.contains(&expected)
    }

    /// Record a name just published to the destination.
    ///
    /// Keeps the snapshot current within a cycle, so a second pending item
    /// sharing the same base name cannot be published twice before the next
    /// fresh listing.
    pub fn mark_published(&mut self, name: &str) {
        self.destination_names.insert(name.to_string());
    }

    /// Number of names in the snapshot
    pub fn len(&self) -> usize {
        self.destination_names.len()
    }

    /// Whether the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.destination_names.is_empty()
    }
}
