/*!
 * Tests for the dedup/idempotency authority
 */

use doctrans::completion_tracker::CompletionTracker;
use doctrans::repository::RemoteItem;

fn item(name: &str) -> RemoteItem {
    RemoteItem::new("id-1", name, "text/plain")
}

fn tracker_with(names: &[&str]) -> CompletionTracker {
    let listing: Vec<RemoteItem> = names
        .iter()
        .enumerate()
        .map(|(i, name)| RemoteItem::new(format!("dest-{}", i), *name, "text/plain"))
        .collect();
    CompletionTracker::from_listing(&listing)
}

#[test]
fn test_isPending_withEmptyDestination_shouldBeTrue() {
    let tracker = tracker_with(&[]);

    assert!(tracker.is_pending(&item("notes.txt")));
}

#[test]
fn test_isPending_withTranslationAlreadyPresent_shouldBeFalse() {
    // The destination already lists the expected artifact name
    let tracker = tracker_with(&["notes_AT_Translated.txt"]);

    assert!(!tracker.is_pending(&item("notes.txt")));
}

#[test]
fn test_isPending_withUnrelatedDestinationEntries_shouldBeTrue() {
    let tracker = tracker_with(&["report_AT_Translated.docx", "other.txt"]);

    assert!(tracker.is_pending(&item("notes.txt")));
}

#[test]
fn test_isPending_withSuffixedSourceName_shouldBeFalseRegardlessOfDestination() {
    // A source item that is itself a translation artifact is never
    // selected, even when the destination is empty
    let tracker = tracker_with(&[]);

    assert!(!tracker.is_pending(&item("report_AT_Translated.docx")));
    assert!(!tracker.is_pending(&item("report_AT_Translated")));
}

#[test]
fn test_isPending_comparisonIsExactString_shouldNotFuzzyMatch() {
    // Same stem but different extension is a different artifact
    let tracker = tracker_with(&["notes_AT_Translated.pdf"]);

    assert!(tracker.is_pending(&item("notes.txt")));
}

#[test]
fn test_markPublished_shouldSuppressSecondItemWithSameBaseName() {
    // Two pending items sharing a base name within one cycle: after the
    // first publish the tracker must report the second as complete
    let mut tracker = tracker_with(&[]);
    let first = RemoteItem::new("a", "notes.txt", "text/plain");
    let second = RemoteItem::new("b", "notes.txt", "text/plain");

    assert!(tracker.is_pending(&first));
    tracker.mark_published("notes_AT_Translated.txt");
    assert!(!tracker.is_pending(&second));
}

#[test]
fn test_fromListing_shouldSnapshotAllNames() {
    let tracker = tracker_with(&["a.txt", "b.txt", "c.txt"]);

    assert_eq!(tracker.len(), 3);
    assert!(!tracker.is_empty());
}
