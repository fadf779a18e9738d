/*!
 * End-to-end poll cycle tests.
 *
 * These drive the full controller over the in-memory repository backend and
 * the scripted mock provider: list -> filter -> download -> extract ->
 * translate -> reassemble -> publish.
 */

use std::sync::Arc;

use doctrans::app_config::{Config, TranslationConfig};
use doctrans::app_controller::Controller;
use doctrans::document_processor::{ContentKind, MIME_DOCX, extract_segments};
use doctrans::providers::mock::MockProvider;
use doctrans::repository::{MemoryRepository, Repository};
use doctrans::translation_service::TranslationService;

use crate::common;

const SOURCE: &str = "source";
const DESTINATION: &str = "destination";

/// Wire a controller around an in-memory repository and a mock provider.
/// Returns the controller plus a handle onto the repository for seeding
/// and observing.
fn make_pipeline(provider: MockProvider) -> (Controller, MemoryRepository, tempfile::TempDir) {
    let staging = common::create_temp_dir().unwrap();

    let mut config = Config::default();
    config.source_folder = SOURCE.to_string();
    config.destination_folder = DESTINATION.to_string();
    config.staging_dir = staging.path().to_string_lossy().to_string();

    let repository = MemoryRepository::new();
    let service = TranslationService::with_provider(Box::new(provider), TranslationConfig::default());
    let controller = Controller::with_components(
        config,
        Arc::new(repository.clone()) as Arc<dyn Repository>,
        service,
    );

    (controller, repository, staging)
}

#[tokio::test]
async fn test_cycle_withNewTextFile_shouldTranslateAndPublish() {
    // One plain text file, empty destination: a single chunk is translated
    // and published under the suffixed name
    let (controller, repo, _staging) = make_pipeline(MockProvider::working());
    repo.seed(SOURCE, "notes.txt", "text/plain", "line1\nline2");

    let stats = controller.run_cycles(1).await.unwrap();

    assert_eq!(stats.translated, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(repo.names_in(DESTINATION), vec!["notes_AT_Translated.txt".to_string()]);

    let published = repo.content_of(DESTINATION, "notes_AT_Translated.txt").unwrap();
    assert_eq!(&published[..], b"[TRANSLATED] line1\n[TRANSLATED] line2");
}

#[tokio::test]
async fn test_cycle_withExistingTranslation_shouldSkipWithoutProviderCalls() {
    // The destination already holds the artifact: no download, no
    // translation, no upload
    let provider = MockProvider::working();
    let counter = provider.counter();
    let (controller, repo, _staging) = make_pipeline(provider);
    repo.seed(SOURCE, "notes.txt", "text/plain", "line1\nline2");
    repo.seed(DESTINATION, "notes_AT_Translated.txt", "text/plain", "old translation");

    let stats = controller.run_cycles(1).await.unwrap();

    assert_eq!(stats.translated, 0);
    assert_eq!(stats.skipped, 1);
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
    // The old artifact is untouched
    assert_eq!(
        &repo.content_of(DESTINATION, "notes_AT_Translated.txt").unwrap()[..],
        b"old translation"
    );
}

#[tokio::test]
async fn test_cycle_withSuffixedSourceItem_shouldSkipUnconditionally() {
    // A translation artifact fed back in as a source is never selected,
    // regardless of destination contents
    let provider = MockProvider::working();
    let counter = provider.counter();
    let (controller, repo, _staging) = make_pipeline(provider);
    repo.seed(SOURCE, "report_AT_Translated.docx", MIME_DOCX, "irrelevant");

    let stats = controller.run_cycles(3).await.unwrap();

    assert_eq!(stats.translated, 0);
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert!(repo.names_in(DESTINATION).is_empty());
}

#[tokio::test]
async fn test_cycle_with300LineFile_shouldMakeThreeProviderCallsAndKeepOrder() {
    let provider = MockProvider::working();
    let counter = provider.counter();
    let (controller, repo, _staging) = make_pipeline(provider);

    let text: String = (0..300).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
    repo.seed(SOURCE, "big.txt", "text/plain", text.into_bytes());

    let stats = controller.run_cycles(1).await.unwrap();

    assert_eq!(stats.translated, 1);
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 3);

    let published = repo.content_of(DESTINATION, "big_AT_Translated.txt").unwrap();
    let published = String::from_utf8(published.to_vec()).unwrap();
    let lines: Vec<&str> = published.split('\n').collect();
    assert_eq!(lines.len(), 300);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(*line, format!("[TRANSLATED] line {}", i));
    }
}

#[tokio::test]
async fn test_cycle_withWordDocument_shouldPreserveParagraphOrder() {
    let (controller, repo, _staging) = make_pipeline(MockProvider::working());
    let content = common::build_test_docx(&["First paragraph.", "Second one.", "Third."]);
    repo.seed(SOURCE, "report.docx", MIME_DOCX, content);

    let stats = controller.run_cycles(1).await.unwrap();

    assert_eq!(stats.translated, 1);
    let published = repo.content_of(DESTINATION, "report_AT_Translated.docx").unwrap();
    let paragraphs = extract_segments(ContentKind::WordDocument, &published).unwrap();
    assert_eq!(
        paragraphs,
        vec![
            "[TRANSLATED] First paragraph.".to_string(),
            "[TRANSLATED] Second one.".to_string(),
            "[TRANSLATED] Third.".to_string()
        ]
    );
}

#[tokio::test]
async fn test_cycle_withFailingProvider_shouldSkipItemAndContinue() {
    // A provider failure is transient: the cycle completes, nothing is
    // published, nothing is marked complete
    let (controller, repo, _staging) = make_pipeline(MockProvider::failing());
    repo.seed(SOURCE, "notes.txt", "text/plain", "line1");

    let stats = controller.run_cycles(1).await.unwrap();

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.translated, 0);
    assert!(repo.names_in(DESTINATION).is_empty());
}

#[tokio::test]
async fn test_cycle_withFailingItem_shouldStillProcessLaterItems() {
    // First item is a corrupt docx, second is a healthy text file; the
    // failure must not take the cycle down
    let (controller, repo, _staging) = make_pipeline(MockProvider::working());
    repo.seed(SOURCE, "broken.docx", MIME_DOCX, "not a zip archive");
    repo.seed(SOURCE, "notes.txt", "text/plain", "hello");

    let stats = controller.run_cycles(1).await.unwrap();

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.translated, 1);
    assert_eq!(repo.names_in(DESTINATION), vec!["notes_AT_Translated.txt".to_string()]);
}

#[tokio::test]
async fn test_cycle_failedItem_shouldBeRetriedOnNextCycle() {
    // The provider fails its first request and recovers: cycle 1 fails
    // the item without marking it complete, cycle 2 retries and publishes
    let (controller, repo, _staging) = make_pipeline(MockProvider::fail_first(1));
    repo.seed(SOURCE, "notes.txt", "text/plain", "hello");

    let stats = controller.run_cycles(2).await.unwrap();

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.translated, 1);
    assert_eq!(repo.names_in(DESTINATION), vec!["notes_AT_Translated.txt".to_string()]);
}

#[tokio::test]
async fn test_cycle_publishedArtifact_shouldNotBeReprocessedOnNextCycle() {
    let provider = MockProvider::working();
    let counter = provider.counter();
    let (controller, repo, _staging) = make_pipeline(provider);
    repo.seed(SOURCE, "notes.txt", "text/plain", "hello");

    // Cycle 1 publishes the artifact
    let first = controller.run_cycles(1).await.unwrap();
    assert_eq!(first.translated, 1);

    // A fresh run (empty in-memory guard) still skips: the destination
    // listing alone is enough
    let second = controller.run_cycles(1).await.unwrap();
    assert_eq!(second.skipped, 1);
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cycle_withTwoSameNameItems_shouldPublishOnlyOnce() {
    // Two pending source items sharing one name within a single cycle:
    // the in-cycle tracker update prevents the double publish
    let (controller, repo, _staging) = make_pipeline(MockProvider::working());
    repo.seed(SOURCE, "notes.txt", "text/plain", "first copy");
    repo.seed(SOURCE, "notes.txt", "text/plain", "second copy");

    let stats = controller.run_cycles(1).await.unwrap();

    assert_eq!(stats.translated, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(repo.names_in(DESTINATION).len(), 1);
    assert_eq!(
        &repo.content_of(DESTINATION, "notes_AT_Translated.txt").unwrap()[..],
        b"[TRANSLATED] first copy"
    );
}

#[tokio::test]
async fn test_cycle_itemsAreProcessedInListingOrder() {
    let (controller, repo, _staging) = make_pipeline(MockProvider::working());
    repo.seed(SOURCE, "zebra.txt", "text/plain", "z");
    repo.seed(SOURCE, "alpha.txt", "text/plain", "a");

    controller.run_cycles(1).await.unwrap();

    // The memory backend lists in insertion order; uploads follow it
    assert_eq!(
        repo.names_in(DESTINATION),
        vec![
            "zebra_AT_Translated.txt".to_string(),
            "alpha_AT_Translated.txt".to_string()
        ]
    );
}

#[tokio::test]
async fn test_cycle_repeatedCycles_shouldBeIdempotent() {
    let provider = MockProvider::working();
    let counter = provider.counter();
    let (controller, repo, _staging) = make_pipeline(provider);
    repo.seed(SOURCE, "notes.txt", "text/plain", "hello");

    let stats = controller.run_cycles(5).await.unwrap();

    assert_eq!(stats.translated, 1);
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(repo.names_in(DESTINATION).len(), 1);
}

#[tokio::test]
async fn test_cycle_unknownContentType_shouldFallBackToPlainText() {
    let (controller, repo, _staging) = make_pipeline(MockProvider::working());
    repo.seed(SOURCE, "blob.dat", "application/octet-stream", "payload text");

    let stats = controller.run_cycles(1).await.unwrap();

    assert_eq!(stats.translated, 1);
    assert_eq!(
        &repo.content_of(DESTINATION, "blob_AT_Translated.dat").unwrap()[..],
        b"[TRANSLATED] payload text"
    );
}
