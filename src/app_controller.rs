use anyhow::{Context, Result};
use bytes::Bytes;
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::app_config::Config;
use crate::completion_tracker::CompletionTracker;
use crate::document_processor::{self, ContentKind};
use crate::errors::RepositoryError;
use crate::file_utils::{self, FileManager};
use crate::repository::{FsRepository, RemoteItem, Repository};
use crate::translation_service::{TokenUsageStats, TranslationService};

// @module: Pipeline controller for the poll/translate/publish loop

/// Counters for one poll cycle (or an accumulated run of cycles)
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CycleStats {
    /// Items translated and published this cycle
    pub translated: usize,
    /// Items skipped because they need no translation
    pub skipped: usize,
    /// Items that hit a transient error and will be retried next cycle
    pub failed: usize,
}

impl CycleStats {
    fn absorb(&mut self, other: CycleStats) {
        self.translated += other.translated;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Thin upload wrapper around the destination folder
pub struct Publisher {
    repository: Arc<dyn Repository>,
    folder: String,
}

impl Publisher {
    /// Create a publisher bound to a destination folder
    pub fn new(repository: Arc<dyn Repository>, folder: impl Into<String>) -> Self {
        Self {
            repository,
            folder: folder.into(),
        }
    }

    /// Upload a translated artifact, returning its new id
    pub async fn publish(&self, name: &str, content: Bytes) -> Result<String, RepositoryError> {
        self.repository.upload(name, &self.folder, content).await
    }
}

/// Main application controller driving the translation pipeline.
///
/// One poll cycle lists the source folder, decides which items still need
/// translation against a fresh destination listing, and runs each pending
/// item through download -> extract -> translate -> reassemble -> publish,
/// strictly one item at a time in listing order. A transient failure skips
/// only the failing item; the poll interval doubles as the retry delay.
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Repository backend for both folders
    repository: Arc<dyn Repository>,

    // @field: Chunked translation service
    translation: TranslationService,

    // @field: Destination upload wrapper
    publisher: Publisher,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let repository: Arc<dyn Repository> = Arc::new(FsRepository::new());
        let translation = TranslationService::new(config.translation.clone())?;
        Ok(Self::with_components(config, repository, translation))
    }

    /// Create a controller around explicit components.
    /// Used by tests to run cycles against in-memory backends.
    pub fn with_components(
        config: Config,
        repository: Arc<dyn Repository>,
        translation: TranslationService,
    ) -> Self {
        let publisher = Publisher::new(Arc::clone(&repository), config.destination_folder.clone());
        Self {
            config,
            repository,
            translation,
            publisher,
        }
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_folder.is_empty() && !self.config.destination_folder.is_empty()
    }

    /// Run the poll loop until the shutdown signal fires.
    ///
    /// The loop is a cancellable ticker: one cycle per tick, with the
    /// configured interval between ticks. No cycle error terminates the
    /// loop; a failed listing is logged and retried on the next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            "doctrans: {} - {}",
            self.translation.provider_name(),
            self.translation.model()
        );
        self.log_folder_contents("Source", &self.config.source_folder).await;
        self.log_folder_contents("Destination", &self.config.destination_folder).await;

        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.poll_interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Items published during this run, by id. The destination listing
        // stays the authority; this only saves re-checks while a backend's
        // listing lags behind a just-finished upload.
        let mut processed: HashSet<String> = HashSet::new();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.run_cycle(&mut processed).await {
                        Ok(stats) => {
                            if stats.translated > 0 || stats.failed > 0 {
                                info!(
                                    "Cycle complete: {} translated, {} skipped, {} failed",
                                    stats.translated, stats.skipped, stats.failed
                                );
                            }
                            debug!("Waiting {}s until next cycle", self.config.poll_interval_secs);
                        }
                        Err(e) => {
                            error!("Poll cycle failed: {:#}", e);
                        }
                    }
                }
                _ = shutdown.changed() => {
                    info!("Shutdown signal received, stopping poll loop");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Run a bounded number of poll cycles back to back and return the
    /// accumulated counters. This is the testable entry point: the same
    /// cycle logic as [`run`], without the ticker.
    pub async fn run_cycles(&self, cycles: usize) -> Result<CycleStats> {
        let mut processed: HashSet<String> = HashSet::new();
        let mut totals = CycleStats::default();

        for _ in 0..cycles {
            totals.absorb(self.run_cycle(&mut processed).await?);
        }

        Ok(totals)
    }

    /// One poll cycle: list, filter, process pending items in listing order
    async fn run_cycle(&self, processed: &mut HashSet<String>) -> Result<CycleStats> {
        let source_items = self
            .repository
            .list(&self.config.source_folder)
            .await
            .context("Failed to list source folder")?;

        // One destination listing per cycle; the tracker keeps it current
        // as items are published so two pending items sharing a base name
        // cannot be published twice within the cycle.
        let destination_items = self
            .repository
            .list(&self.config.destination_folder)
            .await
            .context("Failed to list destination folder")?;
        let mut tracker = CompletionTracker::from_listing(&destination_items);

        let total_files = source_items.len();
        let pending = source_items
            .iter()
            .filter(|item| tracker.is_pending(item) && !processed.contains(&item.id))
            .count();
        if pending > 0 {
            info!("{} file(s) need translating", pending);
        }

        let mut stats = CycleStats::default();

        for item in &source_items {
            if !tracker.is_pending(item) || processed.contains(&item.id) {
                stats.skipped += 1;
                continue;
            }

            match self.process_item(item).await {
                Ok(artifact_name) => {
                    tracker.mark_published(&artifact_name);
                    processed.insert(item.id.clone());
                    stats.translated += 1;
                }
                Err(e) => {
                    // Transient: skip this item, retry it next cycle
                    error!("Error processing {}: {:#}", item.name, e);
                    stats.failed += 1;
                }
            }
        }

        if stats.skipped > 0 {
            info!("Skipping {}/{} translated files", stats.skipped, total_files);
        }

        Ok(stats)
    }

    /// Process one pending item end to end, returning the published
    /// artifact name
    async fn process_item(&self, item: &RemoteItem) -> Result<String> {
        info!("Processing file {}...", item.name);

        let content = self
            .repository
            .download(&item.id)
            .await
            .context("Download failed")?;

        // Keep a local copy around; a failed translation leaves the
        // download inspectable under the staging directory
        match FileManager::stage_download(&self.config.staging_dir, &item.name, &content) {
            Ok(path) => debug!("Staged download at {:?}", path),
            Err(e) => warn!("Could not stage download for {}: {:#}", item.name, e),
        }

        let kind = ContentKind::from_tag(&item.content_type);
        let segments = document_processor::extract_segments(kind, &content)?;

        info!(
            "Translating {} ({}, {} segment(s))...",
            item.name,
            kind.display_name(),
            segments.len()
        );

        let mut item_usage = TokenUsageStats::with_provider_info(
            self.translation.provider_name().to_string(),
            self.translation.model(),
        );
        let mut translated_segments = Vec::with_capacity(segments.len());
        for segment in &segments {
            let (translated, usage) = self
                .translation
                .translate_text(segment, &self.config.target_language)
                .await?;
            item_usage.add_token_usage(Some(usage.prompt_tokens), Some(usage.completion_tokens));
            item_usage.add_request_duration(usage.api_duration);
            translated_segments.push(translated);
        }

        let output = document_processor::reassemble(kind, &translated_segments)?;
        let artifact_name = file_utils::translated_name(&item.name);

        info!("Uploading {}...", artifact_name);
        let artifact_id = self
            .publisher
            .publish(&artifact_name, Bytes::from(output))
            .await
            .context("Upload failed")?;

        if item_usage.total_tokens > 0 {
            info!("{}", item_usage.summary());
        }
        info!("File {} successfully processed (id {})", item.name, artifact_id);

        Ok(artifact_name)
    }

    /// Log the contents of a folder at startup, mirroring what the backend
    /// currently sees
    async fn log_folder_contents(&self, label: &str, folder: &str) {
        match self.repository.list(folder).await {
            Ok(items) => {
                info!("{} folder contents ({}):", label, folder);
                for item in &items {
                    info!("  {} ({})", item.name, item.content_type);
                }
            }
            Err(e) => warn!("Could not list {} folder {}: {}", label, folder, e),
        }
    }
}
