use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::chapter_processor::{ChapterOutput, ChapterProcessor};
use crate::errors::AppError;
use crate::file_utils::{FileManager, OutputLayout};
use crate::language_utils;
use crate::localization::CatalogStore;
use crate::packaging::ResourcePack;
use crate::quest_processor::Chapter;
use crate::translation::TranslationService;

// @module: Application controller for quest localization

/// Result of processing one chapter file
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChapterStatus {
    Written { literals: usize, fallbacks: usize },
    Skipped,
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub chapters_found: usize,
    pub chapters_written: usize,
    pub chapters_skipped: usize,
    pub chapters_failed: usize,
    pub literals: usize,
    pub fallbacks: usize,
    pub archive: Option<PathBuf>,
    pub elapsed: Duration,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Present when translation is enabled
    translation: Option<TranslationService>,

    // @field: Serializes catalog file updates
    store: CatalogStore,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let translation = if config.translation.enabled {
            Some(TranslationService::new(&config.translation)?)
        } else {
            None
        };

        Ok(Self {
            config,
            translation,
            store: CatalogStore::new(),
        })
    }

    /// Create a controller around an existing translation service
    ///
    /// Translation is enabled regardless of `config.translation.enabled`.
    pub fn with_translation_service(config: Config, service: TranslationService) -> Self {
        Self {
            config,
            translation: Some(service),
            store: CatalogStore::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output locations for the configured modpack
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.config.output_dir, &self.config.modpack_name)
    }

    /// Run the whole workflow over the configured input directory
    pub async fn run(&self) -> Result<RunSummary, AppError> {
        let start_time = Instant::now();
        self.config
            .validate()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;

        let input_dir = &self.config.input_dir;

        if !FileManager::dir_exists(input_dir) {
            return Err(AppError::InputDirectoryMissing(input_dir.clone()));
        }

        let files = FileManager::find_chapter_files(input_dir)?;
        let layout = self.layout();
        FileManager::ensure_dir(layout.chapters_dir())?;

        self.log_start(files.len());

        let mut summary = RunSummary {
            chapters_found: files.len(),
            ..RunSummary::default()
        };

        let progress_bar = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chapters ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let processor = ChapterProcessor::new(self.config.modpack_name.as_str(), self.translation.clone());

        let mut results = stream::iter(files)
            .map(|path| {
                let processor = &processor;
                async move {
                    let prepared = Self::prepare_chapter(processor, &path).await;
                    (path, prepared)
                }
            })
            .buffered(self.config.concurrent_chapters.max(1));

        // Results arrive in file-name order, so catalogs are merged deterministically
        while let Some((path, prepared)) = results.next().await {
            let outcome = match prepared {
                Ok(Some((chapter, output))) => self.persist_chapter(&layout, &chapter, &output).await,
                Ok(None) => Ok(ChapterStatus::Skipped),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(ChapterStatus::Written { literals, fallbacks }) => {
                    summary.chapters_written += 1;
                    summary.literals += literals;
                    summary.fallbacks += fallbacks;
                }
                Ok(ChapterStatus::Skipped) => summary.chapters_skipped += 1,
                Err(e) => {
                    summary.chapters_failed += 1;
                    error!("Failed to process {:?}: {:#}", path, e);
                }
            }
            progress_bar.inc(1);
        }
        drop(results);

        progress_bar.finish_and_clear();

        if self.translation.is_some() {
            summary.archive = self.package(&layout).await?;
        }

        summary.elapsed = start_time.elapsed();
        self.log_summary(&summary);

        Ok(summary)
    }

    /// Load and localize one chapter; `None` when it has no localizable blocks
    async fn prepare_chapter(processor: &ChapterProcessor, path: &Path) -> Result<Option<(Chapter, ChapterOutput)>> {
        if !FileManager::has_chapter_extension(path) {
            debug!("{:?} does not have a chapter extension, processing anyway", path);
        }

        let chapter = Chapter::load(path).await?;
        let output = processor.process(&chapter).await;

        Ok(output.map(|output| (chapter, output)))
    }

    /// Merge both catalogs, then write the rewritten chapter
    ///
    /// The chapter file is only written once every key it references is in
    /// the catalogs on disk.
    async fn persist_chapter(
        &self,
        layout: &OutputLayout,
        chapter: &Chapter,
        output: &ChapterOutput,
    ) -> Result<ChapterStatus> {
        self.store
            .merge_into(&layout.source_catalog_path(), &output.source)
            .await
            .context("Failed to update source catalog")?;

        if let Some(translated) = &output.translated {
            let translation = &self.config.translation;
            let path = layout.translated_catalog_path(&translation.target_language, &translation.target_locale);
            self.store
                .merge_into(&path, translated)
                .await
                .context("Failed to update translated catalog")?;
        }

        let chapter_path = chapter.output_path(&layout.chapters_dir());
        tokio::fs::write(&chapter_path, &output.rewritten)
            .await
            .with_context(|| format!("Failed to write chapter file: {:?}", chapter_path))?;

        info!("{} done", chapter.file_name);

        Ok(ChapterStatus::Written {
            literals: output.literal_count,
            fallbacks: output.fallback_count,
        })
    }

    /// Bundle the catalogs into a resource pack once every chapter is persisted
    async fn package(&self, layout: &OutputLayout) -> Result<Option<PathBuf>, AppError> {
        let translation = &self.config.translation;
        let translated_path = layout.translated_catalog_path(&translation.target_language, &translation.target_locale);

        if !FileManager::file_exists(&translated_path) || !FileManager::file_exists(layout.source_catalog_path()) {
            warn!("No catalogs were written, skipping resource pack");
            return Ok(None);
        }

        let pack = ResourcePack::new(
            self.config.modpack_name.as_str(),
            translation.target_language.as_str(),
            translation.target_locale.as_str(),
        );
        let layout = layout.clone();

        let archive = tokio::task::spawn_blocking(move || pack.write(&layout))
            .await
            .map_err(|e| AppError::Unknown(format!("Packaging task failed: {}", e)))??;

        Ok(Some(archive))
    }

    fn log_start(&self, chapter_count: usize) {
        match &self.translation {
            Some(service) => {
                let language = language_utils::get_language_name(service.target_language())
                    .unwrap_or_else(|_| service.target_language().to_string());
                info!(
                    "🚀 {}: {} chapters, translating to {} via {}",
                    self.config.modpack_name,
                    chapter_count,
                    language,
                    service.provider_name()
                );
            }
            None => info!("🚀 {}: {} chapters", self.config.modpack_name, chapter_count),
        }
    }

    fn log_summary(&self, summary: &RunSummary) {
        info!(
            "Finished in {}: {} written, {} skipped, {} failed, {} strings",
            Self::format_duration(summary.elapsed),
            summary.chapters_written,
            summary.chapters_skipped,
            summary.chapters_failed,
            summary.literals
        );

        if summary.fallbacks > 0 {
            warn!("{} strings kept their source text after translation failed", summary.fallbacks);
        }

        if let Some(service) = &self.translation {
            let (hits, misses, hit_rate) = service.cache.stats();
            debug!("Translation cache: {} hits, {} misses ({:.0}%)", hits, misses, hit_rate * 100.0);
        }
    }

    /// Format a duration as "Xh Ym Zs"
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:01}s", seconds, duration.subsec_millis() / 100)
        }
    }
}
