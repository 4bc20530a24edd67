use crate::clipboard::{default_pacer, detect_clipboard, ChunkPacer, ClipboardSink, ClipboardWriter};
use crate::collector::FileCollector;
use crate::config::CollyConfig;
use crate::document::{Document, DocumentBuilder};
use crate::errors::CollyError;
use crate::ignore::ExclusionSet;
use crate::loader::{ContentLoader, FileEntry, SkippedFile, Transformation};
use crate::minify::minify_for_path;
use crate::reporting::print_stats;
use crate::truncate::{truncate_content, TruncationPlan};
use async_trait::async_trait;
use std::borrow::Cow;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, trace};

/// Everything produced before delivery.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub document: Document,
    pub entries: Vec<FileEntry>,
    pub skipped: Vec<SkippedFile>,
    pub plan: Option<TruncationPlan>,
}

/// Outcome of a run, for the caller to report.
#[derive(Debug, Clone, Default)]
pub struct CopyReport {
    pub files_processed: usize,
    pub skipped: Vec<SkippedFile>,
    pub chunks: usize,
    pub characters: usize,
    pub bytes_read: usize,
    pub truncation_length: Option<usize>,
}

#[async_trait(?Send)]
pub trait ClipboardCopier {
    async fn copy_files_to_clipboard(&self) -> Result<CopyReport, CollyError>;
}

pub struct BasicClipboardCopier {
    config: CollyConfig,
}

impl BasicClipboardCopier {
    pub fn new(config: CollyConfig) -> Self {
        BasicClipboardCopier { config }
    }

    /// Delivers a prepared document through the given sink and pacer.
    pub async fn deliver(
        &self,
        prepared: &PreparedDocument,
        sink: &mut dyn ClipboardSink,
        pacer: &dyn ChunkPacer,
    ) -> Result<CopyReport, CollyError> {
        let mut report = report_for(prepared);
        if prepared.document.is_empty() {
            info!("No content generated after processing");
            return Ok(report);
        }

        let text = prepared.document.render();
        report.characters = text.chars().count();
        let mut writer = ClipboardWriter::new(sink, pacer, self.config.max_clip_length);
        report.chunks = writer.write(&text).await?;
        Ok(report)
    }
}

#[async_trait(?Send)]
impl ClipboardCopier for BasicClipboardCopier {
    async fn copy_files_to_clipboard(&self) -> Result<CopyReport, CollyError> {
        let config = &self.config;
        let prepared = prepare_document(config).await?;

        if config.stats {
            print_stats(&prepared.document.sections, &config.model)?;
        }

        if config.print {
            let mut report = report_for(&prepared);
            let text = prepared.document.render();
            report.characters = text.chars().count();
            let mut stdout = tokio::io::stdout();
            stdout.write_all(text.as_bytes()).await?;
            stdout.flush().await?;
            return Ok(report);
        }

        debug!("Initializing clipboard");
        let mut sink = detect_clipboard()?;
        let pacer = default_pacer();
        self.deliver(&prepared, sink.as_mut(), pacer.as_ref()).await
    }
}

/// Runs collection, loading, minification, truncation and rendering.
pub async fn prepare_document(config: &CollyConfig) -> Result<PreparedDocument, CollyError> {
    let exclusions = ExclusionSet::new(&config.exclusions);
    debug!("Expanding file patterns");
    let files = FileCollector::new(&exclusions, config.follow_symlinks, config.strict)
        .collect(&config.patterns)?;

    let loader = ContentLoader::new(config.encoding);
    let mut entries = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();
    for file in files {
        match loader.load(&file.path).await {
            Ok(entry) => entries.push(entry.with_relative_path(file.relative)),
            Err(skip) => {
                error!("{}", CollyError::from(skip.clone()));
                skipped.push(skip);
            }
        }
    }

    if config.minify {
        for entry in entries.iter_mut() {
            let minified = match minify_for_path(&entry.path, &entry.text) {
                Cow::Owned(text) => Some(text),
                Cow::Borrowed(_) => None,
            };
            if let Some(text) = minified {
                trace!("Minified {}", entry.display_path);
                entry.text = text;
                entry.transformations.push(Transformation::Minified);
            }
        }
    }

    let plan = config.truncate.then(|| {
        TruncationPlan::compute(
            entries.iter().map(|entry| entry.text.as_str()),
            config.max_word_length,
            config.overrides.clone(),
        )
    });

    if let Some(plan) = &plan {
        for entry in entries.iter_mut() {
            let effective = plan.effective_length(&entry.relative_path);
            if let Some((length, from_override)) = effective {
                trace!("Truncating {} to {}", entry.display_path, length);
                let truncated = truncate_content(&entry.text, length).into_owned();
                entry.text = truncated;
                entry.transformations.push(Transformation::Truncated {
                    length,
                    from_override,
                });
            }
        }
    }

    let document = DocumentBuilder::new(config, plan.as_ref()).build(&entries, &skipped);

    Ok(PreparedDocument {
        document,
        entries,
        skipped,
        plan,
    })
}

fn report_for(prepared: &PreparedDocument) -> CopyReport {
    CopyReport {
        files_processed: prepared.document.sections.len(),
        skipped: prepared.skipped.clone(),
        chunks: 0,
        characters: 0,
        bytes_read: prepared.entries.iter().map(|entry| entry.byte_len).sum(),
        truncation_length: prepared.plan.as_ref().and_then(|plan| plan.global_length),
    }
}

pub async fn copy_files_to_clipboard(config: CollyConfig) -> Result<CopyReport, CollyError> {
    let copier = BasicClipboardCopier::new(config);
    copier.copy_files_to_clipboard().await
}
