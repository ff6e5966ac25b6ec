use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use super::pages::{ExtractedText, extract_document_text, tool_version};
use super::records::{RecordBuilder, tally_missing_sections, write_lessons};
use super::segment::LessonSegmenter;
use crate::cli::{EmptyPageReport, ExtractArgs};
use crate::model::{
    ExtractCounts, ExtractPaths, ExtractRunManifest, LessonRecord, SourceEntry, ToolVersions,
};
use crate::util::{
    ensure_directory, ensure_parent_directory, now_utc_string, sha256_file, utc_compact_string,
    write_json_pretty,
};

#[derive(Debug, Clone)]
pub(super) struct PipelineConfig {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub empty_page_report: EmptyPageReport,
}

impl From<&ExtractArgs> for PipelineConfig {
    fn from(args: &ExtractArgs) -> Self {
        Self {
            source_path: args.source_pdf.clone(),
            output_path: args.output.clone(),
            empty_page_report: args.empty_page_report,
        }
    }
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));
    let config = PipelineConfig::from(&args);

    ensure_parent_directory(&config.output_path)?;
    ensure_directory(&args.manifest_dir)?;
    let manifest_path = args
        .manifest_dir
        .join(format!("extract_run_{}.json", utc_compact_string(started_ts)));

    info!(
        source = %config.source_path.display(),
        output = %config.output_path.display(),
        run_id = %run_id,
        "starting extract"
    );

    let source_sha256 = sha256_file(&config.source_path)?;
    let (extraction, records) = run_pipeline(&config)?;

    if records.is_empty() {
        warn!(source = %config.source_path.display(), "no lesson headers found");
    }

    let counts = collect_counts(&extraction, &records);
    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_extract_command(&args),
        empty_page_report: config.empty_page_report.as_str().to_string(),
        tool_versions: ToolVersions {
            pdfinfo: tool_version("pdfinfo", &["-v"]),
            pdftotext: tool_version("pdftotext", &["-v"]),
        },
        paths: ExtractPaths {
            source_pdf: config.source_path.display().to_string(),
            output_path: config.output_path.display().to_string(),
            manifest_dir: args.manifest_dir.display().to_string(),
        },
        source: SourceEntry {
            path: config.source_path.display().to_string(),
            sha256: source_sha256,
        },
        counts,
        warnings: extraction.warnings,
        notes: vec![
            "Lesson text comes from the pdftotext text layer, one page at a time.".to_string(),
            "Only the first label of each section kind starts a section.".to_string(),
        ],
    };
    write_json_pretty(&manifest_path, &manifest)?;

    info!(path = %manifest_path.display(), "wrote extract run manifest");
    info!(
        lessons = records.len(),
        pages = manifest.counts.page_count,
        empty_pages = manifest.counts.empty_page_count,
        path = %config.output_path.display(),
        "extract completed"
    );

    Ok(())
}

/// Segment, split, and clean a whole document text into lesson records.
pub(super) fn build_lessons(text: &str) -> Result<Vec<LessonRecord>> {
    let segmenter = LessonSegmenter::new()?;
    let builder = RecordBuilder::new()?;

    let spans = segmenter.split(text)?;
    Ok(builder.build_collection(&spans))
}

/// Extract, segment, split, clean, then replace the output document.
pub(super) fn run_pipeline(config: &PipelineConfig) -> Result<(ExtractedText, Vec<LessonRecord>)> {
    let extraction = extract_document_text(&config.source_path, config.empty_page_report)?;
    let records = build_lessons(&extraction.text)?;
    write_lessons(&config.output_path, &records)?;
    Ok((extraction, records))
}

fn collect_counts(extraction: &ExtractedText, records: &[LessonRecord]) -> ExtractCounts {
    let mut counts = ExtractCounts {
        page_count: extraction.page_count,
        empty_page_count: extraction.empty_page_count,
        failed_page_count: extraction.failed_pages.len(),
        text_char_count: extraction.text_char_count(),
        ..ExtractCounts::default()
    };
    tally_missing_sections(records, &mut counts);
    counts
}

fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = vec![
        "lessonbook".to_string(),
        "extract".to_string(),
        "--source-pdf".to_string(),
        display(&args.source_pdf),
        "--output".to_string(),
        display(&args.output),
        "--manifest-dir".to_string(),
        display(&args.manifest_dir),
    ];

    if args.empty_page_report != EmptyPageReport::Warn {
        command.push("--empty-page-report".to_string());
        command.push(args.empty_page_report.as_str().to_string());
    }

    command.join(" ")
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
