use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::extract::read_lessons;
use crate::model::ExtractRunManifest;

pub fn run(args: StatusArgs) -> Result<()> {
    info!(output = %args.output.display(), "status requested");

    match latest_run_manifest(&args.manifest_dir)? {
        Some(path) => {
            let raw =
                fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            let manifest: ExtractRunManifest = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;

            info!(
                run_id = %manifest.run_id,
                status = %manifest.status,
                updated_at = %manifest.updated_at,
                source_sha256 = %manifest.source.sha256,
                pages = manifest.counts.page_count,
                empty_pages = manifest.counts.empty_page_count,
                failed_pages = manifest.counts.failed_page_count,
                lessons = manifest.counts.lesson_count,
                warnings = manifest.warnings.len(),
                "loaded latest extract run manifest"
            );
        }
        None => warn!(path = %args.manifest_dir.display(), "no extract run manifest found"),
    }

    if args.output.exists() {
        let records = read_lessons(&args.output)?;
        let incomplete = records
            .iter()
            .filter(|record| {
                record.english.is_empty()
                    || record.korean.is_empty()
                    || record.grammar.is_empty()
                    || record.practice.is_empty()
            })
            .count();

        info!(
            path = %args.output.display(),
            lessons = records.len(),
            incomplete_lessons = incomplete,
            "lessons document status"
        );
    } else {
        warn!(path = %args.output.display(), "lessons document missing");
    }

    Ok(())
}

/// Run manifests carry a compact UTC stamp in their name, so the
/// lexicographically greatest name is the newest run.
fn latest_run_manifest(manifest_dir: &Path) -> Result<Option<PathBuf>> {
    if !manifest_dir.exists() {
        return Ok(None);
    }

    let entries = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?;

    let mut latest: Option<PathBuf> = None;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();
        let is_run_manifest = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with("extract_run_") && name.ends_with(".json"))
            .unwrap_or(false);

        if is_run_manifest && latest.as_ref().is_none_or(|current| path > *current) {
            latest = Some(path);
        }
    }

    Ok(latest)
}
