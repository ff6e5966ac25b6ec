use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use crate::cli::EmptyPageReport;

#[derive(Debug, Default)]
pub(super) struct ExtractedText {
    pub text: String,
    pub page_count: usize,
    pub empty_page_count: usize,
    pub failed_pages: Vec<usize>,
    pub warnings: Vec<String>,
}

impl ExtractedText {
    pub fn text_char_count(&self) -> usize {
        non_whitespace_char_count(&self.text)
    }
}

/// Reads every page of `pdf_path` and joins the page texts with newlines.
///
/// Only an unreadable document is an error. A page that cannot be read is
/// replaced by empty text so the page order of the blob stays intact.
pub(super) fn extract_document_text(
    pdf_path: &Path,
    report: EmptyPageReport,
) -> Result<ExtractedText> {
    let page_count = page_count(pdf_path)?;
    debug!(path = %pdf_path.display(), page_count, "reading pages");

    Ok(collect_pages(
        page_count,
        |page_number| extract_page_with_pdftotext(pdf_path, page_number),
        report,
    ))
}

pub(super) fn collect_pages<F>(
    page_count: usize,
    mut read_page: F,
    report: EmptyPageReport,
) -> ExtractedText
where
    F: FnMut(usize) -> Result<String>,
{
    let mut extraction = ExtractedText {
        page_count,
        ..ExtractedText::default()
    };
    let mut pages = Vec::with_capacity(page_count);

    for page_number in 1..=page_count {
        let mut failed = false;
        let page = match read_page(page_number) {
            Ok(text) => text,
            Err(error) => {
                failed = true;
                extraction.failed_pages.push(page_number);
                if report == EmptyPageReport::Warn {
                    warn!(page = page_number, error = %error, "page extraction failed, using empty text");
                    extraction
                        .warnings
                        .push(format!("page {page_number} extraction failed: {error:#}"));
                }
                String::new()
            }
        };

        if non_whitespace_char_count(&page) == 0 {
            extraction.empty_page_count += 1;
            if report == EmptyPageReport::Warn && !failed {
                warn!(page = page_number, "page yielded no text");
                extraction
                    .warnings
                    .push(format!("page {page_number} yielded no text"));
            }
            pages.push(String::new());
        } else {
            pages.push(page);
        }
    }

    extraction.text = pages.join("\n");
    extraction
}

pub(super) fn page_count(pdf_path: &Path) -> Result<usize> {
    let output = Command::new("pdfinfo")
        .arg(pdf_path)
        .output()
        .with_context(|| format!("failed to execute pdfinfo for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "cannot open source document {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    parse_pdfinfo_page_count(&String::from_utf8_lossy(&output.stdout))
        .with_context(|| format!("pdfinfo reported no page count for {}", pdf_path.display()))
}

pub(super) fn parse_pdfinfo_page_count(stdout: &str) -> Result<usize> {
    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix("Pages:") {
            let value = rest.trim();
            return value
                .parse::<usize>()
                .with_context(|| format!("invalid page count: {value}"));
        }
    }

    bail!("missing 'Pages:' line")
}

fn extract_page_with_pdftotext(pdf_path: &Path, page_number: usize) -> Result<String> {
    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg("-f")
        .arg(page_number.to_string())
        .arg("-l")
        .arg(page_number.to_string())
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {} page {}: {}",
            pdf_path.display(),
            page_number,
            stderr.trim()
        );
    }

    Ok(normalize_page_text(&String::from_utf8_lossy(&output.stdout)))
}

pub(super) fn normalize_page_text(raw: &str) -> String {
    raw.replace('\u{0000}', "")
        .trim_end_matches(['\u{000C}', '\n', '\r'])
        .to_string()
}

pub(super) fn non_whitespace_char_count(text: &str) -> usize {
    text.chars()
        .filter(|character| !character.is_whitespace())
        .count()
}

pub(super) fn tool_version(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
}
