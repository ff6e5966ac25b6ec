use serde::{Deserialize, Serialize};

/// One lesson of the booklet. Field order is the serialized order consumed
/// by the viewer and the per-lesson PDF renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    pub lesson: u32,
    pub title: String,
    pub english: String,
    pub korean: String,
    pub grammar: Vec<String>,
    pub practice: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolVersions {
    pub pdfinfo: Option<String>,
    pub pdftotext: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractPaths {
    pub source_pdf: String,
    pub output_path: String,
    pub manifest_dir: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractCounts {
    pub page_count: usize,
    pub empty_page_count: usize,
    pub failed_page_count: usize,
    pub text_char_count: usize,
    pub lesson_count: usize,
    pub missing_english_count: usize,
    pub missing_korean_count: usize,
    pub missing_grammar_count: usize,
    pub missing_practice_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub empty_page_report: String,
    pub tool_versions: ToolVersions,
    pub paths: ExtractPaths,
    pub source: SourceEntry,
    pub counts: ExtractCounts,
    pub warnings: Vec<String>,
    pub notes: Vec<String>,
}
