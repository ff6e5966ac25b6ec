use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::clean::NoiseCleaner;
use super::sections::{RawSections, SectionKind, SectionSplitter};
use super::segment::LessonSpan;
use crate::model::{ExtractCounts, LessonRecord};
use crate::util::write_json_pretty;

/// Splits and cleans lesson bodies into records, compiling the patterns once.
#[derive(Debug)]
pub(super) struct RecordBuilder {
    splitter: SectionSplitter,
    cleaner: NoiseCleaner,
}

impl RecordBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            splitter: SectionSplitter::new()?,
            cleaner: NoiseCleaner::new()?,
        })
    }

    pub fn build_record(&self, span: &LessonSpan) -> LessonRecord {
        let sections = self.splitter.split(&span.body);
        self.record_from_sections(span, &sections)
    }

    fn record_from_sections(&self, span: &LessonSpan, sections: &RawSections) -> LessonRecord {
        LessonRecord {
            lesson: span.number,
            title: span.title.clone(),
            english: self.cleaner.clean_text(sections.get(SectionKind::English)),
            korean: self.cleaner.clean_text(sections.get(SectionKind::Korean)),
            grammar: self.cleaner.clean_lines(sections.get(SectionKind::Grammar)),
            practice: self.cleaner.clean_lines(sections.get(SectionKind::Practice)),
        }
    }

    pub fn build_collection(&self, spans: &[LessonSpan]) -> Vec<LessonRecord> {
        spans.iter().map(|span| self.build_record(span)).collect()
    }
}

/// Records the lesson total and how many lessons came out with each field empty.
pub(super) fn tally_missing_sections(records: &[LessonRecord], counts: &mut ExtractCounts) {
    counts.lesson_count = records.len();
    counts.missing_english_count = records.iter().filter(|r| r.english.is_empty()).count();
    counts.missing_korean_count = records.iter().filter(|r| r.korean.is_empty()).count();
    counts.missing_grammar_count = records.iter().filter(|r| r.grammar.is_empty()).count();
    counts.missing_practice_count = records.iter().filter(|r| r.practice.is_empty()).count();
}

/// Replaces the whole collection at `path`; a failed write leaves the
/// previous file in place.
pub fn write_lessons(path: &Path, records: &[LessonRecord]) -> Result<()> {
    write_json_pretty(path, &records)
}

pub fn read_lessons(path: &Path) -> Result<Vec<LessonRecord>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
