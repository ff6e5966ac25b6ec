use anyhow::{Context, Result};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SectionKind {
    English,
    Korean,
    Grammar,
    Practice,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::English,
        SectionKind::Korean,
        SectionKind::Grammar,
        SectionKind::Practice,
    ];

    fn group_name(self) -> &'static str {
        match self {
            SectionKind::English => "english",
            SectionKind::Korean => "korean",
            SectionKind::Grammar => "grammar",
            SectionKind::Practice => "practice",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct LabelHit {
    pub kind: SectionKind,
    pub start: usize,
    pub end: usize,
}

/// Raw section text of one lesson body, before cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct RawSections {
    pub english: String,
    pub korean: String,
    pub grammar: String,
    pub practice: String,
}

impl RawSections {
    pub fn get(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::English => &self.english,
            SectionKind::Korean => &self.korean,
            SectionKind::Grammar => &self.grammar,
            SectionKind::Practice => &self.practice,
        }
    }

    fn slot(&mut self, kind: SectionKind) -> &mut String {
        match kind {
            SectionKind::English => &mut self.english,
            SectionKind::Korean => &mut self.korean,
            SectionKind::Grammar => &mut self.grammar,
            SectionKind::Practice => &mut self.practice,
        }
    }
}

#[derive(Debug)]
pub(super) struct SectionSplitter {
    label: Regex,
}

impl SectionSplitter {
    pub fn new() -> Result<Self> {
        // Decorated form first so the emoji is consumed with the label.
        let label = Regex::new(concat!(
            r"(?i)",
            r"(?P<english>🗣\x{FE0F}?\s*영어 문장|영어 문장)",
            r"|(?P<korean>🇰🇷\s*한국어 번역|한국어 번역)",
            r"|(?P<grammar>💡\x{FE0F}?\s*문법|문법)",
            r"|(?P<practice>📝\x{FE0F}?\s*말하기|말하기)",
        ))
        .context("failed to compile section label regex")?;

        Ok(Self { label })
    }

    /// Every label occurrence in `body`, in text order.
    pub fn label_hits(&self, body: &str) -> Vec<LabelHit> {
        self.label
            .captures_iter(body)
            .filter_map(|captures| {
                SectionKind::ALL.into_iter().find_map(|kind| {
                    captures.name(kind.group_name()).map(|m| LabelHit {
                        kind,
                        start: m.start(),
                        end: m.end(),
                    })
                })
            })
            .collect()
    }

    /// Each section runs from the end of its label to the next label of any
    /// kind. Only the first label of a kind counts: a repeated label still
    /// ends the section before it, and the text after the repeat is dropped.
    pub fn split(&self, body: &str) -> RawSections {
        let hits = self.label_hits(body);
        let mut sections = RawSections::default();

        for kind in SectionKind::ALL {
            let Some(position) = hits.iter().position(|hit| hit.kind == kind) else {
                continue;
            };
            let start = hits[position].end;
            let end = hits
                .get(position + 1)
                .map(|next| next.start)
                .unwrap_or(body.len());
            *sections.slot(kind) = body[start..end].trim().to_string();
        }

        sections
    }
}
