use anyhow::{Context, Result};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct LessonSpan {
    pub number: u32,
    pub title: String,
    pub body: String,
}

/// Finds "DAY NN - Title" headers and cuts the text between them.
#[derive(Debug)]
pub(super) struct LessonSegmenter {
    header: Regex,
}

impl LessonSegmenter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            header: Regex::new(r"DAY\s*([0-9]{1,2})\s*[-–—]\s*(.+)")
                .context("failed to compile lesson header regex")?,
        })
    }

    /// Spans come back in document order, not lesson-number order. Header
    /// numbers are kept as written, gaps and repeats included.
    pub fn split(&self, text: &str) -> Result<Vec<LessonSpan>> {
        let headers = self.header.captures_iter(text).collect::<Vec<_>>();
        let mut spans = Vec::with_capacity(headers.len());

        for (index, captures) in headers.iter().enumerate() {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let number_raw = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            let number = number_raw
                .parse::<u32>()
                .with_context(|| format!("invalid lesson number in header: {}", whole.as_str()))?;
            let title = captures
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();

            let body_end = headers
                .get(index + 1)
                .and_then(|next| next.get(0))
                .map(|next| next.start())
                .unwrap_or(text.len());

            spans.push(LessonSpan {
                number,
                title,
                body: text[whole.end()..body_end].trim().to_string(),
            });
        }

        Ok(spans)
    }
}
