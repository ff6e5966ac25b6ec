use anyhow::{Context, Result};
use regex::Regex;

const DECORATION: [char; 5] = ['|', '.', '-', '·', '•'];
const TRAILING_DECORATION: [char; 3] = ['|', '·', '•'];

/// Removes restated section banners and bullet decoration from extracted
/// text.
#[derive(Debug)]
pub(super) struct NoiseCleaner {
    banners: Vec<Regex>,
}

impl NoiseCleaner {
    pub fn new() -> Result<Self> {
        let families = [
            r"English Sentences?|영어 문장",
            r"Korean Translation|한국어 번역",
            r"Grammar|문법|표현 포인트",
            r"Speaking Practice|말하기 연습|연습",
        ];

        let banners = families
            .iter()
            .map(|phrases| {
                Regex::new(&format!(r"(?im)^[\s|.\-·•]*(?:{phrases}).*"))
                    .with_context(|| format!("failed to compile banner regex for {phrases}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { banners })
    }

    /// Blanks every banner line, then trims decoration from both ends. A
    /// trailing `.` or `-` is kept since it usually ends a sentence.
    pub fn clean_text(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut cleaned = text.to_string();
        for banner in &self.banners {
            cleaned = banner.replace_all(&cleaned, "").into_owned();
        }

        cleaned
            .trim_start_matches(|character: char| {
                character.is_whitespace() || DECORATION.contains(&character)
            })
            .trim_end_matches(|character: char| {
                character.is_whitespace() || TRAILING_DECORATION.contains(&character)
            })
            .to_string()
    }

    pub fn clean_lines(&self, text: &str) -> Vec<String> {
        text.lines()
            .map(|line| self.clean_text(line))
            .filter(|line| !line.is_empty())
            .collect()
    }
}
