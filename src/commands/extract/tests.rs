use std::fs;
use std::path::PathBuf;

use anyhow::anyhow;

use super::clean::NoiseCleaner;
use super::pages::{collect_pages, normalize_page_text, parse_pdfinfo_page_count};
use super::records::{read_lessons, write_lessons};
use super::run::{PipelineConfig, build_lessons, run_pipeline};
use super::sections::{SectionKind, SectionSplitter};
use super::segment::LessonSegmenter;
use crate::cli::EmptyPageReport;
use crate::model::LessonRecord;

const GREETINGS_BODY: &str = "🗣 영어 문장\nHello.\n🇰🇷 한국어 번역\n안녕.\n💡 문법\n- greet\n📝 말하기\n- say hi";

const DAY_28_TEXT: &str = "DAY 28 - Spending Time with Friends | 친구들과의 시간
영어 문장 | English Sentences
These days, there isn't enough time to hang out with my friends.
We normally go to a coffee shop or have a drink.
한국어 번역 | Korean Translation
요즘에는 친구들과 어울려 다닐 시간이 별로 없습니다.
우리는 보통 커피숍에 가거나 술을 마십니다.
문법·표현 포인트 | Grammar & Expressions
• hang out with friends → 친구들과 어울리다
• it depends on → ~에 따라 다르다
말하기 연습 | Speaking Practice
• 주중이나 주말에 한 번 만나요. → We meet once during the week or on weekends.
• 자기 이야기만 하는 사람은 싫어요. → I don't like people who only talk about themselves.
";

fn scratch_dir(name: &str) -> PathBuf {
    let stamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let dir = std::env::temp_dir().join(format!(
        "lessonbook_{}_{}_{}",
        name,
        std::process::id(),
        stamp
    ));
    fs::create_dir_all(&dir).expect("scratch dir is created");
    dir
}

fn lessons(text: &str) -> Vec<LessonRecord> {
    build_lessons(text).expect("pipeline patterns compile")
}

#[test]
fn full_lesson_yields_all_four_sections() {
    let text = format!("DAY 01 - Greetings\n{GREETINGS_BODY}");
    let records = lessons(&text);

    assert_eq!(
        records,
        vec![LessonRecord {
            lesson: 1,
            title: "Greetings".to_string(),
            english: "Hello.".to_string(),
            korean: "안녕.".to_string(),
            grammar: vec!["greet".to_string()],
            practice: vec!["say hi".to_string()],
        }]
    );
}

#[test]
fn body_with_only_english_label_leaves_other_fields_empty() {
    let records = lessons("DAY 04 - Solo\n🗣 영어 문장\nText here.");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].english, "Text here.");
    assert_eq!(records[0].korean, "");
    assert!(records[0].grammar.is_empty());
    assert!(records[0].practice.is_empty());
}

#[test]
fn adjacent_headers_produce_empty_first_lesson() {
    let records = lessons("DAY 01 - A\nDAY 02 - B\n🗣 영어 문장\nRemaining text.");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].lesson, 1);
    assert_eq!(records[0].title, "A");
    assert_eq!(records[0].english, "");
    assert_eq!(records[0].korean, "");
    assert!(records[0].grammar.is_empty());
    assert!(records[0].practice.is_empty());

    assert_eq!(records[1].lesson, 2);
    assert_eq!(records[1].title, "B");
    assert_eq!(records[1].english, "Remaining text.");
}

#[test]
fn text_without_headers_yields_no_lessons() {
    assert!(lessons("").is_empty());
    assert!(lessons("Cover page\n영어 문장\nno header anywhere").is_empty());
}

#[test]
fn segmenter_keeps_document_order_and_verbatim_numbers() {
    let segmenter = LessonSegmenter::new().expect("header regex compiles");
    let text = "intro\nDAY 03 - Third\nthree\nDAY 01 – First\none\nDAY 03 — Again\nagain\n";

    let spans = segmenter.split(text).expect("headers parse");

    let numbers = spans.iter().map(|span| span.number).collect::<Vec<_>>();
    assert_eq!(numbers, vec![3, 1, 3]);
    assert_eq!(spans[0].title, "Third");
    assert_eq!(spans[0].body, "three");
    assert_eq!(spans[1].title, "First");
    assert_eq!(spans[1].body, "one");
    assert_eq!(spans[2].title, "Again");
    assert_eq!(spans[2].body, "again");
}

#[test]
fn segmenter_marker_is_case_sensitive() {
    let segmenter = LessonSegmenter::new().expect("header regex compiles");
    let spans = segmenter
        .split("Day 01 - lower\nday 02 - lower\nDAY 03 - Upper\nbody")
        .expect("headers parse");

    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].number, 3);
}

#[test]
fn splitter_excludes_neighbouring_labels_from_content() {
    let splitter = SectionSplitter::new().expect("label regex compiles");
    let sections = splitter.split(GREETINGS_BODY);

    assert_eq!(sections.english, "Hello.");
    assert_eq!(sections.korean, "안녕.");
    assert_eq!(sections.grammar, "- greet");
    assert_eq!(sections.practice, "- say hi");
}

#[test]
fn splitter_accepts_reordered_and_missing_sections() {
    let splitter = SectionSplitter::new().expect("label regex compiles");
    let sections = splitter.split("📝 말하기\n- drill\n🗣 영어 문장\nHello.");

    assert_eq!(sections.practice, "- drill");
    assert_eq!(sections.english, "Hello.");
    assert_eq!(sections.korean, "");
    assert_eq!(sections.grammar, "");
}

#[test]
fn splitter_uses_first_occurrence_of_duplicated_label() {
    let splitter = SectionSplitter::new().expect("label regex compiles");
    let body = "🗣 영어 문장\nFirst.\n🇰🇷 한국어 번역\n첫째.\n🗣 영어 문장\nSecond.\n💡 문법\n- g";

    let hits = splitter.label_hits(body);
    let kinds = hits.iter().map(|hit| hit.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            SectionKind::English,
            SectionKind::Korean,
            SectionKind::English,
            SectionKind::Grammar,
        ]
    );

    let sections = splitter.split(body);
    assert_eq!(sections.english, "First.");
    assert_eq!(sections.korean, "첫째.");
    assert_eq!(sections.grammar, "- g");
    assert!(!sections.english.contains("Second."));
}

#[test]
fn splitter_consumes_emoji_with_variation_selector() {
    let splitter = SectionSplitter::new().expect("label regex compiles");
    let sections = splitter.split("🗣\u{FE0F} 영어 문장\nHi.\n💡\u{FE0F} 문법\n- note");

    assert_eq!(sections.english, "Hi.");
    assert_eq!(sections.grammar, "- note");
}

#[test]
fn cleaner_removes_restated_banners_in_both_languages() {
    let cleaner = NoiseCleaner::new().expect("banner regexes compile");

    assert_eq!(
        cleaner.clean_text("| English Sentences\nHello.\n· Korean Translation\nWorld."),
        "Hello.\n\nWorld."
    );
    assert_eq!(cleaner.clean_text("·표현 포인트 | Grammar & Expressions"), "");
    assert_eq!(cleaner.clean_text(" - speaking practice"), "");
    assert_eq!(cleaner.clean_text("   "), "");
}

#[test]
fn cleaner_trims_decoration_but_keeps_sentence_stops() {
    let cleaner = NoiseCleaner::new().expect("banner regexes compile");

    assert_eq!(cleaner.clean_text("| Hello. |"), "Hello.");
    assert_eq!(cleaner.clean_text("• be tight → 빡빡하다 ·"), "be tight → 빡빡하다");
    assert_eq!(cleaner.clean_text("- - range 3-"), "range 3-");
}

#[test]
fn cleaner_is_idempotent() {
    let cleaner = NoiseCleaner::new().expect("banner regexes compile");
    let inputs = [
        GREETINGS_BODY,
        "- - 연습 stuff\nkeep me",
        "•영어 문장\n| Hello.",
        "· · · \n\n text ·|",
        "Grammar points\n- one\n\n- two.",
    ];

    for input in inputs {
        let once = cleaner.clean_text(input);
        assert_eq!(cleaner.clean_text(&once), once, "input: {input:?}");
    }
}

#[test]
fn clean_lines_drops_empty_lines_in_order() {
    let cleaner = NoiseCleaner::new().expect("banner regexes compile");
    let lines = cleaner.clean_lines("· Grammar & Expressions\n• first\n\n|  \n- second\n• third");

    assert_eq!(lines, vec!["first", "second", "third"]);
}

#[test]
fn booklet_lesson_with_bilingual_banners_is_cleaned() {
    let records = lessons(DAY_28_TEXT);

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.lesson, 28);
    assert_eq!(record.title, "Spending Time with Friends | 친구들과의 시간");
    assert_eq!(
        record.english,
        "These days, there isn't enough time to hang out with my friends.\nWe normally go to a coffee shop or have a drink."
    );
    assert_eq!(
        record.korean,
        "요즘에는 친구들과 어울려 다닐 시간이 별로 없습니다.\n우리는 보통 커피숍에 가거나 술을 마십니다."
    );
    assert_eq!(
        record.grammar,
        vec![
            "hang out with friends → 친구들과 어울리다",
            "it depends on → ~에 따라 다르다",
        ]
    );
    assert_eq!(
        record.practice,
        vec![
            "주중이나 주말에 한 번 만나요. → We meet once during the week or on weekends.",
            "자기 이야기만 하는 사람은 싫어요. → I don't like people who only talk about themselves.",
        ]
    );
}

#[test]
fn k_headers_give_k_records_in_header_order() {
    let text = (1..=12)
        .rev()
        .map(|day| format!("DAY {day:02} - Lesson {day}\n{GREETINGS_BODY}\n"))
        .collect::<String>();

    let records = lessons(&text);
    assert_eq!(records.len(), 12);
    let numbers = records.iter().map(|record| record.lesson).collect::<Vec<_>>();
    assert_eq!(numbers, (1..=12).rev().collect::<Vec<u32>>());
    assert!(records.iter().all(|record| record.grammar == vec!["greet"]));
}

#[test]
fn collect_pages_substitutes_empty_text_and_keeps_order() {
    let extraction = collect_pages(
        4,
        |page| match page {
            1 => Ok("DAY 01 - A".to_string()),
            2 => Err(anyhow!("broken content stream")),
            3 => Ok("  \n ".to_string()),
            _ => Ok("DAY 02 - B".to_string()),
        },
        EmptyPageReport::Warn,
    );

    assert_eq!(extraction.text, "DAY 01 - A\n\n\nDAY 02 - B");
    assert_eq!(extraction.page_count, 4);
    assert_eq!(extraction.failed_pages, vec![2]);
    assert_eq!(extraction.empty_page_count, 2);
    assert_eq!(extraction.warnings.len(), 2);
}

#[test]
fn collect_pages_silent_policy_only_counts() {
    let extraction = collect_pages(
        2,
        |page| {
            if page == 1 {
                Err(anyhow!("unreadable"))
            } else {
                Ok("text".to_string())
            }
        },
        EmptyPageReport::Silent,
    );

    assert_eq!(extraction.text, "\ntext");
    assert_eq!(extraction.failed_pages, vec![1]);
    assert_eq!(extraction.empty_page_count, 1);
    assert!(extraction.warnings.is_empty());
}

#[test]
fn pdfinfo_page_count_is_parsed() {
    let stdout = "Title:          Booklet\nPages:          30\nEncrypted:      no\n";
    assert_eq!(parse_pdfinfo_page_count(stdout).ok(), Some(30));
    assert!(parse_pdfinfo_page_count("Title: x\n").is_err());
}

#[test]
fn page_text_normalization_drops_nul_and_form_feed() {
    assert_eq!(normalize_page_text("DAY\u{0000} 01\n\u{000C}"), "DAY 01");
    assert_eq!(normalize_page_text("\u{000C}"), "");
}

#[test]
fn lessons_round_trip_through_json_without_ascii_escaping() {
    let dir = scratch_dir("round_trip");
    let path = dir.join("nested").join("lessons.json");
    let records = lessons(&format!("DAY 01 - Greetings\n{GREETINGS_BODY}\n{DAY_28_TEXT}"));

    write_lessons(&path, &records).expect("lessons are written");
    let raw = fs::read_to_string(&path).expect("lessons file is readable");
    assert!(raw.starts_with("[\n  {\n    \"lesson\": 1,\n    \"title\": \"Greetings\","));
    assert!(raw.contains("안녕."));
    assert!(!raw.contains("\\u"));
    assert!(raw.ends_with("]\n"));

    let restored = read_lessons(&path).expect("lessons are parsed");
    assert_eq!(restored, records);

    let leftovers = fs::read_dir(path.parent().expect("parent exists"))
        .expect("dir is readable")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn rerun_replaces_output_with_identical_bytes() {
    let dir = scratch_dir("idempotent");
    let path = dir.join("lessons.json");

    write_lessons(&path, &[]).expect("stale output is written");
    assert_eq!(fs::read_to_string(&path).expect("readable"), "[]\n");

    write_lessons(&path, &lessons(DAY_28_TEXT)).expect("first run writes");
    let first = fs::read(&path).expect("first output readable");
    write_lessons(&path, &lessons(DAY_28_TEXT)).expect("second run writes");
    let second = fs::read(&path).expect("second output readable");

    assert_eq!(first, second);
    assert_eq!(read_lessons(&path).expect("parsed").len(), 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn failed_write_keeps_existing_target_and_leaves_no_staging_file() {
    let dir = scratch_dir("unwritable");
    let path = dir.join("lessons.json");
    fs::create_dir_all(&path).expect("blocking directory is created");
    fs::write(path.join("inner"), "keep").expect("blocking file is written");

    let result = write_lessons(&path, &lessons(DAY_28_TEXT));
    assert!(result.is_err());

    assert!(path.is_dir());
    assert_eq!(
        fs::read_to_string(path.join("inner")).expect("inner file still readable"),
        "keep"
    );
    let staging = fs::read_dir(&dir)
        .expect("dir is readable")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(staging, 0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_source_fails_before_writing_output() {
    let dir = scratch_dir("missing_source");
    let config = PipelineConfig {
        source_path: dir.join("absent.pdf"),
        output_path: dir.join("lessons.json"),
        empty_page_report: EmptyPageReport::Warn,
    };

    assert!(run_pipeline(&config).is_err());
    assert!(!config.output_path.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn practice_phrase_blanks_korean_prose_starting_with_it() {
    let cleaner = NoiseCleaner::new().expect("banner regexes compile");

    assert_eq!(cleaner.clean_text("연습을 많이 했어요."), "");
    assert_eq!(
        cleaner.clean_text("오늘도 연습을 많이 했어요.\n연습을 많이 했어요."),
        "오늘도 연습을 많이 했어요."
    );
}
