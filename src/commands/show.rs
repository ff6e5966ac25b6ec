use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::ShowArgs;
use crate::commands::extract::read_lessons;
use crate::model::LessonRecord;

pub fn run(args: ShowArgs) -> Result<()> {
    let records = read_lessons(&args.output)?;
    let record = lesson_at(&records, args.position)?;

    let audio_path = audio_path_for(&args.audio_dir, record);
    if audio_path.exists() {
        info!(lesson = record.lesson, path = %audio_path.display(), "audio asset found");
    } else {
        warn!(lesson = record.lesson, path = %audio_path.display(), "audio asset missing");
    }

    if args.json {
        write_json_record(record)
    } else {
        write_text_record(record, &audio_path)
    }
}

/// Looks a lesson up by its 1-based position in the collection, which is
/// not necessarily its lesson number.
fn lesson_at(records: &[LessonRecord], position: usize) -> Result<&LessonRecord> {
    if position == 0 || position > records.len() {
        bail!(
            "lesson position {} out of range (collection has {} lessons)",
            position,
            records.len()
        );
    }
    Ok(&records[position - 1])
}

/// `<audio_dir>/<NN>. <korean title>.mp3`, taking the title part between the
/// first and second `|`.
fn audio_path_for(audio_dir: &Path, record: &LessonRecord) -> PathBuf {
    let title = &record.title;
    let translated_title = title
        .split('|')
        .nth(1)
        .map(str::trim)
        .unwrap_or_else(|| title.trim());
    audio_dir.join(format!("{:02}. {}.mp3", record.lesson, translated_title))
}

fn write_json_record(record: &LessonRecord) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, record)
        .context("failed to serialize lesson json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn write_text_record(record: &LessonRecord, audio_path: &Path) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    writeln!(output, "DAY {:02} - {}", record.lesson, record.title)?;
    writeln!(output, "Audio: {}", audio_path.display())?;
    writeln!(output)?;
    writeln!(output, "English:")?;
    writeln!(output, "{}", record.english)?;
    writeln!(output)?;
    writeln!(output, "Korean:")?;
    writeln!(output, "{}", record.korean)?;
    writeln!(output)?;
    writeln!(output, "Grammar:")?;
    for line in &record.grammar {
        writeln!(output, "  - {line}")?;
    }
    writeln!(output)?;
    writeln!(output, "Practice:")?;
    for line in &record.practice {
        writeln!(output, "  - {line}")?;
    }
    output.flush()?;
    Ok(())
}
