use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "lessonbook",
    version,
    about = "Lesson booklet PDF to structured lesson records"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Status(StatusArgs),
    Show(ShowArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long, default_value = "1분영어_01-30.pdf")]
    pub source_pdf: PathBuf,

    #[arg(long, default_value = "lessons.json")]
    pub output: PathBuf,

    #[arg(long, default_value = ".cache/lessonbook/manifests")]
    pub manifest_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = EmptyPageReport::Warn)]
    pub empty_page_report: EmptyPageReport,
}

/// How pages that yield no text are reported. They are always replaced by
/// empty text and counted in the run manifest.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum EmptyPageReport {
    Silent,
    Warn,
}

impl EmptyPageReport {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Warn => "warn",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "lessons.json")]
    pub output: PathBuf,

    #[arg(long, default_value = ".cache/lessonbook/manifests")]
    pub manifest_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// 1-based position of the lesson in the collection.
    #[arg(long)]
    pub position: usize,

    #[arg(long, default_value = "lessons.json")]
    pub output: PathBuf,

    #[arg(long, default_value = "audio")]
    pub audio_dir: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
