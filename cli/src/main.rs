mod dashboard;
mod report;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use lessonplan_core::{parse_reference_time, FileLessonRepository, FileScheduleRepository, ProgressService};
use tracing::debug;

#[derive(Parser)]
#[command(name = "lessonplan")]
#[command(about = "Topic progress for your lesson plans", long_about = None)]
struct Cli {
    /// Directory with the exported collections (default: ~/.lessonplan)
    #[arg(long, global = true, env = "LESSONPLAN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Reference time: now, eow, +1w, -3d, 2025-W11, "2025-03-12 10:00"
    #[arg(long, global = true, env = "LESSONPLAN_NOW", default_value = "now", allow_hyphen_values = true)]
    now: String,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Progress of all topics with planned lessons, or of a single topic
    Progress {
        /// Topic id, title or unique title prefix
        topic: Option<String>,
    },
    /// Progress of every topic of an Allerlei calendar lesson
    Allerlei {
        /// Id of the calendar lesson
        lesson_id: String,
    },
    /// Show the time slots derived from schedule.json
    Slots,
    /// Open the progress dashboard
    Dashboard,
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "lessonplan=info,lessonplan_core=warn".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let now = parse_reference_time(&cli.now, Local::now().naive_local())?;
    let lessons = FileLessonRepository::new(cli.data_dir.clone())?;
    let schedules = FileScheduleRepository::new(cli.data_dir.clone())?;
    debug!(data_dir = %lessons.base_dir().display(), %now, "starting");
    let service = ProgressService::new(lessons, schedules);

    match cli.command {
        Some(Commands::Progress { topic: Some(query) }) => {
            let topic = service.resolve_topic(&query)?;
            let record = service.for_topic(&topic.id, now)?;
            report::print_records(&[record], now, cli.json)?;
        }
        Some(Commands::Progress { topic: None }) => {
            let records = service.all_active(now)?;
            report::print_records(&records, now, cli.json)?;
        }
        Some(Commands::Allerlei { lesson_id }) => {
            let records = service.for_allerlei_lesson(&lesson_id, now)?;
            report::print_records(&records, now, cli.json)?;
        }
        Some(Commands::Slots) => {
            report::print_slots(&service.schedule()?, cli.json)?;
        }
        Some(Commands::Dashboard) | None => {
            dashboard::run(&service, now)?;
        }
    }
    Ok(())
}
