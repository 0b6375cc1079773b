use chrono::Local;
use clap::{Parser, Subcommand};

use crate::clients::calendar::GoogleCalendar;
use crate::config::AppConfig;
use crate::error::AgendoError;
use crate::input::TerminalPrompter;
use crate::service::{activity, plan};
use crate::shell;

#[derive(Parser)]
#[command(name = "agendo", about = "Time tracking on top of your calendar")]
pub struct Cli {
    /// Path to a key=value config file (default: the CONFIG_FILE env var)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Begin an activity now
    Start { category: String, name: Vec<String> },
    /// Stop the current activity
    Stop,
    /// Rename the current activity
    Rename { name: Vec<String> },
    /// Delete the current activity
    Delete,
    /// Log an event at an arbitrary time; missing fields are prompted for
    Add {
        #[arg(trailing_var_arg = true)]
        tokens: Vec<String>,
    },
    /// Show the schedule of a day, or a span of days
    Plan {
        date: Option<String>,
        days: Option<String>,
    },
    /// Time spent per category over a day, or a span of days
    Stats {
        date: Option<String>,
        days: Option<String>,
    },
    /// Interactive shell for long tracking sessions
    Shell,
}

pub async fn run() -> Result<(), AgendoError> {
    let cli = Cli::parse();

    let config = match cli.config.or_else(|| std::env::var("CONFIG_FILE").ok()) {
        Some(path) => AppConfig::from_file(&path)?,
        None => AppConfig::default(),
    };
    let categories = config.categories()?;
    let token = config.require("CALENDAR_TOKEN")?;
    let calendar_id = config.get("CALENDAR_ID").unwrap_or("primary".to_string());
    let backend = GoogleCalendar::new(token, calendar_id);

    let now = Local::now().naive_local();
    let mut session = activity::SessionState::default();
    let mut prompter = TerminalPrompter;

    match cli.command {
        Commands::Start { category, name } => {
            activity::start(
                &backend,
                &categories,
                &mut session,
                &category,
                &name,
                now,
                &mut prompter,
            )
            .await
        }
        Commands::Stop => activity::stop(&backend, &mut session, now).await,
        Commands::Rename { name } => {
            activity::rename(&backend, &mut session, &name, now, &mut prompter).await
        }
        Commands::Delete => activity::delete(&backend, &mut session, now).await,
        Commands::Add { tokens } => {
            plan::add(&backend, &categories, &tokens, now, &mut prompter).await
        }
        Commands::Plan { date, days } => {
            plan::show(&backend, &categories, date.as_deref(), days.as_deref(), now).await
        }
        Commands::Stats { date, days } => {
            plan::stats(&backend, &categories, date.as_deref(), days.as_deref(), now).await
        }
        Commands::Shell => shell::run(&backend, &categories).await,
    }
}
