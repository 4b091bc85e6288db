//! Records dump tool.
//!
//! # Responsibility
//! - Open a data source from flags, environment or a JSON settings file.
//! - Print groups, curators or students as JSON lines on stdout.
//!
//! ```bash
//! cohort --url sqlite:records.db groups
//! COHORT_DB_URL=sqlite:records.db cohort students --id 4
//! cohort --config cohort.json curators
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cohort_core::{
    init_logging, AppConfig, ConnectionProvider, CuratorRepository, DataSourceConfig,
    GroupRepository, LoggingConfig, SqliteCuratorRepository, SqliteGroupRepository,
    SqliteStudentRepository, StudentRepository,
};
use log::{error, info};
use serde::Serialize;

/// Dump study group records as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "cohort", version, about = "Inspect cohort records")]
struct Args {
    /// Data source URL, `sqlite:<path>` or `sqlite::memory:`
    #[arg(long, env = "COHORT_DB_URL")]
    url: Option<String>,

    /// JSON settings file with `data_source` and optional `logging` sections; wins over `--url`
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Absolute directory for log files; logging stays off when omitted
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log level used with `--log-dir`
    #[arg(long, default_value = cohort_core::default_log_level())]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Groups with their curator and students
    Groups {
        #[arg(long, conflicts_with = "name")]
        id: Option<i64>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Curators, unassigned ones first
    Curators {
        #[arg(long)]
        id: Option<i64>,
    },
    /// Students, unassigned ones first
    Students {
        #[arg(long)]
        id: Option<i64>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error");
            eprintln!("cohort: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let settings = load_settings(&args)?;
    if let Some(logging) = &settings.logging {
        init_logging(logging)?;
    }

    let provider = ConnectionProvider::new(&settings.data_source).map_err(|err| err.to_string())?;
    let groups = SqliteGroupRepository::new(&provider);
    info!("event=cli_run module=cli status=start");

    match args.command {
        Command::Groups { id: Some(id), .. } => print_one(groups.find_by_id(id)),
        Command::Groups {
            name: Some(name), ..
        } => print_one(groups.find_by_name(&name)),
        Command::Groups { .. } => print_all(groups.find_all()),
        Command::Curators { id } => {
            let curators = SqliteCuratorRepository::new(&provider, &groups);
            match id {
                Some(id) => print_one(curators.find_by_id(id)),
                None => print_all(curators.find_all()),
            }
        }
        Command::Students { id } => {
            let students = SqliteStudentRepository::new(&provider, &groups);
            match id {
                Some(id) => print_one(students.find_by_id(id)),
                None => print_all(students.find_all()),
            }
        }
    }
}

fn load_settings(args: &Args) -> Result<AppConfig, String> {
    let mut settings = match (&args.config, &args.url) {
        (Some(path), _) => AppConfig::from_json_file(path).map_err(|err| err.to_string())?,
        (None, Some(url)) => AppConfig {
            data_source: DataSourceConfig::sqlite(url.as_str()),
            logging: None,
        },
        (None, None) => AppConfig {
            data_source: DataSourceConfig::from_env().map_err(|err| err.to_string())?,
            logging: None,
        },
    };

    if let Some(log_dir) = &args.log_dir {
        settings.logging = Some(LoggingConfig::new(args.log_level.as_str(), log_dir.as_path()));
    }
    Ok(settings)
}

fn print_one<T: Serialize, E: std::fmt::Display>(found: Result<Option<T>, E>) -> Result<(), String> {
    match found.map_err(|err| err.to_string())? {
        Some(item) => print_line(&item),
        None => Err("no matching record".to_string()),
    }
}

fn print_all<T, I, E>(found: Result<I, E>) -> Result<(), String>
where
    T: Serialize,
    I: Iterator<Item = T>,
    E: std::fmt::Display,
{
    let mut count = 0usize;
    for item in found.map_err(|err| err.to_string())? {
        print_line(&item)?;
        count += 1;
    }
    info!("event=cli_run module=cli status=ok records={count}");
    Ok(())
}

fn print_line<T: Serialize>(item: &T) -> Result<(), String> {
    let line = serde_json::to_string(item).map_err(|err| err.to_string())?;
    println!("{line}");
    Ok(())
}
