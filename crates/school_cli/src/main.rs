//! Command-line front end over `school_core`.
//!
//! # Responsibility
//! - Resolve configuration and start logging.
//! - Map subcommands onto `SchoolService` use cases and print plain rows.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use school_core::{init_logging, CoreConfig, PersonLike, SchoolService};

#[derive(Debug, Parser)]
#[command(name = "school", version, about = "Students, instructors and courses")]
struct Cli {
    /// Data directory (database, logs, backups). Defaults to ~/.school-manager.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Database file, overriding the one under the data directory.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Log level: trace, debug, info, warn or error.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print core linkage and version.
    Ping,
    /// List one table in canonical order.
    List {
        #[arg(value_enum)]
        table: Table,
    },
    /// List the students enrolled in a course.
    Roster { cid: String },
    /// Write the whole graph as a JSON snapshot.
    Export { path: PathBuf },
    /// Replace the store with a JSON snapshot.
    Import { path: PathBuf },
    /// Copy the database; auto-named in the backup directory without --dest.
    Backup {
        #[arg(long)]
        dest: Option<PathBuf>,
    },
    /// Case-insensitive search over all rows.
    Search { text: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Table {
    Students,
    Instructors,
    Courses,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("school error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Ping = cli.command {
        println!("school_core ping={}", school_core::ping());
        println!("school_core version={}", school_core::core_version());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    init_logging(&config.log_level, &config.log_dir).context("failed to start logging")?;
    let mut service = SchoolService::open(config).context("failed to open school database")?;

    match cli.command {
        Commands::Ping => {}
        Commands::List { table } => print_table(&service, table)?,
        Commands::Roster { cid } => {
            for entry in service.course_roster(&cid)? {
                println!("{}\t{}", entry.sid, entry.name);
            }
        }
        Commands::Export { path } => {
            service.export_snapshot(&path)?;
            println!("exported {}", path.display());
        }
        Commands::Import { path } => {
            service
                .import_snapshot(&path)
                .with_context(|| format!("failed to import {}", path.display()))?;
            let graph = service.graph();
            println!(
                "imported students={} instructors={} courses={}",
                graph.students().len(),
                graph.instructors().len(),
                graph.courses().len()
            );
        }
        Commands::Backup { dest } => {
            let written = service.backup(dest.as_deref())?;
            println!("backup {}", written.display());
        }
        Commands::Search { text } => {
            let hits = service.search(&text);
            for student in hits.students {
                println!("student\t{}\t{}", student.student_id(), student.name());
            }
            for instructor in hits.instructors {
                println!("instructor\t{}\t{}", instructor.instructor_id(), instructor.name());
            }
            for course in hits.courses {
                println!("course\t{}\t{}", course.course_id(), course.course_name());
            }
        }
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<CoreConfig> {
    let mut config = match &cli.data_dir {
        Some(dir) => CoreConfig::in_dir(dir),
        None => CoreConfig::default_location()?,
    };
    if let Some(db) = &cli.db {
        config = config.with_db_path(db);
    }
    if let Some(level) = &cli.log_level {
        config = config.with_log_level(level);
    }
    // Logging requires an absolute directory.
    if config.log_dir.is_relative() {
        let cwd = std::env::current_dir().context("failed to resolve current directory")?;
        config.log_dir = cwd.join(&config.log_dir);
    }
    Ok(config)
}

fn print_table(service: &SchoolService, table: Table) -> anyhow::Result<()> {
    match table {
        Table::Students => {
            for row in service.list_students()? {
                println!("{}\t{}\t{}\t{}", row.sid, row.name, row.age, row.email);
            }
        }
        Table::Instructors => {
            for row in service.list_instructors()? {
                println!("{}\t{}\t{}\t{}", row.iid, row.name, row.age, row.email);
            }
        }
        Table::Courses => {
            for row in service.list_courses()? {
                println!(
                    "{}\t{}\t{}\t{}",
                    row.cid,
                    row.name,
                    row.iid.as_deref().unwrap_or("-"),
                    row.enrolled_count
                );
            }
        }
    }
    Ok(())
}
