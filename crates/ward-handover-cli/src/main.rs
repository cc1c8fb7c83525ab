use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ward_handover_core::board::DateFilter;
use ward_handover_core::models::{JobStatus, PatientQuery, PatientSort, Priority};
use ward_handover_core::{CsvExporter, Database, HandoverConfig, JobFilter, ViewAssembler};

mod seed;

#[derive(Parser, Debug)]
#[command(name = "ward-handover")]
#[command(version)]
#[command(about = "Bootstrap, inspect and export a ward handover store")]
#[command(propagate_version = true)]
struct Args {
    /// Store path (defaults to WARD_HANDOVER_DB_PATH, then ward_handover.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "table")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Create the store (and schema) if missing
    Init {
        /// Also insert the demo patient, notes and jobs
        #[arg(long)]
        seed: bool,
    },

    /// List patients
    Patients {
        /// Substring of name, hospital number or admission reason
        #[arg(long, short = 's', default_value = "")]
        search: String,

        #[arg(long, default_value = "newest")]
        sort: SortArg,

        #[arg(long, default_value = "20")]
        limit: u32,

        /// Only patients with at least one job not done
        #[arg(long)]
        open_only: bool,
    },

    /// Show the jobs board
    Board {
        #[command(flatten)]
        filter: BoardArgs,

        /// Group by status instead of due date
        #[arg(long)]
        by_status: bool,
    },

    /// Write every table as CSV into a directory
    Export {
        #[arg(long)]
        out_dir: PathBuf,
    },

    /// Checkpoint the store and write a consistent copy of it
    Backup {
        #[arg(long)]
        to: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Newest,
    Name,
    HospitalNumber,
}

impl From<SortArg> for PatientSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Newest => PatientSort::NewestFirst,
            SortArg::Name => PatientSort::NameAscending,
            SortArg::HospitalNumber => PatientSort::HospitalNumberAscending,
        }
    }
}

#[derive(clap::Args, Debug)]
struct BoardArgs {
    /// Open, "In Progress" or Done
    #[arg(long)]
    status: Option<String>,

    /// Urgent, Soon or Routine
    #[arg(long)]
    priority: Option<String>,

    #[arg(long)]
    patient: Option<String>,

    #[arg(long)]
    assignee: Option<String>,

    /// Search job text, patient name and hospital number
    #[arg(long)]
    text: Option<String>,

    /// today, tomorrow or YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long)]
    today: Option<NaiveDate>,
}

impl BoardArgs {
    fn to_filter(&self) -> Result<JobFilter> {
        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") | Some("all") => DateFilter::AllDates,
            Some("today") => DateFilter::Today,
            Some("tomorrow") => DateFilter::Tomorrow,
            Some(other) => DateFilter::On(
                NaiveDate::parse_from_str(other, "%Y-%m-%d")
                    .with_context(|| format!("invalid --date {other:?}"))?,
            ),
        };
        let status = match self.status.as_deref() {
            Some(s) => Some(JobStatus::parse(s).with_context(|| format!("invalid --status {s:?}"))?),
            None => None,
        };
        let priority = match self.priority.as_deref() {
            Some(p) => Some(Priority::parse(p).with_context(|| format!("invalid --priority {p:?}"))?),
            None => None,
        };
        Ok(JobFilter {
            status,
            priority,
            patient: self.patient.clone(),
            assignee: self.assignee.clone(),
            text: self.text.clone(),
            date,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let path = match args.db {
        Some(path) => path,
        None => HandoverConfig::from_env().db_path,
    };
    let db = Database::open(&path)
        .with_context(|| format!("failed to open store at {}", path.display()))?;
    let today = Local::now().date_naive();

    match args.command {
        Commands::Init { seed } => {
            let counts = db.table_counts()?;
            println!("Store ready at {}", path.display());
            if seed {
                let outcome = seed::seed_demo_data(&db, Local::now().naive_local())?;
                match args.output {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
                    OutputFormat::Table if outcome.inserted => println!(
                        "Inserted demo patient {} with {} notes and {} jobs",
                        outcome.patient_id, outcome.notes, outcome.jobs
                    ),
                    OutputFormat::Table => println!("Demo patient already present"),
                }
            } else {
                println!(
                    "patients: {}  progress_notes: {}  jobs: {}",
                    counts.patients, counts.progress_notes, counts.jobs
                );
            }
        }

        Commands::Patients {
            search,
            sort,
            limit,
            open_only,
        } => {
            if limit == 0 {
                bail!("--limit must be positive");
            }
            let query = PatientQuery {
                search,
                sort: sort.into(),
                limit,
                only_with_open_jobs: open_only,
            };
            let view = ViewAssembler::new(&db).patient_list(&query, today)?;
            match args.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
                OutputFormat::Table => {
                    if view.rows.is_empty() {
                        println!("No patients found.");
                        return Ok(());
                    }
                    println!(
                        "{:<6} {:<24} {:<12} {:<5} {:<10} REASON",
                        "ID", "NAME", "HOSP NO", "AGE", "OPEN JOBS"
                    );
                    println!("{}", "-".repeat(78));
                    for row in &view.rows {
                        let s = &row.summary;
                        println!(
                            "{:<6} {:<24} {:<12} {:<5} {:<10} {}",
                            s.id,
                            truncate(&s.name, 24),
                            s.hospital_number,
                            row.age.map(|a| a.to_string()).unwrap_or_default(),
                            s.open_job_count,
                            s.reason_for_admission
                        );
                    }
                }
            }
        }

        Commands::Board { filter, by_status } => {
            let today = filter.today.unwrap_or(today);
            let assembler = ViewAssembler::new(&db);
            if by_status {
                let columns = assembler.status_board()?;
                match args.output {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&columns)?),
                    OutputFormat::Table => {
                        for column in &columns {
                            println!("{} ({})", column.status, column.jobs.len());
                            println!("{}", "=".repeat(40));
                            for job in &column.jobs {
                                println!(
                                    "  #{:<5} [{}] {} ({})",
                                    job.job.id, job.job.priority, job.job.job_text, job.patient_name
                                );
                            }
                            println!();
                        }
                    }
                }
                return Ok(());
            }

            let view = assembler.jobs_board(&filter.to_filter()?, today)?;
            match args.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
                OutputFormat::Table => {
                    let m = view.metrics;
                    println!(
                        "Open: {}  In progress: {}  Done: {}  Overdue: {}",
                        m.open, m.in_progress, m.done, m.overdue
                    );
                    println!();
                    for group in &view.groups {
                        println!("{} ({})", group.label, group.jobs.len());
                        println!("{}", "=".repeat(40));
                        for job in &group.jobs {
                            let j = &job.job;
                            println!(
                                "  #{:<5} {:<12} {:<8} {:<16} {} • {} {}",
                                j.id,
                                j.status,
                                j.priority,
                                j.due_display(),
                                job.patient_name,
                                j.job_text,
                                j.assigned_to
                                    .as_deref()
                                    .map(|a| format!("→ {a}"))
                                    .unwrap_or_default()
                            );
                        }
                        println!();
                    }
                    println!("Showing {} of {} jobs", view.shown_jobs(), view.total_jobs);
                }
            }
        }

        Commands::Export { out_dir } => {
            let manifest = CsvExporter::new(&db).write_all(&out_dir)?;
            match args.output {
                OutputFormat::Json => println!("{}", manifest.to_json()?),
                OutputFormat::Table => {
                    for file in &manifest.files {
                        println!("{:<40} {} rows", file.path.display(), file.rows);
                    }
                }
            }
        }

        Commands::Backup { to } => {
            db.checkpoint()?;
            db.copy_to(&to)?;
            info!(dest = %to.display(), "Backup written");
            println!("Backup written to {}", to.display());
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
