//! Honeypot Classifier - Main Entry Point

mod logic;
pub mod constants;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use logic::config::PipelineConfig;
use logic::events::{load_events, parse_timestamp, save_events};
use logic::journal::JournalWriter;
use logic::model::{ArtifactKind, ArtifactStore};

#[derive(Parser)]
#[command(
    name = "honeypot-classifier",
    about = "Label, train on and classify honeypot session events",
    version
)]
struct Cli {
    /// Directory holding the model artifacts (overrides HONEYPOT_MODEL_DIR)
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    /// Directory holding the per-day attack journals (overrides HONEYPOT_JOURNAL_DIR)
    #[arg(long, global = true)]
    journal_dir: Option<PathBuf>,

    /// Seed for balancing, splitting and model training (overrides HONEYPOT_SEED)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Which persisted artifact `classify` predicts with
#[derive(Clone, Copy, ValueEnum)]
enum ModelChoice {
    Svm,
    Xgb,
    Rf,
    Voting,
}

impl From<ModelChoice> for ArtifactKind {
    fn from(choice: ModelChoice) -> Self {
        match choice {
            ModelChoice::Svm => ArtifactKind::Svm,
            ModelChoice::Xgb => ArtifactKind::GradientBoosting,
            ModelChoice::Rf => ArtifactKind::RandomForest,
            ModelChoice::Voting => ArtifactKind::Voting,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the heuristic label (0/1) of one message
    Label { message: String },

    /// Convert raw JSON-lines honeypot logs into the event table
    Sanitize {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long)]
        output: PathBuf,
    },

    /// Train the ensemble on an event table and persist the artifacts
    Train {
        table: PathBuf,
        #[arg(long)]
        validation_fraction: Option<f64>,
        #[arg(long)]
        svm_max_samples: Option<usize>,
    },

    /// Keep only the trailing window of an event table
    Window {
        table: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        minutes: Option<i64>,
        /// Reference instant (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<String>,
    },

    /// Classify an event table with a persisted model
    Classify {
        table: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, value_enum, default_value = "voting")]
        model: ModelChoice,
        /// Also append attack predictions to today's journal
        #[arg(long)]
        journal: bool,
    },

    /// Append the attack records of a prediction file to the journal
    Journal {
        predictions: PathBuf,
        /// UTC day (YYYY-MM-DD); defaults to today
        #[arg(long)]
        day: Option<NaiveDate>,
    },

    /// Window, classify and journal in one pass
    Run {
        table: PathBuf,
        #[arg(long, default_value = "latest_predictions.json")]
        output: PathBuf,
        #[arg(long)]
        minutes: Option<i64>,
        #[arg(long)]
        now: Option<String>,
    },
}

fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(raw) => parse_timestamp(raw).with_context(|| format!("invalid --now value '{}'", raw)),
        None => Ok(Utc::now()),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = PipelineConfig::from_env();
    if let Some(dir) = cli.model_dir {
        config.model_dir = dir;
    }
    if let Some(dir) = cli.journal_dir {
        config.journal_dir = dir;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    match &cli.command {
        Commands::Train { validation_fraction, svm_max_samples, .. } => {
            if let Some(fraction) = validation_fraction {
                config.validation_fraction = *fraction;
            }
            if let Some(cap) = svm_max_samples {
                config.svm_max_samples = *cap;
            }
        }
        Commands::Window { minutes: Some(minutes), .. } | Commands::Run { minutes: Some(minutes), .. } => {
            config.window_minutes = *minutes;
        }
        _ => {}
    }
    config.validate().context("invalid configuration")?;
    log::debug!("Configuration: {:?}", config);

    match cli.command {
        Commands::Label { message } => {
            let rule = logic::labeling::explain(&message);
            let label = logic::labeling::label(&message);
            println!("{} ({:?})", label.as_u8(), rule);
        }

        Commands::Sanitize { inputs, output } => {
            let report = logic::sanitize::sanitize_jsonl(&inputs, &output)
                .with_context(|| format!("failed to sanitize into {}", output.display()))?;
            println!("{} rows written, {} lines skipped", report.written, report.skipped);
        }

        Commands::Train { table, .. } => {
            let report = logic::pipeline::train(&table, &config)
                .with_context(|| format!("training on {} failed", table.display()))?;
            for evaluation in &report.evaluations {
                println!("{}", evaluation);
            }
            if let Some(voting) = report.ensemble_evaluation() {
                println!("Voting Classifier (Soft) validation accuracy: {:.4}", voting.accuracy);
            }
            println!(
                "Run {}: {} events ({} skipped), {} artifacts written",
                report.run_id,
                report.events,
                report.skipped,
                report.artifacts.len()
            );
        }

        Commands::Window { table, output, now, .. } => {
            let now = parse_now(now.as_deref())?;

            let loaded = load_events(&table).with_context(|| format!("failed to read {}", table.display()))?;
            let selection = logic::window::select_recent_minutes(&loaded.events, now, config.window_minutes);
            save_events(&output, &selection.events)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "{} of {} events since {} ({} skipped)",
                selection.events.len(),
                loaded.events.len(),
                selection.cutoff.to_rfc3339(),
                selection.skipped
            );
        }

        Commands::Classify { table, output, model, journal } => {
            let store = ArtifactStore::new(&config.model_dir);
            let report = logic::pipeline::classify(&table, &store, model.into())
                .with_context(|| format!("classification of {} failed", table.display()))?;
            logic::pipeline::write_predictions(&output, &report.records)?;

            print!("{}", report.agreement);
            println!(
                "{} events, {} attacks, {} skipped, {} with unseen categories",
                report.events, report.attacks, report.skipped, report.unseen
            );

            if journal {
                let day = Utc::now().date_naive();
                let journal = JournalWriter::new(&config.journal_dir);
                let written = journal.record_attacks(day, &report.records)?;
                println!("{} attacks journaled to {}", written, journal.path_for(day).display());
            }
        }

        Commands::Journal { predictions, day } => {
            let records = logic::pipeline::read_predictions(&predictions)
                .with_context(|| format!("failed to read {}", predictions.display()))?;
            let day = day.unwrap_or_else(|| Utc::now().date_naive());
            let journal = JournalWriter::new(&config.journal_dir);
            let written = journal.record_attacks(day, &records)?;
            println!("{} attacks journaled to {}", written, journal.path_for(day).display());
        }

        Commands::Run { table, output, now, .. } => {
            let now = parse_now(now.as_deref())?;

            let report = logic::pipeline::run(&table, &output, &config, now)
                .with_context(|| format!("pipeline run on {} failed", table.display()))?;
            println!(
                "{} recent events classified, {} attacks journaled to {}",
                report.classification.events,
                report.journaled,
                report.journal.display()
            );
        }
    }

    Ok(())
}
