//! Hallucheck CLI
//!
//! The `hallucheck` command asks a language model every question in a
//! knowledge base and flags the answers it gets wrong.
//!
//! ## Commands
//!
//! - `run`: Ask every KB question, retry once when warranted, write results
//! - `validate`: Classify a single question/answer pair offline
//! - `summarize`: Re-render the summary of a saved results file

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hallucheck_core::{
    read_run_report_json, render_summary_text, write_run_report_json, CompletionConfig,
    CompletionService, HttpCompletionService, KnowledgeBase, Orchestrator, RunConfig, RunReport,
    Thresholds, TracingObserver, ValidationResult, Validator,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "hallucheck")]
#[command(author = "Stevedores Org")]
#[command(version = hallucheck_core::VERSION)]
#[command(about = "Knowledge-base backed hallucination detection", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the model every KB question and write the results
    Run {
        /// Knowledge base file (JSON)
        #[arg(long, default_value = "kb.json")]
        kb: PathBuf,

        /// Results output file
        #[arg(short, long, default_value = "results.json")]
        output: PathBuf,

        /// Also append log lines to this file
        #[arg(long)]
        log_file: Option<PathBuf>,

        /// Completion server base URL
        #[arg(long, env = "HALLUCHECK_ENDPOINT")]
        endpoint: Option<String>,

        /// Model name sent with every request
        #[arg(long, env = "HALLUCHECK_MODEL")]
        model: Option<String>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f32>,

        /// Maximum generated tokens per answer
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Pause before a retry, in milliseconds
        #[arg(long)]
        retry_delay_ms: Option<u64>,

        /// Pause after each question, in milliseconds
        #[arg(long)]
        question_delay_ms: Option<u64>,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Classify one answer against the knowledge base
    Validate {
        /// Knowledge base file (JSON)
        #[arg(long, default_value = "kb.json")]
        kb: PathBuf,

        /// Question that was asked
        #[arg(short, long)]
        question: String,

        /// Answer the model gave
        #[arg(short, long)]
        answer: String,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Print the summary of a saved results file
    Summarize {
        /// Results file written by `run`
        #[arg(default_value = "results.json")]
        path: PathBuf,
    },
}

/// Similarity cut-off flags shared by `run` and `validate`.
#[derive(Debug, Default, Clone, Args)]
struct ThresholdArgs {
    /// Similarity an answer must exceed to count as correct
    #[arg(long)]
    answer_threshold: Option<f64>,

    /// Similarity a question must exceed to match a KB entry
    #[arg(long)]
    match_threshold: Option<f64>,
}

impl ThresholdArgs {
    fn apply(&self, mut thresholds: Thresholds) -> Thresholds {
        if let Some(answer) = self.answer_threshold {
            thresholds.answer = answer;
        }
        if let Some(question_match) = self.match_threshold {
            thresholds.question_match = question_match;
        }
        thresholds
    }
}

/// Overrides collected from `run` flags.
#[derive(Debug, Default)]
struct RunOverrides {
    endpoint: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    retry_delay_ms: Option<u64>,
    question_delay_ms: Option<u64>,
    thresholds: ThresholdArgs,
}

impl RunOverrides {
    fn completion_config(&self) -> CompletionConfig {
        let mut config = CompletionConfig::from_env();
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config = config.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            config = config.with_max_tokens(max_tokens);
        }
        config
    }

    fn run_config(&self) -> RunConfig {
        let base = RunConfig::from_env();
        let thresholds = self.thresholds.apply(base.thresholds);
        let retry_delay = self
            .retry_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(base.retry_delay);
        let question_delay = self
            .question_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(base.question_delay);
        base.with_retry_delay(retry_delay)
            .with_question_delay(question_delay)
            .with_thresholds(thresholds)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let log_file = match &cli.command {
        Commands::Run { log_file, .. } => log_file.clone(),
        _ => None,
    };
    let _guard = hallucheck_core::init_tracing(cli.json, level, log_file.as_deref());

    match cli.command {
        Commands::Run {
            kb,
            output,
            log_file: _,
            endpoint,
            model,
            temperature,
            max_tokens,
            retry_delay_ms,
            question_delay_ms,
            thresholds,
        } => {
            let overrides = RunOverrides {
                endpoint,
                model,
                temperature,
                max_tokens,
                retry_delay_ms,
                question_delay_ms,
                thresholds,
            };
            cmd_run(&kb, &output, &overrides).await
        }
        Commands::Validate {
            kb,
            question,
            answer,
            thresholds,
        } => {
            let thresholds = thresholds.apply(Thresholds::default());
            cmd_validate(&kb, &question, &answer, thresholds)
        }
        Commands::Summarize { path } => cmd_summarize(&path),
    }
}

async fn cmd_run(kb_path: &Path, output: &Path, overrides: &RunOverrides) -> Result<()> {
    let kb = KnowledgeBase::load_or_empty(kb_path);
    let completion = HttpCompletionService::new(overrides.completion_config())
        .context("Failed to build completion client")?;

    let report = run_detection(&kb, &completion, overrides.run_config(), output).await?;

    println!();
    println!("{}", render_summary_text(&report.summary));
    println!();
    println!("Results written to {}", output.display());
    Ok(())
}

/// Runs every KB question through `completion` and writes the report to `output`.
async fn run_detection(
    kb: &KnowledgeBase,
    completion: &dyn CompletionService,
    config: RunConfig,
    output: &Path,
) -> Result<RunReport> {
    let observer = TracingObserver;
    let results = Orchestrator::new(kb, completion, &observer, config)
        .run()
        .await;

    let report = RunReport::new(results);
    write_run_report_json(output, &report)?;
    info!(path = %output.display(), "results.written");
    Ok(report)
}

fn cmd_validate(
    kb_path: &Path,
    question: &str,
    answer: &str,
    thresholds: Thresholds,
) -> Result<()> {
    let validation = classify(kb_path, question, answer, thresholds)?;
    println!("{}", serde_json::to_string_pretty(&validation)?);
    Ok(())
}

/// Classify one answer against the KB at `kb_path`.
fn classify(
    kb_path: &Path,
    question: &str,
    answer: &str,
    thresholds: Thresholds,
) -> Result<ValidationResult> {
    let kb = KnowledgeBase::load(kb_path)
        .with_context(|| format!("Failed to load knowledge base {}", kb_path.display()))?;
    Ok(Validator::new(&kb, thresholds).validate(question, answer))
}

fn cmd_summarize(path: &Path) -> Result<()> {
    let report = read_run_report_json(path)?;
    let summary = hallucheck_core::summarize(&report.results);
    println!("{}", render_summary_text(&summary));
    Ok(())
}
