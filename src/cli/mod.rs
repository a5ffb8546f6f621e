//! Résumé scorer CLI
//!
//! Command-line interface for training, evaluation, one-off scoring and
//! serving.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::evaluation::{EvaluationConfig, EvaluationJob};
use crate::pipeline::Pipeline;
use crate::server::feedback::{feedback_for, portal_score};
use crate::training::{ModelType, TrainingConfig, TrainingJob};
use crate::utils::data_loader::ResumeRecord;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv_line(key: &str, val: impl std::fmt::Display) {
    println!("  {:<18} {}", muted(key), val.to_string().white());
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "resume-scorer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train, evaluate and serve the résumé scoring model")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit the scoring pipeline and save it
    Train {
        /// Résumé dataset (CSV)
        #[arg(short, long, default_value = "AI_Resume_Screening.csv")]
        data: PathBuf,

        /// Where to write the fitted model
        #[arg(short, long, default_value = "model/resume_score_model.json")]
        model: PathBuf,

        /// Estimator (random_forest, linear)
        #[arg(long, default_value = "random_forest")]
        estimator: ModelType,

        /// Trees in the forest
        #[arg(long, default_value = "100")]
        n_estimators: usize,

        /// Maximum tree depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Held-out fraction
        #[arg(long, default_value = "0.25")]
        test_size: f64,

        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Report held-out metrics and ranked feature importances
    Evaluate {
        #[arg(short, long, default_value = "AI_Resume_Screening.csv")]
        data: PathBuf,

        #[arg(short, long, default_value = "model/resume_score_model.json")]
        model: PathBuf,

        /// Directory for the metrics, importance and residual reports
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Number of cross-validation folds
        #[arg(long, default_value = "5")]
        cv_folds: usize,

        /// Importance rows to print
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Score a single résumé
    Predict {
        #[arg(short, long, default_value = "model/resume_score_model.json")]
        model: PathBuf,

        /// JSON file with skills, experience, education, certifications, projects, salary
        #[arg(short, long, conflicts_with = "text")]
        input: Option<PathBuf>,

        /// Raw résumé text, scored with the portal's default profile
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Start the scoring API
    Serve {
        #[arg(short, long, default_value = "5000")]
        port: u16,

        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(short, long)]
        model: Option<PathBuf>,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(config: TrainingConfig) -> anyhow::Result<()> {
    section("Train");

    step_run(&format!("Training {}", config.model_type.to_string().cyan()));
    let start = Instant::now();
    let report = TrainingJob::new(config).run()?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    kv_line("Estimator", &report.estimator);
    kv_line("Train rows", report.n_train);
    kv_line("Test rows", report.n_test);
    kv_line("Features", report.n_features);
    kv_line("Train R²", format!("{:.4}", report.train_r2));
    kv_line("Test R²", format!("{:.4}", report.test_r2));
    if let Some(path) = &report.model_path {
        kv_line("Saved to", path.display());
    }
    println!();

    Ok(())
}

pub fn cmd_evaluate(config: EvaluationConfig, top: usize) -> anyhow::Result<()> {
    section("Evaluate");

    step_run("Evaluating model");
    let start = Instant::now();
    let report = EvaluationJob::new(config).run()?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    println!("{}", serde_json::to_string_pretty(&report.metrics)?);
    kv_line("Metrics", report.metrics_path.display());

    match (&report.importances, &report.importances_path) {
        (Some(table), Some(path)) => {
            section(&format!("Top {} feature importances", top));
            println!("{}", table.head(top));
            kv_line("Saved to", path.display());
        }
        _ => println!("  {}", "Feature importances not available.".yellow()),
    }
    println!();

    Ok(())
}

pub fn cmd_predict(model_path: &Path, input: Option<&Path>, text: Option<&str>) -> anyhow::Result<()> {
    let record = match (input, text) {
        (Some(path), _) => {
            let json = std::fs::read_to_string(path)?;
            serde_json::from_str::<ResumeRecord>(&json)?
        }
        (None, Some(text)) => ResumeRecord::from_text(text),
        (None, None) => anyhow::bail!("provide --input <file.json> or --text <résumé text>"),
    };

    let pipeline = Pipeline::load(model_path)?;
    let scores = pipeline.predict(&record.to_frame()?)?;
    let score = scores
        .first()
        .copied()
        .ok_or_else(|| anyhow::anyhow!("model returned no score"))?;

    section("Predict");
    kv_line("Score", format!("{:.2}", score).bold());
    if input.is_none() {
        let rounded = portal_score(score);
        kv_line("Feedback", feedback_for(rounded));
    }
    println!();

    Ok(())
}

// ─── Serve ─────────────────────────────────────────────────────────────────────

pub async fn cmd_serve(host: &str, port: u16, model: Option<PathBuf>) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    let mut config = ServerConfig::default().with_host(host).with_port(port);
    if let Some(model) = model {
        config = config.with_model_path(model);
    }

    section("Resume Score API");
    kv_line("Model", config.model_path.display());
    kv_line("Predict", format!("http://{}:{}/predict", host, port));
    kv_line("Portal", format!("http://{}:{}/api/score", host, port));
    kv_line("Health", format!("http://{}:{}/health", host, port));
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    run_server(config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train_defaults() {
        let cli = Cli::try_parse_from(["resume-scorer", "train", "--estimator", "linear"]).unwrap();
        match cli.command {
            Commands::Train { estimator, n_estimators, test_size, .. } => {
                assert_eq!(estimator, ModelType::Linear);
                assert_eq!(n_estimators, 100);
                assert_eq!(test_size, 0.25);
            }
            _ => panic!("expected train"),
        }
    }

    #[test]
    fn test_predict_input_conflicts_with_text() {
        let result = Cli::try_parse_from([
            "resume-scorer", "predict", "--input", "r.json", "--text", "Python",
        ]);
        assert!(result.is_err());
    }
}
