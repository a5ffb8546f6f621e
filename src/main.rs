//! Résumé scorer entry point

use clap::Parser;
use resume_scorer::cli::{cmd_evaluate, cmd_predict, cmd_serve, cmd_train, Cli, Commands};
use resume_scorer::evaluation::EvaluationConfig;
use resume_scorer::training::TrainingConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resume_scorer=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train { data, model, estimator, n_estimators, max_depth, test_size, seed } => {
            let mut config = TrainingConfig::new(data)
                .with_model_path(model)
                .with_model_type(estimator)
                .with_n_estimators(n_estimators)
                .with_test_size(test_size)
                .with_random_state(seed);
            if let Some(depth) = max_depth {
                config = config.with_max_depth(depth);
            }
            cmd_train(config)?;
        }
        Commands::Evaluate { data, model, output_dir, cv_folds, top } => {
            let config = EvaluationConfig::new(data, model)
                .with_output_dir(output_dir)
                .with_cv_folds(cv_folds);
            cmd_evaluate(config, top)?;
        }
        Commands::Predict { model, input, text } => {
            cmd_predict(&model, input.as_deref(), text.as_deref())?;
        }
        Commands::Serve { port, host, model } => {
            cmd_serve(&host, port, model).await?;
        }
    }

    Ok(())
}
