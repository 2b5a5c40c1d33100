//! Command-line front end for the spam classifier
//!
//! # Usage
//!
//! ```bash
//! # Train on a labelled CSV file and save the model
//! spam-rs train --data spam.csv --model model.json
//!
//! # Classify a message
//! spam-rs predict --model model.json "Congratulations! You won a free cruise"
//!
//! # Score a saved model on another labelled file
//! spam-rs evaluate --model model.json --data holdout.csv
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use spam_rs::config::{Config, LoggingConfig};
use spam_rs::dataset::{DatasetLoader, DatasetSchema};
use spam_rs::evaluation::evaluate_report;
use spam_rs::TrainedClassifier;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "spam-rs")]
#[command(about = "Train and run a Naive Bayes spam classifier", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model and report its held-out accuracy
    Train {
        /// Labelled CSV dataset (overrides [dataset].path)
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Where to write the trained model
        #[arg(short, long, default_value = "model.json")]
        model: PathBuf,
        /// Remove common English words before counting
        #[arg(long)]
        english_stopwords: bool,
    },
    /// Classify a message
    Predict {
        /// Trained model file
        #[arg(short, long, default_value = "model.json")]
        model: PathBuf,
        /// Message text
        message: String,
    },
    /// Score a trained model on a labelled CSV dataset
    Evaluate {
        /// Trained model file
        #[arg(short, long, default_value = "model.json")]
        model: PathBuf,
        /// Labelled CSV dataset (overrides [dataset].path)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None if Path::new("spam-rs.toml").exists() => Config::from_file("spam-rs.toml")?,
        None => Config::default(),
    };

    init_logging(&config.logging)?;

    match cli.command {
        Commands::Train {
            data,
            model,
            english_stopwords,
        } => {
            let mut pipeline = config.pipeline.clone();
            pipeline.english_stopwords |= english_stopwords;

            let data = dataset_path(data, &config)?;
            let dataset = loader(&config).load(&data)?;

            let classifier = spam_rs::train(&dataset, &pipeline)?;
            println!("Model Accuracy: {:.2}", classifier.accuracy());

            classifier.save(&model)?;
            println!("✓ Model saved to {}", model.display());
        }
        Commands::Predict { model, message } => {
            let message = message_text(&message)?;
            let classifier = TrainedClassifier::load(&model)
                .with_context(|| format!("Failed to load model from {}", model.display()))?;

            let label = classifier.predict(message)?;
            let probability = classifier.spam_probability(message)?;
            println!("{} (spam probability {:.3})", label, probability);
        }
        Commands::Evaluate { model, data } => {
            let classifier = TrainedClassifier::load(&model)
                .with_context(|| format!("Failed to load model from {}", model.display()))?;

            let data = dataset_path(data, &config)?;
            let dataset = loader(&config).load(&data)?;

            let report = evaluate_report(
                classifier.model(),
                classifier.vocabulary(),
                classifier.preprocessor(),
                &dataset.deduplicate(),
            )?;
            println!("{}", report);
        }
    }

    Ok(())
}

/// RUST_LOG takes precedence over the configured level
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let level: Level = logging
        .level
        .parse()
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format.as_str() {
        "json" => tracing::subscriber::set_global_default(builder.json().finish())?,
        "compact" => tracing::subscriber::set_global_default(builder.compact().finish())?,
        _ => tracing::subscriber::set_global_default(builder.pretty().finish())?,
    }

    info!("Logging initialised at {}", level);
    Ok(())
}

/// Blank input carries no evidence, only the class priors
fn message_text(message: &str) -> Result<&str> {
    if message.trim().is_empty() {
        bail!("Please type a message to validate");
    }
    Ok(message)
}

fn dataset_path(cli_path: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    match cli_path.or_else(|| config.dataset.path.as_ref().map(PathBuf::from)) {
        Some(path) => Ok(path),
        None => bail!("No dataset given: pass --data or set [dataset].path"),
    }
}

fn loader(config: &Config) -> DatasetLoader {
    DatasetLoader::new(DatasetSchema::from(&config.dataset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_message_is_rejected() {
        assert!(message_text("").is_err());
        assert!(message_text("  \t\n").is_err());
    }

    #[test]
    fn test_message_passed_through() {
        assert_eq!(message_text(" win cash ").unwrap(), " win cash ");
    }

    #[test]
    fn test_dataset_path_prefers_command_line() {
        let mut config = Config::default();
        config.dataset.path = Some("configured.csv".to_string());

        assert_eq!(
            dataset_path(Some(PathBuf::from("cli.csv")), &config).unwrap(),
            PathBuf::from("cli.csv")
        );
        assert_eq!(
            dataset_path(None, &config).unwrap(),
            PathBuf::from("configured.csv")
        );
        assert!(dataset_path(None, &Config::default()).is_err());
    }
}
