//! Churn prediction with k-nearest neighbors.
//!
//! Loads a training and a test table, evaluates the classifier on the test
//! rows and shows one individual prediction.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p churn-cli --release -- train_reducido.csv test_reducido.csv 5
//! ```

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use churn_knn::{Dataset, KnnClassifier, L2Dist, LoadOptions, NumericParsing, evaluate};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Evaluate a k-nearest-neighbor churn classifier.
#[derive(Parser, Debug)]
#[command(name = "churn-cli")]
#[command(about = "Evaluate a k-nearest-neighbor churn classifier on a held-out test set")]
struct Args {
    /// Training data: numeric features followed by a 0/1 label, no header.
    #[arg(default_value = "train_reducido.csv")]
    train: PathBuf,

    /// Test data, same layout as the training data.
    #[arg(default_value = "test_reducido.csv")]
    test: PathBuf,

    /// Number of neighbors that vote.
    #[arg(default_value_t = 5)]
    k: usize,

    /// Field separator (a single ASCII character).
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Evaluate on a seeded random share of the training file instead of the
    /// test file (e.g. `0.2`).
    #[arg(long, value_parser = parse_ratio)]
    holdout: Option<f64>,

    /// Seed for `--holdout`.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Reject non-numeric tokens instead of reading them as 0.
    #[arg(long)]
    strict: bool,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!("`{value}` is not a single ASCII character")),
    }
}

fn parse_ratio(value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(ratio) if ratio > 0.0 && ratio < 1.0 => Ok(ratio),
        _ => Err(format!("`{value}` is not a ratio strictly between 0 and 1")),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = LoadOptions {
        delimiter: args.delimiter,
        numeric: if args.strict {
            NumericParsing::Strict
        } else {
            NumericParsing::Lenient
        },
    };

    let test_source = match args.holdout {
        Some(ratio) => format!("{:.0}% of the training file (seed {})", ratio * 100.0, args.seed),
        None => args.test.display().to_string(),
    };
    print!("{}", report::banner(&args.train, &test_source, args.k));

    let input = Dataset::<f64>::load_with(&args.train, &options)
        .with_context(|| format!("failed to load training data from {}", args.train.display()))?;

    let (train, test) = match args.holdout {
        Some(ratio) => {
            let (train, test) = input.shuffle_split(ratio, args.seed);
            input.release();
            (train, test)
        }
        None => {
            let test = Dataset::<f64>::load_with(&args.test, &options)
                .with_context(|| format!("failed to load test data from {}", args.test.display()))?;
            (input, test)
        }
    };
    print!("{}", report::table_summary("training", &train));
    print!("{}", report::table_summary("test", &test));

    train
        .ensure_compatible(&test)
        .context("training and test data are not comparable")?;

    let classifier =
        KnnClassifier::new(args.k, train, L2Dist).context("failed to build the classifier")?;

    info!(k = args.k, rows = test.n_samples(), "evaluating");
    let metrics = evaluate(&test, &classifier).context("failed to evaluate the classifier")?;
    print!("{}", report::metrics(&metrics));

    if let Some(sample) = test.sample(0) {
        let predicted = classifier
            .predict(sample.features)
            .context("failed to classify test row 0")?;
        print!("{}", report::single_prediction(0, predicted, sample.label));
    }

    classifier.into_training().release();
    test.release();

    println!("\nDone.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_arguments() {
        let args = Args::parse_from(["churn-cli"]);
        assert_eq!(args.train, PathBuf::from("train_reducido.csv"));
        assert_eq!(args.test, PathBuf::from("test_reducido.csv"));
        assert_eq!(args.k, 5);
        assert_eq!(args.delimiter, b',');
        assert!(!args.strict);
        assert_eq!(args.holdout, None);
    }

    #[test]
    fn test_holdout_ratio() {
        let args = Args::parse_from(["churn-cli", "all.csv", "--holdout", "0.25", "--seed", "9"]);
        assert_eq!(args.holdout, Some(0.25));
        assert_eq!(args.seed, 9);
        assert!(Args::try_parse_from(["churn-cli", "--holdout", "1.5"]).is_err());
        assert!(Args::try_parse_from(["churn-cli", "--holdout", "0"]).is_err());
        assert!(parse_ratio("half").is_err());
    }

    #[test]
    fn test_positional_arguments() {
        let args = Args::parse_from(["churn-cli", "tr.csv", "te.csv", "3", "--delimiter", ";"]);
        assert_eq!(args.train, PathBuf::from("tr.csv"));
        assert_eq!(args.test, PathBuf::from("te.csv"));
        assert_eq!(args.k, 3);
        assert_eq!(args.delimiter, b';');
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter("\t"), Ok(b'\t'));
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(Args::try_parse_from(["churn-cli", "a", "b", "many"]).is_err());
    }
}
