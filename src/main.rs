use candlecast::data::{CsvHistory, StoreConfig};
use candlecast::engine::{Basis, EngineConfig, Prediction, PredictionSession};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "candlecast", about = "Predict the next candle color from the last 10")]
struct Cli {
    /// Directory holding the prediction and outcome logs
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,
    /// Earlier predictions of the same window needed before majority vote applies
    #[arg(long, global = true, default_value = "5")]
    min_matches: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Predict the next candle for a 10-symbol window (G, R, V) and log it
    Predict {
        sequence: String,
        /// Show which rules fired or how the vote was split
        #[arg(short, long)]
        explain: bool,
        #[arg(long)]
        json: bool,
    },
    /// Record the color that actually followed a window
    Outcome { sequence: String, actual: String },
    /// Show the most recent logged predictions
    Log {
        #[arg(short = 'n', long, default_value = "10")]
        last: usize,
    },
    /// Show accuracy of logged predictions against logged outcomes
    Accuracy {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = CsvHistory::new(StoreConfig {
        data_dir: cli.data_dir,
        ..Default::default()
    });
    let config = EngineConfig {
        min_history_matches: cli.min_matches,
    };
    let mut session = PredictionSession::new(store, config);

    match cli.command {
        Commands::Predict {
            sequence,
            explain,
            json,
        } => run_predict(&mut session, &sequence, explain, json)?,
        Commands::Outcome { sequence, actual } => {
            let record = session.record_outcome(&sequence, &actual)?;
            println!("Logged outcome {} for {}", record.actual, record.window);
        }
        Commands::Log { last } => run_log(&session, last)?,
        Commands::Accuracy { json } => run_accuracy(&session, json)?,
    }

    Ok(())
}

fn run_predict(
    session: &mut PredictionSession<CsvHistory>,
    sequence: &str,
    explain: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (window, prediction) = match session.predict(sequence) {
        Ok(ok) => ok,
        Err(e) if e.is_invalid_input() => {
            println!("Prediction: Invalid Input (confidence 0%)");
            println!("  {}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    println!(
        "Prediction for {}: {} (confidence {}%)",
        window, prediction.label, prediction.confidence
    );
    if explain {
        print_basis(&prediction);
    }
    println!(
        "Logged to {}",
        session.store().config().predictions_path().display()
    );
    Ok(())
}

fn print_basis(prediction: &Prediction) {
    match &prediction.basis {
        Basis::Rules(score) => {
            println!(
                "  Static rules: green={} red={} diff={:+}",
                score.green,
                score.red,
                score.diff()
            );
            for rule in &score.fired {
                let (side, pts) = rule.effect();
                println!("    {:24} +{} {:?}", rule.name(), pts, side);
            }
        }
        Basis::MajorityVote { matches, tally } => {
            println!("  Majority vote over {} earlier predictions:", matches);
            for (label, n) in tally {
                println!("    {:14} {:>4}", label.as_str(), n);
            }
        }
    }
}

fn run_log(
    session: &PredictionSession<CsvHistory>,
    last: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = session.recent_predictions(last)?;
    if records.is_empty() {
        println!("No predictions logged yet.");
        return Ok(());
    }

    println!("  {:32} {:10} {}", "Timestamp", "Window", "Prediction");
    for r in &records {
        println!("  {:32} {:10} {}", r.timestamp.to_rfc3339(), r.window, r.label);
    }
    Ok(())
}

fn run_accuracy(
    session: &PredictionSession<CsvHistory>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = session.accuracy();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.total == 0 {
        println!("No predictions with recorded outcomes yet.");
        return Ok(());
    }

    println!(
        "Accuracy: {:.2}% ({} of {} joined rows)",
        report.accuracy_pct, report.correct, report.total
    );
    println!("  {:14} {:>7} {:>7} {:>8}", "Label", "Correct", "Total", "Acc%");
    for l in &report.by_label {
        println!(
            "  {:14} {:>7} {:>7} {:>7.2}%",
            l.label.as_str(),
            l.correct,
            l.total,
            l.accuracy_pct
        );
    }
    Ok(())
}
