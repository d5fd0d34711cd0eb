use careervue::config::AppConfig;
use careervue::error::AppError;
use careervue::messages::import::{self, ImportFormat};
use careervue::sentiment::{MessageRecord, SentimentResult, SentimentScorer, SentimentStats};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum InputFormat {
    Csv,
    Json,
}

impl From<InputFormat> for ImportFormat {
    fn from(value: InputFormat) -> Self {
        match value {
            InputFormat::Csv => ImportFormat::Csv,
            InputFormat::Json => ImportFormat::Json,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Text to classify
    pub(crate) text: String,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// CSV (subject,message columns) or JSON export of contact messages
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Input format; inferred from the file extension when omitted
    #[arg(long, value_enum)]
    pub(crate) format: Option<InputFormat>,
    /// Print a line per message before the summary
    #[arg(long)]
    pub(crate) list: bool,
}

fn load_scorer() -> Result<SentimentScorer, AppError> {
    let config = AppConfig::load()?;
    let lexicon = config.sentiment.load_lexicon()?;
    Ok(SentimentScorer::new(lexicon))
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let scorer = load_scorer()?;
    let result = scorer.classify(&args.text);

    if args.json {
        let rendered = serde_json::to_string_pretty(&result)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        println!("{}", describe_result(&result));
    }

    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        input,
        format,
        list,
    } = args;

    let format = format
        .map(ImportFormat::from)
        .unwrap_or_else(|| ImportFormat::from_path(&input));
    let records = import::read_path(&input, format)?;
    let scorer = load_scorer()?;

    println!("Sentiment report for {}", input.display());

    if list {
        println!("\nMessages");
        for (index, (record, result)) in records
            .iter()
            .zip(scorer.classify_batch(&records))
            .enumerate()
        {
            println!(
                "{:>4}. {} | {}",
                index + 1,
                record_subject(record),
                describe_result(&result)
            );
        }
    }

    let stats = scorer.aggregate_stats(&records);
    render_stats(&stats);
    Ok(())
}

fn record_subject(record: &MessageRecord) -> &str {
    record
        .subject
        .as_deref()
        .filter(|subject| !subject.is_empty())
        .unwrap_or("(no subject)")
}

pub(crate) fn describe_result(result: &SentimentResult) -> String {
    format!(
        "{} (score {:.2}, {} positive / {} negative)",
        result.sentiment.label(),
        result.score,
        result.positive_count,
        result.negative_count
    )
}

fn render_stats(stats: &SentimentStats) {
    println!("\nSummary");
    println!("- messages: {}", stats.total);
    println!(
        "- positive: {} ({:.1}%)",
        stats.positive, stats.positive_percentage
    );
    println!(
        "- negative: {} ({:.1}%)",
        stats.negative, stats.negative_percentage
    );
    println!(
        "- neutral: {} ({:.1}%)",
        stats.neutral, stats.neutral_percentage
    );
    println!("- average score: {:.2}", stats.average_score);
}
