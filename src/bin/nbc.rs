use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use nbc::corpus::{load_labelled_corpus, CorpusFormat, IngestConfig};
use nbc::serialization::{load_classifier, save_classifier};
use nbc::{ClassifierConfig, NaiveBayes, PriorNormalization};
use serde_json::json;

const DEFAULT_OUTPUT: &str = "classifier.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "Naive Bayes text classifier", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train a classifier from labelled documents
    Train(TrainArgs),
    /// Categorize texts with a trained classifier
    Categorize(CategorizeArgs),
    /// Inspect a saved classifier
    Info(InfoArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PriorArg {
    /// docCount / totalDocuments
    TotalDocuments,
    /// docCount / vocabularyLimit
    VocabularyLimit,
}

impl From<PriorArg> for PriorNormalization {
    fn from(value: PriorArg) -> Self {
        match value {
            PriorArg::TotalDocuments => Self::TotalDocuments,
            PriorArg::VocabularyLimit => Self::VocabularyLimit,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    /// `category<TAB>text` per line
    Tsv,
    /// `<root>/<category>/<document>` files
    Directory,
}

impl From<FormatArg> for CorpusFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Tsv => Self::Tsv,
            FormatArg::Directory => Self::Directory,
        }
    }
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Files or directories to ingest
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output path for the classifier snapshot
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Continue training from an existing snapshot
    #[arg(long, value_name = "PATH")]
    resume: Option<PathBuf>,

    /// Per-document cap on accounted token occurrences (0 = unlimited)
    #[arg(long, value_name = "COUNT")]
    vocabulary_limit: Option<usize>,

    /// Prior normalization policy
    #[arg(long, value_enum)]
    prior: Option<PriorArg>,

    /// Treat Cyrillic letters as separators in the default tokenizer
    #[arg(long)]
    no_cyrillic: bool,

    /// Layout of the inputs
    #[arg(long, value_enum, default_value_t = FormatArg::Tsv)]
    format: FormatArg,

    /// Emit pretty JSON
    #[arg(long)]
    pretty: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Disable recursive directory traversal
    #[arg(long)]
    no_recursive: bool,

    /// Follow symlinks during traversal
    #[arg(long)]
    follow_symlinks: bool,
}

#[derive(Args, Debug)]
struct CategorizeArgs {
    /// Classifier snapshot to load
    #[arg(short = 'm', long, value_name = "PATH")]
    model: PathBuf,

    /// Texts to categorize; reads one text per line from stdin when omitted
    texts: Vec<String>,

    /// Print the score of every category instead of only the best one
    #[arg(long)]
    scores: bool,

    /// Emit JSON lines instead of human-readable output
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Classifier snapshot to load
    #[arg(short = 'm', long, value_name = "PATH")]
    model: PathBuf,

    /// Emit JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Train(args) => run_train(args),
        Commands::Categorize(args) => run_categorize(args),
        Commands::Info(args) => run_info(args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = if quiet > 0 {
        match quiet {
            0 => LevelFilter::Info,
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn run_train(args: TrainArgs) -> Result<()> {
    let mut classifier = match &args.resume {
        Some(path) => {
            if args.vocabulary_limit.is_some() || args.prior.is_some() || args.no_cyrillic {
                warn!("--resume keeps the options stored in the snapshot; overrides are ignored");
            }
            load_classifier(path)
                .with_context(|| format!("failed to resume from {}", path.display()))?
        }
        None => {
            let mut cfg = ClassifierConfig::builder().cyrillic(!args.no_cyrillic);
            if let Some(limit) = args.vocabulary_limit {
                cfg = cfg.vocabulary_limit(limit);
            }
            if let Some(prior) = args.prior {
                cfg = cfg.prior_normalization(prior.into());
            }
            NaiveBayes::new(cfg.build()?)?
        }
    };

    let ingest_cfg = IngestConfig {
        format: args.format.into(),
        recursive: !args.no_recursive,
        follow_symlinks: args.follow_symlinks,
    };
    let documents = load_labelled_corpus(&args.inputs, &ingest_cfg)
        .with_context(|| "failed to load labelled corpus")?;
    info!("loaded {} labelled documents", documents.len());

    let progress = if args.no_progress {
        None
    } else {
        let pb = ProgressBar::new(documents.len() as u64);
        let style = ProgressStyle::with_template("{bar:40} {pos}/{len} documents {elapsed}")
            .context("invalid progress template")?;
        pb.set_style(style);
        Some(pb)
    };

    let start = Instant::now();
    for document in &documents {
        classifier.learn(&document.text, &document.category);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_with_message("training complete");
    }
    let elapsed = start.elapsed();

    save_classifier(&classifier, &args.output, args.pretty)
        .with_context(|| format!("failed to save classifier to {}", args.output.display()))?;

    info!(
        "training complete: documents={} categories={} vocabulary={} duration={elapsed:.2?}",
        documents.len(),
        classifier.categories().len(),
        classifier.vocabulary_size()
    );
    println!(
        "wrote classifier with {} documents, {} categories, vocabulary {} to {}",
        classifier.total_documents(),
        classifier.categories().len(),
        classifier.vocabulary_size(),
        args.output.display()
    );

    Ok(())
}

fn run_categorize(args: CategorizeArgs) -> Result<()> {
    let classifier = load_classifier(&args.model)
        .with_context(|| format!("failed to load classifier from {}", args.model.display()))?;
    if classifier.total_documents() == 0 {
        return Err(anyhow!(
            "classifier in {} has not learned any documents",
            args.model.display()
        ));
    }

    let texts = if args.texts.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("failed to read texts from stdin")?
    } else {
        args.texts
    };

    for text in &texts {
        let ranking = classifier.probabilities(text);
        let best = ranking
            .first()
            .ok_or_else(|| anyhow!("classifier has no categories"))?;
        if args.json {
            let record = if args.scores {
                json!({ "text": text, "category": best.category, "scores": ranking })
            } else {
                json!({ "text": text, "category": best.category, "probability": best.probability })
            };
            println!("{}", serde_json::to_string(&record)?);
        } else if args.scores {
            println!("{text}");
            for score in &ranking {
                println!("  {score}");
            }
        } else {
            println!("{}\t{text}", best.category);
        }
    }

    Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
    let classifier = load_classifier(&args.model)
        .with_context(|| format!("failed to load classifier from {}", args.model.display()))?;
    let summary = classifier.summary();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Model        : {}", args.model.display());
        print!("{summary}");
    }
    Ok(())
}
