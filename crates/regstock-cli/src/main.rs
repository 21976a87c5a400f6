//! `regstock` command-line entry point.

mod display;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use regstock_analysis::export::{aggregate_batch, document_batch};
use regstock_analysis::{AnalyzedCorpus, Analyzer, RequirementCounter, Snapshot};
use regstock_core::dates::snapshot_dates;
use regstock_core::{AnalysisConfig, ClassifierTables, InForceStrategy};
use regstock_store::{DocumentStore, ExportFormat, write_ipc, write_json, write_parquet};

/// Stock of federal regulation: in-force snapshots, industry split and requirement counts.
#[derive(Parser, Debug)]
#[command(name = "regstock", version, about, long_about = None)]
struct Cli {
    /// Corpus JSON (bare array or `{"regulations": [...]}`).
    #[arg(long, env = "REGSTOCK_CORPUS", global = true)]
    corpus: Option<PathBuf>,

    /// Analysis config JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Classifier tables JSON replacing the built-in tables.
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    /// Override the in-force strategy from the config.
    #[arg(long, value_enum, global = true)]
    strategy: Option<StrategyArg>,

    /// Verbose logging. Repeat for more (-v, -vv). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    StatusHistory,
    MakingYear,
}

impl From<StrategyArg> for InForceStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::StatusHistory => InForceStrategy::StatusHistory,
            StrategyArg::MakingYear => InForceStrategy::MakingYear,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load report and corpus diagnostics.
    Summary {
        /// Write per-document rows (.json, .arrow or .parquet).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Aggregate rows for one reference date.
    Snapshot {
        /// Reference date, YYYY-MM-DD.
        #[arg(long)]
        date: NaiveDate,

        /// Write aggregate rows (.json, .arrow or .parquet).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// One snapshot per year over an inclusive range.
    Series {
        #[arg(long)]
        from: i32,

        #[arg(long)]
        to: i32,

        /// Snapshot month.
        #[arg(long, default_value_t = 7)]
        month: u32,

        /// Snapshot day of month.
        #[arg(long, default_value_t = 1)]
        day: u32,

        /// Write aggregate rows (.json, .arrow or .parquet).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Card for one document, or title matches when the id is unknown.
    Show {
        /// Register id (e.g. C2001A00050) or title fragment.
        query: String,

        /// Include requirement match details.
        #[arg(long)]
        explain: bool,
    },

    /// Count requirements in ad-hoc text.
    Count {
        /// Text to count. Reads stdin when neither this nor --file is given.
        text: Option<String>,

        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Include match details.
        #[arg(long)]
        explain: bool,
    },

    /// Print the built-in classifier tables as JSON.
    Tables,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!("regstock v{}", env!("CARGO_PKG_VERSION"));

    let tables = load_tables(cli.tables.as_deref())?;
    let config = load_config(cli.config.as_deref(), cli.strategy)?;

    match &cli.command {
        Command::Summary { out } => {
            let store = open_corpus(cli.corpus.as_deref())?;
            let corpus = analyze(&store, &tables, &config)?;
            print!("{}", display::load_report(store.report())?);
            print!("{}", display::diagnostics(&corpus.diagnostics)?);
            if let Some(path) = out {
                export_documents(path, &corpus)?;
            }
        }
        Command::Snapshot { date, out } => {
            let store = open_corpus(cli.corpus.as_deref())?;
            let corpus = analyze(&store, &tables, &config)?;
            let snapshot = corpus.aggregate(*date);
            print!("{}", display::snapshot_table(&snapshot)?);
            if let Some(path) = out {
                export_snapshots(path, std::slice::from_ref(&snapshot))?;
            }
        }
        Command::Series {
            from,
            to,
            month,
            day,
            out,
        } => {
            if from > to {
                bail!("--from {from} is after --to {to}");
            }
            let dates = snapshot_dates(*from, *to, *month, *day);
            if dates.is_empty() {
                bail!("no valid dates for month {month} day {day}");
            }
            let store = open_corpus(cli.corpus.as_deref())?;
            let corpus = analyze(&store, &tables, &config)?;
            let series = corpus.time_series(&dates);
            print!("{}", display::series_table(&series)?);
            if let Some(path) = out {
                export_snapshots(path, &series)?;
            }
        }
        Command::Show { query, explain } => {
            let store = open_corpus(cli.corpus.as_deref())?;
            let analyzer = Analyzer::new(&tables, &config)?;
            show(&store, &analyzer, query, *explain)?;
        }
        Command::Count {
            text,
            file,
            explain,
        } => {
            let input = match (text, file) {
                (Some(text), _) => text.clone(),
                (None, Some(path)) => std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
                    buf
                }
            };
            let analyzer = Analyzer::new(&tables, &config)?;
            let (bc, regdata) = if *explain {
                (analyzer.bc().explain(&input), analyzer.regdata().explain(&input))
            } else {
                (analyzer.bc().count(&input), analyzer.regdata().count(&input))
            };
            let mut out = String::new();
            display::requirement_section(&mut out, "BC requirements", &bc)?;
            display::requirement_section(&mut out, "RegData restrictions", &regdata)?;
            print!("{out}");
        }
        Command::Tables => {
            println!("{}", serde_json_pretty(&tables)?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ── Inputs ──

fn load_tables(path: Option<&Path>) -> anyhow::Result<ClassifierTables> {
    match path {
        Some(path) => {
            let tables = ClassifierTables::from_json_file(path)
                .with_context(|| format!("loading tables from {}", path.display()))?;
            info!(version = %tables.version, "using custom classifier tables");
            Ok(tables)
        }
        None => Ok(ClassifierTables::standard()),
    }
}

fn load_config(path: Option<&Path>, strategy: Option<StrategyArg>) -> anyhow::Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(strategy) = strategy {
        config = config.with_strategy(strategy.into());
    }
    Ok(config)
}

fn open_corpus(path: Option<&Path>) -> anyhow::Result<DocumentStore> {
    let path = path.context("no corpus given: pass --corpus or set REGSTOCK_CORPUS")?;
    DocumentStore::open(path).with_context(|| format!("loading corpus {}", path.display()))
}

fn analyze(
    store: &DocumentStore,
    tables: &ClassifierTables,
    config: &AnalysisConfig,
) -> anyhow::Result<AnalyzedCorpus> {
    let analyzer = Analyzer::new(tables, config).context("building analyzer")?;
    Ok(analyzer.analyze(store.documents()))
}

// ── Commands ──

fn show(store: &DocumentStore, analyzer: &Analyzer, query: &str, explain: bool) -> anyhow::Result<()> {
    if let Some(doc) = store.get(query) {
        let mut analyzed = analyzer.analyze_document(doc);
        if explain {
            analyzed.bc = analyzer.bc().explain(&doc.text);
            analyzed.regdata = analyzer.regdata().explain(&doc.text);
        }
        print!("{}", display::document_card(&analyzed, Some(doc))?);
        return Ok(());
    }

    let needle = query.to_lowercase();
    let matches: Vec<_> = store
        .documents()
        .iter()
        .filter(|d| d.title.to_lowercase().contains(&needle))
        .collect();
    if matches.is_empty() {
        bail!("no document with id or title matching {query:?}");
    }
    println!("{} titles match {query:?}:", matches.len());
    for doc in matches.iter().take(25) {
        println!("  {:<14} {}", doc.register_id, display::short_title(&doc.title));
    }
    if matches.len() > 25 {
        println!("  ... and {} more", matches.len() - 25);
    }
    Ok(())
}

// ── Exports ──

fn export_snapshots(path: &Path, snapshots: &[Snapshot]) -> anyhow::Result<()> {
    match output_format(path)? {
        ExportFormat::Json => write_json(path, snapshots)?,
        ExportFormat::ArrowIpc => write_ipc(path, &[aggregate_batch(snapshots)?])?,
        ExportFormat::Parquet => write_parquet(path, &[aggregate_batch(snapshots)?])?,
    }
    Ok(())
}

fn export_documents(path: &Path, corpus: &AnalyzedCorpus) -> anyhow::Result<()> {
    match output_format(path)? {
        ExportFormat::Json => write_json(path, &corpus.documents)?,
        ExportFormat::ArrowIpc => write_ipc(path, &[document_batch(&corpus.documents)?])?,
        ExportFormat::Parquet => write_parquet(path, &[document_batch(&corpus.documents)?])?,
    }
    Ok(())
}

fn output_format(path: &Path) -> anyhow::Result<ExportFormat> {
    ExportFormat::from_path(path)
        .with_context(|| format!("unsupported output extension: {} (use .json, .arrow or .parquet)", path.display()))
}

fn serde_json_pretty(tables: &ClassifierTables) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(tables)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_snapshot() {
        let cli = Cli::try_parse_from(["regstock", "--corpus", "c.json", "snapshot", "--date", "2020-07-01"]).unwrap();
        assert_eq!(cli.corpus, Some(PathBuf::from("c.json")));
        match cli.command {
            Command::Snapshot { date, out } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2020, 7, 1).unwrap());
                assert!(out.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parse_series_defaults() {
        let cli = Cli::try_parse_from(["regstock", "series", "--from", "2000", "--to", "2024"]).unwrap();
        match cli.command {
            Command::Series { from, to, month, day, .. } => {
                assert_eq!((from, to, month, day), (2000, 2024, 7, 1));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parse_strategy_override() {
        let cli = Cli::try_parse_from(["regstock", "--strategy", "making-year", "tables"]).unwrap();
        assert_eq!(cli.strategy, Some(StrategyArg::MakingYear));
        let config = load_config(None, cli.strategy).unwrap();
        assert_eq!(config.strategy, InForceStrategy::MakingYear);
    }

    #[test]
    fn bad_date_rejected() {
        assert!(Cli::try_parse_from(["regstock", "snapshot", "--date", "2020-13-01"]).is_err());
    }

    #[test]
    fn count_text_and_file_conflict() {
        assert!(Cli::try_parse_from(["regstock", "count", "must", "--file", "x.txt"]).is_err());
    }

    #[test]
    fn missing_corpus_is_reported() {
        let err = open_corpus(None).unwrap_err();
        assert!(err.to_string().contains("REGSTOCK_CORPUS"));
    }

    #[test]
    fn unsupported_export_extension() {
        assert!(output_format(Path::new("out.csv")).is_err());
        assert_eq!(output_format(Path::new("out.parquet")).unwrap(), ExportFormat::Parquet);
    }
}
