use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use csl_quickstatements::config::ConfigLoader;
use csl_quickstatements::domain::{ItemId, Provenance};
use csl_quickstatements::error::QsError;
use csl_quickstatements::generator::{GenerateOptions, Generator};
use csl_quickstatements::lookup::{FetchSettings, HttpFetcher, SparqlLookup, WIKIDATA_SPARQL};
use csl_quickstatements::output::{CommandOutput, JsonOutput, OutputMode};
use csl_quickstatements::record::{Work, parse_works};

#[derive(Parser)]
#[command(name = "csl-qs")]
#[command(about = "Convert CSL-JSON works into Wikidata QuickStatements")]
#[command(version, author)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Generate statements that create or update one item per work")]
    Generate(GenerateArgs),
    #[command(about = "Generate only \"cites work\" statements for an existing item")]
    Cites(CitesArgs),
}

#[derive(Args)]
struct LookupArgs {
    /// SPARQL endpoint used for identifier lookups.
    #[arg(long, default_value = WIKIDATA_SPARQL)]
    endpoint: String,

    /// Verify TLS certificates of the lookup service.
    #[arg(long)]
    strict_tls: bool,

    /// Lookup timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Args)]
struct SourceArgs {
    /// Source pair added to each claim, e.g. `S248=Q5188229`. Repeatable.
    #[arg(long = "source", value_name = "PAIR")]
    sources: Vec<String>,

    /// Add a "retrieved" source dated today.
    #[arg(long)]
    retrieved: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// CSL-JSON file: one work, an array of works, or JSON Lines.
    file: PathBuf,

    #[arg(long)]
    config: Option<String>,

    /// Always create a new item without looking for an existing one.
    #[arg(long)]
    no_check: bool,

    /// Leave records that already have an item untouched.
    #[arg(long)]
    no_update: bool,

    /// Append "cites work" statements from the reference list.
    #[arg(long)]
    citations: bool,

    /// Print a JSON report instead of QuickStatements text.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    lookup: LookupArgs,
}

#[derive(Args)]
struct CitesArgs {
    file: PathBuf,

    /// Item the citations are added to.
    #[arg(long)]
    item: String,

    #[arg(long)]
    config: Option<String>,

    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    lookup: LookupArgs,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<QsError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &QsError) -> u8 {
    match error {
        QsError::MissingConfig(_)
        | QsError::ConfigRead(_)
        | QsError::ConfigParse(_)
        | QsError::InputRead(_)
        | QsError::InputParse(_)
        | QsError::InvalidItemId(_)
        | QsError::InvalidPropertyId(_)
        | QsError::InvalidProvenance(_)
        | QsError::InvalidLanguage(_) => 2,
        QsError::LookupHttp(_) | QsError::LookupStatus { .. } | QsError::LookupParse(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Cites(args) => run_cites(args),
    }
}

fn run_generate(args: GenerateArgs) -> miette::Result<()> {
    let GenerateArgs {
        file,
        config,
        no_check,
        no_update,
        citations,
        json,
        source,
        lookup,
    } = args;

    let works = read_works(&file)?;
    let generator = build_generator(config.as_deref(), &lookup)?;
    let options = GenerateOptions {
        check: !no_check,
        update: !no_update,
        provenance: build_provenance(&source)?,
        include_citations: citations,
    };
    let output_mode = if json {
        OutputMode::Json
    } else {
        OutputMode::Commands
    };

    match output_mode {
        OutputMode::Json => {
            let report = generator.generate_batch(&works, &options, &JsonOutput)?;
            JsonOutput::print_batch(&report).into_diagnostic()?;
        }
        OutputMode::Commands => {
            let report = generator.generate_batch(&works, &options, &CommandOutput)?;
            CommandOutput::print(&report.commands()).into_diagnostic()?;
        }
    }
    Ok(())
}

fn run_cites(args: CitesArgs) -> miette::Result<()> {
    let CitesArgs {
        file,
        item,
        config,
        source,
        lookup,
    } = args;

    let item = item.parse::<ItemId>()?;
    let works = read_works(&file)?;
    let generator = build_generator(config.as_deref(), &lookup)?;
    let provenance = build_provenance(&source)?;

    let mut text = String::new();
    for work in &works {
        text.push_str(&generator.generate_citations(work, &item, &provenance)?);
    }
    tracing::info!(item = %item, rows = text.lines().count(), "generated citations");
    CommandOutput::print(&text).into_diagnostic()?;
    Ok(())
}

fn read_works(path: &Path) -> miette::Result<Vec<Work>> {
    let text = fs::read_to_string(path).map_err(|_| QsError::InputRead(path.to_path_buf()))?;
    Ok(parse_works(&text)?)
}

fn build_generator(
    config: Option<&str>,
    lookup: &LookupArgs,
) -> miette::Result<Generator<SparqlLookup<HttpFetcher>>> {
    let resolved = ConfigLoader::resolve(config)?;
    let settings = FetchSettings {
        timeout: Duration::from_secs(lookup.timeout),
        strict_tls: lookup.strict_tls,
        ..FetchSettings::default()
    };
    let fetcher = HttpFetcher::new(&settings)?;
    Ok(Generator::new(
        resolved,
        SparqlLookup::with_endpoint(fetcher, &lookup.endpoint),
    ))
}

fn build_provenance(args: &SourceArgs) -> miette::Result<Provenance> {
    let provenance = Provenance::parse_pairs(args.sources.as_slice())?;
    if args.retrieved {
        return Ok(provenance.retrieved_on(chrono::Utc::now().date_naive()));
    }
    Ok(provenance)
}
