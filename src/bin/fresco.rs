//! Command-line entry point for inspecting the RDF view of a repository.
#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use fresco::logging::{init_logging, resolve_filter};
use fresco::{Fixture, FrescoConfig, MemoryStore, NodeDataset, NodePath, NodeStore, Repository};

#[derive(Parser, Debug)]
#[command(
    name = "fresco",
    version,
    about = "Inspect repository nodes as RDF datasets",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for structured responses"
    )]
    format: OutputFormat,

    #[arg(
        long,
        global = true,
        value_name = "FILTER",
        help = "tracing filter directive (overrides RUST_LOG and the config file)"
    )]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SourceArgs {
    #[arg(long, global = true, value_name = "FILE", env = "FRESCO_CONFIG", help = "Config file")]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "TOML fixture describing types, nodes and catalog entries"
    )]
    fixture: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dataset assembled for a node
    Dump {
        #[arg(value_name = "PATH", default_value = "/")]
        path: String,

        #[arg(long, default_value_t = 0, help = "Index of the first child to list")]
        offset: u64,

        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Number of children to list; negative means all"
        )]
        limit: Option<i64>,
    },
    /// List extractor identifiers for a node, or the whole catalog
    Extractors {
        #[arg(value_name = "PATH")]
        path: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct DumpReport {
    subject: Option<String>,
    context: BTreeMap<String, String>,
    graphs: BTreeMap<String, Vec<String>>,
}

impl DumpReport {
    fn from_dataset(dataset: &NodeDataset) -> Self {
        let mut graphs = BTreeMap::new();
        graphs.insert("default".to_owned(), sorted_triples(dataset.default_graph()));
        for (name, graph) in dataset.named_graphs() {
            graphs.insert(name.to_owned(), sorted_triples(graph));
        }
        Self {
            subject: dataset.subject_uri().map(str::to_owned),
            context: dataset
                .context_entries()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
            graphs,
        }
    }
}

#[derive(Debug, Serialize)]
struct ExtractorsReport {
    entries: BTreeMap<String, Vec<String>>,
}

fn sorted_triples(graph: &oxrdf::Graph) -> Vec<String> {
    let mut lines: Vec<String> = graph.iter().map(|t| format!("{t} .")).collect();
    lines.sort();
    lines
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = FrescoConfig::load(cli.source.config.as_deref())?;
    init_logging(&resolve_filter(cli.log.as_deref(), config.log_filter.as_deref()))?;

    let catalog = config.catalog();
    let store: Arc<dyn NodeStore> = match &cli.source.fixture {
        Some(path) => Arc::new(Fixture::load(path)?.into_store(&catalog)?),
        None => Arc::new(MemoryStore::default()),
    };
    let repository = Repository::new(store, config);

    match cli.command {
        Command::Dump {
            path,
            offset,
            limit,
        } => {
            let path = NodePath::new(path)?;
            let window = repository.config().window(offset, limit);
            let dataset = repository.dataset(&path, window)?;
            let report = DumpReport::from_dataset(&dataset);
            emit(&cli.format, &report, |_| print_dump_text(&report))?;
        }
        Command::Extractors { path } => {
            let mut entries = BTreeMap::new();
            match path {
                Some(path) => {
                    let path = NodePath::new(path)?;
                    entries.insert(path.to_string(), repository.extractor_ids_for(&path)?);
                }
                None => {
                    let catalog = repository.catalog();
                    for type_name in catalog.type_names(repository.store())? {
                        let ids = catalog.list_extractor_ids(repository.store(), &type_name)?;
                        entries.insert(type_name, ids);
                    }
                }
            }
            let report = ExtractorsReport { entries };
            emit(&cli.format, &report, |_| print_extractors_text(&report))?;
        }
    }
    Ok(())
}

fn emit<T, F>(format: &OutputFormat, value: &T, printer: F) -> Result<(), Box<dyn Error>>
where
    T: serde::Serialize,
    F: Fn(OutputFormat),
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{json}");
        }
        OutputFormat::Text => printer(OutputFormat::Text),
    }
    Ok(())
}

fn print_dump_text(report: &DumpReport) {
    if let Some(subject) = &report.subject {
        println!("# subject {subject}");
    }
    for (name, triples) in &report.graphs {
        println!("# graph {name} ({} triples)", triples.len());
        for triple in triples {
            println!("{triple}");
        }
    }
}

fn print_extractors_text(report: &ExtractorsReport) {
    if report.entries.is_empty() {
        println!("(no catalog entries)");
    }
    for (key, ids) in &report.entries {
        if ids.is_empty() {
            println!("{key}: (none)");
        } else {
            println!("{key}: {}", ids.join(", "));
        }
    }
}
