// Command-line entry point for semgraph.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use semgraph::application::{AnalysisOptions, AnalyzeUsecase};
use semgraph::domain::diagnostics::DiagnosticSummary;
use semgraph::infrastructure::{
    exporter_for, init_thread_pool, OutputFormat, ProjectConfig, ProjectLoader, SynFrontEnd, CONFIG_FILENAME,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Static call graph for Rust sources", long_about = None)]
struct Cli {
    /// Input source file path (can specify multiple)
    #[arg(short, long)]
    input: Vec<PathBuf>,

    /// Input source folder(s), scanned recursively
    #[arg(short = 'd', long)]
    folder: Vec<PathBuf>,

    /// Workspace Cargo.toml
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// External reference metadata (TOML, can specify multiple)
    #[arg(short, long)]
    reference: Vec<PathBuf>,

    /// Project config file (defaults to ./semgraph.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file path; stdout when omitted
    #[arg(short, long)]
    output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Project name used in logs and diagnostics
    #[arg(long)]
    name: Option<String>,

    /// Worker threads (defaults to half the CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Walk units one at a time
    #[arg(long)]
    sequential: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn overrides(&self) -> ProjectConfig {
        ProjectConfig {
            name: self.name.clone(),
            inputs: self.input.clone(),
            folders: self.folder.clone(),
            workspace: self.workspace.clone(),
            references: self.reference.clone(),
            format: self.format,
            parallel: self.sequential.then_some(false),
            jobs: self.jobs,
        }
    }
}

fn init_logging(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn load_config(cli: &Cli) -> Result<ProjectConfig> {
    let file_config = match &cli.config {
        Some(path) => ProjectConfig::from_file(path)?,
        None if Path::new(CONFIG_FILENAME).is_file() => {
            debug!(path = CONFIG_FILENAME, "using config from working directory");
            ProjectConfig::from_file(Path::new(CONFIG_FILENAME))?
        }
        None => ProjectConfig::default(),
    };
    Ok(file_config.merge(cli.overrides()))
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    if !config.has_sources() {
        bail!("Please provide at least one --input <file>, --folder <dir> or --workspace <Cargo.toml>");
    }

    init_thread_pool(config.jobs)?;

    let sources = ProjectLoader::collect(&config)?;
    let references = ProjectLoader::references(&config);
    info!(project = config.project_name(), files = sources.len(), references = references.len(), "starting analysis");

    let exporter = exporter_for(config.format.unwrap_or_default());
    let usecase = AnalyzeUsecase {
        front_end: &SynFrontEnd,
        exporter: exporter.as_ref(),
        options: AnalysisOptions {
            parallel: config.parallel.unwrap_or(true),
        },
    };

    let report = usecase.run(config.project_name(), &sources, &references)?;

    for diagnostic in &report.diagnostics {
        debug!(%diagnostic, "diagnostic");
    }
    let summary = DiagnosticSummary::of(&report.diagnostics);
    if summary.total() > 0 {
        warn!(
            unresolved_callers = summary.unresolved_callers,
            unresolved_callees = summary.unresolved_callees,
            "some calls could not be attributed"
        );
    }

    match &cli.output {
        Some(path) => {
            usecase.export(&report, path)?;
            info!(output = %path, edges = report.graph.len(), "call graph written");
        }
        None => print!("{}", usecase.render(&report)?),
    }

    eprintln!(
        "{} edges, {} unresolved callers, {} unresolved callees",
        report.graph.len(),
        summary.unresolved_callers,
        summary.unresolved_callees
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
