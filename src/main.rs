use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chemgene::config::Config;
use chemgene::graph::DEFAULT_LIMIT;
use chemgene::pipeline::{self, ExportFormat, InteractionView, PipelineOptions, PipelineOutput};
use chemgene::table::{TablePaths, TableSet};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "chemgene", about = "Chemical-gene interaction graphs from literature tables")]
struct Cli {
    /// Optional path to a config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Chemical entity table (CSV)
    #[arg(long)]
    chemicals: Option<PathBuf>,
    /// Gene entity table (CSV)
    #[arg(long)]
    genes: Option<PathBuf>,
    /// Interaction table (CSV)
    #[arg(long)]
    interactions: Option<PathBuf>,
    /// Number of interaction rows to use
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the styled graph and write it as json or graphml
    Build {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value = "json")]
        format: String,
        /// Output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Convert a saved json view to another format
    Export { view: PathBuf, format: String, output: PathBuf },
    /// Print graph statistics
    Stats {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else if cli.quiet { Level::WARN } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    let cfg = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Build { input, format, output } => {
            let format: ExportFormat = format.parse()?;
            let out = run_pipeline(&input, &cfg)?;
            let doc = out.view.render(format)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, doc).with_context(|| format!("writing {}", path.display()))?;
                    eprintln!(
                        "{} {} nodes, {} edges to {}",
                        "Wrote".green().bold(),
                        out.stats.nodes,
                        out.stats.edges,
                        path.display()
                    );
                }
                None => println!("{}", doc),
            }
        }
        Commands::Export { view, format, output } => {
            export_cmd(&view, &format, &output)?;
        }
        Commands::Stats { input } => {
            let out = run_pipeline(&input, &cfg)?;
            let s = out.stats;
            println!("{}", "Interaction graph".bold());
            println!("  records used   {} of {}", s.records_used.to_string().cyan(), s.records_available);
            println!("  nodes          {}", s.nodes.to_string().cyan());
            println!("    chemical     {}", s.chemical_nodes.to_string().green());
            println!("    gene/other   {}", s.gene_nodes.to_string().blue());
            println!("    unmatched    {}", s.unmatched_nodes.to_string().yellow());
            println!("  edges          {}", s.edges.to_string().cyan());
            println!("  index          {} chemicals, {} genes", out.index.chemicals.len(), out.index.genes.len());
        }
    }

    Ok(())
}

fn run_pipeline(input: &InputArgs, cfg: &Config) -> anyhow::Result<PipelineOutput> {
    let paths = TablePaths {
        chemicals: pick(&input.chemicals, &cfg.chemicals, "chemicals")?,
        genes: pick(&input.genes, &cfg.genes, "genes")?,
        interactions: pick(&input.interactions, &cfg.interactions, "interactions")?,
    };
    let columns = cfg.columns.clone().unwrap_or_default();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Reading tables...");
    let tables = TableSet::load(&paths, &columns);
    spinner.finish_and_clear();
    let tables = tables.context("reading input tables")?;

    let options = PipelineOptions {
        limit: input.limit.or(cfg.limit).unwrap_or(DEFAULT_LIMIT),
        palette: cfg.palette.clone().unwrap_or_default(),
        viewer: cfg.viewer.clone().unwrap_or_default(),
    };
    Ok(pipeline::run(tables, &options))
}

fn pick(cli: &Option<PathBuf>, cfg: &Option<PathBuf>, what: &str) -> anyhow::Result<PathBuf> {
    cli.clone()
        .or_else(|| cfg.clone())
        .with_context(|| format!("no {} table given; pass --{} or set it in the config", what, what))
}

fn export_cmd(view_path: &Path, format: &str, output: &Path) -> anyhow::Result<()> {
    let view = InteractionView::load_json(view_path).with_context(|| format!("reading {}", view_path.display()))?;
    let format: ExportFormat = format.parse()?;
    std::fs::write(output, view.render(format)?)?;
    eprintln!("{} {:?} to {}", "Exported".green().bold(), format, output.display());
    Ok(())
}
