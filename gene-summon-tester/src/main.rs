mod common;
mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use gene_summon_core::{BuiltinCatalogLoader, FileCatalogLoader, SummonEngine};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::split_csv;
use logic::checks::{expand_checks, list_checks};
use logic::{CheckResult, DistributionTester, resolve_seed_inputs};

#[derive(Debug, Parser)]
#[command(name = "gene-summon-tester", version)]
#[command(about = "Statistical QA for Gene Summon - draw, race and capsule-odds frequencies")]
struct Args {
    /// Checks to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    checks: String,

    /// List all available checks and exit
    #[arg(long)]
    list_checks: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Draws per tier, per capsule and per race check
    #[arg(long, alias = "iterations", default_value_t = 10_000)]
    draws: usize,

    /// Maximum absolute deviation between observed and expected shares
    #[arg(long, default_value_t = 0.02)]
    tolerance: f64,

    /// Catalog JSON file (defaults to the built-in catalog)
    #[arg(long, env = "GENE_SUMMON_CATALOG")]
    catalog: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_checks(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let (checks, unknown) = expand_checks(&split_csv(&args.checks));
    for name in &unknown {
        eprintln!("⚠️  Unknown check: {}", name.yellow());
    }
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;

    let engine = load_engine(&args)?;
    log::info!(
        "catalog v{} with {} cards, fingerprint {:016x}",
        engine.catalog().version(),
        engine.catalog().total_items(),
        engine.catalog().fingerprint()
    );
    let tester = DistributionTester::new(engine, args.draws, args.tolerance, args.verbose);

    println!("{}", "🎲 Running Distribution Checks".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());
    let results = tester.run_checks(&checks, &seeds)?;

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_checks(args: &Args) -> Result<bool> {
    if !args.list_checks {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available checks:")?;
    for (key, description) in list_checks() {
        writeln!(output_target.writer(), "  {key:12} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🧬 Gene Summon Distribution Tester".bright_cyan().bold());
    println!("{}", "==================================".cyan());
}

fn load_engine(args: &Args) -> Result<SummonEngine> {
    match &args.catalog {
        Some(path) => SummonEngine::from_loader(&FileCatalogLoader::new(path))
            .with_context(|| format!("loading catalog {}", path.display())),
        None => SummonEngine::from_loader(&BuiltinCatalogLoader).context("loading built-in catalog"),
    }
}

fn write_reports(args: &Args, results: &[CheckResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Gene Summon Distribution Results\n\n_No checks executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No checks executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
