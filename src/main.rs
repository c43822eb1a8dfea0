use clap::Parser;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

use searchdeadres::config::Config;
use searchdeadres::discovery::ProjectLayout;
use searchdeadres::prune::{PruneReport, ResourceAnalyzer};
use searchdeadres::report::{self, Reporter, RunKind};

/// SearchDeadRes - Find and prune unused Android resources
#[derive(Parser, Debug)]
#[command(name = "searchdeadres")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resource roots (`res` directories); discovered when omitted
    #[arg(long = "res", value_name = "DIR")]
    res: Vec<PathBuf>,

    /// Source roots scanned for references; discovered when omitted
    #[arg(long = "src", value_name = "DIR")]
    src: Vec<PathBuf>,

    /// Regex of resource names to always keep (can be specified multiple times)
    #[arg(long, value_name = "RE")]
    exclude_name: Vec<String>,

    /// Only consider these resource types for removal
    #[arg(long, value_name = "TYPE")]
    target_type: Vec<String>,

    /// Never remove resources of these types
    #[arg(long, value_name = "TYPE")]
    exclude_type: Vec<String>,

    /// Repeat the analysis after each removal pass
    #[arg(long)]
    cascade: bool,

    /// Remove unused resources from disk
    #[arg(long)]
    prune: bool,

    /// Dry run - show what would be removed without making changes
    #[arg(long)]
    dry_run: bool,

    /// Ask for confirmation before removing anything
    #[arg(long)]
    interactive: bool,

    /// Generate undo script
    #[arg(long)]
    undo_script: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl From<OutputFormat> for report::ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => report::ReportFormat::Terminal,
            OutputFormat::Json => report::ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    info!("SearchDeadRes v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config(&cli)?;

    run(&config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        // Try to load from default locations
        Config::from_default_locations(&cli.path)?
    };

    // Override with CLI arguments
    if !cli.res.is_empty() {
        config.resource_dirs = cli.res.clone();
    }
    if !cli.src.is_empty() {
        config.source_dirs = cli.src.clone();
    }
    config.exclude_names.extend(cli.exclude_name.iter().cloned());
    config.target_types.extend(cli.target_type.iter().cloned());
    config.exclude_types.extend(cli.exclude_type.iter().cloned());
    if cli.cascade {
        config.cascade = true;
    }

    config.resolve_roots(&cli.path);

    if config.resource_dirs.is_empty() || config.source_dirs.is_empty() {
        let layout = ProjectLayout::discover(&cli.path);
        if config.resource_dirs.is_empty() {
            config.resource_dirs = layout.resource_dirs;
        }
        if config.source_dirs.is_empty() {
            config.source_dirs = layout.source_dirs;
        }
    }

    Ok(config)
}

fn run(config: &Config, cli: &Cli) -> Result<()> {
    let start_time = Instant::now();

    if config.resource_dirs.is_empty() {
        println!("{}", "No resource directories found.".yellow());
        return Ok(());
    }

    let mut analyzer =
        ResourceAnalyzer::from_config(config)?.with_undo_script(cli.undo_script.clone());
    let reporter =
        Reporter::new(cli.format.into(), cli.output.clone()).with_kept(cli.verbose);

    let spinner = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .into_diagnostic()?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };
    spinner.set_message(format!(
        "Analyzing {} resource roots...",
        config.resource_dirs.len()
    ));
    let analysis = analyzer.analyze();
    spinner.finish_and_clear();

    let preview = PruneReport::preview(&analysis.classification);
    let mutate = cli.prune && !cli.dry_run;

    if !mutate || preview.removed.is_empty() {
        reporter.report(&preview, RunKind::Preview)?;
        print_elapsed(cli, start_time);
        return Ok(());
    }

    if cli.interactive && !confirm_prune(&preview)? {
        println!("{}", "Nothing removed.".yellow());
        return Ok(());
    }

    let outcome = analyzer.prune().into_diagnostic()?;
    reporter.report(
        &outcome.report,
        RunKind::Pruned {
            iterations: outcome.iterations,
        },
    )?;

    if let Some(path) = &cli.undo_script {
        if path.exists() && outcome.report.undo_script_error.is_none() {
            println!("{} Undo script saved to: {}", "→".dimmed(), path.display());
        }
    }

    print_elapsed(cli, start_time);
    Ok(())
}

fn confirm_prune(preview: &PruneReport) -> Result<bool> {
    println!();
    for removed in &preview.removed {
        println!("  {} {}", "-".red(), removed.resource.display_name());
    }
    println!();

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Remove {} unused resources?", preview.removed.len()))
        .default(false)
        .interact()
        .into_diagnostic()
}

fn print_elapsed(cli: &Cli, start_time: Instant) {
    if !cli.quiet && matches!(cli.format, OutputFormat::Terminal) {
        println!(
            "{}",
            format!("Completed in {:.2}s", start_time.elapsed().as_secs_f64()).dimmed()
        );
    }
}
