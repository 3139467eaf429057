mod config;
mod exit_code;
mod report;

use clap::Parser;
use colored::Colorize;
use exit_code::ExitCode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gqlguard")]
#[command(about = "Schema-aware GraphQL security scanner", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the scan configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Force colored output even when not a TTY
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except findings
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON output for tooling
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    match run(cli).await {
        Ok(code) => code.exit(),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::Failure.exit()
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let target = config::load_target(&cli.config)?;

    // A scan paces itself with inter-probe delays, so it can run for a
    // while; show a pulse unless the output is meant for machines.
    let spinner = (!cli.quiet && cli.format == OutputFormat::Human).then(|| {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_message(format!("Scanning {}...", target.url));
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        pb
    });

    let result = gqlguard_scanner::run_scan(target).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match cli.format {
        OutputFormat::Human => report::print_human(&result, !cli.quiet),
        OutputFormat::Json => report::print_json(&result)?,
    }

    Ok(ExitCode::from_result(&result))
}

/// Tracing goes to stderr so stdout stays clean for reports (the JSON
/// format is piped into tooling). Silent unless `RUST_LOG` opts in.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// Priority order (highest to lowest):
/// 1. `--color` flag (force colors on)
/// 2. `--no-color` flag (force colors off)
/// 3. `NO_COLOR` environment variable (if set, disable colors)
/// 4. Default: colors enabled if stdout is a TTY (handled by `colored`)
///
/// See: <https://no-color.org/>
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color {
        control::set_override(true);
    } else if no_color || std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    }
}
