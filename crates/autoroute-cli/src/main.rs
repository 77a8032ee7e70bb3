use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use autoroute_cli::output::render_report;
use autoroute_lib::{load_document, resolve_document, save_document, HaversineMetric};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Resolve auto-routes in a route document into concrete waypoint chains"
)]
struct Cli {
    /// Route document to rewrite in place.
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Write the rewritten document here instead of overwriting FILE.
    #[arg(long, value_name = "PATH", conflicts_with = "dry_run")]
    output: Option<PathBuf>,

    /// Resolve and report without writing anything.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = parse_args();
    init_tracing();
    handle_resolve(&cli)
}

/// Parse arguments, exiting with status 1 on any usage error.
fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            process::exit(code);
        }
    }
}

fn handle_resolve(cli: &Cli) -> Result<()> {
    let mut document = load_document(&cli.file)
        .with_context(|| format!("failed to load route document {}", cli.file.display()))?;

    let report = resolve_document(&mut document, &HaversineMetric);
    print!("{}", render_report(&report, &document));

    if cli.dry_run {
        info!(path = %cli.file.display(), "dry run; document not written");
        return Ok(());
    }

    let target = cli.output.as_deref().unwrap_or(cli.file.as_path());
    save_document(target, &document)
        .with_context(|| format!("failed to write route document {}", target.display()))?;
    info!(path = %target.display(), "wrote route document");

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
