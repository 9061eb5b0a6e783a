mod run;

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};
use shelfcheck_scraper::{Content, ScanMode};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shelfcheck")]
#[command(about = "Check product availability and render a replacement-aware report")]
#[command(group(ArgGroup::new("input").required(true).args(["asins", "url"])))]
struct Cli {
    /// Comma-separated list of ASINs
    #[arg(short, long)]
    asins: Option<String>,

    /// Page to scan for product identifiers
    #[arg(short, long)]
    url: Option<String>,

    /// What to scan the page for (only used with --url)
    #[arg(long, value_enum, default_value_t = ScanArg::Images)]
    scan: ScanArg,

    /// Print fetched product data as JSON instead of writing a report
    #[arg(long)]
    json: bool,

    /// Replacement mapping file (overrides SHELFCHECK_REPLACEMENTS_PATH)
    #[arg(long)]
    replacements: Option<PathBuf>,

    /// Directory the report is written to (overrides SHELFCHECK_OUTPUT_DIR)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScanArg {
    /// Marketplace links on the page
    Links,
    /// Images on the page that fail to load
    Images,
}

impl From<ScanArg> for ScanMode {
    fn from(value: ScanArg) -> Self {
        match value {
            ScanArg::Links => ScanMode::Links,
            ScanArg::Images => ScanMode::Images,
        }
    }
}

impl Cli {
    fn content(&self) -> anyhow::Result<Content<'_>> {
        match (self.asins.as_deref(), self.url.as_deref()) {
            (Some(list), None) => Ok(Content::Explicit(list)),
            (None, Some(url)) => Ok(Content::Page {
                url,
                mode: self.scan.into(),
            }),
            _ => anyhow::bail!("provide exactly one of --asins or --url"),
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = shelfcheck_core::load_app_config()?;
    init_tracing(&config.log_level);

    if let Some(path) = &cli.replacements {
        config.replacements_path.clone_from(path);
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir.clone_from(dir);
    }
    tracing::debug!(?config, "configuration loaded");

    run::run(cli.content()?, cli.json, &config).await
}
