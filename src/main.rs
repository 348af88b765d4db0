use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use kbscrape::api::ApiClient;
use kbscrape::config::{self, Credentials, KbConfig};
use kbscrape::scrape;

#[derive(Parser)]
#[command(name = "kbscrape", version, about = "Knowby usage scraper — pulls view/completion analytics into dashboard CSVs")]
struct Cli {
    /// Bearer token for the Authorization header
    #[arg(long, env = "KNOWBY_AUTHORIZATION", hide_env_values = true)]
    authorization: Option<String>,

    /// Value for the X-Member-Id header
    #[arg(long, env = "KNOWBY_MEMBER_ID")]
    member_id: Option<String>,

    /// Value for the X-Organisation-Id header
    #[arg(long, env = "KNOWBY_ORGANISATION_ID")]
    organisation_id: Option<String>,

    /// API base URL override
    #[arg(long, env = "KNOWBY_BASE_URL")]
    base_url: Option<String>,

    /// Directory the CSV files are written to
    #[arg(long, default_value = "public")]
    out_dir: PathBuf,

    /// Write a starter config file and exit
    #[arg(long)]
    init: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if cli.init {
        if config::init_config()? {
            println!("Wrote {}", config::config_path()?.display());
        } else {
            println!("Config already exists: {}", config::config_path()?.display());
        }
        return Ok(());
    }

    let file_config = KbConfig::load()?;
    let knowby = file_config.knowby.unwrap_or_default();

    let credentials = Credentials {
        authorization: config::resolve_credential(
            cli.authorization,
            knowby.authorization,
            "--authorization",
            "KNOWBY_AUTHORIZATION",
        )?,
        member_id: config::resolve_credential(
            cli.member_id,
            knowby.member_id,
            "--member-id",
            "KNOWBY_MEMBER_ID",
        )?,
        organisation_id: config::resolve_credential(
            cli.organisation_id,
            knowby.organisation_id,
            "--organisation-id",
            "KNOWBY_ORGANISATION_ID",
        )?,
    };

    let client = ApiClient::new(credentials, cli.base_url.or(knowby.base_url));
    let report = scrape::run_scrape(&client, &cli.out_dir)?;

    eprintln!(
        "\nScrape complete: {} knowbys, {} views, {} completions, {} file{} written ({:.1}s)",
        report.published,
        report.view_events,
        report.completion_events,
        report.files.len(),
        if report.files.len() == 1 { "" } else { "s" },
        report.duration_secs,
    );

    Ok(())
}
