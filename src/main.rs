use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use profile_import::{ImportOrchestrator, PollConfig, ServiceConfig, SkillApiEnrichment};

use tracing_subscriber::{fmt, EnvFilter};

/// Import an external professional profile and print it as canonical JSON.
#[derive(Parser)]
#[command(name = "cv-profile-import", version)]
struct Args {
    /// Subject identifier: a handle, @handle, or full profile URL
    identifier: String,

    /// Maximum number of poll attempts before giving up
    #[arg(long, default_value_t = 20)]
    max_attempts: u32,

    /// Seconds to wait between poll attempts
    #[arg(long, default_value_t = 8)]
    interval: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let service = ServiceConfig::from_env()?;

    let poll_config = PollConfig::default()
        .with_max_attempts(args.max_attempts)
        .with_interval(Duration::from_secs(args.interval));

    let orchestrator = ImportOrchestrator::new(service)?.with_poll_config(poll_config);

    let profile = match std::env::var("ENRICHMENT_API_URL") {
        Ok(url) => {
            let enrichment = SkillApiEnrichment::new(&url)?;
            orchestrator
                .with_enrichment(enrichment)
                .import_profile(&args.identifier)
                .await?
        }
        Err(_) => orchestrator.import_profile(&args.identifier).await?,
    };

    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}
