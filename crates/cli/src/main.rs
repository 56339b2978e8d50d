use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use offerwise_core::domain::factors::OfferFactors;
use offerwise_core::engine::OfferStrategyService;

#[derive(Debug, Parser)]
#[command(name = "offerwise")]
struct Args {
    /// Path to an OfferFactors JSON document ("-" reads stdin).
    #[arg(long)]
    factors: PathBuf,

    /// Skip the reasoning backend even when a key is configured.
    #[arg(long)]
    offline: bool,

    /// Pretty-print the result.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = offerwise_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let factors = read_factors(&args.factors)?;
    factors.validate()?;

    let service = if args.offline {
        OfferStrategyService::deterministic()
    } else {
        OfferStrategyService::from_settings(&settings)
    };

    let strategies = match service.generate_offer_strategies(&factors).await {
        Ok(strategies) => strategies,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            return Err(err);
        }
    };

    tracing::info!(
        strategy = strategies.primary_strategy.strategy.label(),
        offer = strategies.primary_strategy.recommended_offer,
        "generated offer strategies"
    );

    let out = if args.pretty {
        serde_json::to_string_pretty(&strategies)?
    } else {
        serde_json::to_string(&strategies)?
    };
    println!("{out}");

    Ok(())
}

fn read_factors(path: &Path) -> anyhow::Result<OfferFactors> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read factors from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read factors file {}", path.display()))?
    };

    serde_json::from_str(&raw).context("factors document is not a valid OfferFactors JSON object")
}

fn init_sentry(settings: &offerwise_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
