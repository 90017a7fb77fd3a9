use clap::Parser;
use startspeed::config::{LoggingSettings, Settings};
use startspeed::core::RateLimiter;
use startspeed::services::{CacheManager, StartListClient, StatsClient};
use startspeed::{ReportSource, StartSpeedPipeline, TrackQuery};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Rank the horses of a start by historical start speed
#[derive(Debug, Parser)]
#[command(name = "startspeed", version, about)]
struct Cli {
    /// Track name as listed on today's cards
    #[arg(short, long)]
    track: String,

    /// Start (race) number on the track's card
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    start: u32,

    /// Recompute even if a cached ranking exists
    #[arg(long)]
    refresh: bool,

    /// Configuration file to use instead of config/default.toml
    #[arg(short, long, env = "STARTSPEED_CONFIG")]
    config: Option<PathBuf>,
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.init(),
    }
}

async fn build_cache(settings: &Settings) -> CacheManager {
    let ttl = settings.cache.ttl_secs;
    let l1_size = settings.cache.l1_cache_size;

    match &settings.cache.redis_url {
        Some(url) => match CacheManager::new(url, l1_size, ttl).await {
            Ok(cache) => {
                info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_size, ttl);
                cache
            }
            Err(e) => {
                warn!("Failed to connect to Redis ({}), caching in memory only", e);
                CacheManager::in_memory(l1_size, ttl)
            }
        },
        None => {
            info!("No Redis configured, caching in memory only");
            CacheManager::in_memory(l1_size, ttl)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging);

    let start_list = match StartListClient::new(
        settings.start_list.base_url.clone(),
        settings.start_list.timeout_secs,
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create start list client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stats = match StatsClient::new(
        settings.stats.base_url.clone(),
        settings.stats.organisation.clone(),
        settings.stats.source_of_data.clone(),
        settings.stats.timeout_secs,
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create statistics client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cache = Arc::new(build_cache(&settings).await);
    let limiter = RateLimiter::new(settings.limiter.max_concurrent);

    let pipeline = StartSpeedPipeline::new(start_list, stats, cache, limiter);
    let query = TrackQuery::new(cli.track, cli.start);

    match pipeline.run_with(&query, cli.refresh).await {
        Ok(report) => {
            if report.source == ReportSource::Cached {
                println!("Found info from cache");
            }
            for horse in &report.horses {
                println!("{} {}: {:.2}", horse.start_number, horse.name, horse.start_score);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if e.is_not_found() {
                eprintln!("Could not find {} start {}: {}", query.track_name, query.start_number, e);
            } else {
                error!("Start speed run failed: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}
