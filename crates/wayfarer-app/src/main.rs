mod cli;
mod shell;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;
use wayfarer_config::WayfarerConfig;
use wayfarer_view::HttpFaviconFetcher;

use shell::Shell;

/// How often timers and queued surface events are serviced.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

fn init_logging(directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("wayfarer=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn write_frames<W: AsyncWrite + Unpin>(
    out: &mut W,
    frames: Vec<String>,
) -> std::io::Result<()> {
    if frames.is_empty() {
        return Ok(());
    }
    for frame in frames {
        out.write_all(frame.as_bytes()).await?;
        out.write_all(b"\n").await?;
    }
    out.flush().await
}

#[tokio::main]
async fn main() {
    let args = cli::parse();

    let loaded = match &args.config {
        Some(path) => wayfarer_config::load_config_from(path),
        None => wayfarer_config::load_config(),
    };
    let (config, load_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (WayfarerConfig::default(), Some(e)),
    };

    if args.print_config {
        println!("{}", wayfarer_config::config_to_json(&config));
        return;
    }

    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.directive());
    init_logging(&directive);

    tracing::info!("Wayfarer v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    let favicons = match HttpFaviconFetcher::new(tokio::runtime::Handle::current()) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            tracing::error!("Failed to build favicon client: {e}");
            return;
        }
    };

    let mut shell = match Shell::new(&config, favicons, args.width, args.height) {
        Ok(shell) => shell,
        Err(e) => {
            tracing::error!("Failed to open window: {e}");
            return;
        }
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    tracing::info!("Entering command loop");
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let now = Instant::now();
                    shell.handle_line(&line, now);
                    shell.tick(now);
                }
                Ok(None) => {
                    tracing::info!("stdin closed");
                    break;
                }
                Err(e) => {
                    tracing::error!("stdin read failed: {e}");
                    break;
                }
            },
            _ = ticker.tick() => shell.tick(Instant::now()),
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted");
                break;
            }
        }

        if let Err(e) = write_frames(&mut stdout, shell.drain_frames()).await {
            tracing::error!("stdout write failed: {e}");
            break;
        }
    }

    shell.shutdown();
    if let Err(e) = write_frames(&mut stdout, shell.drain_frames()).await {
        tracing::warn!("final flush failed: {e}");
    }
    tracing::info!("Shutdown complete");
}
