//! Timer Dashboard - a client for remote poker timers
//!
//! This is the main entry point for the timer-dashboard application.

use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use anyhow::{bail, Context};
use futures::StreamExt;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};
use tracing::{error, info, warn};

use timer_dashboard::{
    config::{Command, Config},
    endpoint::Endpoint,
    mode_gate::{initial_screen, Screen},
    render::{render_countdown, render_view_state},
    services::{discover_servers, DiscoveryConfig, HttpFetcher},
    state::DashboardController,
    store::{save_endpoint, save_mode, ConfigStore, Configuration, FileConfigStore},
    tasks::{auto_refresh_task, countdown_task, CountdownOutcome, CountdownState, DEFAULT_COUNTDOWN},
    utils::shutdown_signal,
};

const DEFAULT_TIMEOUT: Duration = timer_dashboard::services::http::DEFAULT_TIMEOUT;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so the rendered screens own stdout
    tracing_subscriber::fmt()
        .with_env_filter(format!("timer_dashboard={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting timer-dashboard v{}", env!("CARGO_PKG_VERSION"));

    let store = match &config.config_file {
        Some(path) => FileConfigStore::open(path),
        None => FileConfigStore::open_default(),
    }
    .context("failed to open preferences")?;
    info!("Preferences: {}", store.path().display());

    let command = config.command();
    let auto_refresh = command.auto_refresh_interval();

    match command {
        Command::Start => {
            let screen = initial_screen(&Configuration::load(&store));
            open_screen(screen).await
        }
        Command::Mode { mode } => {
            save_mode(&store, mode).context("failed to save mode")?;
            info!("Mode set to {}", mode);
            let screen = initial_screen(&Configuration::load(&store));
            open_screen(screen).await
        }
        Command::Endpoint { url } => {
            let endpoint = Endpoint::normalize(&url)?;
            save_endpoint(&store, &endpoint).context("failed to save endpoint")?;
            println!("Saved server endpoint {}", endpoint);
            Ok(())
        }
        Command::Dashboard {
            endpoint,
            timeout_ms,
            ..
        } => {
            let endpoint = match endpoint {
                Some(raw) => Endpoint::normalize(&raw)?,
                None => match Configuration::load(&store).server_endpoint {
                    Some(saved) => saved,
                    None => bail!("no server endpoint saved; run `timer-dashboard endpoint <url>` first"),
                },
            };
            run_dashboard(endpoint, auto_refresh, Duration::from_millis(timeout_ms)).await
        }
        Command::Timer { seconds } => run_timer(Duration::from_secs(seconds)).await,
        Command::Discover { timeout_ms, port } => {
            let discovery = DiscoveryConfig {
                target: SocketAddr::from((Ipv4Addr::BROADCAST, port)),
                listen_for: Duration::from_millis(timeout_ms),
                ..DiscoveryConfig::default()
            };
            run_discovery(&discovery, &store).await
        }
    }
}

async fn open_screen(screen: Screen) -> anyhow::Result<()> {
    match screen {
        Screen::ModeSelection => {
            println!("Choose a mode:");
            println!("  timer-dashboard mode timer       local countdown");
            println!("  timer-dashboard mode dashboard   watch a timer server");
            Ok(())
        }
        Screen::EndpointEntry => {
            println!("Enter the timer server address:");
            println!("  timer-dashboard endpoint <url>");
            println!("  timer-dashboard discover         search the local network");
            Ok(())
        }
        Screen::Timer => run_timer(DEFAULT_COUNTDOWN).await,
        Screen::Dashboard(endpoint) => run_dashboard(endpoint, None, DEFAULT_TIMEOUT).await,
    }
}

async fn run_dashboard(
    endpoint: Endpoint,
    auto_refresh: Option<Duration>,
    timeout: Duration,
) -> anyhow::Result<()> {
    let fetcher = Arc::new(HttpFetcher::with_timeout(timeout)?);
    let controller = Arc::new(DashboardController::with_endpoint(endpoint.clone(), fetcher));

    if let Some(every) = auto_refresh {
        tokio::spawn(auto_refresh_task(Arc::downgrade(&controller), every));
    }

    let mut states = Box::pin(controller.observe_state()?);
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    println!("Keys: r + Enter = refresh, f + Enter = restart fetch, q + Enter = quit");

    loop {
        tokio::select! {
            state = states.next() => match state {
                Some(state) => println!("{}", render_view_state(&state, &endpoint)),
                None => break,
            },

            line = input.next_line(), if stdin_open => match line.context("failed to read input")? {
                Some(line) => match line.trim() {
                    "r" | "" => {
                        controller.refresh()?;
                    }
                    "f" => {
                        controller.restart()?;
                    }
                    "q" => break,
                    other => println!("Unknown key `{}`", other),
                },
                None => {
                    info!("Input closed, waiting for a shutdown signal");
                    stdin_open = false;
                }
            },

            signal = &mut shutdown => {
                if let Err(e) = signal {
                    error!("Failed to listen for shutdown signals: {}", e);
                }
                break;
            }
        }
    }

    controller.dispose();
    info!("Dashboard closed");
    Ok(())
}

async fn run_timer(duration: Duration) -> anyhow::Result<()> {
    let (tx, mut rx) = watch::channel(CountdownState::running(duration.as_secs()));

    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let line = render_countdown(&rx.borrow_and_update());
            println!("{}", line);
        }
    });

    let cancel = async {
        if let Err(e) = shutdown_signal().await {
            warn!("Countdown cannot be interrupted: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let outcome = countdown_task(duration, tx, cancel).await;
    if let Err(e) = printer.await {
        warn!("Countdown printer stopped: {}", e);
    }

    if outcome == CountdownOutcome::Cancelled {
        info!("Countdown interrupted");
    }
    Ok(())
}

async fn run_discovery(discovery: &DiscoveryConfig, store: &dyn ConfigStore) -> anyhow::Result<()> {
    println!("Searching for timer servers ...");
    let found = discover_servers(discovery).await?;

    match found.as_slice() {
        [] => println!("No servers found"),
        [only] => {
            save_endpoint(store, only).context("failed to save endpoint")?;
            println!("Found {} and saved it as the server endpoint", only);
        }
        many => {
            println!("Found {} servers:", many.len());
            for endpoint in many {
                println!("  {}", endpoint);
            }
            println!("Save one with `timer-dashboard endpoint <url>`");
        }
    }
    Ok(())
}
