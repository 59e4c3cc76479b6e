//! Feed client entry-point: wires REST adapters, the live channel, and the console.

use std::io::{self, Write};
use std::sync::Arc;

use color_eyre::eyre::WrapErr;
use futures_util::StreamExt;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use feed::config::FeedSettings;
use feed::domain::ports::LiveUpdateSink;
use feed::domain::{FeedRuntime, FeedSnapshot, FeedView, ThreadRenderer};
use feed::inbound::console::{ConsoleDriver, ConsoleFlow, parse_command};
use feed::inbound::ws::{connect, live_channel};
use feed::outbound::http::{HttpFeedSource, HttpLikeGateway};

/// Application bootstrap.
#[actix_rt::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = FeedSettings::load().wrap_err("failed to load feed settings")?;
    let api_base = settings.api_base()?;
    let ws_url = settings.ws_url()?;
    let timeout = settings.request_timeout();

    let source = HttpFeedSource::new(&api_base, timeout).wrap_err("failed to build feed client")?;
    let likes = HttpLikeGateway::new(&api_base, timeout).wrap_err("failed to build like client")?;
    let (runtime, feed) = FeedRuntime::new(Arc::new(source), Arc::new(likes), settings.user_id());
    let runtime_task = actix_rt::spawn(runtime.run());

    let renderer = ThreadRenderer::new(
        settings.indent_curve(),
        Arc::new(DefaultClock),
        settings.automated_handles(),
    );
    let render_task = actix_rt::spawn(render_snapshots(feed.snapshots(), renderer));

    let sink: Arc<dyn LiveUpdateSink> = Arc::new(feed.clone());
    let (dispatcher, publisher, shutdown) = live_channel(sink);
    let live_task = match connect(&ws_url).await {
        Ok(socket) => {
            let (socket_sink, frames) = socket.split();
            Some(actix_rt::spawn(dispatcher.run(frames, socket_sink)))
        }
        Err(error) => {
            warn!(%error, "continuing without live updates");
            None
        }
    };

    let driver = ConsoleDriver::new(feed.clone(), Arc::new(publisher), settings.author_id());
    read_commands(&driver).await?;

    info!("shutting down feed");
    feed.tear_down();
    shutdown.shutdown();
    if let Some(task) = live_task {
        let end = task.await.wrap_err("live dispatcher panicked")?;
        info!(end = ?end, "live channel finished");
    }
    runtime_task.await.wrap_err("feed runtime panicked")?;
    render_task.await.wrap_err("renderer panicked")?;
    Ok(())
}

async fn read_commands(driver: &ConsoleDriver) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(error) => {
                warn!(%error, "ignoring console input");
                continue;
            }
        };
        match driver.execute(command).await {
            Ok(ConsoleFlow::Quit) => break,
            Ok(ConsoleFlow::Continue) => {}
            Err(error) => warn!(%error, "console command failed"),
        }
    }
    Ok(())
}

async fn render_snapshots(mut snapshots: watch::Receiver<FeedSnapshot>, renderer: ThreadRenderer) {
    while snapshots.changed().await.is_ok() {
        let view = renderer.render(&snapshots.borrow_and_update());
        if let Err(error) = write_view(&view) {
            warn!(%error, "failed to write feed view");
            break;
        }
    }
}

fn write_view(view: &FeedView) -> io::Result<()> {
    let line = serde_json::to_string(view)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{line}")?;
    stdout.flush()
}
