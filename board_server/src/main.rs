use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use board_server::{
    env::Settings,
    replay::{Replay, ReplayOutcome},
    BoardServer, ConsoleTarget, LoggerManager,
};
use clap::{Args, Parser, Subcommand};
use snake_engine::{batch, client::SnakeRequest};
use tokio::io::BufReader;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(
    name = "board_server",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read one {"request", "moves"} object per line and print the next turn's request.
    Move,
    /// Replay a game from a snapshot and stream it to board viewers.
    Serve(ServeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Game request at turn 0.
    #[arg(long)]
    snapshot: PathBuf,

    #[arg(long, default_value_t = 0)]
    seed: i64,

    /// Pause between turns, in milliseconds.
    #[arg(long, default_value_t = 0)]
    turn_delay_ms: u64,

    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let mut settings = Settings::new().context("failed to load settings")?;

    match cli.command {
        Command::Move => {
            let _logger = LoggerManager::setup(&settings, ConsoleTarget::Stderr);
            run_move()
        }
        Command::Serve(args) => {
            if let Some(port) = args.port {
                settings.server.port = port;
            }
            let _logger = LoggerManager::setup(&settings, ConsoleTarget::Stdout);
            run_serve(&settings, args).await
        }
    }
}

fn run_move() -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let summary = batch::run(stdin.lock(), stdout.lock()).context("turn computation failed")?;
    info!(
        processed = summary.processed,
        decode_failed = summary.decode_failed,
        "move input finished"
    );
    Ok(())
}

async fn run_serve(settings: &Settings, args: ServeArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("failed to read snapshot {}", args.snapshot.display()))?;
    let request: SnakeRequest = serde_json::from_str(&raw).context("failed to decode snapshot")?;

    let mut replay = Replay::from_request(&request, args.seed)?;
    let server = BoardServer::start(settings, replay.session())?;

    let turn_delay = (args.turn_delay_ms > 0).then(|| Duration::from_millis(args.turn_delay_ms));
    let input = BufReader::new(tokio::io::stdin());

    let outcome = match replay.drive(server.hub(), input, turn_delay).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "replay failed");
            server.stop().await;
            return Err(e.into());
        }
    };
    if let ReplayOutcome::MalformedInput { turn } = outcome {
        warn!(turn, "stopped reading moves at malformed input");
    }

    if let Err(e) = server.hub().end_game().await {
        warn!(error = %e, "failed to end game");
    }
    info!(?outcome, game_id = %server.game_id(), "game finished, press Ctrl-C to exit");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("ctrl-c received");
    server.stop().await;

    Ok(())
}
