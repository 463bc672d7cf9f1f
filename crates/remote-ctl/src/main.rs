//! PC Remote command-line client — entry point.
//!
//! Drives a PC Remote server from the terminal: one invocation opens a
//! WebSocket session, performs its command, and disconnects.  `screen
//! watch` keeps the session open and streams mirrored frames until a frame
//! limit is reached or Ctrl+C is pressed.
//!
//! # Usage
//!
//! ```text
//! remote-ctl --server <HOST:PORT> <COMMAND>
//!
//! Commands:
//!   media   <previous|next|play_pause|mute>     Media playback control
//!   input   mouse-move --dx <N> --dy <N>        Relative pointer move
//!   input   mouse-click [--button left|right]   Pointer click
//!   system  <lock|sleep|restart|shutdown>       System power control
//!   file    send <PATH>                         Send a file to the PC
//!   screen  watch [--frames N] [--save DIR]     Stream mirrored frames
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable                 | Default | Description                        |
//! |--------------------------|---------|------------------------------------|
//! | `REMOTE_SERVER`          | —       | Server address as `host:port`      |
//! | `REMOTE_CONNECT_TIMEOUT` | `5`     | Connection attempt timeout (secs)  |
//!
//! Log output is controlled by `RUST_LOG` (e.g. `RUST_LOG=debug`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use remote_core::{
    Endpoint, FileAction, ImageFormat, InputAction, MediaAction, MouseButton, ScreenAction,
    SystemAction,
};
use remote_session::{
    CommandDispatcher, EventStream, Session, SessionConfig, SessionEvent,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// PC Remote command-line client.
#[derive(Debug, Parser)]
#[command(
    name = "remote-ctl",
    about = "Drive a PC Remote server: media, input, system, file, and screen commands",
    version
)]
struct Cli {
    /// Server address as `host:port`.
    #[arg(long, env = "REMOTE_SERVER")]
    server: Endpoint,

    /// Connection attempt timeout in seconds.
    #[arg(long, default_value_t = 5, env = "REMOTE_CONNECT_TIMEOUT")]
    connect_timeout: u64,

    #[command(subcommand)]
    command: RemoteCommand,
}

#[derive(Debug, Subcommand)]
enum RemoteCommand {
    /// Media playback control.
    Media {
        /// One of: previous, next, play_pause, mute.
        action: MediaAction,
    },
    /// Pointer input.
    Input {
        #[command(subcommand)]
        action: InputCommand,
    },
    /// System power and lock control.
    System {
        /// One of: lock, sleep, restart, shutdown.
        action: SystemAction,
    },
    /// File transfer to the PC.
    File {
        #[command(subcommand)]
        action: FileCommand,
    },
    /// Screen mirroring.
    Screen {
        #[command(subcommand)]
        action: ScreenCommand,
    },
}

#[derive(Debug, Subcommand)]
enum InputCommand {
    /// Move the pointer by a relative delta.
    MouseMove {
        /// Horizontal delta in pixels (negative is left).
        #[arg(long, allow_hyphen_values = true)]
        dx: i32,
        /// Vertical delta in pixels (negative is up).
        #[arg(long, allow_hyphen_values = true)]
        dy: i32,
    },
    /// Click a pointer button.
    MouseClick {
        /// Button to click: left or right.
        #[arg(long, default_value = "left")]
        button: MouseButton,
    },
}

#[derive(Debug, Subcommand)]
enum FileCommand {
    /// Send a local file to the PC.
    Send {
        /// Path of the file to send.
        path: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum ScreenCommand {
    /// Start mirroring and print (optionally save) incoming frames.
    Watch {
        /// Stop after this many frames (default: until Ctrl+C).
        #[arg(long)]
        frames: Option<u64>,
        /// Directory to save frames into as numbered image files.
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let connect_timeout = Duration::from_secs(cli.connect_timeout);

    let session = Session::spawn(SessionConfig {
        connect_timeout,
        ..SessionConfig::default()
    });

    // Subscribe before connecting so the connection outcome event cannot be
    // missed.
    let (_, mut events) = session.subscribe();
    session
        .connect(cli.server.clone())
        .await
        .context("could not start connection attempt")?;
    await_connected(&mut events, connect_timeout + Duration::from_secs(1)).await?;
    info!(server = %cli.server, "session established");

    let dispatcher = CommandDispatcher::new(session.clone());
    let outcome = run_command(cli.command, &dispatcher, &mut events).await;

    // Disconnect even when the command failed, so the server sees an
    // orderly close instead of a dropped socket.
    if let Err(error) = session.disconnect().await {
        warn!(%error, "disconnect failed");
    }
    outcome
}

/// Waits for the pending connection attempt to resolve.
async fn await_connected(events: &mut EventStream, limit: Duration) -> anyhow::Result<()> {
    let event = tokio::time::timeout(limit, events.next())
        .await
        .context("timed out waiting for the connection to resolve")?;
    match event {
        Some(SessionEvent::ConnectionOpened) => Ok(()),
        Some(SessionEvent::ConnectionFailed { cause }) => bail!("connection failed: {cause}"),
        Some(other) => bail!("unexpected session event while connecting: {other:?}"),
        None => bail!("session terminated before the connection resolved"),
    }
}

async fn run_command(
    command: RemoteCommand,
    dispatcher: &CommandDispatcher,
    events: &mut EventStream,
) -> anyhow::Result<()> {
    match command {
        RemoteCommand::Media { action } => {
            let id = dispatcher.send_media(action).await?;
            info!(id, token = action.token(), "media command sent");
        }
        RemoteCommand::Input { action } => {
            let input = match action {
                InputCommand::MouseMove { dx, dy } => InputAction::MouseMove {
                    delta_x: dx,
                    delta_y: dy,
                },
                InputCommand::MouseClick { button } => InputAction::MouseClick { button },
            };
            let id = dispatcher.send_input(input).await?;
            info!(id, token = input.token(), "input command sent");
        }
        RemoteCommand::System { action } => {
            let id = dispatcher.send_system(action).await?;
            info!(id, token = action.token(), "system command sent");
        }
        RemoteCommand::File {
            action: FileCommand::Send { path },
        } => {
            let contents = tokio::fs::read(&path)
                .await
                .with_context(|| format!("could not read {}", path.display()))?;
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .with_context(|| format!("{} has no usable file name", path.display()))?
                .to_string();
            let size = contents.len();
            let id = dispatcher
                .send_file(&FileAction::Receive { filename, contents })
                .await?;
            info!(id, size, "file sent");
        }
        RemoteCommand::Screen {
            action: ScreenCommand::Watch { frames, save },
        } => {
            watch_screen(dispatcher, events, frames, save.as_deref()).await?;
        }
    }
    Ok(())
}

/// Streams mirrored frames until the limit is reached, the server closes
/// the session, or Ctrl+C is pressed.
async fn watch_screen(
    dispatcher: &CommandDispatcher,
    events: &mut EventStream,
    limit: Option<u64>,
    save_dir: Option<&Path>,
) -> anyhow::Result<()> {
    if let Some(dir) = save_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("could not create {}", dir.display()))?;
    }

    dispatcher.send_screen(ScreenAction::Start).await?;
    info!("mirroring started");

    let mut received: u64 = 0;
    loop {
        tokio::select! {
            event = events.next() => match event {
                Some(SessionEvent::ScreenFrame(frame)) => {
                    received += 1;
                    info!(
                        frame = received,
                        format = ?frame.format,
                        bytes = frame.data.len(),
                        "frame received"
                    );
                    if let Some(dir) = save_dir {
                        let name = format!("frame_{received:05}.{}", extension(frame.format));
                        let path = dir.join(name);
                        tokio::fs::write(&path, &frame.data)
                            .await
                            .with_context(|| format!("could not write {}", path.display()))?;
                    }
                    if limit.is_some_and(|n| received >= n) {
                        break;
                    }
                }
                Some(SessionEvent::ConnectionClosed { code, reason }) => {
                    info!(code, %reason, "session closed by the server");
                    return Ok(());
                }
                Some(SessionEvent::ConnectionFailed { cause }) => {
                    bail!("session lost while mirroring: {cause}");
                }
                Some(SessionEvent::ConnectionOpened) => {}
                None => bail!("session terminated while mirroring"),
            },
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping mirroring");
                break;
            }
        }
    }

    dispatcher.send_screen(ScreenAction::Stop).await?;
    info!(frames = received, "mirroring stopped");
    Ok(())
}

/// File extension for a saved frame.
fn extension(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpg",
        ImageFormat::Png => "png",
        ImageFormat::Gif => "gif",
        ImageFormat::Bmp => "bmp",
        ImageFormat::WebP => "webp",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
