use std::io;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::env::Settings;

pub mod completion;
pub mod env;
pub mod error;
pub mod hub;
pub mod protocol;
pub mod replay;
pub mod server;
pub mod subscriber;

pub use completion::{CompletionGroup, CompletionToken};
pub use error::{HubError, ProtocolViolation, ServerError, SubscriberError};
pub use hub::{HubHandle, HubState};
pub use protocol::{Envelope, EnvelopeKind, GameResponse, GameSession, SessionStatus};
pub use server::BoardServer;

/// Where console logs go. `move` writes its data to stdout, so it logs to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

pub struct LoggerManager {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

impl LoggerManager {
    pub fn setup(settings: &Settings, console: ConsoleTarget) -> Self {
        let file_appender = RollingFileAppender::new(
            Rotation::DAILY,
            &settings.logging.directory,
            &settings.logging.filename,
        );
        let (non_blocking_file_writer, guard) = tracing_appender::non_blocking(file_appender);

        // RUST_LOG wins over the configured level.
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&settings.server.log_level));

        let console_writer = match console {
            ConsoleTarget::Stdout => BoxMakeWriter::new(io::stdout),
            ConsoleTarget::Stderr => BoxMakeWriter::new(io::stderr),
        };
        let console_layer = fmt::layer()
            .with_writer(console_writer)
            .with_ansi(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .pretty();

        let file_layer = fmt::layer()
            .with_writer(non_blocking_file_writer)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .pretty();

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        tracing::info!(
            directory = %settings.logging.directory,
            filename = %settings.logging.filename,
            "logger initialized"
        );

        Self { _guard: guard }
    }
}
