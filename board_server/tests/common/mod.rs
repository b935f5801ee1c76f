#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Once;
use std::time::Duration;

use async_tungstenite::tungstenite::{self, Message};
use board_server::{env::Settings, protocol::Envelope};
use futures::{SinkExt, StreamExt};
use snake_engine::Frame;
use tracing::info;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub fn setup_logger() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Ephemeral port and short timers.
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.server.port = 0;
    settings.server.shutdown_timeout_seconds = 5;
    settings.hub.retry_interval_ms = 10;
    settings.subscriber.write_timeout_seconds = 2;
    settings
}

pub fn frame(turn: i32) -> Frame {
    Frame {
        snakes: Vec::new(),
        turn,
        food: Vec::new(),
        hazards: Vec::new(),
    }
}

pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

type Stream = async_tungstenite::WebSocketStream<
    async_tungstenite::tokio::TokioAdapter<tokio::net::TcpStream>,
>;

pub struct WebSocketTest {
    pub stream: futures::stream::SplitStream<Stream>,
    pub sink: futures::stream::SplitSink<Stream, Message>,
}

impl WebSocketTest {
    pub async fn connect(addr: SocketAddr, path: &str) -> Result<Self, tungstenite::Error> {
        let url = format!("ws://{}{}", addr, path);
        let (ws_stream, response) = async_tungstenite::tokio::connect_async(url).await?;
        assert_eq!(
            response.status(),
            tungstenite::http::StatusCode::SWITCHING_PROTOCOLS
        );

        let (sink, stream) = ws_stream.split();
        Ok(Self { stream, sink })
    }

    pub async fn close(&mut self) -> Result<(), tungstenite::Error> {
        self.sink.send(Message::Close(None)).await?;
        self.sink.close().await
    }

    /// Next envelope; panics on close or timeout.
    pub async fn expect_envelope(&mut self) -> Envelope<Frame> {
        let next = async {
            loop {
                match self.stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        info!("[TEST] Received message: {}", text);
                        return serde_json::from_str::<Envelope<Frame>>(&text)
                            .expect("Failed to parse envelope");
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                    Some(Ok(Message::Close(reason))) => {
                        panic!("WebSocket closed unexpectedly. Reason: {:?}", reason)
                    }
                    Some(Ok(msg)) => {
                        info!("[TEST] Ignoring other message type: {:?}", msg);
                        continue;
                    }
                    Some(Err(e)) => panic!("WebSocket error: {:?}", e),
                    None => panic!("WebSocket closed unexpectedly"),
                }
            }
        };

        tokio::time::timeout(MESSAGE_TIMEOUT, next)
            .await
            .expect("Expected envelope timeout")
    }

    /// Waits for the server to close; panics if another envelope shows up first.
    pub async fn expect_close(&mut self) {
        let closed = async {
            loop {
                match self.stream.next().await {
                    Some(Ok(Message::Close(_))) | None => return,
                    Some(Ok(Message::Text(text))) => {
                        panic!("Unexpected message before close: {}", text)
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(_)) => return,
                }
            }
        };

        tokio::time::timeout(MESSAGE_TIMEOUT, closed)
            .await
            .expect("Expected close timeout")
    }
}
