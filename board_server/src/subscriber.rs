use std::sync::Arc;
use std::time::Duration;

use actix_ws::{CloseCode, CloseReason, Message, MessageStream, Session};
use futures_util::StreamExt;
use snake_engine::Frame;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::SubscriberError;
use crate::hub::messages::{SubscriberHandle, SubscriberId};
use crate::protocol::FrameEnvelope;

/// One viewer connection: relays frames from its hub queue onto the socket.
pub struct Subscriber {
    handle: SubscriberHandle,
    session: Session,
    write_timeout: Duration,
}

impl Subscriber {
    pub fn new(handle: SubscriberHandle, session: Session, write_timeout: Duration) -> Self {
        Self {
            handle,
            session,
            write_timeout,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.handle.id
    }

    /// Starts the peer watcher and the delivery task on the current worker.
    pub fn spawn(self, stream: MessageStream) {
        let closed = CancellationToken::new();
        watch_peer(
            self.handle.id,
            self.session.clone(),
            stream,
            self.handle.done.clone(),
            closed.clone(),
        );
        actix_web::rt::spawn(self.run(closed));
    }

    async fn run(mut self, closed: CancellationToken) {
        let id = self.handle.id;
        let done = self.handle.done.clone();

        let close_result = match self.stream_frames(&closed).await {
            Ok(()) => {
                info!(subscriber_id = %id, "game end delivered, closing viewer");
                self.session
                    .close(Some(CloseReason {
                        code: CloseCode::Normal,
                        description: None,
                    }))
                    .await
            }
            Err(err) => {
                warn!(subscriber_id = %id, error = %err, "viewer stream aborted");
                self.session.close(None).await
            }
        };
        if close_result.is_err() {
            debug!(subscriber_id = %id, "viewer session already closed");
        }

        done.cancel();
    }

    async fn stream_frames(&mut self, closed: &CancellationToken) -> Result<(), SubscriberError> {
        let mut last: Option<Arc<Frame>> = None;

        loop {
            let next = tokio::select! {
                _ = closed.cancelled() => return Err(SubscriberError::PeerClosed),
                next = self.handle.frames.recv() => next,
            };

            match next {
                Some(frame) => {
                    self.send(&FrameEnvelope::frame(frame.as_ref())).await?;
                    last = Some(frame);
                }
                None => {
                    self.send(&FrameEnvelope::game_end(last.as_deref())).await?;
                    return Ok(());
                }
            }
        }
    }

    async fn send(&mut self, envelope: &FrameEnvelope<'_>) -> Result<(), SubscriberError> {
        let text = serde_json::to_string(envelope)?;
        match tokio::time::timeout(self.write_timeout, self.session.text(text)).await {
            Ok(sent) => sent.map_err(SubscriberError::from),
            Err(_) => Err(SubscriberError::WriteTimeout {
                seconds: self.write_timeout.as_secs(),
            }),
        }
    }
}

/// Drains inbound traffic to notice the peer going away. The stream is
/// one-way, so anything but a ping is discarded.
fn watch_peer(
    id: SubscriberId,
    mut session: Session,
    mut stream: MessageStream,
    done: CancellationToken,
    closed: CancellationToken,
) {
    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                _ = done.cancelled() => break,
                msg = stream.next() => match msg {
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(reason))) => {
                        debug!(subscriber_id = %id, ?reason, "viewer sent close");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        debug!(subscriber_id = %id, error = %err, "viewer stream error");
                        break;
                    }
                    None => break,
                },
            }
        }
        closed.cancel();
    });
}
