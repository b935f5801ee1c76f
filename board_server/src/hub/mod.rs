use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use actix::{Actor, ActorContext, Addr, AsyncContext, Context};
use snake_engine::Frame;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::completion::CompletionToken;
use crate::env::HubSettings;
use crate::error::HubResult;
use crate::protocol::GameSession;

pub mod handlers;
pub mod messages;

use messages::{
    EndGame, GameInfo, GetGameInfo, GetStatus, HubStatus, Ingest, RegisterSubscriber,
    RequestShutdown, SubscriberHandle, SubscriberId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubState {
    /// Accepting frames.
    Running,
    /// Game over; subscribers are still being caught up.
    Draining,
    Stopped,
}

pub(crate) struct SubscriberSlot {
    /// Dropped once the subscriber has every frame of a finished game.
    pub(crate) outbound: Option<mpsc::Sender<Arc<Frame>>>,
    /// Index of the next frame to hand over.
    pub(crate) cursor: usize,
    pub(crate) done: CancellationToken,
}

/// Owns the frame history of one game and fans it out to every viewer.
///
/// Each subscriber gets a bounded queue and a cursor into the history. A full
/// queue never blocks the hub; the slot is retried on the next tick and
/// resumes from its cursor, so every viewer sees every frame in order.
pub struct FrameHub {
    pub(crate) session: GameSession,
    pub(crate) state: HubState,
    pub(crate) frames: Vec<Arc<Frame>>,
    pub(crate) subscribers: HashMap<SubscriberId, SubscriberSlot>,
    pub(crate) next_subscriber_id: u64,
    pub(crate) queue_capacity: usize,
    retry_interval: Duration,
    pub(crate) shutdown_requested: bool,
    completion: Option<CompletionToken>,
}

impl FrameHub {
    pub fn new(session: GameSession, settings: &HubSettings, completion: CompletionToken) -> Self {
        Self {
            session,
            state: HubState::Running,
            frames: Vec::new(),
            subscribers: HashMap::new(),
            next_subscriber_id: 1,
            queue_capacity: settings.subscriber_queue_capacity.max(1),
            retry_interval: settings.retry_interval(),
            shutdown_requested: false,
            completion: Some(completion),
        }
    }

    pub(crate) fn dispatch(&mut self, ctx: &mut Context<Self>) {
        let frames = &self.frames;
        let draining = self.state != HubState::Running;

        self.subscribers.retain(|id, slot| {
            if slot.done.is_cancelled() {
                debug!(subscriber_id = %id, "subscriber finished");
                return false;
            }

            if let Some(outbound) = slot.outbound.as_ref() {
                while slot.cursor < frames.len() {
                    match outbound.try_send(frames[slot.cursor].clone()) {
                        Ok(()) => slot.cursor += 1,
                        Err(TrySendError::Full(_)) => break,
                        Err(TrySendError::Closed(_)) => {
                            debug!(subscriber_id = %id, "subscriber queue closed");
                            return false;
                        }
                    }
                }
            }

            if draining && slot.cursor == frames.len() {
                slot.outbound = None;
            }
            true
        });

        if self.shutdown_requested && draining && self.subscribers.is_empty() {
            info!(game_id = %self.session.id, "all subscribers drained, stopping hub");
            self.state = HubState::Stopped;
            ctx.stop();
        }
    }
}

impl Actor for FrameHub {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(game_id = %self.session.id, "frame hub started");
        ctx.run_interval(self.retry_interval, |act, ctx| act.dispatch(ctx));
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.state = HubState::Stopped;
        if let Some(completion) = self.completion.take() {
            completion.complete();
        }
    }
}

/// Cloneable front for the hub actor.
#[derive(Clone)]
pub struct HubHandle {
    addr: Addr<FrameHub>,
}

impl HubHandle {
    pub fn start(
        session: GameSession,
        settings: &HubSettings,
        completion: CompletionToken,
    ) -> Self {
        let addr = FrameHub::new(session, settings, completion).start();
        Self { addr }
    }

    pub async fn ingest(&self, frame: Frame) -> HubResult<()> {
        self.addr.send(Ingest { frame }).await?
    }

    pub async fn end_game(&self) -> HubResult<()> {
        self.addr.send(EndGame).await?
    }

    pub async fn register_subscriber(&self) -> HubResult<SubscriberHandle> {
        self.addr.send(RegisterSubscriber).await?
    }

    pub async fn game_info(&self) -> HubResult<GameInfo> {
        self.addr.send(GetGameInfo).await?
    }

    pub async fn status(&self) -> HubResult<HubStatus> {
        self.addr.send(GetStatus).await?
    }

    pub async fn request_shutdown(&self) -> HubResult<()> {
        self.addr.send(RequestShutdown).await?
    }
}
