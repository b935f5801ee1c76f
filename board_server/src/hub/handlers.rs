use std::sync::Arc;

use actix::{Context, Handler};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{HubResult, ProtocolViolation};
use crate::hub::{
    messages::{
        EndGame, GameInfo, GetGameInfo, GetStatus, HubStatus, Ingest, RegisterSubscriber,
        RequestShutdown, SubscriberHandle, SubscriberId,
    },
    FrameHub, HubState, SubscriberSlot,
};
use crate::protocol::SessionStatus;

impl Handler<Ingest> for FrameHub {
    type Result = HubResult<()>;

    fn handle(&mut self, msg: Ingest, ctx: &mut Context<Self>) -> Self::Result {
        if self.state != HubState::Running {
            warn!(turn = msg.frame.turn, "frame ingested after game end");
            return Err(ProtocolViolation::IngestAfterEnd.into());
        }

        let expected = self.frames.len() as i32;
        if msg.frame.turn != expected {
            warn!(expected, got = msg.frame.turn, "frame turn out of sequence");
            return Err(ProtocolViolation::TurnMismatch {
                expected,
                got: msg.frame.turn,
            }
            .into());
        }

        debug!(turn = msg.frame.turn, "frame ingested");
        self.frames.push(Arc::new(msg.frame));
        self.dispatch(ctx);
        Ok(())
    }
}

impl Handler<EndGame> for FrameHub {
    type Result = HubResult<()>;

    fn handle(&mut self, _msg: EndGame, ctx: &mut Context<Self>) -> Self::Result {
        if self.state != HubState::Running {
            return Err(ProtocolViolation::AlreadyEnded.into());
        }

        info!(
            game_id = %self.session.id,
            frames = self.frames.len(),
            subscribers = self.subscribers.len(),
            "game ended, draining subscribers"
        );
        self.state = HubState::Draining;
        self.session.status = SessionStatus::Ended;
        self.dispatch(ctx);
        Ok(())
    }
}

impl Handler<RegisterSubscriber> for FrameHub {
    type Result = HubResult<SubscriberHandle>;

    fn handle(&mut self, _msg: RegisterSubscriber, ctx: &mut Context<Self>) -> Self::Result {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let done = CancellationToken::new();
        self.subscribers.insert(
            id,
            SubscriberSlot {
                outbound: Some(tx),
                cursor: 0,
                done: done.clone(),
            },
        );
        info!(subscriber_id = %id, state = ?self.state, "subscriber registered");

        self.dispatch(ctx);
        Ok(SubscriberHandle::new(id, rx, done))
    }
}

impl Handler<GetGameInfo> for FrameHub {
    type Result = HubResult<GameInfo>;

    fn handle(&mut self, _msg: GetGameInfo, _ctx: &mut Context<Self>) -> Self::Result {
        Ok(GameInfo {
            session: self.session.clone(),
            last_frame: self.frames.last().cloned(),
        })
    }
}

impl Handler<GetStatus> for FrameHub {
    type Result = HubResult<HubStatus>;

    fn handle(&mut self, _msg: GetStatus, _ctx: &mut Context<Self>) -> Self::Result {
        Ok(HubStatus {
            state: self.state,
            frames: self.frames.len(),
            subscribers: self.subscribers.len(),
        })
    }
}

impl Handler<RequestShutdown> for FrameHub {
    type Result = HubResult<()>;

    fn handle(&mut self, _msg: RequestShutdown, ctx: &mut Context<Self>) -> Self::Result {
        debug!(state = ?self.state, "hub shutdown requested");
        self.shutdown_requested = true;
        self.dispatch(ctx);
        Ok(())
    }
}
