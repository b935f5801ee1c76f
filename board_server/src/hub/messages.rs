use std::fmt;
use std::sync::Arc;

use actix::Message;
use snake_engine::Frame;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::error::HubResult;
use crate::protocol::GameSession;

use super::HubState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receiving side of one registration. The hub pushes into `frames` and
/// closes it once the game is over and the backlog is delivered; the
/// subscriber cancels `done` when it is finished with the connection.
/// Dropping the handle cancels `done` as well, so a subscriber task that
/// dies early still releases its hub slot.
pub struct SubscriberHandle {
    pub id: SubscriberId,
    pub frames: mpsc::Receiver<Arc<Frame>>,
    pub done: CancellationToken,
    _release: DropGuard,
}

impl SubscriberHandle {
    pub(crate) fn new(
        id: SubscriberId,
        frames: mpsc::Receiver<Arc<Frame>>,
        done: CancellationToken,
    ) -> Self {
        Self {
            id,
            frames,
            _release: done.clone().drop_guard(),
            done,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameInfo {
    pub session: GameSession,
    pub last_frame: Option<Arc<Frame>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubStatus {
    pub state: HubState,
    pub frames: usize,
    pub subscribers: usize,
}

#[derive(Message)]
#[rtype(result = "HubResult<()>")]
pub struct Ingest {
    pub frame: Frame,
}

#[derive(Message)]
#[rtype(result = "HubResult<()>")]
pub struct EndGame;

#[derive(Message)]
#[rtype(result = "HubResult<SubscriberHandle>")]
pub struct RegisterSubscriber;

#[derive(Message)]
#[rtype(result = "HubResult<GameInfo>")]
pub struct GetGameInfo;

#[derive(Message)]
#[rtype(result = "HubResult<HubStatus>")]
pub struct GetStatus;

#[derive(Message)]
#[rtype(result = "HubResult<()>")]
pub struct RequestShutdown;
