use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Join point for the two background tasks behind a running board: the hub's
/// dispatch loop and the HTTP listener. `wait` resolves once both have
/// reported, and can be awaited any number of times from any clone.
#[derive(Clone)]
pub struct CompletionGroup {
    dispatch: CancellationToken,
    listener: CancellationToken,
}

/// One expected completion. Completing consumes the token; dropping it
/// without completing still counts, so a panicking task cannot wedge `wait`.
pub struct CompletionToken {
    label: &'static str,
    token: CancellationToken,
    completed: bool,
}

impl CompletionGroup {
    /// Returns the group with its `dispatch` and `listener` tokens.
    pub fn pair() -> (Self, CompletionToken, CompletionToken) {
        let dispatch = CancellationToken::new();
        let listener = CancellationToken::new();
        let group = Self {
            dispatch: dispatch.clone(),
            listener: listener.clone(),
        };
        (
            group,
            CompletionToken::new("dispatch", dispatch),
            CompletionToken::new("listener", listener),
        )
    }

    pub async fn wait(&self) {
        self.dispatch.cancelled().await;
        self.listener.cancelled().await;
    }

    pub fn is_complete(&self) -> bool {
        self.dispatch.is_cancelled() && self.listener.is_cancelled()
    }
}

impl CompletionToken {
    fn new(label: &'static str, token: CancellationToken) -> Self {
        Self {
            label,
            token,
            completed: false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn complete(mut self) {
        self.completed = true;
        debug!(task = self.label, "background task completed");
        self.token.cancel();
    }
}

impl Drop for CompletionToken {
    fn drop(&mut self) {
        if !self.completed {
            warn!(task = self.label, "completion token dropped before completing");
            self.token.cancel();
        }
    }
}
