//! The network seam.
//!
//! The model emits [`Intent`]s and announces which reply topics it wants via
//! [`Transport::on`]. Replies are not pushed into the model by the transport;
//! whoever owns the socket hands them to
//! [`SessionContext::dispatch`](crate::state::SessionContext::dispatch).

use std::collections::{HashSet, VecDeque};

use spachat_proto::{Intent, Topic};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Bidirectional event channel to the backend.
pub trait Transport {
    /// Send an intent. Never blocks.
    fn emit(&mut self, intent: Intent);

    /// The model is now interested in replies on `topic`.
    fn on(&mut self, topic: Topic) {
        let _ = topic;
    }
}

/// Buffers intents in memory until the owner drains them.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    outbox: VecDeque<Intent>,
    listening: HashSet<Topic>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every intent emitted so far, oldest first.
    pub fn drain(&mut self) -> Vec<Intent> {
        self.outbox.drain(..).collect()
    }

    /// Intents emitted and not yet drained.
    pub fn pending(&self) -> impl Iterator<Item = &Intent> {
        self.outbox.iter()
    }

    pub fn is_listening(&self, topic: Topic) -> bool {
        self.listening.contains(&topic)
    }
}

impl Transport for MemoryTransport {
    fn emit(&mut self, intent: Intent) {
        self.outbox.push_back(intent);
    }

    fn on(&mut self, topic: Topic) {
        self.listening.insert(topic);
    }
}

/// Forwards intents onto a bounded tokio channel.
///
/// Emission uses `try_send` so the model never waits on the network. A full
/// or closed channel drops the intent with a warning.
#[derive(Debug)]
pub struct ChannelTransport {
    tx: mpsc::Sender<Intent>,
}

impl ChannelTransport {
    /// Create a transport and the receiver the network task reads from.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Intent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// True once the receiving side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Transport for ChannelTransport {
    fn emit(&mut self, intent: Intent) {
        let topic = intent.topic();
        match self.tx.try_send(intent) {
            Ok(()) => debug!(%topic, "intent queued"),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(%topic, "transport queue full, intent dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(%topic, "transport closed, intent dropped");
            }
        }
    }

    fn on(&mut self, topic: Topic) {
        debug!(%topic, "listening");
    }
}
