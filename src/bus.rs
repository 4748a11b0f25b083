//! Model events and the publish/subscribe seam.
//!
//! The model publishes after each state change commits, so a subscriber
//! reading the context from inside its handler already sees the new state.
//! Events carry snapshots of the people involved.

use crate::state::Person;
use spachat_proto::{ChatMessage, PersonRecord};

/// Something observers may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// The backend confirmed a login; `user` is the now signed-in user.
    LoginCompleted { user: Person },
    /// The current user reverted to anonymous; `user` is who it was before.
    LogoutCompleted { user: Person },
    /// The chat target changed.
    ChateeChanged {
        old: Option<Person>,
        new: Option<Person>,
    },
    /// The registry was resynchronised from a backend roster.
    RosterChanged { roster: Vec<PersonRecord> },
    /// A message left through the transport.
    MessageSent { message: ChatMessage },
    /// A message arrived from the backend.
    MessageReceived { message: ChatMessage },
}

impl ModelEvent {
    /// Topic name observers subscribe to.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::LoginCompleted { .. } => "login-completed",
            Self::LogoutCompleted { .. } => "logout-completed",
            Self::ChateeChanged { .. } => "chatee-changed",
            Self::RosterChanged { .. } => "roster-changed",
            Self::MessageSent { .. } => "message-sent",
            Self::MessageReceived { .. } => "message-received",
        }
    }
}

/// Synchronous, ordered publish/subscribe.
pub trait EventBus {
    /// Deliver `event` to every interested subscriber before returning.
    fn publish(&mut self, event: &ModelEvent);
}

/// Records every event; handy for tests and replay.
impl EventBus for Vec<ModelEvent> {
    fn publish(&mut self, event: &ModelEvent) {
        self.push(event.clone());
    }
}

type Handler = Box<dyn FnMut(&ModelEvent)>;

/// In-process bus dispatching by topic, in subscription order.
#[derive(Default)]
pub struct Subscribers {
    handlers: Vec<(Option<&'static str>, Handler)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `handler` for every event published on `topic`.
    pub fn subscribe(&mut self, topic: &'static str, handler: impl FnMut(&ModelEvent) + 'static) {
        self.handlers.push((Some(topic), Box::new(handler)));
    }

    /// Call `handler` for every event.
    pub fn subscribe_all(&mut self, handler: impl FnMut(&ModelEvent) + 'static) {
        self.handlers.push((None, Box::new(handler)));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl EventBus for Subscribers {
    fn publish(&mut self, event: &ModelEvent) {
        let topic = event.topic();
        tracing::trace!(topic, "publishing model event");
        for (filter, handler) in &mut self.handlers {
            if filter.is_none_or(|t| t == topic) {
                handler(event);
            }
        }
    }
}
