//! The session context.
//!
//! One `SessionContext` owns everything mutable: the registry, who the
//! current user is, who the chatee is, the id serial, the connected flag and
//! the set of reply topics the model is listening on. Nothing is global, so a
//! test builds a fresh context and throws it away.
//!
//! ## Identity state machine
//!
//! ```text
//! ┌───────────┐   login()   ┌─────────────┐  userupdate  ┌─────────────┐
//! │ Anonymous ├────────────►│   Pending   ├─────────────►│  SignedIn   │
//! └─────▲─────┘             └──────┬──────┘              └──────┬──────┘
//!       │        logout()          │          logout()          │
//!       └──────────────────────────┴────────────────────────────┘
//! ```
//!
//! The operations themselves live next to their concern: login and logout in
//! [`crate::identity`], chatee and messaging in [`crate::chat`].

use std::collections::HashSet;

use spachat_proto::{AvatarStyle, Inbound, Topic};
use tracing::{debug, error, info};

use super::cid::ClientIdGenerator;
use super::person::{ClientId, Person};
use super::registry::{People, PersonRegistry};
use crate::bus::{EventBus, ModelEvent};
use crate::config::Config;
use crate::error::ModelResult;
use crate::telemetry::spans;
use crate::transport::Transport;

/// Who the current user is.
///
/// Pending and signed-in users live in the registry under the id held here.
/// The anonymous placeholder is owned by the context itself, so it stays the
/// current user even after a roster resync has cleared it from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Not signed in.
    Anonymous,
    /// Login sent, waiting for `userupdate`.
    Pending(ClientId),
    /// Confirmed by the backend; the id is the server id.
    SignedIn(ClientId),
}

impl Identity {
    /// Registry id of a non-anonymous user.
    pub fn client_id(&self) -> Option<&str> {
        match self {
            Identity::Anonymous => None,
            Identity::Pending(id) | Identity::SignedIn(id) => Some(id),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Identity::Pending(_))
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, Identity::SignedIn(_))
    }
}

/// Owner of the registry and all session state.
pub struct SessionContext<B, T> {
    pub(crate) config: Config,
    pub(crate) registry: PersonRegistry,
    pub(crate) anonymous: Person,
    pub(crate) identity: Identity,
    pub(crate) chatee: Option<ClientId>,
    pub(crate) cid_gen: ClientIdGenerator,
    pub(crate) connected: bool,
    pub(crate) listeners: HashSet<Topic>,
    pub(crate) bus: B,
    pub(crate) transport: T,
}

impl<B: EventBus, T: Transport> SessionContext<B, T> {
    /// Build the anonymous placeholder and start a session with it as the
    /// current user.
    ///
    /// This is the only constructor, so every context is bootstrapped
    /// exactly once.
    pub fn bootstrap(config: Config, bus: B, transport: T) -> ModelResult<Self> {
        let identity = &config.identity;
        let anonymous = Person::confirmed(
            identity.anon_id.clone(),
            identity.anon_name.clone(),
            AvatarStyle::default(),
        )?;

        let cid_gen = ClientIdGenerator::new(identity.client_id_prefix.clone());
        let mut registry = PersonRegistry::new(anonymous.client_id.clone());
        registry.insert(anonymous.clone())?;

        info!(anon_id = %anonymous.client_id, "session bootstrapped");

        Ok(Self {
            config,
            registry,
            anonymous,
            identity: Identity::Anonymous,
            chatee: None,
            cid_gen,
            connected: false,
            listeners: HashSet::new(),
            bus,
            transport,
        })
    }

    /// The current user; the anonymous placeholder when nobody is signed in.
    pub fn current_user(&self) -> &Person {
        match self.identity.client_id() {
            None => &self.anonymous,
            Some(id) => match self.registry.get_by_client_id(id) {
                Some(person) => person,
                None => {
                    error!(client_id = %id, "current user missing from registry");
                    &self.anonymous
                }
            },
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// True if `person` is the current user.
    pub fn is_user(&self, person: &Person) -> bool {
        person.client_id == self.current_user().client_id
    }

    /// True if `person` is the anonymous placeholder.
    pub fn is_anonymous(&self, person: &Person) -> bool {
        person.client_id == self.anonymous.client_id
    }

    pub fn get_by_client_id(&self, client_id: &str) -> Option<&Person> {
        self.registry.get_by_client_id(client_id)
    }

    /// Everyone in the registry, in presentation order.
    pub fn all(&self) -> People<'_> {
        self.registry.all()
    }

    pub fn registry(&self) -> &PersonRegistry {
        &self.registry
    }

    /// True between a successful `join` and the next `leave`/`logout`.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// True if replies on `topic` will be handled by [`dispatch`](Self::dispatch).
    pub fn is_listening(&self, topic: Topic) -> bool {
        self.listeners.contains(&topic)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Hand a backend reply to the handler registered for its topic.
    ///
    /// Returns `Ok(false)` when nothing is listening on the topic. Handler
    /// errors are returned as-is and leave the session unchanged.
    pub fn dispatch(&mut self, inbound: Inbound) -> ModelResult<bool> {
        let topic = inbound.topic();
        if !self.listeners.contains(&topic) {
            debug!(%topic, "no listener registered, reply ignored");
            return Ok(false);
        }

        let _span = spans::reply(topic).entered();
        match inbound {
            Inbound::UserUpdate(records) => self.complete_login(&records)?,
            Inbound::ListChange(roster) => self.apply_roster(roster),
            Inbound::UpdateChat(message) => self.receive_message(message),
        }
        Ok(true)
    }

    /// Decode a JSON frame and [`dispatch`](Self::dispatch) it.
    pub fn dispatch_frame(&mut self, frame: &str) -> ModelResult<bool> {
        let inbound = Inbound::decode(frame)?;
        self.dispatch(inbound)
    }

    pub(crate) fn publish(&mut self, event: ModelEvent) {
        self.bus.publish(&event);
    }

    pub(crate) fn listen(&mut self, topic: Topic) {
        if self.listeners.insert(topic) {
            self.transport.on(topic);
        }
    }

    pub(crate) fn unlisten(&mut self, topic: Topic) {
        self.listeners.remove(&topic);
    }
}
