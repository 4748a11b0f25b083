//! Chat room membership, chatee selection and messaging.

use spachat_proto::{AvatarStyle, AvatarUpdate, ChatMessage, Intent, JoinChat, PersonRecord, Topic};
use tracing::{debug, info, warn};

use crate::bus::{EventBus, ModelEvent};
use crate::error::ModelError;
use crate::state::{ClientId, Identity, Person, SessionContext};
use crate::telemetry::spans;
use crate::transport::Transport;

impl<B: EventBus, T: Transport> SessionContext<B, T> {
    /// The person the current user is chatting with.
    pub fn get_chatee(&self) -> Option<&Person> {
        self.chatee
            .as_deref()
            .and_then(|id| self.registry.get_by_client_id(id))
    }

    /// Point the chat at `person_id`.
    ///
    /// An id not in the registry clears the chatee. Returns `false` without
    /// publishing when the chatee would not change.
    pub fn set_chatee(&mut self, person_id: &str) -> bool {
        let new = self
            .registry
            .get_by_client_id(person_id)
            .map(|person| person.client_id.clone());
        self.change_chatee(new)
    }

    fn change_chatee(&mut self, new: Option<ClientId>) -> bool {
        if new == self.chatee {
            return false;
        }

        let old = self.get_chatee().cloned();
        self.chatee = new;
        let new = self.get_chatee().cloned();

        debug!(
            old = old.as_ref().map(Person::client_id),
            new = new.as_ref().map(Person::client_id),
            "chatee changed"
        );
        self.publish(ModelEvent::ChateeChanged { old, new });
        true
    }

    /// Enter the chat room.
    ///
    /// Refused (returns `false`, nothing sent) for the anonymous user or when
    /// already joined. Otherwise starts listening for roster and message
    /// replies and sends `joinchat`.
    pub fn join(&mut self) -> bool {
        if self.connected {
            debug!("already joined");
            return false;
        }
        if self.identity.is_anonymous() {
            warn!("user must be signed in before joining chat");
            return false;
        }

        let _span = spans::operation("join", self.current_user().client_id()).entered();
        self.listen(Topic::ListChange);
        self.listen(Topic::UpdateChat);
        self.transport.emit(Intent::JoinChat(JoinChat {
            room: self.config.chat.room.clone(),
        }));
        self.connected = true;

        info!(room = %self.config.chat.room, "joined chat");
        true
    }

    /// Leave the chat room and forget the chatee.
    ///
    /// Sends `leavechat` only if the room had been joined.
    pub fn leave(&mut self) {
        let was_connected = self.connected;
        self.chatee = None;
        self.connected = false;
        self.unlisten(Topic::ListChange);
        self.unlisten(Topic::UpdateChat);

        if was_connected {
            self.transport.emit(Intent::LeaveChat);
            info!("left chat");
        }
    }

    /// Send `text` to the chatee.
    ///
    /// Returns `false` with nothing sent if the user is anonymous or there is
    /// no chatee.
    pub fn send_message(&mut self, text: &str) -> bool {
        if self.identity.is_anonymous() {
            debug!("anonymous user cannot send messages");
            return false;
        }
        let Some(chatee) = self.get_chatee() else {
            debug!("no chatee, message not sent");
            return false;
        };

        let message = ChatMessage {
            dest_id: chatee.client_id.clone(),
            dest_name: chatee.display_name.clone(),
            sender_id: self.current_user().client_id.clone(),
            msg_text: text.to_string(),
        };
        let _span = spans::operation("send_message", &message.sender_id).entered();

        self.transport.emit(Intent::UpdateChat(message.clone()));
        debug!(dest_id = %message.dest_id, "message sent");
        self.publish(ModelEvent::MessageSent { message });
        true
    }

    /// Ask the backend to restyle `person_id`'s avatar.
    ///
    /// Nothing changes locally; the new style arrives with the next
    /// `listchange` roster.
    pub fn update_avatar(&mut self, person_id: &str, style: AvatarStyle) {
        debug!(person_id, "avatar update requested");
        self.transport.emit(Intent::UpdateAvatar(AvatarUpdate {
            person_id: person_id.to_string(),
            css_map: style,
        }));
    }

    /// Rebuild the registry from a `listchange` roster.
    ///
    /// The current user survives the rebuild and only has its style
    /// refreshed. Entries without a name are skipped. A chatee missing from
    /// the new roster is unset.
    pub(crate) fn apply_roster(&mut self, roster: Vec<PersonRecord>) {
        let me = match &self.identity {
            Identity::SignedIn(id) => Some(id.clone()),
            _ => None,
        };
        let previous_chatee = self.get_chatee().cloned();
        self.registry.clear(self.identity.client_id());

        for record in &roster {
            if record.display_name().is_none() {
                continue;
            }
            if let Some(me) = &me
                && record.server_id() == Some(me.as_str())
            {
                if let Some(style) = record.css_map.clone() {
                    self.registry.set_style(me, style);
                }
                continue;
            }

            match Person::from_record(record).and_then(|person| self.registry.insert(person)) {
                Ok(()) => {}
                Err(ModelError::DuplicateId(id)) => {
                    warn!(client_id = %id, "duplicate roster entry skipped");
                }
                Err(e) => warn!(error = %e, code = e.error_code(), "roster entry skipped"),
            }
        }

        if let Some(old) = previous_chatee
            && !self.registry.contains(&old.client_id)
        {
            info!(client_id = %old.client_id, "chatee went offline");
            self.chatee = None;
            self.publish(ModelEvent::ChateeChanged {
                old: Some(old),
                new: None,
            });
        }

        debug!(people = self.registry.len(), "roster applied");
        self.publish(ModelEvent::RosterChanged { roster });
    }

    /// Handle an incoming `updatechat` message.
    ///
    /// A message from someone other than the user or the current chatee
    /// switches the chatee to its sender.
    pub(crate) fn receive_message(&mut self, message: ChatMessage) {
        let sender = message.sender_id.as_str();
        let retarget = match &self.chatee {
            None => true,
            Some(chatee) => sender != chatee.as_str() && sender != self.current_user().client_id(),
        };
        if retarget {
            self.set_chatee(sender);
        }

        debug!(sender_id = %message.sender_id, "message received");
        self.publish(ModelEvent::MessageReceived { message });
    }
}
