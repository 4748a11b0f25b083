//! Scripted backend for integration tests.

use super::{TestContext, record};
use spachat_proto::{ChatMessage, Inbound, Intent, PersonRecord};

/// Answers intents the way the chat server does, one reply batch per call
/// to [`ScriptedBackend::pump`].
pub struct ScriptedBackend {
    pub roster: Vec<PersonRecord>,
    pub received: Vec<Intent>,
    next_id: u64,
}

#[allow(dead_code)]
impl ScriptedBackend {
    /// Backend with Betty (u1) and Mike (u2) online.
    pub fn new() -> Self {
        Self {
            roster: vec![record("u1", "Betty"), record("u2", "Mike")],
            received: Vec::new(),
            next_id: 42,
        }
    }

    /// Drain the context's outgoing intents and dispatch the replies.
    /// Returns how many replies the model handled.
    pub fn pump(&mut self, ctx: &mut TestContext) -> usize {
        let mut handled = 0;
        loop {
            let intents = ctx.transport_mut().drain();
            if intents.is_empty() {
                return handled;
            }
            for intent in intents {
                for reply in self.reply_to(&intent) {
                    if ctx.dispatch(reply).expect("backend reply accepted") {
                        handled += 1;
                    }
                }
                self.received.push(intent);
            }
        }
    }

    fn reply_to(&mut self, intent: &Intent) -> Vec<Inbound> {
        match intent {
            Intent::AddUser(add) => {
                let id = format!("u{}", self.next_id);
                self.next_id += 1;
                let confirmed = PersonRecord {
                    id: Some(id),
                    cid: Some(add.cid.clone()),
                    name: Some(add.name.clone()),
                    css_map: Some(add.css_map.clone()),
                };
                self.roster.push(confirmed.clone());
                vec![Inbound::UserUpdate(vec![confirmed])]
            }
            Intent::JoinChat(_) => vec![Inbound::ListChange(self.roster.clone())],
            Intent::UpdateAvatar(update) => {
                for entry in &mut self.roster {
                    if entry.id.as_deref() == Some(update.person_id.as_str()) {
                        entry.css_map = Some(update.css_map.clone());
                    }
                }
                vec![Inbound::ListChange(self.roster.clone())]
            }
            Intent::UpdateChat(_) | Intent::LeaveChat => Vec::new(),
        }
    }

    /// Push an unsolicited message from `from` to `to`.
    pub fn say(&self, ctx: &mut TestContext, from: &str, to: &str, text: &str) -> bool {
        ctx.dispatch(Inbound::UpdateChat(ChatMessage {
            dest_id: to.into(),
            dest_name: String::new(),
            sender_id: from.into(),
            msg_text: text.into(),
        }))
        .expect("message accepted")
    }

    /// Take `id` off the roster and broadcast the new list.
    pub fn drop_person(&mut self, ctx: &mut TestContext, id: &str) -> bool {
        self.roster.retain(|r| r.id.as_deref() != Some(id));
        ctx.dispatch(Inbound::ListChange(self.roster.clone()))
            .expect("roster accepted")
    }
}
