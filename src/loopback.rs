//! In-process stand-in for the chat backend.
//!
//! Answers the model's intents the way the real server does: `adduser` is
//! confirmed with a fresh server id, `joinchat` and `updateavatar` produce a
//! roster, and every message gets a reply from its recipient.

use spachat_proto::{AvatarStyle, ChatMessage, Inbound, Intent, PersonRecord};
use tokio::sync::mpsc;
use tracing::{debug, info};

struct Backend {
    roster: Vec<PersonRecord>,
    next_id: u64,
    member: Option<String>,
}

impl Backend {
    fn new() -> Self {
        let peer = |id: &str, name: &str, top, left, color: &str| PersonRecord {
            id: Some(id.into()),
            cid: Some(id.into()),
            name: Some(name.into()),
            css_map: Some(AvatarStyle::new(top, left, color)),
        };
        Self {
            roster: vec![
                peer("u1", "Betty", 20, 20, "rgb(128, 128, 128)"),
                peer("u2", "Mike", 60, 20, "rgb(128, 255, 128)"),
            ],
            next_id: 100,
            member: None,
        }
    }

    fn handle(&mut self, intent: Intent) -> Vec<Inbound> {
        match intent {
            Intent::AddUser(add) => {
                let id = format!("u{}", self.next_id);
                self.next_id += 1;
                let record = PersonRecord {
                    id: Some(id.clone()),
                    cid: Some(add.cid),
                    name: Some(add.name),
                    css_map: Some(add.css_map),
                };
                self.roster.push(record.clone());
                self.member = Some(id);
                vec![Inbound::UserUpdate(vec![record])]
            }
            Intent::JoinChat(join) => {
                info!(room = %join.room, "member joined");
                vec![Inbound::ListChange(self.roster.clone())]
            }
            Intent::UpdateChat(msg) => vec![Inbound::UpdateChat(ChatMessage {
                dest_id: msg.sender_id,
                dest_name: String::new(),
                sender_id: msg.dest_id,
                msg_text: format!("Thanks for the note, you said \"{}\"", msg.msg_text),
            })],
            Intent::UpdateAvatar(update) => {
                if let Some(record) = self
                    .roster
                    .iter_mut()
                    .find(|r| r.id.as_deref() == Some(update.person_id.as_str()))
                {
                    record.css_map = Some(update.css_map);
                }
                vec![Inbound::ListChange(self.roster.clone())]
            }
            Intent::LeaveChat => {
                if let Some(id) = self.member.take() {
                    self.roster.retain(|r| r.id.as_deref() != Some(id.as_str()));
                }
                Vec::new()
            }
        }
    }
}

/// Serve intents until the model side drops its transport.
pub async fn run(mut intents: mpsc::Receiver<Intent>, replies: mpsc::Sender<Inbound>) {
    let mut backend = Backend::new();
    while let Some(intent) = intents.recv().await {
        debug!(topic = %intent.topic(), "backend received intent");
        for reply in backend.handle(intent) {
            if replies.send(reply).await.is_err() {
                return;
            }
        }
    }
    debug!("transport closed, backend stopping");
}
