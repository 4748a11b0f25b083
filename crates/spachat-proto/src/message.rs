//! Outgoing intents and incoming backend replies.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::style::AvatarStyle;
use crate::topic::Topic;

/// Payload of an `adduser` intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddUser {
    /// Client id of the pending login.
    pub cid: String,
    /// Requested avatar style.
    pub css_map: AvatarStyle,
    /// Requested display name.
    pub name: String,
}

/// Payload of a `joinchat` intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinChat {
    /// Room to enter.
    pub room: String,
}

/// A one-to-one chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Recipient id.
    pub dest_id: String,
    /// Recipient display name.
    pub dest_name: String,
    /// Sender id.
    pub sender_id: String,
    /// Message body.
    pub msg_text: String,
}

/// Payload of an `updateavatar` intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarUpdate {
    /// Person whose avatar changes.
    pub person_id: String,
    /// New style.
    pub css_map: AvatarStyle,
}

/// A person as reported by the backend in `userupdate` and `listchange`.
///
/// Every field is optional on the wire; the model decides which omissions
/// are protocol errors and which entries are merely skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Server-assigned id.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Client id echoed back from the originating `adduser`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_map: Option<AvatarStyle>,
}

impl PersonRecord {
    /// The server id, treating an empty string as absent.
    pub fn server_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// The display name, treating an empty string as absent.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Client → backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum Intent {
    /// Begin a login.
    AddUser(AddUser),
    /// Enter the chat room.
    JoinChat(JoinChat),
    /// Send a chat message.
    UpdateChat(ChatMessage),
    /// Change an avatar.
    UpdateAvatar(AvatarUpdate),
    /// Leave the chat room.
    LeaveChat,
}

impl Intent {
    /// Topic this intent is emitted on.
    pub fn topic(&self) -> Topic {
        match self {
            Intent::AddUser(_) => Topic::AddUser,
            Intent::JoinChat(_) => Topic::JoinChat,
            Intent::UpdateChat(_) => Topic::UpdateChat,
            Intent::UpdateAvatar(_) => Topic::UpdateAvatar,
            Intent::LeaveChat => Topic::LeaveChat,
        }
    }

    /// Serialize to a JSON frame.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a JSON frame.
    pub fn decode(frame: &str) -> Result<Self> {
        Ok(serde_json::from_str(frame)?)
    }
}

/// Backend → client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum Inbound {
    /// Login confirmation. The first record describes the confirmed user.
    UserUpdate(Vec<PersonRecord>),
    /// Full roster of people currently online.
    ListChange(Vec<PersonRecord>),
    /// An incoming chat message.
    UpdateChat(ChatMessage),
}

impl Inbound {
    /// Topic this reply arrives on.
    pub fn topic(&self) -> Topic {
        match self {
            Inbound::UserUpdate(_) => Topic::UserUpdate,
            Inbound::ListChange(_) => Topic::ListChange,
            Inbound::UpdateChat(_) => Topic::UpdateChat,
        }
    }

    /// Serialize to a JSON frame.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a JSON frame.
    pub fn decode(frame: &str) -> Result<Self> {
        Ok(serde_json::from_str(frame)?)
    }
}
