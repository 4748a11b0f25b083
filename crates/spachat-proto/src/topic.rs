//! Event topic names exchanged with the backend.

use std::fmt;
use std::str::FromStr;

use crate::error::ProtoError;

/// A transport event topic.
///
/// Outgoing: `adduser`, `joinchat`, `updatechat`, `updateavatar`, `leavechat`.
/// Incoming: `userupdate`, `listchange`, `updatechat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Request the backend to create a user for a pending login.
    AddUser,
    /// Backend confirmation of an `adduser` request.
    UserUpdate,
    /// Enter the chat room.
    JoinChat,
    /// Backend roster broadcast.
    ListChange,
    /// A chat message, in either direction.
    UpdateChat,
    /// Request an avatar style change.
    UpdateAvatar,
    /// Leave the chat room.
    LeaveChat,
}

impl Topic {
    /// Every topic, in protocol order.
    pub const ALL: [Topic; 7] = [
        Topic::AddUser,
        Topic::UserUpdate,
        Topic::JoinChat,
        Topic::ListChange,
        Topic::UpdateChat,
        Topic::UpdateAvatar,
        Topic::LeaveChat,
    ];

    /// The on-the-wire topic name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::AddUser => "adduser",
            Topic::UserUpdate => "userupdate",
            Topic::JoinChat => "joinchat",
            Topic::ListChange => "listchange",
            Topic::UpdateChat => "updatechat",
            Topic::UpdateAvatar => "updateavatar",
            Topic::LeaveChat => "leavechat",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ProtoError::UnknownTopic(s.to_string()))
    }
}
