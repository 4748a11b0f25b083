//! # spachat-proto
//!
//! The wire vocabulary spoken between the spachat client model and its
//! backend: event topic names, outgoing intents and incoming replies.
//!
//! Frames are JSON objects of the form `{"event": "<topic>", "data": ...}`,
//! with payload field names matching the chat backend (`cid`, `_id`,
//! `css_map`, `background-color`).
//!
//! ```rust
//! use spachat_proto::{Inbound, Topic};
//!
//! let raw = r#"{"event":"userupdate","data":[{"_id":"u42","cid":"c0","name":"Alice"}]}"#;
//! let reply = Inbound::decode(raw).expect("valid frame");
//! assert_eq!(reply.topic(), Topic::UserUpdate);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod message;
pub mod style;
pub mod topic;

pub use error::{ProtoError, Result};
pub use message::{AddUser, AvatarUpdate, ChatMessage, Inbound, Intent, JoinChat, PersonRecord};
pub use style::AvatarStyle;
pub use topic::Topic;
