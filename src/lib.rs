//! spachat - client-side identity and chat session model.
//!
//! A [`SessionContext`] owns the person registry and everything about the
//! local session: who the current user is, the login handshake, who the
//! user is chatting with. It talks to the backend through a [`Transport`]
//! and tells observers what changed through an [`EventBus`].
//!
//! ```
//! use spachat::{Config, MemoryTransport, ModelEvent, SessionContext};
//! use spachat_proto::{Inbound, PersonRecord};
//!
//! let mut ctx = SessionContext::bootstrap(
//!     Config::default(),
//!     Vec::<ModelEvent>::new(),
//!     MemoryTransport::new(),
//! )?;
//! ctx.login("Alice")?;
//! ctx.dispatch(Inbound::UserUpdate(vec![PersonRecord {
//!     id: Some("u42".into()),
//!     cid: Some("c0".into()),
//!     ..Default::default()
//! }]))?;
//!
//! assert_eq!(ctx.current_user().server_id(), Some("u42"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bus;
pub mod chat;
pub mod config;
pub mod error;
pub mod identity;
pub mod state;
pub mod telemetry;
pub mod transport;

pub use bus::{EventBus, ModelEvent, Subscribers};
pub use config::Config;
pub use error::{ModelError, ModelResult};
pub use state::{Identity, People, Person, PersonRegistry, SessionContext};
pub use transport::{ChannelTransport, MemoryTransport, Transport};
