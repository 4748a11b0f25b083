//! State management module.
//!
//! Contains the session context and the person registry it owns.

mod cid;
mod person;
mod registry;
mod session;

pub use cid::ClientIdGenerator;
pub use person::{ClientId, Person};
pub use registry::{People, PersonRegistry};
pub use session::{Identity, SessionContext};
