//! Integration test common infrastructure.
//!
//! Provides a recording session context and a scripted backend that turns
//! the model's intents into replies, so whole login/chat flows can be run
//! without a network.

pub mod backend;

use spachat::{Config, MemoryTransport, ModelEvent, SessionContext};
use spachat_proto::{AvatarStyle, PersonRecord};

#[allow(unused_imports)]
pub use backend::ScriptedBackend;

/// Session context that records every event and buffers every intent.
pub type TestContext = SessionContext<Vec<ModelEvent>, MemoryTransport>;

/// A freshly bootstrapped context with default config.
pub fn context() -> TestContext {
    SessionContext::bootstrap(Config::default(), Vec::new(), MemoryTransport::new())
        .expect("bootstrap with default config")
}

/// A roster entry as the backend sends it.
#[allow(dead_code)]
pub fn record(id: &str, name: &str) -> PersonRecord {
    PersonRecord {
        id: Some(id.into()),
        cid: Some(id.into()),
        name: Some(name.into()),
        css_map: Some(AvatarStyle::new(20, 20, "rgb(128, 128, 128)")),
    }
}

/// Topics of every event published so far.
#[allow(dead_code)]
pub fn topics(ctx: &TestContext) -> Vec<&'static str> {
    ctx.bus().iter().map(ModelEvent::topic).collect()
}
