//! Logging setup and span helpers.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_filter`. With `json` set, events are
/// written as one JSON object per line.
pub fn init(default_filter: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {e}");
    }
}

/// Standardized span constructors for model observability.
pub mod spans {
    use spachat_proto::Topic;
    use tracing::{Span, debug_span, info_span};

    /// Span for an identity or chat operation on behalf of `client_id`.
    pub fn operation(name: &'static str, client_id: &str) -> Span {
        info_span!("op", op = name, client_id = %client_id)
    }

    /// Span for handling a backend reply.
    pub fn reply(topic: Topic) -> Span {
        debug_span!("reply", topic = %topic)
    }
}
