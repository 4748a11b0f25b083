//! Client id generation.

use super::person::ClientId;

/// Generates client ids for pending logins.
///
/// Format: prefix + decimal serial, e.g. "c0", "c1", ... The serial only
/// moves forward, so an id is never handed out twice in one process even
/// after its person has been removed.
#[derive(Debug)]
pub struct ClientIdGenerator {
    prefix: String,
    counter: u64,
}

impl ClientIdGenerator {
    /// Create a new generator starting at serial 0.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }

    /// Generate the next client id.
    pub fn next(&mut self) -> ClientId {
        let n = self.counter;
        self.counter += 1;
        format!("{}{}", self.prefix, n)
    }

    /// Serial the next call to [`next`](Self::next) will use.
    pub fn peek_serial(&self) -> u64 {
        self.counter
    }
}
