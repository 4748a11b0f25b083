//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Identity Defaults
// =============================================================================

pub fn default_anon_id() -> String {
    "a0".to_string()
}

pub fn default_anon_name() -> String {
    "anonymous".to_string()
}

pub fn default_client_id_prefix() -> String {
    "c".to_string()
}

// =============================================================================
// Avatar Defaults
// =============================================================================

pub fn default_avatar_top() -> i32 {
    25
}

pub fn default_avatar_left() -> i32 {
    25
}

pub fn default_avatar_background() -> String {
    "#8f8".to_string()
}

// =============================================================================
// Chat Defaults
// =============================================================================

pub fn default_room() -> String {
    "lobby".to_string()
}

pub fn default_transport_capacity() -> usize {
    64
}
