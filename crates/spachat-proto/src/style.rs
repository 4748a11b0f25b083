//! Avatar presentation attributes.

use serde::{Deserialize, Serialize};

/// Avatar style, carried as `css_map` on the wire.
///
/// Only the attributes the chat UI understands are kept. The model never
/// interprets them; they are stored and forwarded as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarStyle {
    /// Offset from the top of the avatar canvas, in pixels.
    #[serde(default)]
    pub top: i32,
    /// Offset from the left of the avatar canvas, in pixels.
    #[serde(default)]
    pub left: i32,
    /// Avatar fill colour.
    #[serde(
        rename = "background-color",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub background_color: Option<String>,
    /// Text colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl AvatarStyle {
    /// Create a style at the given position with a fill colour.
    pub fn new(top: i32, left: i32, background_color: impl Into<String>) -> Self {
        Self {
            top,
            left,
            background_color: Some(background_color.into()),
            color: None,
        }
    }
}
