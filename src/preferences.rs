//! User preferences affecting the core.
//!
//! Persistence (file format, location, migration) is the host's job; these
//! types only need to round-trip through serde.

use serde::{Deserialize, Serialize};

/// Preferences for move animation and input feel.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(default)]
pub struct InteractionPreferences {
    /// Duration of a quarter turn, in seconds. Longer moves (half turns,
    /// slices) scale proportionally from their base durations.
    pub twist_duration: f32,
    /// Whether to speed up animations when many moves are queued.
    pub dynamic_twist_speed: bool,
}
impl Default for InteractionPreferences {
    fn default() -> Self {
        Self {
            twist_duration: 0.3,
            dynamic_twist_speed: false,
        }
    }
}
