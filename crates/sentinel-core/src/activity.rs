//! User-interaction event kinds observed by the idle monitor.

use serde::{Deserialize, Serialize};

/// The fixed set of user-interaction events that reset the idle timer.
///
/// Any observed event of any kind counts as activity; the kind is carried
/// only for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Pointer button pressed down.
    PointerPress,
    /// Pointer moved.
    PointerMove,
    /// Key pressed.
    KeyPress,
    /// Scroll wheel or scroll gesture.
    Scroll,
    /// Touch contact started.
    TouchStart,
    /// Completed click (press + release).
    Click,
}

impl ActivityKind {
    /// All observed event kinds, in a stable order.
    pub const ALL: [ActivityKind; 6] = [
        ActivityKind::PointerPress,
        ActivityKind::PointerMove,
        ActivityKind::KeyPress,
        ActivityKind::Scroll,
        ActivityKind::TouchStart,
        ActivityKind::Click,
    ];

    /// Short lowercase label used in log output.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::PointerPress => "pointer_press",
            ActivityKind::PointerMove => "pointer_move",
            ActivityKind::KeyPress => "key_press",
            ActivityKind::Scroll => "scroll",
            ActivityKind::TouchStart => "touch_start",
            ActivityKind::Click => "click",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_contains_every_kind_once() {
        let mut seen = std::collections::HashSet::new();
        for kind in ActivityKind::ALL {
            assert!(seen.insert(kind), "duplicate kind {kind}");
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_label_round_trips_through_serde() {
        for kind in ActivityKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.label()));
            let back: ActivityKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(ActivityKind::KeyPress.to_string(), "key_press");
        assert_eq!(ActivityKind::Scroll.to_string(), "scroll");
    }
}
