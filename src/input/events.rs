use crate::core::geo::{MarkSet, Point};
use serde::{Deserialize, Serialize};

/// Pointer input coming from the map-image surface.
///
/// Positions are pixel offsets from the image's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Primary click/tap on the image surface
    Click { position: Point },
    /// Image finished loading and reported its displayed size
    ImageLoaded { width_px: f64, height_px: f64 },
    /// Displayed image size changed
    Resize { width_px: f64, height_px: f64 },
    /// Image failed to load
    ImageError,
}

/// Result of resolving one click against the current mark set
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// A new mark was appended; carries the new set
    Added(MarkSet),
    /// The mark at `index` was removed; carries the new set
    Removed { index: usize, marks: MarkSet },
    /// The mark at `index` was handed to the configured delegate
    Delegated { index: usize },
    /// Nothing happened
    Ignored,
}

impl ClickOutcome {
    /// The replacement mark set, when the click produced one
    pub fn marks(&self) -> Option<&MarkSet> {
        match self {
            Self::Added(marks) | Self::Removed { marks, .. } => Some(marks),
            Self::Delegated { .. } | Self::Ignored => None,
        }
    }

    pub fn into_marks(self) -> Option<MarkSet> {
        match self {
            Self::Added(marks) | Self::Removed { marks, .. } => Some(marks),
            Self::Delegated { .. } | Self::Ignored => None,
        }
    }

    pub fn handled(&self) -> EventHandled {
        match self {
            Self::Ignored => EventHandled::NotHandled,
            _ => EventHandled::Handled,
        }
    }
}

/// Whether an event was handled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::MarkPosition;

    #[test]
    fn test_outcome_marks() {
        let added = ClickOutcome::Added(vec![MarkPosition::new(1.0, 1.0)]);
        assert_eq!(added.marks().map(Vec::len), Some(1));
        assert_eq!(added.handled(), EventHandled::Handled);

        assert_eq!(ClickOutcome::Delegated { index: 0 }.marks(), None);
        assert_eq!(ClickOutcome::Ignored.handled(), EventHandled::NotHandled);
    }
}
