use crate::core::constants::{PERCENT_MAX, PERCENT_MIN};
use serde::{Deserialize, Deserializer, Serialize};

/// A single point annotation in percent space.
///
/// `x` and `y` are percentages of the rendered image's width and height.
/// `name` is an optional label and is never stored as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkPosition {
    pub x: f64,
    pub y: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_label"
    )]
    pub name: Option<String>,
}

impl MarkPosition {
    /// Creates an unlabeled mark at the given percent position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, name: None }
    }

    /// Creates a mark with its position clamped into `[0, 100]` on both axes
    pub fn clamped(x: f64, y: f64) -> Self {
        Self::new(clamp_percent(x), clamp_percent(y))
    }

    /// Attaches a label, normalizing blank labels to none
    pub fn with_name(mut self, name: impl AsRef<str>) -> Self {
        self.name = normalize_label(name.as_ref());
        self
    }

    /// Checks that both coordinates lie in percent space
    pub fn is_valid(&self) -> bool {
        (PERCENT_MIN..=PERCENT_MAX).contains(&self.x) && (PERCENT_MIN..=PERCENT_MAX).contains(&self.y)
    }

    /// Euclidean distance in percent space
    pub fn percent_distance_to(&self, other: &MarkPosition) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Ordered marks for one map; insertion order is display order.
pub type MarkSet = Vec<MarkPosition>;

/// Clamps a percentage into `[0, 100]`. NaN maps to 0.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return PERCENT_MIN;
    }
    value.clamp(PERCENT_MIN, PERCENT_MAX)
}

/// Trims a label; whitespace-only labels become `None`
pub fn normalize_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn deserialize_label<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(normalize_label))
}

/// A pixel offset relative to the top-left corner of the rendered image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Measured on-screen size of the map image.
///
/// Only meaningful once the image has loaded and reported a nonzero size;
/// see [`RenderedImageFrame::measured`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderedImageFrame {
    pub width_px: f64,
    pub height_px: f64,
}

impl RenderedImageFrame {
    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self {
            width_px,
            height_px,
        }
    }

    /// Builds a frame from a measurement, rejecting empty or non-finite sizes
    pub fn measured(width_px: f64, height_px: f64) -> Option<Self> {
        let frame = Self::new(width_px, height_px);
        frame.is_valid().then_some(frame)
    }

    /// A frame is usable for conversion only with positive, finite dimensions
    pub fn is_valid(&self) -> bool {
        self.width_px.is_finite()
            && self.height_px.is_finite()
            && self.width_px > 0.0
            && self.height_px > 0.0
    }
}
