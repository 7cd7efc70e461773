//! Caller-owned editing state for one selected map.
//!
//! A session keeps the selected map, the last measured frame and the draft
//! mark set. Every change goes through [`MarkOverlayController`] or the pure
//! set functions and the returned set replaces the draft wholesale.

use crate::{
    core::{
        constants::PLACEHOLDER_IMAGE,
        geo::{MarkPosition, MarkSet, Point, RenderedImageFrame},
    },
    data::records::{MapSelection, MarkedMapRecord, MarkedMapUpdate, NewMarkedMap},
    input::{
        events::{ClickOutcome, PointerEvent},
        overlay::{remove_mark, rename_mark, MarkOverlayController},
    },
};

#[derive(Debug, Clone)]
pub struct MarkingSession {
    controller: MarkOverlayController,
    selection: Option<MapSelection>,
    frame: Option<RenderedImageFrame>,
    marks: MarkSet,
    image_failed: bool,
}

impl MarkingSession {
    pub fn new(controller: MarkOverlayController) -> Self {
        Self {
            controller,
            selection: None,
            frame: None,
            marks: Vec::new(),
            image_failed: false,
        }
    }

    pub fn controller(&self) -> &MarkOverlayController {
        &self.controller
    }

    pub fn selection(&self) -> Option<&MapSelection> {
        self.selection.as_ref()
    }

    pub fn frame(&self) -> Option<&RenderedImageFrame> {
        self.frame.as_ref()
    }

    pub fn marks(&self) -> &[MarkPosition] {
        &self.marks
    }

    /// Switch to another map. Marks never carry over between maps.
    pub fn select_map(&mut self, selection: MapSelection) {
        log::debug!("selected map {} ({})", selection.map_id, selection.name);
        self.selection = Some(selection);
        self.frame = None;
        self.marks = Vec::new();
        self.image_failed = false;
    }

    /// Open a saved record for editing, taking its marks as the draft
    pub fn load_record(&mut self, record: &MarkedMapRecord) {
        self.select_map(MapSelection::from(record));
        self.marks = record.marks.clone();
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.frame = None;
        self.marks = Vec::new();
        self.image_failed = false;
    }

    /// Record the image's measured size. Empty sizes leave the frame unset.
    pub fn measure(&mut self, width_px: f64, height_px: f64) {
        self.frame = RenderedImageFrame::measured(width_px, height_px);
        if self.frame.is_none() {
            log::debug!("ignoring unusable frame {}x{}", width_px, height_px);
        }
    }

    /// The image could not be loaded; pointer input stays disabled, marks are kept
    pub fn mark_image_failed(&mut self) {
        self.image_failed = true;
        self.frame = None;
    }

    /// True when a real image is shown and a nonzero frame has been measured
    pub fn pointer_enabled(&self) -> bool {
        let has_image = self
            .selection
            .as_ref()
            .map(MapSelection::has_image)
            .unwrap_or(false);
        has_image && !self.image_failed && self.frame.is_some()
    }

    /// Image to display: the map image, or the placeholder when it is missing
    pub fn image_source(&self) -> Option<&str> {
        let selection = self.selection.as_ref()?;
        match (&selection.image_url, self.image_failed) {
            (Some(url), false) => Some(url.as_str()),
            _ => Some(PLACEHOLDER_IMAGE),
        }
    }

    pub fn click(&mut self, position: Point) -> ClickOutcome {
        let frame = match (self.pointer_enabled(), self.frame) {
            (true, Some(frame)) => frame,
            _ => return ClickOutcome::Ignored,
        };

        let outcome = self.controller.handle_click(&self.marks, position, &frame);
        if let Some(marks) = outcome.marks() {
            self.marks = marks.clone();
        }
        outcome
    }

    /// Apply a pointer event from the image surface
    pub fn handle_event(&mut self, event: &PointerEvent) -> ClickOutcome {
        match event {
            PointerEvent::Click { position } => self.click(*position),
            PointerEvent::ImageLoaded {
                width_px,
                height_px,
            }
            | PointerEvent::Resize {
                width_px,
                height_px,
            } => {
                self.measure(*width_px, *height_px);
                ClickOutcome::Ignored
            }
            PointerEvent::ImageError => {
                self.mark_image_failed();
                ClickOutcome::Ignored
            }
        }
    }

    pub fn rename(&mut self, index: usize, name: &str) {
        self.marks = rename_mark(&self.marks, index, name);
    }

    pub fn remove(&mut self, index: usize) {
        self.marks = remove_mark(&self.marks, index);
    }

    /// Create payload for the current map and draft marks; `None` while the draft is empty
    pub fn to_new_record(&self) -> Option<NewMarkedMap> {
        if self.marks.is_empty() {
            return None;
        }
        let selection = self.selection.as_ref()?;
        Some(NewMarkedMap {
            map_id: selection.map_id.clone(),
            map_name: selection.name.clone(),
            image_url: selection.image_url.clone().unwrap_or_default(),
            marks: self.marks.clone(),
        })
    }

    /// Marks-only update carrying the draft verbatim
    pub fn to_update(&self) -> MarkedMapUpdate {
        MarkedMapUpdate::marks(self.marks.clone())
    }
}

impl Default for MarkingSession {
    fn default() -> Self {
        Self::new(MarkOverlayController::default())
    }
}
