//! Click resolution for the editable mark overlay.
//!
//! The controller holds configuration only. The current mark set and frame
//! are passed into every call and a new set comes back; nothing is kept
//! between calls.

use crate::{
    core::{
        config::OverlayConfig,
        constants::HIT_RADIUS_PX,
        geo::{normalize_label, MarkPosition, MarkSet, Point, RenderedImageFrame},
        mapper::CoordinateMapper,
    },
    input::events::{ClickOutcome, PointerEvent},
};
use std::fmt;
use std::sync::Arc;

/// Callback receiving a clicked mark and its index in the set
pub type MarkCallback = Arc<dyn Fn(&MarkPosition, usize) + Send + Sync>;

/// What a click on an existing mark does in editable mode
#[derive(Clone)]
pub enum ClickMode {
    /// Clicking a mark deletes it
    RemoveOnClick,
    /// Clicking a mark hands it to the delegate (e.g. to edit its label)
    DelegateOnClick(MarkCallback),
}

impl ClickMode {
    pub fn delegate<F>(f: F) -> Self
    where
        F: Fn(&MarkPosition, usize) + Send + Sync + 'static,
    {
        Self::DelegateOnClick(Arc::new(f))
    }
}

impl fmt::Debug for ClickMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoveOnClick => f.write_str("RemoveOnClick"),
            Self::DelegateOnClick(_) => f.write_str("DelegateOnClick(..)"),
        }
    }
}

impl Default for ClickMode {
    fn default() -> Self {
        Self::RemoveOnClick
    }
}

#[derive(Debug, Clone)]
pub struct MarkOverlayController {
    mode: ClickMode,
    read_only: bool,
    hit_radius_px: f64,
}

impl MarkOverlayController {
    pub fn new(mode: ClickMode) -> Self {
        Self {
            mode,
            read_only: false,
            hit_radius_px: HIT_RADIUS_PX,
        }
    }

    /// Controller for display-only views; clicks on marks still reach a delegate
    pub fn read_only(mode: ClickMode) -> Self {
        Self::new(mode).with_read_only(true)
    }

    pub fn from_config(mode: ClickMode, config: &OverlayConfig) -> Self {
        Self::new(mode).with_hit_radius(config.hit_radius_px)
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_hit_radius(mut self, hit_radius_px: f64) -> Self {
        self.hit_radius_px = hit_radius_px;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn mode(&self) -> &ClickMode {
        &self.mode
    }

    pub fn hit_radius_px(&self) -> f64 {
        self.hit_radius_px
    }

    /// Index of the first mark within the hit radius of `pointer`
    pub fn hit_test(&self, marks: &[MarkPosition], pointer: Point, frame: &RenderedImageFrame) -> Option<usize> {
        marks.iter().position(|mark| {
            CoordinateMapper::distance_to_pointer(mark, pointer, frame) <= self.hit_radius_px
        })
    }

    /// Resolve a click at pixel offset `pointer` into add, remove or delegate
    pub fn handle_click(
        &self,
        marks: &[MarkPosition],
        pointer: Point,
        frame: &RenderedImageFrame,
    ) -> ClickOutcome {
        if !frame.is_valid() {
            log::warn!(
                "click ignored: frame not measured ({}x{})",
                frame.width_px,
                frame.height_px
            );
            return ClickOutcome::Ignored;
        }

        let hit = self.hit_test(marks, pointer, frame);

        if self.read_only {
            return match (hit, &self.mode) {
                (Some(index), ClickMode::DelegateOnClick(delegate)) => {
                    log::debug!("read-only click activated mark {}", index);
                    delegate(&marks[index], index);
                    ClickOutcome::Delegated { index }
                }
                _ => ClickOutcome::Ignored,
            };
        }

        match (hit, &self.mode) {
            (Some(index), ClickMode::DelegateOnClick(delegate)) => {
                log::debug!("click delegated for mark {}", index);
                delegate(&marks[index], index);
                ClickOutcome::Delegated { index }
            }
            (Some(index), ClickMode::RemoveOnClick) => {
                log::debug!("click removed mark {}", index);
                ClickOutcome::Removed {
                    index,
                    marks: remove_mark(marks, index),
                }
            }
            (None, _) => {
                let mark = CoordinateMapper::pixel_to_percent(pointer.x, pointer.y, frame);
                log::debug!("click added mark at ({:.2}%, {:.2}%)", mark.x, mark.y);
                let mut next = Vec::with_capacity(marks.len() + 1);
                next.extend_from_slice(marks);
                next.push(mark);
                ClickOutcome::Added(next)
            }
        }
    }

    /// Route a pointer event; only clicks can change marks
    pub fn handle_event(
        &self,
        marks: &[MarkPosition],
        event: &PointerEvent,
        frame: Option<&RenderedImageFrame>,
    ) -> ClickOutcome {
        match (event, frame) {
            (PointerEvent::Click { position }, Some(frame)) => self.handle_click(marks, *position, frame),
            _ => ClickOutcome::Ignored,
        }
    }
}

impl Default for MarkOverlayController {
    fn default() -> Self {
        Self::new(ClickMode::default())
    }
}

/// New set with the mark at `index` relabeled; blank names clear the label
pub fn rename_mark(marks: &[MarkPosition], index: usize, new_name: &str) -> MarkSet {
    marks
        .iter()
        .enumerate()
        .map(|(i, mark)| {
            if i == index {
                MarkPosition {
                    name: normalize_label(new_name),
                    ..mark.clone()
                }
            } else {
                mark.clone()
            }
        })
        .collect()
}

/// New set without the mark at `index`; out-of-range indices change nothing
pub fn remove_mark(marks: &[MarkPosition], index: usize) -> MarkSet {
    marks
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, mark)| mark.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn frame() -> RenderedImageFrame {
        RenderedImageFrame::new(600.0, 400.0)
    }

    #[test]
    fn test_background_click_adds_mark() {
        let controller = MarkOverlayController::default();
        let outcome = controller.handle_click(&[], Point::new(300.0, 100.0), &frame());

        assert_eq!(outcome, ClickOutcome::Added(vec![MarkPosition::new(50.0, 25.0)]));
    }

    #[test]
    fn test_add_then_remove_same_spot() {
        let controller = MarkOverlayController::default();
        let click = Point::new(123.0, 321.0);

        let marks = controller.handle_click(&[], click, &frame()).into_marks().unwrap();
        assert_eq!(marks.len(), 1);

        let outcome = controller.handle_click(&marks, click, &frame());
        assert_eq!(
            outcome,
            ClickOutcome::Removed {
                index: 0,
                marks: vec![]
            }
        );
    }

    #[test]
    fn test_click_outside_image_is_clamped() {
        let controller = MarkOverlayController::default();
        let marks = controller
            .handle_click(&[], Point::new(-40.0, 900.0), &frame())
            .into_marks()
            .unwrap();
        assert_eq!(marks, vec![MarkPosition::new(0.0, 100.0)]);
    }

    #[test]
    fn test_hit_radius_boundary() {
        let controller = MarkOverlayController::default();
        let marks = vec![MarkPosition::new(50.0, 50.0)];

        // mark center sits at (300, 200)
        assert_eq!(controller.hit_test(&marks, Point::new(313.0, 200.0), &frame()), Some(0));
        assert_eq!(controller.hit_test(&marks, Point::new(313.5, 200.0), &frame()), None);
    }

    #[test]
    fn test_first_hit_wins() {
        let controller = MarkOverlayController::default();
        let marks = vec![
            MarkPosition::new(10.0, 10.0),
            MarkPosition::new(50.0, 50.0),
            MarkPosition::new(50.5, 50.0),
        ];

        let outcome = controller.handle_click(&marks, Point::new(302.0, 200.0), &frame());
        match outcome {
            ClickOutcome::Removed { index, marks: next } => {
                assert_eq!(index, 1);
                assert_eq!(next, vec![marks[0].clone(), marks[2].clone()]);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_delegate_replaces_removal() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let controller = MarkOverlayController::new(ClickMode::delegate(move |mark, index| {
            sink.lock().unwrap().push((mark.clone(), index));
        }));
        let marks = vec![MarkPosition::new(50.0, 50.0).with_name("Boss")];

        let outcome = controller.handle_click(&marks, Point::new(300.0, 200.0), &frame());
        assert_eq!(outcome, ClickOutcome::Delegated { index: 0 });
        assert_eq!(seen.lock().unwrap().as_slice(), &[(marks[0].clone(), 0)]);

        // background clicks still add in delegate mode
        let outcome = controller.handle_click(&marks, Point::new(30.0, 20.0), &frame());
        assert_eq!(outcome.marks().map(Vec::len), Some(2));
    }

    #[test]
    fn test_read_only_without_delegate_ignores_everything() {
        let controller = MarkOverlayController::read_only(ClickMode::RemoveOnClick);
        let marks = vec![MarkPosition::new(50.0, 50.0)];

        assert_eq!(
            controller.handle_click(&marks, Point::new(300.0, 200.0), &frame()),
            ClickOutcome::Ignored
        );
        assert_eq!(
            controller.handle_click(&marks, Point::new(10.0, 10.0), &frame()),
            ClickOutcome::Ignored
        );
    }

    #[test]
    fn test_read_only_activates_delegate_on_mark_only() {
        let hits = Arc::new(Mutex::new(0usize));
        let counter = hits.clone();
        let controller = MarkOverlayController::read_only(ClickMode::delegate(move |_, _| {
            *counter.lock().unwrap() += 1;
        }));
        let marks = vec![MarkPosition::new(50.0, 50.0)];

        assert_eq!(
            controller.handle_click(&marks, Point::new(301.0, 199.0), &frame()),
            ClickOutcome::Delegated { index: 0 }
        );
        assert_eq!(
            controller.handle_click(&marks, Point::new(10.0, 10.0), &frame()),
            ClickOutcome::Ignored
        );
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn test_unmeasured_frame_is_ignored() {
        let controller = MarkOverlayController::default();
        let outcome = controller.handle_click(&[], Point::new(1.0, 1.0), &RenderedImageFrame::new(0.0, 0.0));
        assert_eq!(outcome, ClickOutcome::Ignored);
    }

    #[test]
    fn test_handle_event_requires_frame() {
        let controller = MarkOverlayController::default();
        let click = PointerEvent::Click {
            position: Point::new(60.0, 40.0),
        };

        assert_eq!(controller.handle_event(&[], &click, None), ClickOutcome::Ignored);
        assert_eq!(
            controller.handle_event(&[], &click, Some(&frame())),
            ClickOutcome::Added(vec![MarkPosition::new(10.0, 10.0)])
        );
    }

    #[test]
    fn test_rename_mark() {
        let marks = vec![MarkPosition::new(1.0, 1.0), MarkPosition::new(2.0, 2.0).with_name("Old")];

        let renamed = rename_mark(&marks, 0, "  Chest  ");
        assert_eq!(renamed[0].name.as_deref(), Some("Chest"));
        assert_eq!(renamed[1], marks[1]);

        let cleared = rename_mark(&marks, 1, "   ");
        assert_eq!(cleared[1].name, None);

        assert_eq!(rename_mark(&marks, 7, "x"), marks);
    }

    #[test]
    fn test_remove_mark() {
        let marks = vec![MarkPosition::new(1.0, 1.0), MarkPosition::new(2.0, 2.0)];
        assert_eq!(remove_mark(&marks, 0), vec![MarkPosition::new(2.0, 2.0)]);
        assert_eq!(remove_mark(&marks, 5), marks);
    }
}
