//! Pointer gesture tracking
//!
//! Turns raw mouse press/drag/release into drag events. A press on a card
//! only arms the gesture; the drag starts once the pointer has travelled
//! `activation` cells, so a plain click never picks anything up.

use crate::domain::{DragEvent, TaskId};

use super::utils::cell_distance;

#[derive(Debug, Clone)]
struct Press {
    task: TaskId,
    origin: (u16, u16),
}

/// Mouse drag tracker
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    activation: u16,
    pressed: Option<Press>,
    dragging: bool,
    last_over: Option<String>,
    position: Option<(u16, u16)>,
}

impl PointerTracker {
    pub fn new(activation: u16) -> Self {
        Self {
            activation,
            ..Self::default()
        }
    }

    /// Button went down on a card
    pub fn press(&mut self, task: TaskId, x: u16, y: u16) {
        self.reset();
        self.pressed = Some(Press {
            task,
            origin: (x, y),
        });
        self.position = Some((x, y));
    }

    /// Pointer moved with the button held, now over `over`
    pub fn motion(&mut self, x: u16, y: u16, over: Option<&str>) -> Vec<DragEvent> {
        let Some(press) = &self.pressed else {
            return Vec::new();
        };
        self.position = Some((x, y));

        let mut events = Vec::new();
        if !self.dragging {
            if cell_distance(press.origin, (x, y)) < self.activation {
                return events;
            }
            self.dragging = true;
            events.push(DragEvent::Start(press.task.clone()));
        } else if self.last_over.as_deref() == over {
            return events;
        }

        self.last_over = over.map(str::to_string);
        events.push(DragEvent::Over(self.last_over.clone()));
        events
    }

    /// Button released over `over`. Returns the drop if a drag was active.
    pub fn release(&mut self, over: Option<&str>) -> Option<DragEvent> {
        let dropped = self.dragging.then(|| DragEvent::End(over.map(str::to_string)));
        self.reset();
        dropped
    }

    /// Abandons the gesture. Returns a cancel if a drag was active.
    pub fn abort(&mut self) -> Option<DragEvent> {
        let cancelled = self.dragging.then_some(DragEvent::Cancel);
        self.reset();
        cancelled
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Id the active drag last reported as hovered
    pub fn over(&self) -> Option<&str> {
        self.last_over.as_deref()
    }

    /// Last pointer position while the button is held
    pub fn position(&self) -> Option<(u16, u16)> {
        self.position
    }

    fn reset(&mut self) {
        self.pressed = None;
        self.dragging = false;
        self.last_over = None;
        self.position = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(s: &str) -> TaskId {
        s.parse().unwrap()
    }

    fn over(id: &str) -> DragEvent {
        DragEvent::Over(Some(id.to_string()))
    }

    #[test]
    fn motion_without_press_does_nothing() {
        let mut tracker = PointerTracker::new(1);
        assert!(tracker.motion(4, 4, Some("task-1")).is_empty());
        assert_eq!(tracker.release(Some("task-1")), None);
    }

    #[test]
    fn click_without_travel_is_not_a_drag() {
        let mut tracker = PointerTracker::new(2);
        tracker.press(tid("task-1"), 5, 5);

        assert!(tracker.motion(6, 5, Some("task-1")).is_empty());
        assert!(!tracker.is_dragging());
        assert_eq!(tracker.release(Some("task-1")), None);
    }

    #[test]
    fn drag_starts_after_activation_distance() {
        let mut tracker = PointerTracker::new(2);
        tracker.press(tid("task-1"), 5, 5);

        let events = tracker.motion(7, 6, Some("task-1"));
        assert_eq!(events, vec![DragEvent::Start(tid("task-1")), over("task-1")]);
        assert!(tracker.is_dragging());
        assert_eq!(tracker.position(), Some((7, 6)));
    }

    #[test]
    fn over_only_fires_when_target_changes() {
        let mut tracker = PointerTracker::new(1);
        tracker.press(tid("task-1"), 5, 5);
        tracker.motion(6, 5, Some("task-1"));

        assert!(tracker.motion(7, 5, Some("task-1")).is_empty());
        assert_eq!(tracker.motion(35, 5, Some("task-3")), vec![over("task-3")]);
        assert_eq!(tracker.motion(35, 1, None), vec![DragEvent::Over(None)]);
        assert!(tracker.motion(36, 1, None).is_empty());
    }

    #[test]
    fn release_drops_on_target() {
        let mut tracker = PointerTracker::new(1);
        tracker.press(tid("task-1"), 5, 5);
        tracker.motion(40, 9, Some("task-4"));

        assert_eq!(
            tracker.release(Some("task-4")),
            Some(DragEvent::End(Some("task-4".to_string())))
        );
        assert!(!tracker.is_dragging());
        assert_eq!(tracker.position(), None);
    }

    #[test]
    fn release_outside_any_target() {
        let mut tracker = PointerTracker::new(1);
        tracker.press(tid("task-1"), 5, 5);
        tracker.motion(5, 1, None);

        assert_eq!(tracker.release(None), Some(DragEvent::End(None)));
    }

    #[test]
    fn abort_cancels_active_drag_only() {
        let mut tracker = PointerTracker::new(1);
        tracker.press(tid("task-1"), 5, 5);
        assert_eq!(tracker.abort(), None);

        tracker.press(tid("task-1"), 5, 5);
        tracker.motion(9, 5, Some("col-done"));
        assert_eq!(tracker.abort(), Some(DragEvent::Cancel));
        assert!(tracker.motion(10, 5, Some("col-done")).is_empty());
    }

    #[test]
    fn zero_activation_starts_on_first_motion() {
        let mut tracker = PointerTracker::new(0);
        tracker.press(tid("task-2"), 5, 9);

        let events = tracker.motion(5, 9, Some("task-2"));
        assert_eq!(events.first(), Some(&DragEvent::Start(tid("task-2"))));
    }
}
