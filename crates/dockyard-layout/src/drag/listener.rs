//! Pointer gesture detection.
//!
//! After a pointer-down the listener waits for either the hold delay to
//! elapse or the pointer to travel far enough. Whichever happens first
//! starts the drag. Releasing before that is a plain click and cancels.

use std::time::{Duration, Instant};

pub const DRAG_HOLD_DELAY: Duration = Duration::from_millis(1800);
pub const DRAG_DISTANCE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragSignal {
    Start { x: f64, y: f64 },
    Drag { x: f64, y: f64 },
    Stop { x: f64, y: f64 },
    /// Released before the drag started.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ListenerState {
    Idle,
    Pending {
        origin: (f64, f64),
        last: (f64, f64),
        down_at: Instant,
    },
    Dragging,
}

#[derive(Debug, Clone)]
pub struct DragListener {
    state: ListenerState,
    hold_delay: Duration,
    distance: f64,
}

impl Default for DragListener {
    fn default() -> Self {
        Self::new()
    }
}

impl DragListener {
    pub fn new() -> Self {
        Self::with_thresholds(DRAG_HOLD_DELAY, DRAG_DISTANCE)
    }

    pub fn with_thresholds(hold_delay: Duration, distance: f64) -> Self {
        Self {
            state: ListenerState::Idle,
            hold_delay,
            distance,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ListenerState::Pending { .. })
    }

    pub fn is_dragging(&self) -> bool {
        self.state == ListenerState::Dragging
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, now: Instant) {
        self.state = ListenerState::Pending {
            origin: (x, y),
            last: (x, y),
            down_at: now,
        };
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now: Instant) -> Option<DragSignal> {
        match self.state {
            ListenerState::Idle => None,
            ListenerState::Dragging => Some(DragSignal::Drag { x, y }),
            ListenerState::Pending { origin, down_at, .. } => {
                let travelled = ((x - origin.0).powi(2) + (y - origin.1).powi(2)).sqrt();
                if travelled >= self.distance || now.duration_since(down_at) >= self.hold_delay {
                    self.state = ListenerState::Dragging;
                    Some(DragSignal::Start { x, y })
                } else {
                    self.state = ListenerState::Pending {
                        origin,
                        last: (x, y),
                        down_at,
                    };
                    None
                }
            }
        }
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<DragSignal> {
        let signal = match self.state {
            ListenerState::Idle => None,
            ListenerState::Pending { .. } => Some(DragSignal::Cancelled),
            ListenerState::Dragging => Some(DragSignal::Stop { x, y }),
        };
        self.state = ListenerState::Idle;
        signal
    }

    /// Fire the hold timeout if it has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<DragSignal> {
        if let ListenerState::Pending { last, down_at, .. } = self.state {
            if now.duration_since(down_at) >= self.hold_delay {
                self.state = ListenerState::Dragging;
                return Some(DragSignal::Start { x: last.0, y: last.1 });
            }
        }
        None
    }

    pub fn cancel(&mut self) {
        self.state = ListenerState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_starts_drag_without_drag_event() {
        let t0 = Instant::now();
        let mut listener = DragListener::new();
        listener.pointer_down(0.0, 0.0, t0);
        assert_eq!(listener.pointer_move(3.0, 4.0, t0), None);
        assert_eq!(
            listener.pointer_move(6.0, 8.0, t0),
            Some(DragSignal::Start { x: 6.0, y: 8.0 })
        );
        assert_eq!(
            listener.pointer_move(7.0, 8.0, t0),
            Some(DragSignal::Drag { x: 7.0, y: 8.0 })
        );
        assert_eq!(
            listener.pointer_up(7.0, 8.0),
            Some(DragSignal::Stop { x: 7.0, y: 8.0 })
        );
        assert!(!listener.is_dragging());
    }

    #[test]
    fn hold_timeout_starts_drag_at_last_position() {
        let t0 = Instant::now();
        let mut listener = DragListener::new();
        listener.pointer_down(10.0, 10.0, t0);
        listener.pointer_move(12.0, 10.0, t0);
        assert_eq!(listener.tick(t0 + Duration::from_millis(100)), None);
        assert_eq!(
            listener.tick(t0 + DRAG_HOLD_DELAY),
            Some(DragSignal::Start { x: 12.0, y: 10.0 })
        );
        assert!(listener.is_dragging());
    }

    #[test]
    fn release_before_start_cancels() {
        let t0 = Instant::now();
        let mut listener = DragListener::new();
        listener.pointer_down(0.0, 0.0, t0);
        assert!(listener.is_pending());
        assert_eq!(listener.pointer_up(1.0, 1.0), Some(DragSignal::Cancelled));
        assert_eq!(listener.tick(t0 + DRAG_HOLD_DELAY), None);
        assert_eq!(listener.pointer_move(50.0, 50.0, t0), None);
    }
}
