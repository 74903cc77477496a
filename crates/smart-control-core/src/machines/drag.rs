use std::time::{Duration, Instant};

use tracing::debug;

use super::RateGate;
use crate::action::{ActionEvent, MouseButton};

/// Where a pointer button is in its press cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    /// Pinch seen, drag threshold not reached yet
    Pinching { since: Instant },
    /// Button is held down
    Dragging,
}

/// Press / drag / click machine for one pointer button.
///
/// A short pinch is a click (rate limited by the click debounce), a pinch
/// held longer than the drag hold time presses the button until the pinch
/// ends. Any path out of `Dragging` emits the matching `MouseUp`.
#[derive(Debug, Clone)]
pub struct DragMachine {
    button: MouseButton,
    drag_hold_time: Duration,
    click_gate: RateGate,
    phase: DragPhase,
}

impl DragMachine {
    pub fn new(button: MouseButton, drag_hold_time: Duration, click_debounce: Duration) -> Self {
        Self {
            button,
            drag_hold_time,
            click_gate: RateGate::new(click_debounce),
            phase: DragPhase::Idle,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// Advance with this frame's (stabilized) pinch state.
    pub fn update(&mut self, pinched: bool, now: Instant) -> Option<ActionEvent> {
        match (self.phase, pinched) {
            (DragPhase::Idle, true) => {
                self.phase = DragPhase::Pinching { since: now };
                None
            }
            (DragPhase::Pinching { since }, true) => {
                if now.saturating_duration_since(since) > self.drag_hold_time {
                    debug!("Drag started on {:?} button", self.button);
                    self.phase = DragPhase::Dragging;
                    Some(ActionEvent::MouseDown {
                        button: self.button,
                    })
                } else {
                    None
                }
            }
            (DragPhase::Dragging, true) | (DragPhase::Idle, false) => None,
            (DragPhase::Pinching { .. }, false) => {
                self.phase = DragPhase::Idle;
                if self.click_gate.try_fire(now) {
                    Some(ActionEvent::Click {
                        button: self.button,
                    })
                } else {
                    debug!("Click on {:?} button suppressed by debounce", self.button);
                    None
                }
            }
            (DragPhase::Dragging, false) => {
                debug!("Drag ended on {:?} button", self.button);
                self.phase = DragPhase::Idle;
                Some(ActionEvent::MouseUp {
                    button: self.button,
                })
            }
        }
    }

    /// Hand disappeared: drop any pinch timing, release a held button.
    pub fn hand_lost(&mut self) -> Option<ActionEvent> {
        let was_dragging = self.is_dragging();
        self.phase = DragPhase::Idle;
        was_dragging.then(|| {
            debug!("Hand lost mid-drag, releasing {:?} button", self.button);
            ActionEvent::MouseUp {
                button: self.button,
            }
        })
    }

    /// Mode teardown; same guarantee as [`DragMachine::hand_lost`].
    pub fn release(&mut self) -> Option<ActionEvent> {
        self.hand_lost()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> DragMachine {
        DragMachine::new(
            MouseButton::Left,
            Duration::from_millis(150),
            Duration::from_millis(250),
        )
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_quick_pinch_clicks() {
        let t0 = Instant::now();
        let mut m = machine();
        assert_eq!(m.update(true, t0), None);
        assert_eq!(m.update(true, t0 + ms(50)), None);
        assert_eq!(
            m.update(false, t0 + ms(100)),
            Some(ActionEvent::Click {
                button: MouseButton::Left
            })
        );
        assert_eq!(m.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_held_pinch_drags_then_releases() {
        let t0 = Instant::now();
        let mut m = machine();
        let mut events = Vec::new();
        for step in 0..=4 {
            events.extend(m.update(true, t0 + ms(step * 50)));
        }
        events.extend(m.update(false, t0 + ms(250)));
        assert_eq!(
            events,
            vec![
                ActionEvent::MouseDown {
                    button: MouseButton::Left
                },
                ActionEvent::MouseUp {
                    button: MouseButton::Left
                },
            ]
        );
    }

    #[test]
    fn test_drag_threshold_is_strict() {
        let t0 = Instant::now();
        let mut m = machine();
        m.update(true, t0);
        assert_eq!(m.update(true, t0 + ms(150)), None);
        assert!(m.update(true, t0 + ms(151)).is_some());
    }

    #[test]
    fn test_click_debounce() {
        let t0 = Instant::now();
        let mut m = machine();
        m.update(true, t0);
        assert!(m.update(false, t0 + ms(50)).is_some());
        m.update(true, t0 + ms(100));
        assert_eq!(m.update(false, t0 + ms(150)), None);
        m.update(true, t0 + ms(300));
        assert!(m.update(false, t0 + ms(350)).is_some());
    }

    #[test]
    fn test_hand_lost_releases_drag() {
        let t0 = Instant::now();
        let mut m = machine();
        m.update(true, t0);
        m.update(true, t0 + ms(200));
        assert!(m.is_dragging());
        assert_eq!(
            m.hand_lost(),
            Some(ActionEvent::MouseUp {
                button: MouseButton::Left
            })
        );
        assert_eq!(m.hand_lost(), None);
        // Re-appearing hand starts a fresh cycle, no stale click
        assert_eq!(m.update(false, t0 + ms(300)), None);
    }

    #[test]
    fn test_hand_lost_while_pinching_is_silent() {
        let t0 = Instant::now();
        let mut m = machine();
        m.update(true, t0);
        assert_eq!(m.hand_lost(), None);
        assert_eq!(m.phase(), DragPhase::Idle);
    }
}
