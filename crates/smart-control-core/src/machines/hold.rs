use std::time::{Duration, Instant};

use tracing::debug;

use crate::gesture::GestureLabel;

/// Progress of the gesture currently being held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldPhase<L> {
    Idle,
    Candidate { gesture: L, since: Instant },
}

/// Observable state, including the cooldown window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldStatus<L> {
    Idle,
    Candidate(L),
    Cooldown,
}

/// Hold-to-confirm machine with a post-action cooldown.
///
/// A stable gesture must stay unchanged for `hold_time` before it fires, and
/// nothing fires again until `cooldown_time` has passed. A candidate may
/// start timing during the cooldown, it just cannot fire before the deadline.
#[derive(Debug, Clone)]
pub struct HoldMachine<L> {
    hold_time: Duration,
    cooldown_time: Duration,
    phase: HoldPhase<L>,
    last_fired: Option<Instant>,
}

impl<L: GestureLabel> HoldMachine<L> {
    pub fn new(hold_time: Duration, cooldown_time: Duration) -> Self {
        Self {
            hold_time,
            cooldown_time,
            phase: HoldPhase::Idle,
            last_fired: None,
        }
    }

    pub fn phase(&self) -> HoldPhase<L> {
        self.phase
    }

    pub fn status(&self, now: Instant) -> HoldStatus<L> {
        match self.phase {
            HoldPhase::Candidate { gesture, .. } => HoldStatus::Candidate(gesture),
            HoldPhase::Idle if self.in_cooldown(now) => HoldStatus::Cooldown,
            HoldPhase::Idle => HoldStatus::Idle,
        }
    }

    pub fn in_cooldown(&self, now: Instant) -> bool {
        self.last_fired
            .is_some_and(|fired| now.saturating_duration_since(fired) <= self.cooldown_time)
    }

    /// Advance with this frame's stabilized gesture; returns the gesture to
    /// act on when a hold is confirmed.
    pub fn update(&mut self, stable: Option<L>, now: Instant) -> Option<L> {
        let Some(gesture) = stable else {
            self.phase = HoldPhase::Idle;
            return None;
        };

        match self.phase {
            HoldPhase::Candidate { gesture: held, since } if held == gesture => {
                if self.in_cooldown(now) || now.saturating_duration_since(since) < self.hold_time {
                    return None;
                }
                debug!("Gesture {} confirmed", gesture.name());
                self.phase = HoldPhase::Idle;
                self.last_fired = Some(now);
                Some(gesture)
            }
            _ => {
                debug!("Gesture {} candidate", gesture.name());
                self.phase = HoldPhase::Candidate {
                    gesture,
                    since: now,
                };
                None
            }
        }
    }

    /// Drop an unconfirmed candidate. A running cooldown is kept.
    pub fn reset(&mut self) {
        self.phase = HoldPhase::Idle;
    }
}
