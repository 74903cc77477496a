//! Temporal stabilization
//!
//! Two independent strategies: a moving average over recent cursor targets,
//! and a vote over recent gesture labels. Both are fixed-size ring buffers
//! owned by a single mode session.

use std::collections::VecDeque;

use crate::gesture::GestureLabel;

/// Moving-average smoother for cursor positions.
#[derive(Debug, Clone)]
pub struct PositionSmoother {
    buffer: VecDeque<(f32, f32)>,
    capacity: usize,
}

impl PositionSmoother {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a target and return the mean of the buffered targets
    pub fn push(&mut self, x: f32, y: f32) -> (f32, f32) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back((x, y));

        let n = self.buffer.len() as f32;
        let (sx, sy) = self
            .buffer
            .iter()
            .fold((0.0, 0.0), |(ax, ay), (x, y)| (ax + x, ay + y));
        (sx / n, sy / n)
    }

    /// Drop every sample so the next hand starts without a stale anchor
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// How the label buffer turns into a stable label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteStrategy {
    /// Every slot of a full window holds the same label
    #[default]
    Unanimous,
    /// One label fills more than half of a full window
    Majority,
}

/// Debounces raw per-frame labels over a fixed window.
///
/// A raw `None` is a vote for "no gesture", and a stable label is never
/// reported before the window is full, so with unanimity a new gesture
/// needs `window` consecutive identical frames.
#[derive(Debug, Clone)]
pub struct LabelDebouncer<L> {
    buffer: VecDeque<Option<L>>,
    window: usize,
    strategy: VoteStrategy,
}

impl<L: GestureLabel> LabelDebouncer<L> {
    pub fn new(window: usize) -> Self {
        Self::with_strategy(window, VoteStrategy::Unanimous)
    }

    pub fn with_strategy(window: usize, strategy: VoteStrategy) -> Self {
        let window = window.max(1);
        Self {
            buffer: VecDeque::with_capacity(window),
            window,
            strategy,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Record this frame's raw label and return the stabilized one
    pub fn push(&mut self, raw: Option<L>) -> Option<L> {
        if self.buffer.len() == self.window {
            self.buffer.pop_front();
        }
        self.buffer.push_back(raw);
        self.current()
    }

    /// Stabilized label for the current buffer contents
    pub fn current(&self) -> Option<L> {
        if self.buffer.len() < self.window {
            return None;
        }
        match self.strategy {
            VoteStrategy::Unanimous => {
                let first = (*self.buffer.front()?)?;
                self.buffer
                    .iter()
                    .all(|label| *label == Some(first))
                    .then_some(first)
            }
            VoteStrategy::Majority => self.buffer.iter().flatten().copied().find(|candidate| {
                let votes = self
                    .buffer
                    .iter()
                    .filter(|label| **label == Some(*candidate))
                    .count();
                votes * 2 > self.window
            }),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{NavigationGesture, PinchState};

    #[test]
    fn test_smoother_mean_and_eviction() {
        let mut smoother = PositionSmoother::new(3);
        assert_eq!(smoother.push(0.0, 0.0), (0.0, 0.0));
        assert_eq!(smoother.push(0.3, 0.6), (0.15, 0.3));
        let (x, _) = smoother.push(0.6, 0.0);
        assert!((x - 0.3).abs() < 1e-6);
        // Oldest sample (0.0) is evicted
        let (x, _) = smoother.push(0.9, 0.0);
        assert!((x - 0.6).abs() < 1e-6);
        assert_eq!(smoother.len(), 3);
    }

    #[test]
    fn test_smoother_clear_drops_anchor() {
        let mut smoother = PositionSmoother::new(5);
        smoother.push(0.1, 0.1);
        smoother.push(0.1, 0.1);
        smoother.clear();
        assert!(smoother.is_empty());
        assert_eq!(smoother.push(0.9, 0.9), (0.9, 0.9));
    }

    #[test]
    fn test_unanimous_window_scenario() {
        let mut debouncer = LabelDebouncer::new(3);
        let raw = [
            None,
            None,
            Some(PinchState::Active),
            Some(PinchState::Active),
            Some(PinchState::Active),
        ];
        let out: Vec<_> = raw.iter().map(|r| debouncer.push(*r)).collect();
        assert_eq!(out, vec![None, None, None, None, Some(PinchState::Active)]);
    }

    #[test]
    fn test_stable_exactly_at_window_minus_one() {
        for window in 1..=6 {
            let mut debouncer = LabelDebouncer::new(window);
            for i in 0..window + 3 {
                let out = debouncer.push(Some(NavigationGesture::Next));
                if i + 1 < window {
                    assert_eq!(out, None, "window {} index {}", window, i);
                } else {
                    assert_eq!(out, Some(NavigationGesture::Next), "window {} index {}", window, i);
                }
            }
        }
    }

    #[test]
    fn test_single_noisy_frame_resets_unanimity() {
        let mut debouncer = LabelDebouncer::new(3);
        for _ in 0..3 {
            debouncer.push(Some(NavigationGesture::Next));
        }
        assert_eq!(debouncer.push(Some(NavigationGesture::Fist)), None);
        assert_eq!(debouncer.push(Some(NavigationGesture::Next)), None);
        assert_eq!(debouncer.push(Some(NavigationGesture::Next)), None);
        assert_eq!(debouncer.push(Some(NavigationGesture::Next)), Some(NavigationGesture::Next));
    }

    #[test]
    fn test_majority_strategy() {
        let mut debouncer = LabelDebouncer::with_strategy(5, VoteStrategy::Majority);
        let g = Some(NavigationGesture::Start);
        let o = Some(NavigationGesture::Exit);
        for raw in [g, o, g, None] {
            assert_eq!(debouncer.push(raw), None);
        }
        // [g, o, g, None, g]: 3 of 5
        assert_eq!(debouncer.push(g), g);
        // [o, g, None, g, None]: 2 of 5
        assert_eq!(debouncer.push(None), None);
    }

    #[test]
    fn test_majority_of_none_is_none() {
        let mut debouncer: LabelDebouncer<NavigationGesture> =
            LabelDebouncer::with_strategy(3, VoteStrategy::Majority);
        debouncer.push(None);
        debouncer.push(None);
        assert_eq!(debouncer.push(Some(NavigationGesture::Next)), None);
    }
}
