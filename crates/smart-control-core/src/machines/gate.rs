use std::time::{Duration, Instant};

/// Lets a trigger through at most once per `min_interval`.
#[derive(Debug, Clone)]
pub struct RateGate {
    min_interval: Duration,
    last_fired: Option<Instant>,
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_fired: None,
        }
    }

    /// Fire if strictly more than `min_interval` has passed since the last
    /// fire (or nothing has fired yet).
    pub fn try_fire(&mut self, now: Instant) -> bool {
        let open = self
            .last_fired
            .map_or(true, |last| now.saturating_duration_since(last) > self.min_interval);
        if open {
            self.last_fired = Some(now);
        }
        open
    }

    pub fn last_fired(&self) -> Option<Instant> {
        self.last_fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_interval() {
        let t0 = Instant::now();
        let mut gate = RateGate::new(Duration::from_millis(250));
        assert!(gate.try_fire(t0));
        assert!(!gate.try_fire(t0 + Duration::from_millis(100)));
        assert!(!gate.try_fire(t0 + Duration::from_millis(250)));
        assert!(gate.try_fire(t0 + Duration::from_millis(251)));
        assert_eq!(gate.last_fired(), Some(t0 + Duration::from_millis(251)));
    }
}
