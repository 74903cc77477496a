use tracing::debug;

/// Emitted when the lock flips
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LockTransition<V> {
    /// Locked, holding the captured value
    Locked(V),
    Unlocked,
}

/// Frame-counted lock toggle.
///
/// Each trigger frame adds one to a counter and each other frame takes two
/// away (floored at zero). Reaching `trigger_frames` flips the lock once and
/// starts a cooldown of `cooldown_frames` frames during which triggers do
/// not count. While locked the value captured at lock time is held.
#[derive(Debug, Clone)]
pub struct LockMachine<V> {
    trigger_frames: u32,
    cooldown_frames: u32,
    counter: u32,
    cooldown_remaining: u32,
    locked_value: Option<V>,
}

impl<V: Copy> LockMachine<V> {
    pub fn new(trigger_frames: u32, cooldown_frames: u32) -> Self {
        Self {
            trigger_frames: trigger_frames.max(1),
            cooldown_frames,
            counter: 0,
            cooldown_remaining: 0,
            locked_value: None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked_value.is_some()
    }

    pub fn locked_value(&self) -> Option<V> {
        self.locked_value
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_remaining
    }

    /// The live value, or the captured one while locked
    pub fn hold(&self, live: V) -> V {
        self.locked_value.unwrap_or(live)
    }

    /// Advance one frame. `current` is captured if this frame locks.
    pub fn update(&mut self, triggered: bool, current: V) -> Option<LockTransition<V>> {
        let cooling = self.tick_cooldown();

        if !triggered || cooling {
            self.counter = self.counter.saturating_sub(2);
            return None;
        }

        self.counter += 1;
        if self.counter < self.trigger_frames {
            return None;
        }

        self.counter = 0;
        self.cooldown_remaining = self.cooldown_frames;
        let transition = match self.locked_value.take() {
            Some(_) => LockTransition::Unlocked,
            None => {
                self.locked_value = Some(current);
                LockTransition::Locked(current)
            }
        };
        debug!("Lock toggled, locked = {}", self.is_locked());
        Some(transition)
    }

    /// A frame without a hand: the trigger count is abandoned, the cooldown
    /// keeps running, the lock itself is untouched.
    pub fn hand_lost(&mut self) {
        self.counter = 0;
        self.tick_cooldown();
    }

    fn tick_cooldown(&mut self) -> bool {
        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
            true
        } else {
            false
        }
    }
}
