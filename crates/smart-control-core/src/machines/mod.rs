//! Per-mode control state machines
//!
//! Three shapes recur across every control mode:
//!
//! - [`DragMachine`]: press / drag / click for pointer buttons
//! - [`HoldMachine`]: hold-to-confirm with a cooldown for discrete gestures
//! - [`LockMachine`]: frame-counted lock toggle for a continuous value
//!
//! Each instance belongs to exactly one mode session and is driven from that
//! session's loop only. Time-based machines take the frame timestamp as an
//! argument rather than reading the clock, so a replayed sequence produces
//! the same actions every time.

mod drag;
mod gate;
mod hold;
mod lock;

pub use drag::{DragMachine, DragPhase};
pub use gate::RateGate;
pub use hold::{HoldMachine, HoldPhase, HoldStatus};
pub use lock::{LockMachine, LockTransition};
