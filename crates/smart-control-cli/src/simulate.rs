//! Keyboard-driven synthetic hand as a frame source.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use futures::StreamExt;
use smart_control_core::{CaptureError, FrameSample, FrameSource, HandSimulator, SimInput};
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::debug;

/// Frame interval of the simulated camera (~30 fps)
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Restores cooked mode when dropped
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

pub struct SimSource {
    simulator: HandSimulator,
    events: EventStream,
    ticker: Interval,
    _raw: RawModeGuard,
}

impl SimSource {
    /// Puts the terminal in raw mode until the source is dropped.
    pub fn new() -> std::io::Result<Self> {
        let raw = RawModeGuard::enable()?;
        let mut ticker = interval(FRAME_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Ok(Self {
            simulator: HandSimulator::new(),
            events: EventStream::new(),
            ticker,
            _raw: raw,
        })
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[async_trait]
impl FrameSource for SimSource {
    async fn next_frame(&mut self) -> Result<FrameSample, CaptureError> {
        loop {
            tokio::select! {
                _ = self.ticker.tick() => {
                    return Ok(FrameSample::new(Instant::now(), self.simulator.frame()));
                }
                event = self.events.next() => match event {
                    Some(Ok(Event::Key(key))) => {
                        // Raw mode swallows SIGINT, so Ctrl-C arrives as a key
                        if is_interrupt(&key) {
                            return Err(CaptureError::Closed);
                        }
                        match self.simulator.process_key(key) {
                            SimInput::Quit => return Err(CaptureError::Closed),
                            SimInput::Updated => debug!("Simulated pose: {:?}", self.simulator.pose()),
                            SimInput::Ignored => {}
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(CaptureError::Failed(e.to_string())),
                    None => return Err(CaptureError::Closed),
                },
            }
        }
    }
}
