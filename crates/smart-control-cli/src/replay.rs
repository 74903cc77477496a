//! Recorded landmark streams
//!
//! One JSON object per line:
//!
//! ```text
//! {"t": 0.033, "hand": {"points": [[0.51, 0.62, -0.01], ...], "handedness": "right"}}
//! {"t": 0.066, "hand": null}
//! ```
//!
//! `t` is seconds since the start of the recording. Blank lines are skipped.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use smart_control_core::{CaptureError, FrameSample, FrameSource, LandmarkFrame};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ReplayRecord {
    t: f64,
    hand: Option<LandmarkFrame>,
}

/// Frame source reading a JSON-lines recording.
pub struct ReplaySource<R> {
    lines: Lines<BufReader<R>>,
    line_no: usize,
    base: Instant,
    realtime: bool,
}

impl ReplaySource<File> {
    pub async fn open(path: &Path, realtime: bool) -> anyhow::Result<Self> {
        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open replay file {}", path.display()))?;
        debug!("Replaying {}", path.display());
        Ok(Self::new(file, realtime))
    }
}

impl<R: AsyncRead + Unpin + Send> ReplaySource<R> {
    /// With `realtime`, each frame is held back until its recorded offset
    pub fn new(reader: R, realtime: bool) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            line_no: 0,
            base: Instant::now(),
            realtime,
        }
    }

    fn parse(&self, line: &str) -> Result<(Instant, Option<LandmarkFrame>), CaptureError> {
        let record: ReplayRecord = serde_json::from_str(line).map_err(|e| {
            CaptureError::Failed(format!("replay line {}: {}", self.line_no, e))
        })?;
        let captured_at = Duration::try_from_secs_f64(record.t)
            .ok()
            .and_then(|offset| self.base.checked_add(offset))
            .ok_or_else(|| {
                CaptureError::Failed(format!(
                    "replay line {}: invalid timestamp {}",
                    self.line_no, record.t
                ))
            })?;
        Ok((captured_at, record.hand))
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> FrameSource for ReplaySource<R> {
    async fn next_frame(&mut self) -> Result<FrameSample, CaptureError> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| CaptureError::Failed(e.to_string()))?;
            self.line_no += 1;

            let Some(line) = line else {
                return Err(CaptureError::Exhausted);
            };
            if line.trim().is_empty() {
                continue;
            }

            let (captured_at, hand) = self.parse(&line)?;
            if self.realtime {
                tokio::time::sleep_until(captured_at.into()).await;
            }
            return Ok(FrameSample::new(captured_at, hand));
        }
    }
}
