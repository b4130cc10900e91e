//! Per-frame diagnostics sink

use crate::renderer::Viewport;
use std::time::Duration;

/// Summary of one render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub changed: usize,
    pub elapsed: Duration,
    pub viewport: Viewport,
}

/// Receives stats after every render
pub trait FrameObserver: Send {
    fn frame_rendered(&mut self, stats: &FrameStats);
}

/// Writes frame timing to the `log` facade at debug level
#[derive(Debug, Default)]
pub struct LogObserver;

impl FrameObserver for LogObserver {
    fn frame_rendered(&mut self, stats: &FrameStats) {
        log::debug!(
            "frame {}: {} cells changed in {:.2} ms ({}x{} viewport)",
            stats.frame,
            stats.changed,
            stats.elapsed.as_secs_f64() * 1000.0,
            stats.viewport.width,
            stats.viewport.height,
        );
    }
}
