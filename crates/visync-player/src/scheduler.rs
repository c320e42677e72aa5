use std::time::Duration;

use async_trait::async_trait;

/// Paces the sync loop, one call per animation frame
#[async_trait]
pub trait FrameScheduler: Send + Sync {
    /// Resolves when the next frame is due
    async fn next_frame(&self);
}

/// Fixed-rate frame ticks
#[derive(Debug, Clone, Copy)]
pub struct IntervalScheduler {
    period: Duration,
}

impl IntervalScheduler {
    /// Ticks `frame_rate` times per second; 0 is treated as 1
    pub fn new(frame_rate: u32) -> Self {
        Self::from_period(Duration::from_secs(1) / frame_rate.max(1))
    }

    pub const fn from_period(period: Duration) -> Self {
        Self { period }
    }

    pub const fn period(&self) -> Duration {
        self.period
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new(60)
    }
}

#[async_trait]
impl FrameScheduler for IntervalScheduler {
    async fn next_frame(&self) {
        tokio::time::sleep(self.period).await;
    }
}
