use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};

use crate::{init::shutdown::GracefulShutdown, start::burst::Burst};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Drives one [`Burst`] per tick until shutdown.
#[derive(Debug)]
pub struct Scheduler {
    burst: Burst,
    period: Duration,
}

impl Scheduler {
    pub fn new(burst: Burst) -> Self {
        Self::with_period(burst, TICK_PERIOD)
    }

    /// # Panics
    ///
    /// `run` panics if `period` is zero.
    pub fn with_period(burst: Burst, period: Duration) -> Self {
        Self { burst, period }
    }

    pub fn burst(&self) -> &Burst {
        &self.burst
    }

    /// Runs until `shutdown` is initiated and returns the number of bursts fired.
    ///
    /// The first burst goes out one period after start. A burst is awaited
    /// before the next tick is considered, so bursts never overlap; a burst
    /// that overruns the period pushes the following ticks back.
    pub async fn run(&self, shutdown: &GracefulShutdown) -> u64 {
        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut fired = 0;
        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait_shutting_down() => break,
                _ = ticker.tick() => {}
            }
            self.burst.fire().await;
            fired += 1;
        }
        log::debug!("scheduler stopped after {fired} burst(s)");
        fired
    }
}
