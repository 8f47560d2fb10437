use std::sync::Arc;

use anyhow::Result;

pub mod cmd;
mod common;
pub mod init;
pub mod start;
#[cfg(test)]
mod testing;

pub use cmd::Config;
pub use start::{Burst, BurstReport, Scheduler};

pub async fn run() -> Result<()> {
    let config = Arc::new(init::cmd::init()?);
    let shutdown = init::shutdown::init()?;

    announce_start();
    let burst = Burst::new(config)?;
    let fired = Scheduler::new(burst).run(&shutdown).await;
    log::info!("Shutdown complete after {fired} burst(s).");
    Ok(())
}

fn announce_start() {
    log::info!("🚀 Starting loadgen: {}", chrono::Local::now());
}
