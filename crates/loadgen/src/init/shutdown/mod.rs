use std::sync::Arc;

use anyhow::Result;
use mea::{condvar::Condvar, mutex::Mutex};

mod ctrlc;

pub fn init() -> Result<GracefulShutdown> {
    let ctrlc = ctrlc::init()?;
    let shutdown = GracefulShutdown::new();
    termination(ctrlc, shutdown.clone());
    Ok(shutdown)
}

fn termination(ctrlc: ctrlc2::AsyncCtrlC, shutdown_for_signal: GracefulShutdown) {
    tokio::spawn(async move {
        let _ = ctrlc.await;
        log::info!("Shutdown requested (Ctrl+C). Letting the current burst finish...");
        shutdown_for_signal.initiate().await;
    });
}

#[derive(Clone, Debug)]
pub struct GracefulShutdown {
    inner: Arc<GracefulShutdownInner>,
}

#[derive(Debug)]
struct GracefulShutdownInner {
    shutting_down: Mutex<bool>,
    cv: Condvar,
}

impl Default for GracefulShutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl GracefulShutdown {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(GracefulShutdownInner {
                shutting_down: Mutex::new(false),
                cv: Condvar::new(),
            }),
        }
    }

    pub async fn initiate(&self) {
        let mut shutting_down = self.inner.shutting_down.lock().await;
        if *shutting_down {
            return;
        }
        *shutting_down = true;
        self.inner.cv.notify_all();
    }

    pub async fn is_shutting_down(&self) -> bool {
        *self.inner.shutting_down.lock().await
    }

    pub async fn wait_shutting_down(&self) {
        let mut shutting_down = self.inner.shutting_down.lock().await;
        while !*shutting_down {
            shutting_down = self.inner.cv.wait(shutting_down).await;
        }
    }
}
