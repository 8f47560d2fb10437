use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use anyhow::Result;
use reqwest::Client;
use tokio::task::JoinSet;

use crate::cmd::Config;

/// Outcome of one burst. `issued` is what was sent, whatever came back.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BurstReport {
    pub issued: u64,
    pub succeeded: u64,
    pub failed: u64,
}

impl BurstReport {
    pub fn summary(&self, url: &str) -> String {
        format!("{} request(s) complete to {}", self.issued, url)
    }
}

/// Fires `requests_per_second` concurrent GETs at the target URL.
#[derive(Debug)]
pub struct Burst {
    client: Client,
    config: Arc<Config>,
    issued_total: AtomicU64,
}

impl Burst {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = reqwest::ClientBuilder::new().build()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: Arc<Config>, client: Client) -> Self {
        Self {
            client,
            config,
            issued_total: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Requests sent since this executor was built.
    pub fn issued_total(&self) -> u64 {
        self.issued_total.load(Ordering::Relaxed)
    }

    /// Sends one burst and waits until every request has resolved.
    ///
    /// A failed request is logged and counted; it never aborts the burst.
    pub async fn fire(&self) -> BurstReport {
        let url = &self.config.target_url;
        let size = burst_size(self.config.requests_per_second);
        if size == 0 {
            log::warn!(
                "burst size {} is not positive, nothing sent",
                self.config.requests_per_second
            );
        }

        let mut tasks = JoinSet::new();
        for url in vec![url.clone(); size] {
            let client = self.client.clone();
            tasks.spawn(async move { get(client, url).await });
        }

        let mut report = BurstReport {
            issued: size as u64,
            ..Default::default()
        };
        while let Some(res) = tasks.join_next().await {
            match res {
                Ok(Ok(())) => report.succeeded += 1,
                Ok(Err(e)) => {
                    report.failed += 1;
                    log::warn!("Request failed: {:#}", anyhow::Error::from(e));
                }
                Err(e) => {
                    report.failed += 1;
                    log::warn!("Request failed: {e}");
                }
            }
        }

        let total = self.issued_total.fetch_add(report.issued, Ordering::Relaxed) + report.issued;
        log::info!("{}", report.summary(url));
        log::debug!(
            "{} ok, {} failed, {total} request(s) issued since start",
            report.succeeded,
            report.failed
        );
        report
    }
}

/// Negative sizes clamp to an empty burst.
fn burst_size(requests_per_second: i64) -> usize {
    usize::try_from(requests_per_second).unwrap_or(0)
}

// Status and body are not judged: any response that arrives in full is a success.
async fn get(client: Client, url: String) -> reqwest::Result<()> {
    let resp = client.get(url).send().await?;
    resp.bytes().await?;
    Ok(())
}
