//! Test helpers: an in-process HTTP/1.1 responder that answers every request
//! with a fixed status and counts what it saw, and a `log` sink that records
//! the lines emitted on the current thread.

use std::{
    cell::RefCell,
    net::SocketAddr,
    sync::{
        Arc, Once,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use log::{Level, LevelFilter, Log, Metadata, Record};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicUsize,
    inflight: AtomicUsize,
    max_inflight: AtomicUsize,
}

pub(crate) struct TestServer {
    addr: SocketAddr,
    counters: Arc<Counters>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub(crate) async fn start() -> Self {
        Self::with(200, Duration::ZERO).await
    }

    pub(crate) async fn with(status: u16, delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let counters = Arc::new(Counters::default());

        let handle = tokio::spawn({
            let counters = counters.clone();
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let counters = counters.clone();
                    tokio::spawn(async move {
                        let _ = respond(stream, status, delay, &counters).await;
                    });
                }
            }
        });

        Self {
            addr,
            counters,
            handle,
        }
    }

    pub(crate) fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub(crate) fn hits(&self) -> usize {
        self.counters.hits.load(Ordering::SeqCst)
    }

    pub(crate) fn max_inflight(&self) -> usize {
        self.counters.max_inflight.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An address nothing listens on.
pub(crate) async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

async fn respond(
    mut stream: TcpStream,
    status: u16,
    delay: Duration,
    counters: &Counters,
) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        head.extend_from_slice(&chunk[..n]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let now = counters.inflight.fetch_add(1, Ordering::SeqCst) + 1;
    counters.max_inflight.fetch_max(now, Ordering::SeqCst);
    counters.hits.fetch_add(1, Ordering::SeqCst);

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    counters.inflight.fetch_sub(1, Ordering::SeqCst);

    let body = "ok";
    let resp = format!(
        "HTTP/1.1 {status} Test\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(resp.as_bytes()).await?;
    stream.shutdown().await
}

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.with(|lines| {
            lines
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Starts recording log lines for the calling thread.
///
/// `#[tokio::test]` runs on a current-thread runtime, so everything logged by
/// the code under test (outside spawned blocking work) lands here.
pub(crate) fn capture_logs() -> LogCapture {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });
    CAPTURED.with(|lines| lines.borrow_mut().clear());
    LogCapture
}

pub(crate) struct LogCapture;

impl LogCapture {
    pub(crate) fn lines(&self) -> Vec<(Level, String)> {
        CAPTURED.with(|lines| lines.borrow().clone())
    }

    /// Messages at `level` that start with `prefix`.
    pub(crate) fn matching(&self, level: Level, prefix: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, msg)| *l == level && msg.starts_with(prefix))
            .map(|(_, msg)| msg)
            .collect()
    }

    pub(crate) fn summaries(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, msg)| *l == Level::Info && msg.contains(" request(s) complete to "))
            .map(|(_, msg)| msg)
            .collect()
    }
}
