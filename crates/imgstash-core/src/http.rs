//! Streaming HTTP GET over libcurl.
//!
//! libcurl pushes body bytes through a callback; a worker thread runs the
//! transfer and forwards each chunk over a bounded channel so callers get a
//! plain blocking [`Read`].

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::error::{Result, TransferError};
use crate::resource::ResourceOpener;

/// Chunks buffered between the curl worker and the reader.
const CHANNEL_DEPTH: usize = 16;

/// Per-request curl settings.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_redirects: u32,
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

impl From<&HttpConfig> for HttpOptions {
    fn from(cfg: &HttpConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.timeout(),
            max_redirects: cfg.max_redirects,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Opens http/https links as streaming bodies.
#[derive(Debug, Clone, Default)]
pub struct HttpOpener {
    options: HttpOptions,
}

impl HttpOpener {
    pub fn new(options: HttpOptions) -> Self {
        Self { options }
    }
}

impl ResourceOpener for HttpOpener {
    fn open(&self, link: &str) -> Result<Box<dyn Read + Send>> {
        Ok(Box::new(HttpStream::get(link, self.options.clone())?))
    }
}

enum Message {
    Data(Vec<u8>),
    Done,
    Failed(io::Error),
}

/// Response body of an in-flight GET. Transfer errors (connection, timeout,
/// HTTP status >= 400) are returned from `read`. Dropping the stream aborts the
/// transfer and waits for the worker to exit; a stalled transfer notices within
/// about a second, when libcurl next reports progress.
pub struct HttpStream {
    rx: Option<Receiver<Message>>,
    cancelled: Arc<AtomicBool>,
    buf: Vec<u8>,
    pos: usize,
    finished: bool,
    worker: Option<JoinHandle<()>>,
}

impl HttpStream {
    pub fn get(url: &str, options: HttpOptions) -> Result<Self> {
        let (tx, rx) = mpsc::sync_channel(CHANNEL_DEPTH);
        let url = url.to_string();
        let cancelled = Arc::new(AtomicBool::new(false));
        let worker_cancelled = Arc::clone(&cancelled);
        let worker = std::thread::Builder::new()
            .name("imgstash-http".to_string())
            .spawn(move || run_transfer(&url, &options, tx, &worker_cancelled))
            .map_err(TransferError::Stream)?;
        Ok(Self {
            rx: Some(rx),
            cancelled,
            buf: Vec::new(),
            pos: 0,
            finished: false,
            worker: Some(worker),
        })
    }
}

impl Read for HttpStream {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.pos < self.buf.len() {
                let n = out.len().min(self.buf.len() - self.pos);
                out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }
            if self.finished {
                return Ok(0);
            }
            let Some(rx) = self.rx.as_ref() else {
                return Ok(0);
            };
            match rx.recv() {
                Ok(Message::Data(chunk)) => {
                    self.buf = chunk;
                    self.pos = 0;
                }
                Ok(Message::Done) => self.finished = true,
                Ok(Message::Failed(e)) => {
                    self.finished = true;
                    return Err(e);
                }
                Err(_) => {
                    self.finished = true;
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "http worker exited before end of body",
                    ));
                }
            }
        }
    }
}

impl Drop for HttpStream {
    fn drop(&mut self) {
        // Either flag makes the worker abort: cancel for idle transfers, closed channel for writes.
        self.cancelled.store(true, Ordering::Relaxed);
        self.rx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("http worker panicked");
            }
        }
    }
}

fn run_transfer(
    url: &str,
    options: &HttpOptions,
    tx: SyncSender<Message>,
    cancelled: &AtomicBool,
) {
    let msg = match perform(url, options, &tx, cancelled) {
        Ok(()) => Message::Done,
        Err(e) => {
            tracing::debug!(url, "GET failed: {}", e);
            Message::Failed(e)
        }
    };
    let _ = tx.send(msg);
}

fn perform(
    url: &str,
    options: &HttpOptions,
    tx: &SyncSender<Message>,
    cancelled: &AtomicBool,
) -> io::Result<()> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(curl_io)?;
    easy.follow_location(true).map_err(curl_io)?;
    easy.max_redirections(options.max_redirects).map_err(curl_io)?;
    easy.fail_on_error(true).map_err(curl_io)?;
    easy.useragent(&options.user_agent).map_err(curl_io)?;
    easy.connect_timeout(options.connect_timeout).map_err(curl_io)?;
    easy.timeout(options.timeout).map_err(curl_io)?;
    easy.progress(true).map_err(curl_io)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match tx.send(Message::Data(data.to_vec())) {
                Ok(()) => Ok(data.len()),
                // Reader is gone; a short count aborts the transfer.
                Err(_) => Ok(0),
            })
            .map_err(curl_io)?;
        // Returning false aborts the transfer; this also fires while no data arrives.
        transfer
            .progress_function(|_, _, _, _| !cancelled.load(Ordering::Relaxed))
            .map_err(curl_io)?;
        transfer.perform().map_err(curl_io)?;
    }

    let code = easy.response_code().map_err(curl_io)?;
    if !(200..300).contains(&code) {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("GET {url} returned HTTP {code}"),
        ));
    }
    Ok(())
}

fn curl_io(e: curl::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}
