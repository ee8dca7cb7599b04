//! # Concurrent TCP server
//! src/server/tcp.rs
//!
//! Acceptor loop, worker pool, and per-connection handling.
//!
//! Data flow: acceptor → task queue → worker → (request parse → response
//! render) → connection closed. The queue is the only state shared between
//! the acceptor and the workers; each connection is owned by exactly one
//! thread at a time, so there is no double-close and no cross-connection
//! interference.
//!
//! Backpressure: when the queue is full the acceptor blocks in `put` and
//! simply stops accepting until a worker frees a slot.
//!
//! Failures are isolated per connection. A request that fails to parse
//! gets a best-effort 400 and the worker moves on to the next connection;
//! only listen-setup failures and non-transient accept errors are fatal.

use crate::config::Config;
use crate::http::{Request, Response, StatusCode};
use crate::metrics::MetricsCollector;
use crate::queue::TaskQueue;
use crate::render::{self, RenderContext};
use std::io::{self, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Concurrent HTTP server with a bounded connection queue
pub struct Server {
    config: Config,
    context: Arc<RenderContext>,
    metrics: MetricsCollector,
    queue: Arc<TaskQueue<TcpStream>>,
    listener: Option<TcpListener>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let context = Arc::new(RenderContext::from_config(&config));
        let queue = Arc::new(TaskQueue::new(config.queue_capacity));

        Self {
            config,
            context,
            metrics: MetricsCollector::new(),
            queue,
            listener: None,
        }
    }

    /// Binds the listening socket and returns the bound address.
    ///
    /// Separate from [`run`](Self::run) so callers (tests in particular)
    /// can bind port 0 and learn the ephemeral port before starting the
    /// accept loop.
    pub fn bind(&mut self) -> io::Result<SocketAddr> {
        let listener = TcpListener::bind(self.config.address())?;
        let addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(addr)
    }

    /// Handle to the server's metrics collector.
    pub fn metrics(&self) -> MetricsCollector {
        self.metrics.clone()
    }

    /// Starts the worker pool and runs the accept loop.
    ///
    /// Blocks the calling thread indefinitely under normal operation.
    /// Returns an error if binding fails or a non-transient accept error
    /// occurs.
    pub fn run(&mut self) -> io::Result<()> {
        if self.listener.is_none() {
            let addr = self.bind()?;
            println!("[+] Listening on {}", addr);
        }
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => return Err(io::Error::new(io::ErrorKind::Other, "listener missing")),
        };

        self.spawn_workers();
        self.accept_loop(&listener)
    }

    /// Spawns the fixed worker pool.
    fn spawn_workers(&self) {
        for id in 0..self.config.workers {
            let queue = Arc::clone(&self.queue);
            let context = Arc::clone(&self.context);
            let metrics = self.metrics.clone();
            let max_line_length = self.config.max_line_length;

            thread::spawn(move || {
                Self::worker_loop(id, queue, context, metrics, max_line_length)
            });
        }
        println!("[+] Started {} workers", self.config.workers);
    }

    /// Acceptor: blocks on accept, hands each connection to the queue.
    fn accept_loop(&self, listener: &TcpListener) -> io::Result<()> {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if self.queue.is_full() {
                        println!(
                            "[*] Queue saturated ({} queued); stalling acceptor",
                            self.queue.capacity()
                        );
                    }
                    self.queue.put(stream);
                }
                Err(e) if is_transient_accept_error(&e) => {
                    eprintln!("[!] Transient accept error, continuing: {}", e);
                }
                Err(e) => {
                    eprintln!("[!] Fatal accept error: {}", e);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Worker: dequeue a connection, process it, close it, repeat.
    fn worker_loop(
        id: usize,
        queue: Arc<TaskQueue<TcpStream>>,
        context: Arc<RenderContext>,
        metrics: MetricsCollector,
        max_line_length: usize,
    ) {
        println!("[+] Worker {} started", id);

        loop {
            let stream = queue.get();
            metrics.worker_started();

            if let Err(e) = Self::handle_connection(stream, &context, &metrics, max_line_length) {
                eprintln!("[!] Worker {}: connection error: {}", id, e);
            }

            metrics.worker_finished();
            // Stream dropped above: connection closed exactly once.
        }
    }

    /// Processes one connection: parse the request, render and flush the
    /// response.
    ///
    /// A parse failure is answered with a best-effort 400 and is not an
    /// error from this function's point of view; only transport failures
    /// propagate.
    fn handle_connection(
        stream: TcpStream,
        context: &RenderContext,
        metrics: &MetricsCollector,
        max_line_length: usize,
    ) -> io::Result<()> {
        let start = Instant::now();
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut stream = stream;

        let response = match Request::parse(&mut reader, max_line_length) {
            Ok(request) => render::render(&request, context),
            Err(e) => {
                metrics.record_parse_failure();
                eprintln!("[!] Parse error: {}", e);
                Response::error(StatusCode::BadRequest, &format!("Invalid request: {}", e))
            }
        };

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        metrics.record_request(response.status().as_u16(), start.elapsed());
        Ok(())
    }
}

/// Accept errors that do not invalidate the listening socket.
fn is_transient_accept_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
    )
}
