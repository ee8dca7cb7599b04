//! # rshttpd
//! src/lib.rs
//!
//! A minimal concurrent HTTP server built from scratch: a single acceptor
//! thread hands accepted TCP connections to a bounded FIFO queue, and a
//! fixed pool of worker threads parses one request off each connection and
//! renders one response (canned text, simulated-delay text, a static file
//! under the document root, or 404).
//!
//! ## Architecture
//!
//! ```text
//! acceptor → task queue → worker pool → (request parse → render) → close
//! ```
//!
//! - `http`: request parsing, response construction, status codes
//! - `queue`: the bounded blocking FIFO between acceptor and workers
//! - `render`: the response decision ladder and static file resolution
//! - `server`: acceptor loop, worker pool, per-connection handling
//! - `config`: CLI/env configuration
//! - `metrics`: request counters, worker gauge, latency percentiles
//!
//! ## Example
//!
//! ```no_run
//! use rshttpd::config::Config;
//! use rshttpd::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.run().expect("server failed");
//! ```

pub mod config;
pub mod http;
pub mod metrics;
pub mod queue;
pub mod render;
pub mod server;
