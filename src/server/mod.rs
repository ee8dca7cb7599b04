//! # Server module
//! src/server/mod.rs
//!
//! The concurrent dispatch pipeline: a single acceptor thread feeds
//! accepted connections into the bounded task queue, and a fixed pool of
//! worker threads drains it, each fully processing one connection at a
//! time.

pub mod tcp;

pub use tcp::Server;
