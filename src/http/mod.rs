//! # HTTP module
//!
//! Hand-rolled HTTP/1.x support: enough of the protocol to read one request
//! off a connection and write one response back.
//!
//! - Streaming request parsing from any `BufRead` source
//! - Response construction with explicit `Content-Length` framing
//! - The handful of status codes this server emits
//!
//! Connections are never kept alive; each one carries exactly one
//! request/response exchange.

pub mod request;
pub mod response;
pub mod status;

pub use request::{ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
