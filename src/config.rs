//! # Server configuration
//! src/config.rs
//!
//! Startup configuration for the server, sourced from CLI arguments and
//! environment variables.
//!
//! ## CLI
//! ```bash
//! ./rshttpd --port 8008 --workers 4 --queue-capacity 10 --document-root ./dist
//! ```
//!
//! ## Environment
//! ```bash
//! HTTP_PORT=8008 WORKERS=8 ./rshttpd
//! ```

use clap::Parser;

/// Configuration for the concurrent HTTP server
#[derive(Debug, Clone, Parser)]
#[command(name = "rshttpd")]
#[command(about = "Minimal concurrent HTTP server with a bounded connection queue")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Port the server listens on
    #[arg(short, long, default_value = "8008", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP the server binds to
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directory static files are served from
    #[arg(long = "document-root", default_value = "./dist", env = "DOCUMENT_ROOT")]
    pub document_root: String,

    /// Number of worker threads consuming the connection queue
    #[arg(long, default_value = "4", env = "WORKERS")]
    pub workers: usize,

    /// Capacity of the connection queue; a full queue stalls the acceptor
    #[arg(long = "queue-capacity", default_value = "10", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Simulated delay for GET /sleep, in milliseconds
    #[arg(long = "sleep-ms", default_value = "1000", env = "SLEEP_MS")]
    pub sleep_ms: u64,

    /// Maximum accepted length of a request or header line, in bytes
    #[arg(long = "max-line-length", default_value = "8192", env = "MAX_LINE_LENGTH")]
    pub max_line_length: usize,
}

impl Config {
    /// Parses the configuration from CLI arguments and environment variables.
    pub fn new() -> Self {
        Config::parse()
    }

    /// Full bind address (host:port).
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Rejects configurations the server cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }
        if self.queue_capacity == 0 {
            return Err("Queue capacity must be >= 1".to_string());
        }
        if self.max_line_length < 16 {
            return Err("Max line length must be >= 16".to_string());
        }
        Ok(())
    }

    /// Prints a startup summary of the configuration.
    pub fn print_summary(&self) {
        println!("rshttpd configuration");
        println!("   Address:        {}", self.address());
        println!("   Document root:  {}", self.document_root);
        println!("   Workers:        {}", self.workers);
        println!("   Queue capacity: {}", self.queue_capacity);
        println!("   Sleep delay:    {} ms", self.sleep_ms);
        println!("   Max line:       {} bytes", self.max_line_length);
        println!();
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8008,
            host: "127.0.0.1".to_string(),
            document_root: "./dist".to_string(),
            workers: 4,
            queue_capacity: 10,
            sleep_ms: 1000,
            max_line_length: 8192,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8008);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.document_root, "./dist");
        assert_eq!(config.workers, 4);
        assert_eq!(config.queue_capacity, 10);
    }

    #[test]
    fn test_address() {
        let config = Config::default();
        assert_eq!(config.address(), "127.0.0.1:8008");
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "0.0.0.0".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_workers() {
        let mut config = Config::default();
        config.workers = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Workers"));
    }

    #[test]
    fn test_validate_zero_queue_capacity() {
        let mut config = Config::default();
        config.queue_capacity = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Queue capacity"));
    }

    #[test]
    fn test_validate_tiny_max_line() {
        let mut config = Config::default();
        config.max_line_length = 8;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Max line length"));
    }

    #[test]
    fn test_validate_one_worker_one_slot() {
        let mut config = Config::default();
        config.workers = 1;
        config.queue_capacity = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_custom_values() {
        let mut config = Config::default();
        config.port = 9000;
        config.workers = 8;
        config.queue_capacity = 64;
        config.sleep_ms = 250;

        assert_eq!(config.port, 9000);
        assert_eq!(config.workers, 8);
        assert_eq!(config.queue_capacity, 64);
        assert_eq!(config.sleep_ms, 250);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_print_summary() {
        let config = Config::default();
        // Should not panic
        config.print_summary();
    }
}
