//! # rshttpd - entry point
//! src/main.rs

use rshttpd::config::Config;
use rshttpd::server::Server;

fn main() {
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    let mut server = Server::new(config);
    if let Err(e) = server.run() {
        eprintln!("Fatal server error: {}", e);
        std::process::exit(1);
    }
}
