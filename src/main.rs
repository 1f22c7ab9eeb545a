use std::net::SocketAddr;
use std::sync::Arc;

use astra::Server;

use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::mailings::provider_from_config;
use crate::responses::error_to_response;
use crate::router::{handle, AppState};

mod config;
mod db;
mod domain;
mod errors;
mod ingest;
mod mailings;
mod responses;
mod router;
mod spreadsheets;
mod templates;
mod webhooks;

#[cfg(test)]
mod tests;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = AppConfig::from_env();

    // Create the database handle and run the schema
    let db = Database::new(config.db_path.clone());
    if let Err(e) = init_db(&db, "sql/schema.sql") {
        eprintln!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    let provider = provider_from_config(&config);

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Invalid bind address {:?}: {e}", config.bind_addr);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState {
        db,
        provider,
        config,
    });

    log::info!("Starting server at http://{addr}");
    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        eprintln!("Server ended with error: {e}");
    }
}
