//! Results web server: REST API for group tables, brackets and rankings.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! RESULTS_DATA_DIR persists results as JSON files; REGISTRY_CSV preloads registrations.

use actix_web::{web::Data, App, HttpServer};
use tt_results::api::{configure, AppState};
use tt_results::{AppConfig, ParticipantRegistry, ResultsStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();

    let store = match &config.data_dir {
        Some(dir) => ResultsStore::open(dir.clone())
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?,
        None => {
            log::warn!("RESULTS_DATA_DIR not set; results are kept in memory only");
            ResultsStore::in_memory()
        }
    };

    let registry = match &config.registry_csv {
        Some(path) => ParticipantRegistry::from_csv_path(path)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?,
        None => ParticipantRegistry::new(),
    };

    let state = Data::new(AppState::new(store, registry));

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(bind)?
        .run()
        .await
}
