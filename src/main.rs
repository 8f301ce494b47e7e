use std::io;

use actix_web::{web, HttpServer};
use clap::Parser;
use log::info;

mod config;
mod db;
mod errors;
mod models;
mod routes;

/// Builds the application around a shared `web::Data<Database>`.
macro_rules! todo_app {
    ($db:expr) => {
        actix_web::App::new()
            .app_data($db)
            .wrap(actix_web::middleware::NormalizePath::new(
                actix_web::middleware::TrailingSlash::Trim,
            ))
            .wrap(actix_web::middleware::Logger::default())
            .wrap(actix_cors::Cors::permissive())
            .configure($crate::routes::entry::configure_routes)
    };
}
pub(crate) use todo_app;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = config::Config::parse();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    let database = db::Database::open(&config.database).map_err(io::Error::other)?;
    let entries = database
        .lock_entry_table()
        .and_then(|entry_table| entry_table.count())
        .map_err(io::Error::other)?;
    let app_data = web::Data::new(database);

    info!(
        "event=server_start module=main host={} port={} database={} entries={entries}",
        config.host,
        config.port,
        config.database.display()
    );
    HttpServer::new(move || todo_app!(app_data.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
