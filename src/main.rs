use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};

use taskboard::config::Config;
use taskboard::db;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let pool = db::connect(&config.database_url, config.max_connections)
        .await
        .map_err(|e| {
            error!("Failed to create pool: {}", e);
            io::Error::new(io::ErrorKind::Other, e)
        })?;

    db::bootstrap(&pool).await.map_err(|e| {
        error!("Failed to prepare database: {}", e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;

    info!("Server running at http://{}", config.server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .configure(taskboard::configure)
    })
    .bind(&config.server_address)?
    .run()
    .await
}
