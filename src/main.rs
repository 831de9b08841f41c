use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;

use tasknest::auth::{AuthMiddleware, SessionKeys};
use tasknest::config::Config;
use tasknest::routes;
use tasknest::routes::health;
use tasknest::store::{memory::MemoryStore, postgres::PgStore, Store};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let keys = SessionKeys::from_secret(&config.session_secret);
    let visibility = config.task_visibility;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPool::connect(database_url)
                .await
                .expect("Failed to connect to database");
            if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
                // The schema may already be in place from a manual setup.
                log::warn!("migrations did not run cleanly: {}", e);
            }
            Arc::new(PgStore::new(pool))
        }
        None => {
            log::warn!("DATABASE_URL not set; using in-memory store, data will not survive restarts");
            Arc::new(MemoryStore::new())
        }
    };

    log::info!(
        "Starting tasknest server at {} (task visibility: {:?})",
        config.server_url(),
        visibility
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::new(keys.clone()))
            .app_data(web::Data::new(visibility))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
