mod api;
mod config;
mod web_error;

use actix_web::{middleware, App, HttpServer};

use common::log::tracing_factory::TracingFactory;
use config::constant::CFG;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    TracingFactory::init_log(cfg!(debug_assertions));

    let host = CFG.server.host.clone();
    let port = CFG.server.port;

    tracing::info!("starting IDMS-to-MySQL migration server at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .service(api::migration::migrate_idms_mysql)
            .wrap(middleware::Logger::default())
    })
    .workers(2)
    .bind((host, port))?
    .run()
    .await
}
